use crate::period::DateWindow;
use crate::schema::{CategoryIndex, Transaction};
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point on the reconstructed or projected cumulative-balance series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// The observed part of the balance curve, reconstructed backward from the
/// present-day account total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceHistory {
    /// Balance implied for the moment before the window's first day.
    pub starting_balance: Decimal,

    /// One point per elapsed day, from the window start through the
    /// reference date (or the window end if that comes first). Empty when
    /// the reference date precedes the window.
    pub points: Vec<DailyBalance>,

    /// Running balance at the reference date; the seed any projection
    /// grows from.
    pub reference_balance: Decimal,
}

impl BalanceHistory {
    /// Signed flow observed between the window start and the reference date.
    pub fn net_flow_to_date(&self) -> Decimal {
        self.reference_balance - self.starting_balance
    }

    /// Window days that have already elapsed.
    pub fn days_elapsed(&self) -> usize {
        self.points.len()
    }
}

/// Reconstructs the daily cumulative-balance history for the window.
///
/// The curve is anchored at the known present: `starting_balance` is the
/// current all-account total minus the net flow of every window
/// transaction, so the series always closes exactly on
/// `current_total_balance` once the whole window has elapsed.
///
/// This is a modeling approximation, not ledger replay. It assumes no
/// activity outside the window touches the same accounts, and it subtracts
/// window flows from the *all-account* total without checking which account
/// each transaction belongs to. Out-of-window activity or diverging
/// per-account timing will tilt the reconstructed past, never the present
/// anchor.
pub fn reconstruct_history(
    window: &DateWindow,
    reference: NaiveDate,
    current_total_balance: Decimal,
    transactions: &[Transaction],
    categories: &CategoryIndex,
) -> BalanceHistory {
    // 1. Net flow per window day, dense.
    let mut net_by_day: BTreeMap<NaiveDate, Decimal> =
        window.days().map(|day| (day, Decimal::ZERO)).collect();
    let mut total_net_flow = Decimal::ZERO;

    for transaction in transactions {
        let effect = categories.net_effect(transaction);
        if effect.is_zero() {
            continue;
        }
        // Same stray rule as the aggregator: only window days exist.
        if let Some(slot) = net_by_day.get_mut(&transaction.date) {
            *slot += effect;
            total_net_flow += effect;
        }
    }

    // 2. Anchor backward so the curve closes on the present total.
    let starting_balance = current_total_balance - total_net_flow;

    // 3. Walk day by day up to yesterday, one point per elapsed day.
    let mut points: Vec<DailyBalance> = Vec::new();
    let mut running = starting_balance;
    for day in window.days().take_while(|day| *day < reference) {
        running += net_by_day[&day];
        points.push(DailyBalance {
            date: day,
            balance: running,
        });
    }

    // 4. The reference day itself becomes the last observed point.
    if window.contains(reference) {
        running += net_by_day[&reference];
        points.push(DailyBalance {
            date: reference,
            balance: running,
        });
    }

    debug!(
        "Reconstructed balance history: starting {}, {} observed days, reference balance {}",
        starting_balance,
        points.len(),
        running
    );

    BalanceHistory {
        starting_balance,
        points,
        reference_balance: running,
    }
}
