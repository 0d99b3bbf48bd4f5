use crate::cashflow::{BalanceHistory, DailyBalance};
use crate::period::DateWindow;
use crate::trend::{TrendError, TrendModel};
use crate::EngineOptions;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fewest elapsed days before the fallback projects a non-zero daily
/// delta. Below this the early-window average is too noisy to extrapolate.
const MIN_PROJECTION_DAYS: usize = 4;

/// How the projected part of the series was produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ForecastMethod {
    /// Trend model fit over the observed daily balances.
    Model,
    /// Constant daily delta from the observed average net flow.
    LinearProjection,
}

/// The projected segment in its two terminal forms. The model attempt is
/// fallible; its failure selects the linear form instead of surfacing.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastSegment {
    Model {
        balances: Vec<Decimal>,
    },
    Linear {
        balances: Vec<Decimal>,
        daily_delta: Decimal,
    },
}

impl ForecastSegment {
    pub fn method(&self) -> ForecastMethod {
        match self {
            Self::Model { .. } => ForecastMethod::Model,
            Self::Linear { .. } => ForecastMethod::LinearProjection,
        }
    }

    pub fn into_balances(self) -> Vec<Decimal> {
        match self {
            Self::Model { balances } => balances,
            Self::Linear { balances, .. } => balances,
        }
    }
}

/// The full dashboard balance series: observed history spliced with the
/// projection that extends it to the window end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResult {
    /// One point per window day that has history or projection coverage,
    /// ascending.
    pub points: Vec<DailyBalance>,

    /// First index holding a projected value. Equals the series length
    /// when the window ends on or before the reference date.
    pub forecast_start_index: usize,

    /// Absent in the pure-history case.
    pub method: Option<ForecastMethod>,
}

/// Extends the reconstructed history through the window end.
///
/// Days strictly after the reference date form the projection horizon.
/// With no horizon the history is returned as-is. Otherwise the segment
/// comes from the trend model when enough history exists and the fit
/// succeeds, else from the linear fallback; either way the dashboard
/// receives a complete series, never an error.
pub fn project_balances(
    window: &DateWindow,
    reference: NaiveDate,
    history: BalanceHistory,
    options: &EngineOptions,
) -> ForecastResult {
    let forecast_start_index = history.points.len();
    let horizon_days: Vec<NaiveDate> = window.days().filter(|day| *day > reference).collect();

    if horizon_days.is_empty() {
        return ForecastResult {
            points: history.points,
            forecast_start_index,
            method: None,
        };
    }

    let segment = forecast_segment(&history, horizon_days.len(), options);
    let method = segment.method();
    debug!(
        "Forecasting {} days via {:?} after {} observed",
        horizon_days.len(),
        method,
        forecast_start_index
    );

    // Splice. Zipping truncates a too-long segment and tolerates a short
    // one (under-coverage is accepted, gaps are never invented).
    let mut points = history.points;
    points.extend(
        horizon_days
            .iter()
            .zip(segment.into_balances())
            .map(|(date, balance)| DailyBalance {
                date: *date,
                balance,
            }),
    );

    ForecastResult {
        points,
        forecast_start_index,
        method: Some(method),
    }
}

/// Produces the projected balances for `horizon` days past the reference
/// date. Model path first when history allows, linear fallback otherwise.
pub fn forecast_segment(
    history: &BalanceHistory,
    horizon: usize,
    options: &EngineOptions,
) -> ForecastSegment {
    if history.points.len() >= options.min_model_history {
        match model_segment(&history.points, horizon, options.confidence_level) {
            Ok(balances) => return ForecastSegment::Model { balances },
            Err(err) => warn!(
                "Trend model unavailable ({}), falling back to linear projection",
                err
            ),
        }
    } else {
        debug!(
            "{} observed days of {} needed for the model, using linear projection",
            history.points.len(),
            options.min_model_history
        );
    }

    let daily_delta = fallback_daily_delta(history);
    let mut balances = Vec::with_capacity(horizon);
    let mut running = history.reference_balance;
    for _ in 0..horizon {
        running += daily_delta;
        balances.push(running);
    }

    ForecastSegment::Linear {
        balances,
        daily_delta,
    }
}

fn model_segment(
    points: &[DailyBalance],
    horizon: usize,
    confidence_level: f64,
) -> Result<Vec<Decimal>, TrendError> {
    let series: Vec<f64> = points
        .iter()
        .map(|point| point.balance.to_f64().ok_or(TrendError::NonFinite))
        .collect::<Result<_, _>>()?;

    let model = TrendModel::fit(&series, confidence_level)?;
    let forecast = model.predict(horizon);

    forecast
        .values
        .iter()
        .map(|value| Decimal::from_f64(*value).ok_or(TrendError::NonFinite))
        .collect()
}

/// Average observed daily net flow, or zero while the window is too young
/// to average meaningfully.
fn fallback_daily_delta(history: &BalanceHistory) -> Decimal {
    let days_elapsed = history.days_elapsed();
    if days_elapsed >= MIN_PROJECTION_DAYS {
        history.net_flow_to_date() / Decimal::from(days_elapsed as u64)
    } else {
        Decimal::ZERO
    }
}
