use thiserror::Error;

/// Fewest observations the fit will accept: two to seed level and trend,
/// two more to produce a usable residual estimate.
pub const MIN_FIT_POINTS: usize = 4;

/// Ways a fit can fail. These are control flow for the forecaster, not
/// crate errors: each one routes the caller into the linear fallback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrendError {
    #[error("Series too short to fit a trend model: {0} points")]
    TooShort(usize),

    #[error("Series is degenerate: fewer than two distinct values")]
    DegenerateSeries,

    #[error("Series contains a non-finite value")]
    NonFinite,
}

/// Holt's linear trend model (double exponential smoothing).
///
/// Fitting keeps a smoothed level and a smoothed per-step trend, choosing
/// the smoothing weights by grid search over the one-step-ahead squared
/// error. Prediction extrapolates `level + h * trend` with a symmetric
/// interval built from the residual deviation at the requested confidence
/// level. Deterministic for identical inputs.
#[derive(Debug, Clone)]
pub struct TrendModel {
    level: f64,
    trend: f64,
    alpha: f64,
    beta: f64,
    residual_sigma: f64,
    z_score: f64,
}

/// Point predictions with their confidence bounds, one entry per step.
#[derive(Debug, Clone)]
pub struct TrendForecast {
    pub values: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl TrendModel {
    /// Fits the model to an evenly spaced series.
    ///
    /// `confidence_level` is the two-sided interval mass, in (0, 1).
    pub fn fit(series: &[f64], confidence_level: f64) -> Result<Self, TrendError> {
        if series.len() < MIN_FIT_POINTS {
            return Err(TrendError::TooShort(series.len()));
        }
        if series.iter().any(|value| !value.is_finite()) {
            return Err(TrendError::NonFinite);
        }
        if series.iter().all(|value| *value == series[0]) {
            return Err(TrendError::DegenerateSeries);
        }

        let z_score = normal_quantile(0.5 + confidence_level / 2.0);
        if !z_score.is_finite() {
            return Err(TrendError::NonFinite);
        }

        // Grid-search the smoothing weights. Strict improvement keeps the
        // first-best combination, so ties resolve deterministically.
        let mut best: Option<(f64, f64, f64, f64, f64)> = None;
        for alpha_step in 1..=9 {
            let alpha = alpha_step as f64 / 10.0;
            for beta_step in 1..=9 {
                let beta = beta_step as f64 / 10.0;
                let (level, trend, sse) = smooth(series, alpha, beta);
                if best.map_or(true, |(best_sse, ..)| sse < best_sse) {
                    best = Some((sse, alpha, beta, level, trend));
                }
            }
        }

        let (sse, alpha, beta, level, trend) = best.unwrap_or((0.0, 0.5, 0.5, series[0], 0.0));
        let residual_sigma = (sse / (series.len() as f64 - 2.0)).sqrt();
        if !level.is_finite() || !trend.is_finite() || !residual_sigma.is_finite() {
            return Err(TrendError::NonFinite);
        }

        Ok(Self {
            level,
            trend,
            alpha,
            beta,
            residual_sigma,
            z_score,
        })
    }

    /// Predicts `horizon` steps past the end of the fitted series.
    pub fn predict(&self, horizon: usize) -> TrendForecast {
        let mut values = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        // Interval variance for step h inflates by the smoothing response
        // of every earlier step: 1 + sum_{j=1}^{h-1} (alpha * (1 + j*beta))^2.
        let mut variance_inflation: f64 = 1.0;
        for step in 1..=horizon {
            let value = self.level + step as f64 * self.trend;
            let half_width = self.z_score * self.residual_sigma * variance_inflation.sqrt();
            values.push(value);
            lower.push(value - half_width);
            upper.push(value + half_width);

            let j = step as f64;
            variance_inflation += (self.alpha * (1.0 + j * self.beta)).powi(2);
        }

        TrendForecast {
            values,
            lower,
            upper,
        }
    }
}

/// One Holt pass: returns the final level, final trend, and the summed
/// one-step-ahead squared error.
fn smooth(series: &[f64], alpha: f64, beta: f64) -> (f64, f64, f64) {
    let mut level = series[0];
    let mut trend = series[1] - series[0];
    let mut sse = 0.0;

    for &observed in &series[1..] {
        let predicted = level + trend;
        let error = observed - predicted;
        sse += error * error;

        let next_level = alpha * observed + (1.0 - alpha) * (level + trend);
        trend = beta * (next_level - level) + (1.0 - beta) * trend;
        level = next_level;
    }

    (level, trend, sse)
}

/// Inverse standard normal CDF, Acklam's rational approximation
/// (|relative error| < 1.15e-9). Returns NaN outside (0, 1).
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if !(p > 0.0 && p < 1.0) {
        return f64::NAN;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rejects_short_series() {
        let result = TrendModel::fit(&[1.0, 2.0, 3.0], 0.95);
        assert_eq!(result.unwrap_err(), TrendError::TooShort(3));
    }

    #[test]
    fn test_fit_rejects_constant_series() {
        let result = TrendModel::fit(&[5.0; 10], 0.95);
        assert_eq!(result.unwrap_err(), TrendError::DegenerateSeries);
    }

    #[test]
    fn test_fit_rejects_non_finite_values() {
        let result = TrendModel::fit(&[1.0, f64::NAN, 3.0, 4.0], 0.95);
        assert_eq!(result.unwrap_err(), TrendError::NonFinite);
    }

    #[test]
    fn test_perfect_line_continues_exactly() {
        let series: Vec<f64> = (0..8).map(|i| 10.0 + 2.0 * i as f64).collect();
        let model = TrendModel::fit(&series, 0.95).unwrap();
        let forecast = model.predict(3);

        // Next values on the line are 26, 28, 30, and a zero-residual fit
        // leaves no interval width.
        for (value, expected) in forecast.values.iter().zip([26.0, 28.0, 30.0]) {
            assert!((value - expected).abs() < 1e-9, "got {}", value);
        }
        for (lower, upper) in forecast.lower.iter().zip(&forecast.upper) {
            assert!((upper - lower).abs() < 1e-9);
        }
    }

    #[test]
    fn test_noisy_trend_is_tracked_and_bounds_widen() {
        let series = [
            100.0, 103.0, 101.5, 106.0, 108.5, 107.0, 111.0, 113.5, 112.0, 116.0,
        ];
        let model = TrendModel::fit(&series, 0.95).unwrap();
        let forecast = model.predict(5);

        assert!(forecast.values[4] > forecast.values[0], "trend should rise");
        let first_width = forecast.upper[0] - forecast.lower[0];
        let last_width = forecast.upper[4] - forecast.lower[4];
        assert!(first_width > 0.0);
        assert!(last_width >= first_width, "intervals should not narrow");
    }

    #[test]
    fn test_interval_width_grows_every_step() {
        let series = [
            100.0, 103.0, 101.5, 106.0, 108.5, 107.0, 111.0, 113.5, 112.0, 116.0,
        ];
        let model = TrendModel::fit(&series, 0.95).unwrap();
        let forecast = model.predict(6);

        // A noisy fit keeps a positive residual deviation, and every step
        // adds a positive smoothing-response term to the interval variance,
        // so each interval is strictly wider than the one before it.
        let widths: Vec<f64> = forecast
            .upper
            .iter()
            .zip(&forecast.lower)
            .map(|(upper, lower)| upper - lower)
            .collect();
        for pair in widths.windows(2) {
            assert!(pair[1] > pair[0], "widths {:?}", widths);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let series = [4.0, 9.0, 6.5, 12.0, 10.0, 15.5, 13.0, 18.0];
        let first = TrendModel::fit(&series, 0.95).unwrap().predict(4);
        let second = TrendModel::fit(&series, 0.95).unwrap().predict(4);
        assert_eq!(first.values, second.values);
        assert_eq!(first.lower, second.lower);
    }

    #[test]
    fn test_normal_quantile_reference_points() {
        assert!(normal_quantile(0.5).abs() < 1e-9);
        assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-5);
        assert!((normal_quantile(0.025) + 1.959964).abs() < 1e-5);
        assert!((normal_quantile(0.01) + 2.326348).abs() < 1e-5);
        assert!(normal_quantile(0.0).is_nan());
        assert!(normal_quantile(1.5).is_nan());
    }
}
