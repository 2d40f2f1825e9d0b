//! Simple Moving Average (SMA) over an arbitrary series.
//!
//! Used by Bollinger (center line) and Stochastic (%D).
//! Lookback: period - 1 past the first defined input.

/// Rolling mean of a series. Any NaN in the window yields NaN.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }

    result
}
