//! Vortex Indicator — directional flow pair.
//!
//! Per bar (needs the previous bar):
//! - TR  = max(|high - low|, |high - prev_close|, |low - prev_close|)
//! - VM+ = |high - prev_low|
//! - VM- = |low - prev_high|
//!
//! VI+ = sum(VM+, L) / sum(TR, L), VI- = sum(VM-, L) / sum(TR, L).
//! A zero true-range sum sets both lines to 1.0.
//! Lookback: L (every bar in the window needs a predecessor).

use super::Indicator;
use crate::domain::Candle;

/// Which line of the Vortex pair to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VortexLine {
    Plus,
    Minus,
}

#[derive(Debug, Clone)]
pub struct Vortex {
    period: usize,
    line: VortexLine,
    name: String,
}

impl Vortex {
    pub fn plus(period: usize) -> Self {
        assert!(period >= 1, "Vortex period must be >= 1");
        Self {
            period,
            line: VortexLine::Plus,
            name: format!("vortex_plus_{period}"),
        }
    }

    pub fn minus(period: usize) -> Self {
        assert!(period >= 1, "Vortex period must be >= 1");
        Self {
            period,
            line: VortexLine::Minus,
            name: format!("vortex_minus_{period}"),
        }
    }
}

impl Indicator for Vortex {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let (plus, minus) = vortex_pair(candles, self.period);
        match self.line {
            VortexLine::Plus => plus,
            VortexLine::Minus => minus,
        }
    }
}

/// Compute both Vortex lines in one pass.
pub fn vortex_pair(candles: &[Candle], period: usize) -> (Vec<f64>, Vec<f64>) {
    let n = candles.len();
    let mut plus = vec![f64::NAN; n];
    let mut minus = vec![f64::NAN; n];

    if period == 0 || n <= period {
        return (plus, minus);
    }

    let mut tr = vec![f64::NAN; n];
    let mut vm_plus = vec![f64::NAN; n];
    let mut vm_minus = vec![f64::NAN; n];
    for i in 1..n {
        let cur = &candles[i];
        let prev = &candles[i - 1];
        tr[i] = (cur.high - cur.low)
            .abs()
            .max((cur.high - prev.close).abs())
            .max((cur.low - prev.close).abs());
        vm_plus[i] = (cur.high - prev.low).abs();
        vm_minus[i] = (cur.low - prev.high).abs();
    }

    for i in period..n {
        let window = (i + 1 - period)..=i;
        let sum_tr: f64 = tr[window.clone()].iter().sum();
        let sum_plus: f64 = vm_plus[window.clone()].iter().sum();
        let sum_minus: f64 = vm_minus[window].iter().sum();

        // NaN sums leave the row undefined.
        if sum_tr.is_nan() || sum_plus.is_nan() || sum_minus.is_nan() {
            continue;
        }
        if sum_tr == 0.0 {
            plus[i] = 1.0;
            minus[i] = 1.0;
        } else {
            plus[i] = sum_plus / sum_tr;
            minus[i] = sum_minus / sum_tr;
        }
    }

    (plus, minus)
}
