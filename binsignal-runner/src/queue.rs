//! Session queue construction: rank by strength, one signal per instrument,
//! capped at the target count. Short queues are never padded.

use std::collections::HashSet;

use binsignal_core::domain::Signal;

/// Sort candidates by descending strength and keep the first signal per
/// instrument, up to `target`.
///
/// The sort is stable, so equal strengths keep their candidate order.
pub fn build_queue(mut candidates: Vec<Signal>, target: usize) -> Vec<Signal> {
    candidates.sort_by(|a, b| b.strength.total_cmp(&a.strength));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|s| seen.insert(s.instrument_id.clone()))
        .take(target)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsignal_core::domain::{Instrument, Interval, SignalOrigin};
    use std::collections::BTreeSet;

    fn signal(symbol: &str, strength: f64) -> Signal {
        Signal::from_score(
            &Instrument::new(symbol, "").unwrap(),
            strength,
            BTreeSet::new(),
            Interval::OneMinute,
            1.0,
            SignalOrigin::Momentum,
        )
    }

    fn strengths(queue: &[Signal]) -> Vec<f64> {
        queue.iter().map(|s| s.strength).collect()
    }

    #[test]
    fn keeps_top_n_descending() {
        let candidates = vec![
            signal("A", 1.9),
            signal("B", 3.1),
            signal("C", 0.5),
            signal("D", 2.0),
            signal("E", 1.9),
        ];
        let queue = build_queue(candidates, 2);
        assert_eq!(strengths(&queue), vec![3.1, 2.0]);
        assert_eq!(queue[0].instrument_id, "B");
    }

    #[test]
    fn duplicate_instrument_keeps_strongest() {
        let queue = build_queue(vec![signal("A", 1.0), signal("A", 4.0), signal("B", 2.0)], 5);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].instrument_id, "A");
        assert_eq!(queue[0].strength, 4.0);
    }

    #[test]
    fn short_queue_is_not_padded() {
        let queue = build_queue(vec![signal("A", 1.0)], 5);
        assert_eq!(queue.len(), 1);
        assert!(build_queue(Vec::new(), 5).is_empty());
    }

    #[test]
    fn ties_keep_candidate_order() {
        let queue = build_queue(vec![signal("X", 1.9), signal("Y", 1.9)], 2);
        assert_eq!(queue[0].instrument_id, "X");
        assert_eq!(queue[1].instrument_id, "Y");
    }
}
