use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvironmentInterval {
    pub state_label: String,
    pub start: f64,
    pub duration: f64,
}

/// Periodic environment signal over `[0, end)`: the state list is cycled,
/// one state per `interval` time units. The last interval is not truncated
/// at `end`; slicing clips it like any other interval.
/// A clone taken before consumption replays the same intervals.
#[derive(Clone, Debug)]
pub struct EnvironmentSequence<'a> {
    states: &'a [String],
    interval: f64,
    end: f64,
    step: usize,
}

impl<'a> EnvironmentSequence<'a> {
    pub fn new(states: &'a [String], interval: f64, end: f64) -> Self {
        Self {
            states,
            interval,
            end,
            step: 0,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.states.is_empty()
            || !(self.interval.is_finite() && self.interval > 0.0)
            || !(self.end > 0.0)
    }
}

impl Iterator for EnvironmentSequence<'_> {
    type Item = EnvironmentInterval;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_degenerate() {
            return None;
        }
        // Multiply rather than accumulate so long runs don't drift.
        let start = self.step as f64 * self.interval;
        if start >= self.end {
            return None;
        }
        let state_label = self.states[self.step % self.states.len()].clone();
        self.step += 1;
        Some(EnvironmentInterval {
            state_label,
            start,
            duration: self.interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Vec<String> {
        vec!["ENV-A".to_string(), "ENV-B".to_string()]
    }

    #[test]
    fn test_cycles_states() {
        let states = states();
        let seq = EnvironmentSequence::new(&states, 100.0, 300.0).collect::<Vec<_>>();
        let expected = [("ENV-A", 0.0), ("ENV-B", 100.0), ("ENV-A", 200.0)];
        assert_eq!(seq.len(), expected.len());
        for (interval, (label, start)) in seq.iter().zip(expected) {
            assert_eq!(interval.state_label, label);
            assert_eq!(interval.start, start);
            assert_eq!(interval.duration, 100.0);
        }
    }

    #[test]
    fn test_partial_last_interval_is_kept() {
        let states = states();
        let seq = EnvironmentSequence::new(&states, 100.0, 250.0).collect::<Vec<_>>();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[2].start, 200.0);
    }

    #[test]
    fn test_restartable() {
        let states = states();
        let seq = EnvironmentSequence::new(&states, 50.0, 1000.0);
        let first = seq.clone().collect::<Vec<_>>();
        let second = seq.collect::<Vec<_>>();
        assert_eq!(first, second);
        assert_eq!(first.len(), 20);
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        let states = states();
        assert_eq!(EnvironmentSequence::new(&[], 100.0, 300.0).count(), 0);
        assert_eq!(EnvironmentSequence::new(&states, 0.0, 300.0).count(), 0);
        assert_eq!(EnvironmentSequence::new(&states, 100.0, 0.0).count(), 0);
    }
}
