//! Normalization of raw per-replicate records into phenotype-state sequences.
//!
//! A state label is the concatenation of two task profiles of equal width,
//! one per environment context (e.g. `"101000101000"` with six tasks). Each
//! profile character is `'1'` when the organism performs that task.

use crate::error::LineageError;
use crate::time_range::TimeRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const LIST_DELIMITER: char = ',';

/// One replicate's sequence fields, before normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub environment: String,
    /// `"0"` means reaction sensors are enabled.
    pub disable_reaction_sensors: String,
    pub random_seed: String,
    pub states: String,
    pub starts: String,
    pub durations: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateInterval {
    pub state_label: String,
    pub env_a_profile: String,
    pub env_b_profile: String,
    pub env_a_tasks: BTreeSet<String>,
    pub env_b_tasks: BTreeSet<String>,
    pub is_plastic: bool,
    pub start: f64,
    pub duration: f64,
}

impl StateInterval {
    #[inline(always)]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// True when no task is performed in either environment.
    pub fn is_neutral(&self) -> bool {
        self.env_a_tasks.is_empty() && self.env_b_tasks.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineageSequence {
    pub condition_key: String,
    pub environment: String,
    pub sensors: bool,
    pub replicate_seed: String,
    /// Rank of this replicate within its condition, in ingestion order.
    pub replicate_index: usize,
    pub states: Vec<StateInterval>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceSummary {
    pub replicate_seed: String,
    pub condition_key: String,
    pub replicate_index: usize,
    pub span: TimeRange,
    pub interval_count: usize,
    pub unique_state_count: usize,
    pub plastic_interval_count: usize,
    pub distinct_states: BTreeSet<String>,
}

pub fn condition_key(environment: &str, sensors: bool) -> String {
    let sensors = if sensors { "sensors" } else { "no-sensors" };
    format!("{environment}|{sensors}")
}

impl LineageSequence {
    /// Observed span: first start to last end. Sequences are never empty.
    pub fn span(&self) -> TimeRange {
        let min = self.states.first().map(|s| s.start).unwrap_or(0.0);
        let max = self.states.last().map(|s| s.end()).unwrap_or(min);
        TimeRange::new(min, max)
    }

    pub fn is_contiguous(&self) -> bool {
        self.states
            .windows(2)
            .all(|pair| pair[1].start == pair[0].end())
    }

    pub fn summary(&self) -> SequenceSummary {
        let distinct_states = self
            .states
            .iter()
            .map(|s| s.state_label.clone())
            .collect::<BTreeSet<_>>();
        SequenceSummary {
            replicate_seed: self.replicate_seed.clone(),
            condition_key: self.condition_key.clone(),
            replicate_index: self.replicate_index,
            span: self.span(),
            interval_count: self.states.len(),
            unique_state_count: distinct_states.len(),
            plastic_interval_count: self.states.iter().filter(|s| s.is_plastic).count(),
            distinct_states,
        }
    }
}

/// Turns raw records into [`LineageSequence`]s for a fixed task list.
/// The replicate index is left at zero; the range aggregator assigns it.
pub struct SequenceNormalizer<'a> {
    tasks: &'a [String],
}

impl<'a> SequenceNormalizer<'a> {
    pub fn new(tasks: &'a [String]) -> Self {
        Self { tasks }
    }

    pub fn normalize(&self, record: &RawRecord) -> Result<LineageSequence, LineageError> {
        let replicate = record.random_seed.as_str();
        if [&record.states, &record.starts, &record.durations]
            .iter()
            .all(|field| field.trim().is_empty())
        {
            return Err(LineageError::EmptySequence {
                replicate: replicate.to_string(),
            });
        }

        let labels = record.states.split(LIST_DELIMITER).collect::<Vec<_>>();
        let starts = record.starts.split(LIST_DELIMITER).collect::<Vec<_>>();
        let durations = record.durations.split(LIST_DELIMITER).collect::<Vec<_>>();
        if labels.len() != starts.len() || labels.len() != durations.len() {
            return Err(LineageError::malformed(
                replicate,
                format!(
                    "list lengths differ (states {}, starts {}, durations {})",
                    labels.len(),
                    starts.len(),
                    durations.len()
                ),
            ));
        }

        let states = labels
            .iter()
            .zip(starts.iter())
            .zip(durations.iter())
            .enumerate()
            .map(|(idx, ((label, start), duration))| {
                let start = parse_time(replicate, "start", idx, start)?;
                let duration = parse_time(replicate, "duration", idx, duration)?;
                self.state_interval(replicate, idx, label.trim(), start, duration)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sensors = record.disable_reaction_sensors.trim() == "0";
        Ok(LineageSequence {
            condition_key: condition_key(&record.environment, sensors),
            environment: record.environment.clone(),
            sensors,
            replicate_seed: record.random_seed.clone(),
            replicate_index: 0,
            states,
        })
    }

    fn state_interval(
        &self,
        replicate: &str,
        idx: usize,
        label: &str,
        start: f64,
        duration: f64,
    ) -> Result<StateInterval, LineageError> {
        let width = self.tasks.len();
        if label.len() != width * 2 || !label.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(LineageError::malformed(
                replicate,
                format!(
                    "state {} '{label}' is not a {}-bit profile pair",
                    idx + 1,
                    width * 2
                ),
            ));
        }
        let (env_a_profile, env_b_profile) = label.split_at(width);
        let is_plastic = env_a_profile != env_b_profile;
        let state_label = if is_plastic { label } else { env_a_profile };
        Ok(StateInterval {
            state_label: state_label.to_string(),
            env_a_profile: env_a_profile.to_string(),
            env_b_profile: env_b_profile.to_string(),
            env_a_tasks: self.active_tasks(env_a_profile),
            env_b_tasks: self.active_tasks(env_b_profile),
            is_plastic,
            start,
            duration,
        })
    }

    fn active_tasks(&self, profile: &str) -> BTreeSet<String> {
        profile
            .bytes()
            .zip(self.tasks.iter())
            .filter(|(bit, _)| *bit == b'1')
            .map(|(_, task)| task.clone())
            .collect()
    }
}

fn parse_time(replicate: &str, what: &str, idx: usize, text: &str) -> Result<f64, LineageError> {
    let value = text.trim().parse::<f64>().map_err(|e| {
        LineageError::malformed(
            replicate,
            format!("{what} {} '{}' is not a number: {e}", idx + 1, text.trim()),
        )
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(LineageError::malformed(
            replicate,
            format!("{what} {} must be a non-negative number, got {value}", idx + 1),
        ));
    }
    Ok(value)
}
