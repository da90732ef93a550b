//! Folds normalized sequences into the global observed time range and the
//! per-condition replicate registry.
//!
//! Replicate indices are assigned in first-seen order within each condition,
//! so callers must feed sequences in a stable, single-pass order to get
//! reproducible column placement. The global range does not depend on order.

use crate::phenotype_sequence::LineageSequence;
use crate::time_range::TimeRange;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConditionCount {
    pub condition_key: String,
    pub replicate_count: usize,
}

#[derive(Clone, Debug, Default)]
struct ConditionEntry {
    seeds: HashMap<String, usize>,
}

#[derive(Clone, Debug, Default)]
pub struct RangeAggregator {
    range: Option<TimeRange>,
    conditions: HashMap<String, ConditionEntry>,
    condition_order: Vec<String>,
}

impl RangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sequence`, widening the global range and stamping its
    /// replicate index. A seed seen before in the same condition keeps its
    /// earlier index.
    pub fn ingest(&mut self, mut sequence: LineageSequence) -> LineageSequence {
        let span = sequence.span();
        self.range = Some(match self.range {
            Some(range) => range.union(&span),
            None => span,
        });

        if !self.conditions.contains_key(&sequence.condition_key) {
            self.condition_order.push(sequence.condition_key.clone());
        }
        let entry = self
            .conditions
            .entry(sequence.condition_key.clone())
            .or_default();
        let next_index = entry.seeds.len();
        sequence.replicate_index = *entry
            .seeds
            .entry(sequence.replicate_seed.clone())
            .or_insert(next_index);
        sequence
    }

    /// `None` until at least one sequence has been ingested.
    pub fn global_range(&self) -> Option<TimeRange> {
        self.range
    }

    pub fn replicate_count(&self, condition_key: &str) -> usize {
        self.conditions
            .get(condition_key)
            .map(|entry| entry.seeds.len())
            .unwrap_or(0)
    }

    /// Conditions in first-seen order.
    pub fn conditions(&self) -> Vec<ConditionCount> {
        self.condition_order
            .iter()
            .map(|key| ConditionCount {
                condition_key: key.clone(),
                replicate_count: self.replicate_count(key),
            })
            .collect()
    }
}
