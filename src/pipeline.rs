//! Load-once dataset plus the redraw entry point.
//!
//! Loading normalizes every record, assigns replicate indices and fixes the
//! global time range and environment signal. Those never change afterwards;
//! each redraw (display-mode toggle or frame resize) recomputes slicing and
//! layout from scratch on the same immutable data.
//!
//! Records must be supplied in a stable order: replicate indices, and so
//! column positions, follow first-seen order within each condition. A layout
//! shows one condition; indices restart per condition and would collide.

use crate::config::{DisplayMode, MalformedRecordPolicy, VisConfig};
use crate::draw_commands::{DrawCommandAssembler, LineageLayout};
use crate::environment_sequence::{EnvironmentInterval, EnvironmentSequence};
use crate::error::LineageError;
use crate::lineage_layout::LayoutScaler;
use crate::phenotype_sequence::{
    LineageSequence, RawRecord, SequenceNormalizer, SequenceSummary,
};
use crate::range_aggregator::{ConditionCount, RangeAggregator};
use crate::slice_selector::display_slices;
use crate::time_range::TimeRange;
use log::{debug, warn};

#[derive(Debug)]
pub struct LineageDataset {
    config: VisConfig,
    sequences: Vec<LineageSequence>,
    global_range: Option<TimeRange>,
    conditions: Vec<ConditionCount>,
    environment: Vec<EnvironmentInterval>,
    skipped: Vec<LineageError>,
}

impl LineageDataset {
    pub fn from_records<I>(config: VisConfig, records: I) -> Result<Self, LineageError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        config.validate()?;
        let normalizer = SequenceNormalizer::new(&config.tasks);
        let mut aggregator = RangeAggregator::new();
        let mut sequences = vec![];
        let mut skipped = vec![];
        for record in records {
            match normalizer.normalize(&record) {
                Ok(sequence) => sequences.push(aggregator.ingest(sequence)),
                Err(e) if e.is_record_error() => match config.on_malformed_record {
                    MalformedRecordPolicy::Skip => {
                        warn!("Skipping record: {e}");
                        skipped.push(e);
                    }
                    MalformedRecordPolicy::Abort => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }

        let global_range = aggregator.global_range();
        let env = &config.environment_sequence;
        let environment: Vec<EnvironmentInterval> = global_range
            .map(|global| {
                EnvironmentSequence::new(&env.states, env.interval, global.max).collect()
            })
            .unwrap_or_default();

        debug!(
            "Loaded {} sequence(s), skipped {}, global range {:?}, {} environment interval(s)",
            sequences.len(),
            skipped.len(),
            global_range,
            environment.len()
        );
        let conditions = aggregator.conditions();
        Ok(Self {
            config,
            sequences,
            global_range,
            conditions,
            environment,
            skipped,
        })
    }

    pub fn config(&self) -> &VisConfig {
        &self.config
    }

    /// Every normalized sequence, filtered or not, in ingestion order.
    pub fn sequences(&self) -> &[LineageSequence] {
        &self.sequences
    }

    /// `None` when no record could be normalized.
    pub fn global_range(&self) -> Option<TimeRange> {
        self.global_range
    }

    pub fn conditions(&self) -> &[ConditionCount] {
        &self.conditions
    }

    pub fn environment(&self) -> &[EnvironmentInterval] {
        &self.environment
    }

    /// Record errors passed over under the `skip` policy.
    pub fn skipped(&self) -> &[LineageError] {
        &self.skipped
    }

    fn accepted(&self) -> impl Iterator<Item = &LineageSequence> + Clone + '_ {
        self.sequences
            .iter()
            .filter(|sequence| self.config.data_filter.accepts(sequence))
    }

    /// Sequences accepted by the configured data filter, restricted to the
    /// first accepted condition.
    pub fn selected(&self) -> Vec<&LineageSequence> {
        let accepted = self.accepted();
        let Some(first) = accepted.clone().next() else {
            return vec![];
        };
        accepted
            .filter(|sequence| sequence.condition_key == first.condition_key)
            .collect()
    }

    pub fn summaries(&self) -> Vec<SequenceSummary> {
        self.selected().into_iter().map(|s| s.summary()).collect()
    }

    /// Lays out the selection for `mode`. Sliced mode fails when a configured
    /// window is not covered by the observed range.
    pub fn redraw(
        &self,
        mode: DisplayMode,
        frame_width: f64,
    ) -> Result<LineageLayout, LineageError> {
        let global = self.global_range.unwrap_or(TimeRange::new(0.0, 0.0));
        let slices = match self.global_range {
            Some(global) => {
                if mode == DisplayMode::Sliced {
                    check_slices(&self.config.slices, &global)?;
                }
                display_slices(mode, global, &self.config.slices)
            }
            None => vec![],
        };
        let selected = self.selected();
        let dropped = self.accepted().count() - selected.len();
        if let (true, Some(first)) = (dropped > 0, selected.first()) {
            warn!(
                "Data filter spans several conditions; drawing {} only, {dropped} sequence(s) left out",
                first.condition_key
            );
        }
        let replicate_count = selected
            .iter()
            .map(|s| s.replicate_index + 1)
            .max()
            .unwrap_or(0);

        let settings = &self.config.layout;
        let geometry =
            LayoutScaler::new(settings).layout(&slices, replicate_count, frame_width);
        let layout = DrawCommandAssembler::new(settings).assemble(
            mode,
            global,
            &selected,
            &self.environment,
            &geometry,
        );
        debug!(
            "Redraw ({}): {} slice(s), {} replicate column(s), {} state band(s), {} environment band(s)",
            mode.as_str(),
            layout.slice_axes.len(),
            replicate_count,
            layout.state_bands.len(),
            layout.environment_bands.len()
        );
        Ok(layout)
    }
}

/// Sliced-mode windows must lie inside the observed range.
fn check_slices(slices: &[TimeRange], global: &TimeRange) -> Result<(), LineageError> {
    for (idx, slice) in slices.iter().enumerate() {
        if !global.covers(slice) {
            return Err(LineageError::Configuration(format!(
                "slice {} [{}, {}] lies outside the observed range [{}, {}]",
                idx + 1,
                slice.min,
                slice.max,
                global.min,
                global.max
            )));
        }
    }
    Ok(())
}
