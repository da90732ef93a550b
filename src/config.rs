use crate::{error::LineageError, phenotype_sequence::LineageSequence, time_range::TimeRange};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TASKS: [&str; 6] = ["not", "nand", "and", "ornot", "or", "andnot"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Full,
    Sliced,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Sliced => "sliced",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "sliced" | "slices" => Some(Self::Sliced),
            _ => None,
        }
    }
}

/// Which triple of sequence columns a record is read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceResolution {
    /// Consecutive genotypes with the same phenotype merged into one interval.
    #[default]
    Phenotype,
    /// One interval per genotype along the lineage.
    Genotype,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRecordPolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSequenceConfig {
    pub states: Vec<String>,
    pub interval: f64,
}

impl Default for EnvironmentSequenceConfig {
    fn default() -> Self {
        Self {
            states: vec!["ENV-A".to_string(), "ENV-B".to_string()],
            interval: 100.0,
        }
    }
}

pub const DEFAULT_ENVIRONMENT: &str = "env-chg_rate-u100";

/// Inclusion predicate over normalized sequences. `None` fields match anything.
/// The default selects the sensorless `env-chg_rate-u100` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFilter {
    pub environment: Option<String>,
    pub sensors: Option<bool>,
    /// Keep only replicates whose index within their condition is below this.
    pub max_replicates: Option<usize>,
}

impl Default for DataFilter {
    fn default() -> Self {
        Self {
            environment: Some(DEFAULT_ENVIRONMENT.to_string()),
            sensors: Some(false),
            max_replicates: None,
        }
    }
}

impl DataFilter {
    pub fn accepts(&self, sequence: &LineageSequence) -> bool {
        if let Some(environment) = &self.environment {
            if &sequence.environment != environment {
                return false;
            }
        }
        if let Some(sensors) = self.sensors {
            if sequence.sensors != sensors {
                return false;
            }
        }
        match self.max_replicates {
            Some(limit) => sequence.replicate_index < limit,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Pixels per time unit.
    pub tick_height: f64,
    pub max_column_width: f64,
    pub max_column_spacing: f64,
    pub slice_gap: f64,
    pub margins: Margins,
    pub env_column_width: f64,
    /// Distance from the left edge of the replicate columns to the environment band.
    pub env_column_offset: f64,
    pub band_inset: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            tick_height: 0.2,
            max_column_width: 20.0,
            max_column_spacing: 5.0,
            slice_gap: 30.0,
            margins: Margins::default(),
            env_column_width: 20.0,
            env_column_offset: 30.0,
            band_inset: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub tasks: Vec<String>,
    pub environment_sequence: EnvironmentSequenceConfig,
    pub data_filter: DataFilter,
    /// Windows shown in sliced mode, top to bottom.
    pub slices: Vec<TimeRange>,
    pub layout: LayoutSettings,
    pub sequence_resolution: SequenceResolution,
    pub on_malformed_record: MalformedRecordPolicy,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            tasks: DEFAULT_TASKS.iter().map(|t| t.to_string()).collect(),
            environment_sequence: EnvironmentSequenceConfig::default(),
            data_filter: DataFilter::default(),
            slices: vec![
                TimeRange::new(0.0, 500.0),
                TimeRange::new(97_500.0, 102_500.0),
                TimeRange::new(195_000.0, 200_000.0),
            ],
            layout: LayoutSettings::default(),
            sequence_resolution: SequenceResolution::default(),
            on_malformed_record: MalformedRecordPolicy::default(),
        }
    }
}

impl VisConfig {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LineageError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: VisConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything that does not depend on the loaded data.
    /// Slice windows against the observed range are checked on sliced redraw.
    pub fn validate(&self) -> Result<(), LineageError> {
        if self.tasks.is_empty() {
            return Err(LineageError::Configuration(
                "task list must not be empty".to_string(),
            ));
        }
        let layout = &self.layout;
        if !(layout.tick_height.is_finite() && layout.tick_height > 0.0) {
            return Err(LineageError::Configuration(format!(
                "tick_height must be positive, got {}",
                layout.tick_height
            )));
        }
        for (name, value) in [
            ("max_column_width", layout.max_column_width),
            ("max_column_spacing", layout.max_column_spacing),
            ("slice_gap", layout.slice_gap),
            ("env_column_width", layout.env_column_width),
            ("band_inset", layout.band_inset),
            ("env_column_offset", layout.env_column_offset),
            ("margins.top", layout.margins.top),
            ("margins.right", layout.margins.right),
            ("margins.bottom", layout.margins.bottom),
            ("margins.left", layout.margins.left),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LineageError::Configuration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if layout.env_column_offset > layout.margins.left {
            return Err(LineageError::Configuration(format!(
                "env_column_offset {} exceeds margins.left {}",
                layout.env_column_offset, layout.margins.left
            )));
        }
        for (idx, slice) in self.slices.iter().enumerate() {
            if !slice.is_well_formed() {
                return Err(LineageError::Configuration(format!(
                    "slice {} has min {} > max {}",
                    idx + 1,
                    slice.min,
                    slice.max
                )));
            }
        }
        Ok(())
    }
}
