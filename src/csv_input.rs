//! CSV ingestion of lineage state-sequence tables (one row per replicate).
//!
//! Rows are returned in file order; replicate indices depend on it.

use crate::config::{SequenceResolution, VisConfig};
use crate::error::LineageError;
use crate::phenotype_sequence::RawRecord;
use crate::pipeline::LineageDataset;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LineageRow {
    environment: String,
    #[serde(rename = "DISABLE_REACTION_SENSORS")]
    disable_reaction_sensors: String,
    #[serde(rename = "RANDOM_SEED")]
    random_seed: String,
    phen_seq_by_phen_state: String,
    phen_seq_by_phen_start: String,
    phen_seq_by_phen_duration: String,
    #[serde(default)]
    phen_seq_by_geno_state: Option<String>,
    #[serde(default)]
    phen_seq_by_geno_start: Option<String>,
    #[serde(default)]
    phen_seq_by_geno_duration: Option<String>,
}

impl LineageRow {
    fn into_record(self, resolution: SequenceResolution) -> RawRecord {
        let (states, starts, durations) = match resolution {
            SequenceResolution::Phenotype => (
                self.phen_seq_by_phen_state,
                self.phen_seq_by_phen_start,
                self.phen_seq_by_phen_duration,
            ),
            // Tables without genotype columns yield empty records, which the
            // normalizer reports per replicate.
            SequenceResolution::Genotype => (
                self.phen_seq_by_geno_state.unwrap_or_default(),
                self.phen_seq_by_geno_start.unwrap_or_default(),
                self.phen_seq_by_geno_duration.unwrap_or_default(),
            ),
        };
        RawRecord {
            environment: self.environment,
            disable_reaction_sensors: self.disable_reaction_sensors,
            random_seed: self.random_seed,
            states,
            starts,
            durations,
        }
    }
}

pub fn read_records<R: Read>(
    reader: R,
    resolution: SequenceResolution,
) -> Result<Vec<RawRecord>, LineageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut records = vec![];
    for row in reader.deserialize::<LineageRow>() {
        records.push(row?.into_record(resolution));
    }
    Ok(records)
}

pub fn read_records_from_path<P: AsRef<Path>>(
    path: P,
    resolution: SequenceResolution,
) -> Result<Vec<RawRecord>, LineageError> {
    let file = std::fs::File::open(path.as_ref())?;
    read_records(file, resolution)
}

pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    config: VisConfig,
) -> Result<LineageDataset, LineageError> {
    let records = read_records_from_path(path.as_ref(), config.sequence_resolution)?;
    log::debug!(
        "Read {} row(s) from '{}'",
        records.len(),
        path.as_ref().display()
    );
    LineageDataset::from_records(config, records)
}
