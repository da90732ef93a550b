use itertools::Itertools;
use phenoseq::config::{DisplayMode, MalformedRecordPolicy, SequenceResolution, VisConfig};
use phenoseq::csv_input::load_dataset;
use phenoseq::draw_commands::FillCategory;
use phenoseq::error::LineageError;
use phenoseq::render_export::export_lineage_layout_svg;
use phenoseq::time_range::TimeRange;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "COPY_MUT_PROB,DISABLE_REACTION_SENSORS,RANDOM_SEED,environment,phen_seq_by_geno_duration,phen_seq_by_geno_start,phen_seq_by_geno_state,phen_seq_by_phen_duration,phen_seq_by_phen_start,phen_seq_by_phen_state";

fn write_table(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn long_run_table() -> NamedTempFile {
    write_table(&[
        // Plastic from 100000 on.
        "0.0025,1,201,env-chg_rate-u100,\"50000,150000\",\"0,50000\",\"000000000000,000000000000\",\"100000,100000\",\"0,100000\",\"000000000000,100000010000\"",
        // Static non-neutral the whole time.
        "0.0025,1,202,env-chg_rate-u100,200000,0,110000110000,200000,0,110000110000",
        // Sensors on: a different condition.
        "0.0025,0,203,env-chg_rate-u100,200000,0,000000000000,200000,0,000000000000",
        // Broken row: three states, two starts.
        "0.0025,1,204,env-chg_rate-u100,10,0,000000000000,\"10,10,10\",\"0,10\",\"000000000000,000000000000,000000000000\"",
    ])
}

#[test]
fn test_sliced_layout_from_csv() {
    let table = long_run_table();
    let mut config = VisConfig::default();
    config.data_filter.sensors = Some(false);
    let dataset = load_dataset(table.path(), config).unwrap();

    assert_eq!(dataset.global_range(), Some(TimeRange::new(0.0, 200_000.0)));
    assert_eq!(dataset.skipped().len(), 1);
    assert_eq!(dataset.selected().len(), 2);

    let layout = dataset.redraw(DisplayMode::Sliced, 1200.0).unwrap();
    assert_eq!(layout.slice_axes.len(), 3);
    assert!((layout.canvas_height - 2160.0).abs() < 1e-6);

    // Replicate 201 switches state exactly at the middle slice's centre.
    let middle = layout
        .state_bands
        .iter()
        .filter(|b| b.replicate_seed == "201" && b.slice_index == 1)
        .map(|b| (b.fill, b.time.min, b.time.max, b.is_plastic))
        .collect::<Vec<_>>();
    assert_eq!(
        middle,
        vec![
            (FillCategory::Neutral, 97_500.0, 100_000.0, false),
            (FillCategory::Active, 100_000.0, 102_500.0, true),
        ]
    );

    // Every band stays inside its slice's rows.
    for band in &layout.state_bands {
        let axis = &layout.slice_axes[band.slice_index];
        assert!(band.rect.y >= axis.range.0 - 1e-9);
        assert!(band.rect.y + band.rect.height <= axis.range.1 + 1e-9);
    }

    // 100-update environment cycle: 5 bands in the first slice, 50 in each of the others.
    let per_slice = (0..3)
        .map(|i| {
            layout
                .environment_bands
                .iter()
                .filter(|b| b.slice_index == i)
                .count()
        })
        .collect::<Vec<_>>();
    assert_eq!(per_slice, vec![5, 50, 50]);
}

#[test]
fn test_full_layout_and_svg() {
    let table = long_run_table();
    let dataset = load_dataset(table.path(), VisConfig::default()).unwrap();
    let layout = dataset.redraw(DisplayMode::Full, 800.0).unwrap();
    assert_eq!(layout.slice_axes.len(), 1);
    assert!((layout.canvas_height - 40_000.0).abs() < 1e-6);

    // Seed 203 runs with sensors on and is filtered out by default.
    let mut seeds = layout
        .state_bands
        .iter()
        .map(|b| b.replicate_seed.as_str())
        .collect::<Vec<_>>();
    seeds.dedup();
    assert_eq!(seeds, vec!["201", "202"]);
    for (a, b) in layout.state_bands.iter().tuple_combinations() {
        if a.slice_index == b.slice_index && a.rect.x == b.rect.x {
            assert!(a.time.max <= b.time.min || b.time.max <= a.time.min);
        }
    }

    let svg = export_lineage_layout_svg(&layout);
    assert!(svg.contains("full view"));
}

#[test]
fn test_genotype_resolution() {
    let table = long_run_table();
    let config = VisConfig {
        sequence_resolution: SequenceResolution::Genotype,
        ..VisConfig::default()
    };
    let dataset = load_dataset(table.path(), config).unwrap();
    let first = &dataset.sequences()[0];
    assert_eq!(first.replicate_seed, "201");
    assert_eq!(first.states.len(), 2);
    assert_eq!(first.states[1].start, 50_000.0);
    // The broken row only has a bad phenotype triple.
    assert!(dataset.skipped().is_empty());
}

#[test]
fn test_abort_policy_from_config_file() {
    let table = long_run_table();
    let mut config_file = NamedTempFile::new().unwrap();
    write!(config_file, r#"{{"on_malformed_record": "abort"}}"#).unwrap();
    config_file.flush().unwrap();

    let config = VisConfig::load_from_path(config_file.path()).unwrap();
    assert_eq!(config.on_malformed_record, MalformedRecordPolicy::Abort);
    let err = load_dataset(table.path(), config).unwrap_err();
    assert!(matches!(err, LineageError::MalformedRecord { .. }));
}

#[test]
fn test_resize_changes_columns_not_rows() {
    let table = long_run_table();
    let dataset = load_dataset(table.path(), VisConfig::default()).unwrap();
    let wide = dataset.redraw(DisplayMode::Sliced, 2000.0).unwrap();
    let narrow = dataset.redraw(DisplayMode::Sliced, 100.0).unwrap();
    assert_eq!(wide.canvas_height, narrow.canvas_height);
    assert!(narrow.canvas_width < wide.canvas_width);
    assert_eq!(wide.state_bands.len(), narrow.state_bands.len());
}
