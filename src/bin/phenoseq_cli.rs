use anyhow::{Result, anyhow};
use phenoseq::{
    about,
    config::{DisplayMode, VisConfig},
    csv_input::load_dataset,
    phenotype_sequence::SequenceSummary,
    pipeline::LineageDataset,
    range_aggregator::ConditionCount,
    render_export::export_lineage_layout_svg,
    time_range::TimeRange,
};
use serde::Serialize;
use std::{env, fs};

const DEFAULT_FRAME_WIDTH: f64 = 1200.0;

#[derive(Serialize)]
struct DatasetSummary {
    global_range: Option<TimeRange>,
    sequence_count: usize,
    selected_count: usize,
    skipped: Vec<String>,
    conditions: Vec<ConditionCount>,
    replicates: Vec<SequenceSummary>,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  phenoseq_cli --version\n  \
  phenoseq_cli default-config\n  \
  phenoseq_cli [--config PATH] summary DATA.csv\n  \
  phenoseq_cli [--config PATH] layout DATA.csv full|sliced [--width PX]\n  \
  phenoseq_cli [--config PATH] render-svg DATA.csv full|sliced OUTPUT.svg [--width PX]\n\n  \
  Only the first condition the data filter accepts is drawn; sliced mode\n  \
  needs every configured slice inside the observed update range.\n  \
  Set RUST_LOG=debug to trace pipeline stages"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn parse_global_config_arg(args: &[String]) -> (Option<String>, usize) {
    if args.len() >= 3 && args[1] == "--config" {
        return (Some(args[2].clone()), 3);
    }
    (None, 1)
}

/// Pulls `--width PX` out of the trailing arguments.
fn parse_frame_width(args: &[String]) -> Result<f64> {
    match args.iter().position(|a| a == "--width") {
        Some(idx) => {
            let value = args
                .get(idx + 1)
                .ok_or_else(|| anyhow!("--width needs a value"))?;
            value
                .parse::<f64>()
                .map_err(|e| anyhow!("Invalid --width '{value}': {e}"))
        }
        None => Ok(DEFAULT_FRAME_WIDTH),
    }
}

fn parse_mode(text: &str) -> Result<DisplayMode> {
    DisplayMode::parse(text)
        .ok_or_else(|| anyhow!("Unknown display mode '{text}' (use full or sliced)"))
}

fn load_config(path: Option<&str>) -> Result<VisConfig> {
    match path {
        Some(path) => VisConfig::load_from_path(path)
            .map_err(|e| anyhow!("Could not load config '{path}': {e}")),
        None => Ok(VisConfig::default()),
    }
}

fn summarize(dataset: &LineageDataset) -> DatasetSummary {
    DatasetSummary {
        global_range: dataset.global_range(),
        sequence_count: dataset.sequences().len(),
        selected_count: dataset.selected().len(),
        skipped: dataset.skipped().iter().map(|e| e.to_string()).collect(),
        conditions: dataset.conditions().to_vec(),
        replicates: dataset.summaries(),
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err(anyhow!("Missing command"));
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (config_path, cmd_idx) = parse_global_config_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        return Err(anyhow!("Missing command"));
    }
    let config = load_config(config_path.as_deref())?;
    let rest = &args[cmd_idx + 1..];

    match args[cmd_idx].as_str() {
        "default-config" => print_json(&VisConfig::default()),
        "summary" => {
            let [data, ..] = rest else {
                usage();
                return Err(anyhow!("summary needs DATA.csv"));
            };
            let dataset = load_dataset(data, config)?;
            print_json(&summarize(&dataset))
        }
        "layout" => {
            let [data, mode, ..] = rest else {
                usage();
                return Err(anyhow!("layout needs DATA.csv and a display mode"));
            };
            let mode = parse_mode(mode)?;
            let width = parse_frame_width(rest)?;
            let dataset = load_dataset(data, config)?;
            print_json(&dataset.redraw(mode, width)?)
        }
        "render-svg" => {
            let [data, mode, output, ..] = rest else {
                usage();
                return Err(anyhow!(
                    "render-svg needs DATA.csv, a display mode and OUTPUT.svg"
                ));
            };
            let mode = parse_mode(mode)?;
            let width = parse_frame_width(rest)?;
            let dataset = load_dataset(data, config)?;
            let svg = export_lineage_layout_svg(&dataset.redraw(mode, width)?);
            fs::write(output, svg)
                .map_err(|e| anyhow!("Could not write SVG '{output}': {e}"))?;
            println!("Wrote {output}");
            Ok(())
        }
        other => {
            usage();
            Err(anyhow!("Unknown command '{other}'"))
        }
    }
}
