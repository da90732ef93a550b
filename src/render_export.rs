use crate::draw_commands::{FillCategory, LineageLayout, Rect};
use std::collections::HashMap;
use svg::Document;
use svg::node::element::{Line, Rectangle, Text};

const NEUTRAL_FILL: &str = "#d4d4d8";
const ACTIVE_FILL: &str = "#3b6aaa";
const PLASTIC_FILL: &str = "#b47846";
const ENVIRONMENT_PALETTE: [&str; 4] = ["#f59e0b", "#5a8cd2", "#238c64", "#b42d2d"];
const TITLE_HEIGHT: f64 = 28.0;

fn rectangle(rect: &Rect, y_shift: f64, fill: &str) -> Rectangle {
    Rectangle::new()
        .set("x", rect.x)
        .set("y", rect.y + y_shift)
        .set("width", rect.width)
        .set("height", rect.height)
        .set("fill", fill)
}

pub fn export_lineage_layout_svg(layout: &LineageLayout) -> String {
    let width = layout.frame_width.max(1.0);
    let height = layout.frame_height + TITLE_HEIGHT;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .set("style", "background:#ffffff")
        .add(
            Text::new(format!(
                "Lineage states ({} view, {} replicate(s), updates {}..{})",
                layout.mode.as_str(),
                layout.replicate_count,
                layout.global_range.min,
                layout.global_range.max
            ))
            .set("x", 8)
            .set("y", 18)
            .set("font-family", "Helvetica, Arial, sans-serif")
            .set("font-size", 12)
            .set("fill", "#202020"),
        );

    let mut env_colors: HashMap<&str, &str> = HashMap::new();
    for band in &layout.environment_bands {
        let next = ENVIRONMENT_PALETTE[env_colors.len() % ENVIRONMENT_PALETTE.len()];
        let fill = *env_colors.entry(band.state_label.as_str()).or_insert(next);
        doc = doc.add(
            rectangle(&band.rect, TITLE_HEIGHT, fill).set("class", band.state_label.clone()),
        );
    }

    for band in &layout.state_bands {
        let fill = match band.fill {
            FillCategory::Neutral => NEUTRAL_FILL,
            FillCategory::Active if band.is_plastic => PLASTIC_FILL,
            FillCategory::Active => ACTIVE_FILL,
        };
        doc = doc.add(
            rectangle(&band.rect, TITLE_HEIGHT, fill)
                .set("class", format!("{} state-{}", band.fill.as_str(), band.state_label)),
        );
    }

    for axis in &layout.slice_axes {
        let (y0, y1) = (axis.range.0 + TITLE_HEIGHT, axis.range.1 + TITLE_HEIGHT);
        let x = layout.frame_width - 4.0;
        doc = doc
            .add(
                Line::new()
                    .set("x1", x)
                    .set("y1", y0)
                    .set("x2", x)
                    .set("y2", y1)
                    .set("stroke", "#8a8a8a")
                    .set("stroke-width", 1),
            )
            .add(
                Text::new(format!("{}", axis.domain.min))
                    .set("x", x - 4.0)
                    .set("y", y0 + 10.0)
                    .set("text-anchor", "end")
                    .set("font-family", "monospace")
                    .set("font-size", 9)
                    .set("fill", "#374151"),
            )
            .add(
                Text::new(format!("{}", axis.domain.max))
                    .set("x", x - 4.0)
                    .set("y", y1)
                    .set("text-anchor", "end")
                    .set("font-family", "monospace")
                    .set("font-size", 9)
                    .set("fill", "#374151"),
            );
    }

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayMode, VisConfig};
    use crate::phenotype_sequence::RawRecord;
    use crate::pipeline::LineageDataset;
    use crate::time_range::TimeRange;

    fn dataset() -> LineageDataset {
        let config = VisConfig {
            slices: vec![TimeRange::new(0.0, 100.0), TimeRange::new(200.0, 300.0)],
            ..VisConfig::default()
        };
        let records = vec![RawRecord {
            environment: "env-chg_rate-u100".to_string(),
            disable_reaction_sensors: "1".to_string(),
            random_seed: "3".to_string(),
            states: "000000000000,100000010000".to_string(),
            starts: "0,150".to_string(),
            durations: "150,150".to_string(),
        }];
        LineageDataset::from_records(config, records).unwrap()
    }

    #[test]
    fn test_export_lineage_layout_svg() {
        let layout = dataset().redraw(DisplayMode::Sliced, 600.0).unwrap();
        let svg = export_lineage_layout_svg(&layout);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("sliced view"));
        assert!(svg.contains(PLASTIC_FILL));
        assert!(svg.contains(NEUTRAL_FILL));
        assert!(svg.contains("ENV-A"));
    }

    #[test]
    fn test_export_empty_layout() {
        let dataset = LineageDataset::from_records(VisConfig::default(), vec![]).unwrap();
        let layout = dataset.redraw(DisplayMode::Full, 600.0).unwrap();
        let svg = export_lineage_layout_svg(&layout);
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<rect"));
    }
}
