//! Canvas geometry: replicate columns across, stacked time slices down.
//!
//! All positions here are relative to the canvas origin (inside the margins).

use crate::config::LayoutSettings;
use crate::time_range::TimeRange;
use serde::Serialize;

/// Linear map from `domain` to `range`, optionally clamped to the domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        let mut f = (value - d0) / span;
        if self.clamp {
            f = f.clamp(0.0, 1.0);
        }
        r0 + f * (r1 - r0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HorizontalLayout {
    pub replicate_count: usize,
    pub canvas_width: f64,
    /// Pixel distance between adjacent replicate columns.
    pub column_step: f64,
    pub column_width: f64,
    pub scale: LinearScale,
}

impl HorizontalLayout {
    pub fn x_for_replicate(&self, replicate_index: usize) -> f64 {
        self.scale.apply(replicate_index as f64)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SliceLayout {
    pub slice_index: usize,
    pub domain: TimeRange,
    pub height: f64,
    /// Top of this slice, below all preceding slices and gaps.
    pub vertical_offset: f64,
    pub scale: LinearScale,
}

impl SliceLayout {
    /// Canvas y for time `t`, clamped into this slice.
    pub fn y_for_time(&self, t: f64) -> f64 {
        self.vertical_offset + self.scale.apply(t)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanvasGeometry {
    pub horizontal: HorizontalLayout,
    pub slices: Vec<SliceLayout>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Canvas plus margins.
    pub frame_width: f64,
    pub frame_height: f64,
}

pub struct LayoutScaler<'a> {
    settings: &'a LayoutSettings,
}

impl<'a> LayoutScaler<'a> {
    pub fn new(settings: &'a LayoutSettings) -> Self {
        Self { settings }
    }

    pub fn horizontal(&self, replicate_count: usize, frame_width: f64) -> HorizontalLayout {
        let s = self.settings;
        let available = frame_width - s.margins.left - s.margins.right;
        let pitch = s.max_column_width + s.max_column_spacing;
        let preferred = (replicate_count as f64 + 1.0) * pitch;
        let canvas_width = available.min(preferred).max(0.0);
        let scale = LinearScale::new((0.0, replicate_count as f64), (0.0, canvas_width));
        let column_step = if replicate_count == 0 {
            0.0
        } else {
            canvas_width / replicate_count as f64
        };
        let column_width = if pitch > 0.0 {
            (column_step * s.max_column_width / pitch).min(s.max_column_width)
        } else {
            0.0
        };
        HorizontalLayout {
            replicate_count,
            canvas_width,
            column_step,
            column_width,
            scale,
        }
    }

    pub fn slice_height(&self, slice: &TimeRange) -> f64 {
        (slice.span() * self.settings.tick_height).max(0.0)
    }

    pub fn vertical(&self, slices: &[TimeRange]) -> Vec<SliceLayout> {
        let mut offset = 0.0;
        slices
            .iter()
            .enumerate()
            .map(|(slice_index, slice)| {
                let height = self.slice_height(slice);
                let layout = SliceLayout {
                    slice_index,
                    domain: *slice,
                    height,
                    vertical_offset: offset,
                    scale: LinearScale::new((slice.min, slice.max), (0.0, height)).clamped(),
                };
                offset += height + self.settings.slice_gap;
                layout
            })
            .collect()
    }

    pub fn canvas_height(&self, slices: &[SliceLayout]) -> f64 {
        let heights = slices.iter().map(|s| s.height).sum::<f64>();
        let gaps = slices.len().saturating_sub(1) as f64 * self.settings.slice_gap;
        heights + gaps
    }

    pub fn layout(
        &self,
        slices: &[TimeRange],
        replicate_count: usize,
        frame_width: f64,
    ) -> CanvasGeometry {
        let margins = &self.settings.margins;
        let horizontal = self.horizontal(replicate_count, frame_width);
        let slices = self.vertical(slices);
        let canvas_width = horizontal.canvas_width;
        let canvas_height = self.canvas_height(&slices);
        CanvasGeometry {
            horizontal,
            slices,
            canvas_width,
            canvas_height,
            frame_width: canvas_width + margins.left + margins.right,
            frame_height: canvas_height + margins.top + margins.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Margins;

    fn settings() -> LayoutSettings {
        LayoutSettings::default()
    }

    #[test]
    fn test_vertical_scale_is_clamped() {
        let settings = settings();
        let scaler = LayoutScaler::new(&settings);
        let slices = scaler.vertical(&[TimeRange::new(100.0, 200.0)]);
        let slice = &slices[0];
        assert!((slice.height - 20.0).abs() < 1e-9);
        assert!((slice.scale.apply(100.0) - 0.0).abs() < 1e-9);
        assert!((slice.scale.apply(150.0) - 10.0).abs() < 1e-9);
        assert!((slice.scale.apply(250.0) - 20.0).abs() < 1e-9);
        assert!((slice.scale.apply(50.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_stacked_slices() {
        let settings = settings();
        let scaler = LayoutScaler::new(&settings);
        let slices = scaler.vertical(&[
            TimeRange::new(0.0, 500.0),
            TimeRange::new(97_500.0, 102_500.0),
            TimeRange::new(195_000.0, 200_000.0),
        ]);
        let heights = slices.iter().map(|s| s.height.round()).collect::<Vec<_>>();
        assert_eq!(heights, vec![100.0, 1000.0, 1000.0]);
        let offsets = slices
            .iter()
            .map(|s| s.vertical_offset.round())
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![0.0, 130.0, 1160.0]);
        assert!((scaler.canvas_height(&slices) - 2160.0).abs() < 1e-6);
        assert!((slices[1].y_for_time(97_500.0) - 130.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_extent_slice() {
        let settings = settings();
        let scaler = LayoutScaler::new(&settings);
        let slices = scaler.vertical(&[TimeRange::new(300.0, 300.0)]);
        assert_eq!(slices[0].height, 0.0);
        assert_eq!(slices[0].scale.apply(300.0), 0.0);
        assert_eq!(slices[0].scale.apply(900.0), 0.0);
    }

    #[test]
    fn test_columns_capped_at_max_pitch() {
        let settings = settings();
        let scaler = LayoutScaler::new(&settings);
        let h = scaler.horizontal(4, 10_000.0);
        assert!((h.canvas_width - 125.0).abs() < 1e-9);
        assert!(h.column_width <= settings.max_column_width);
        assert!((h.x_for_replicate(0) - 0.0).abs() < 1e-9);
        assert!((h.x_for_replicate(2) - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_columns_shrink_to_frame() {
        let settings = settings();
        let scaler = LayoutScaler::new(&settings);
        // 180 px frame minus 80 px margins leaves 100 px for 50 replicates.
        let h = scaler.horizontal(50, 180.0);
        assert!((h.canvas_width - 100.0).abs() < 1e-9);
        assert!((h.column_step - 2.0).abs() < 1e-9);
        assert!((h.column_width - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_width_frame_degrades() {
        let settings = settings();
        let scaler = LayoutScaler::new(&settings);
        let h = scaler.horizontal(10, 30.0);
        assert_eq!(h.canvas_width, 0.0);
        assert_eq!(h.column_width, 0.0);
        let h = scaler.horizontal(0, 800.0);
        assert_eq!(h.column_step, 0.0);
        assert_eq!(h.x_for_replicate(0), 0.0);
    }

    #[test]
    fn test_layout_totals_include_margins() {
        let settings = LayoutSettings {
            margins: Margins {
                top: 10.0,
                right: 5.0,
                bottom: 15.0,
                left: 40.0,
            },
            ..LayoutSettings::default()
        };
        let scaler = LayoutScaler::new(&settings);
        let geometry = scaler.layout(&[TimeRange::new(0.0, 1000.0)], 2, 1000.0);
        assert!((geometry.canvas_height - 200.0).abs() < 1e-9);
        assert!((geometry.frame_height - 225.0).abs() < 1e-9);
        assert!((geometry.canvas_width - 75.0).abs() < 1e-9);
        assert!((geometry.frame_width - 120.0).abs() < 1e-9);
    }
}
