//! Positioned rectangle descriptors for state and environment bands.
//!
//! Everything here is plain data in frame coordinates (margins included),
//! ready for any rendering backend.

use crate::config::{DisplayMode, LayoutSettings};
use crate::environment_sequence::EnvironmentInterval;
use crate::lineage_layout::{CanvasGeometry, SliceLayout};
use crate::phenotype_sequence::{LineageSequence, StateInterval};
use crate::slice_selector::{ClippedInterval, Interval, SliceSelector};
use crate::time_range::TimeRange;
use itertools::Itertools;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillCategory {
    /// No task performed in either environment.
    Neutral,
    Active,
}

impl FillCategory {
    pub fn for_state(state: &StateInterval) -> Self {
        if state.is_neutral() {
            FillCategory::Neutral
        } else {
            FillCategory::Active
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Active => "active",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateBand {
    pub replicate_seed: String,
    pub condition_key: String,
    pub replicate_index: usize,
    pub slice_index: usize,
    pub state_label: String,
    pub is_plastic: bool,
    pub fill: FillCategory,
    /// Clipped time extent drawn by `rect`.
    pub time: TimeRange,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvironmentBand {
    pub slice_index: usize,
    pub state_label: String,
    pub time: TimeRange,
    pub rect: Rect,
}

/// Vertical axis of one slice: time domain and the frame rows it maps onto.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SliceAxis {
    pub slice_index: usize,
    pub domain: TimeRange,
    pub range: (f64, f64),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineageLayout {
    pub mode: DisplayMode,
    pub global_range: TimeRange,
    pub replicate_count: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    pub column_width: f64,
    pub slice_axes: Vec<SliceAxis>,
    pub state_bands: Vec<StateBand>,
    pub environment_bands: Vec<EnvironmentBand>,
}

pub struct DrawCommandAssembler<'a> {
    settings: &'a LayoutSettings,
}

impl<'a> DrawCommandAssembler<'a> {
    pub fn new(settings: &'a LayoutSettings) -> Self {
        Self { settings }
    }

    fn band_rect<T: Interval>(
        &self,
        slice: &SliceLayout,
        clipped: &ClippedInterval<'_, T>,
        x: f64,
        width: f64,
    ) -> Rect {
        let top = slice.y_for_time(clipped.render_start);
        let bottom = slice.y_for_time(clipped.effective_end);
        Rect {
            x,
            y: self.settings.margins.top + top,
            width,
            height: (bottom - top - self.settings.band_inset).max(0.0),
        }
    }

    pub fn state_bands(
        &self,
        sequences: &[&LineageSequence],
        geometry: &CanvasGeometry,
    ) -> Vec<StateBand> {
        let domains = geometry.slices.iter().map(|s| s.domain).collect::<Vec<_>>();
        let selector = SliceSelector::new(&domains);
        let column_width = geometry.horizontal.column_width;
        sequences
            .iter()
            .cartesian_product(geometry.slices.iter())
            .flat_map(|(sequence, slice)| {
                let x = self.settings.margins.left
                    + geometry.horizontal.x_for_replicate(sequence.replicate_index);
                selector
                    .select_in(slice.slice_index, &sequence.states)
                    .into_iter()
                    .map(move |clipped| StateBand {
                        replicate_seed: sequence.replicate_seed.clone(),
                        condition_key: sequence.condition_key.clone(),
                        replicate_index: sequence.replicate_index,
                        slice_index: slice.slice_index,
                        state_label: clipped.interval.state_label.clone(),
                        is_plastic: clipped.interval.is_plastic,
                        fill: FillCategory::for_state(clipped.interval),
                        time: TimeRange::new(clipped.render_start, clipped.effective_end),
                        rect: self.band_rect(slice, &clipped, x, column_width),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn environment_bands(
        &self,
        environment: &[EnvironmentInterval],
        geometry: &CanvasGeometry,
    ) -> Vec<EnvironmentBand> {
        let domains = geometry.slices.iter().map(|s| s.domain).collect::<Vec<_>>();
        let selector = SliceSelector::new(&domains);
        let x = self.settings.margins.left - self.settings.env_column_offset;
        geometry
            .slices
            .iter()
            .flat_map(|slice| {
                selector
                    .select_in(slice.slice_index, environment)
                    .into_iter()
                    .map(move |clipped| EnvironmentBand {
                        slice_index: slice.slice_index,
                        state_label: clipped.interval.state_label.clone(),
                        time: TimeRange::new(clipped.render_start, clipped.effective_end),
                        rect: self.band_rect(slice, &clipped, x, self.settings.env_column_width),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn slice_axes(&self, geometry: &CanvasGeometry) -> Vec<SliceAxis> {
        let top = self.settings.margins.top;
        geometry
            .slices
            .iter()
            .map(|slice| SliceAxis {
                slice_index: slice.slice_index,
                domain: slice.domain,
                range: (
                    top + slice.vertical_offset,
                    top + slice.vertical_offset + slice.height,
                ),
            })
            .collect()
    }

    pub fn assemble(
        &self,
        mode: DisplayMode,
        global_range: TimeRange,
        sequences: &[&LineageSequence],
        environment: &[EnvironmentInterval],
        geometry: &CanvasGeometry,
    ) -> LineageLayout {
        LineageLayout {
            mode,
            global_range,
            replicate_count: geometry.horizontal.replicate_count,
            canvas_width: geometry.canvas_width,
            canvas_height: geometry.canvas_height,
            frame_width: geometry.frame_width,
            frame_height: geometry.frame_height,
            column_width: geometry.horizontal.column_width,
            slice_axes: self.slice_axes(geometry),
            state_bands: self.state_bands(sequences, geometry),
            environment_bands: self.environment_bands(environment, geometry),
        }
    }
}
