//! Assignment of intervals to display slices, with clipping at slice bounds.

use crate::config::DisplayMode;
use crate::environment_sequence::EnvironmentInterval;
use crate::phenotype_sequence::StateInterval;
use crate::time_range::TimeRange;
use itertools::Itertools;

/// Anything with a start and a duration on the simulation timeline.
pub trait Interval {
    fn start(&self) -> f64;
    fn duration(&self) -> f64;

    fn end(&self) -> f64 {
        self.start() + self.duration()
    }
}

impl Interval for StateInterval {
    fn start(&self) -> f64 {
        self.start
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

impl Interval for EnvironmentInterval {
    fn start(&self) -> f64 {
        self.start
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// An interval as drawn inside one slice.
#[derive(Clone, Debug, PartialEq)]
pub struct ClippedInterval<'a, T> {
    pub interval: &'a T,
    pub slice_index: usize,
    pub render_start: f64,
    pub effective_end: f64,
}

impl<T> ClippedInterval<'_, T> {
    pub fn extent(&self) -> f64 {
        self.effective_end - self.render_start
    }
}

/// The windows to draw: the global range in full mode, the configured list
/// otherwise.
pub fn display_slices(
    mode: DisplayMode,
    global: TimeRange,
    sliced: &[TimeRange],
) -> Vec<TimeRange> {
    match mode {
        DisplayMode::Full => vec![global],
        DisplayMode::Sliced => sliced.to_vec(),
    }
}

/// True when the closed extent `[start, end]` of `interval` touches `slice`:
/// it begins in it, ends in it, or spans it.
pub fn is_assigned<T: Interval>(interval: &T, slice: &TimeRange) -> bool {
    let start = interval.start();
    let end = interval.end();
    let begins_in = slice.contains(start);
    let ends_in = slice.contains(end);
    let spans = start < slice.min && end > slice.max;
    begins_in || ends_in || spans
}

/// Rendered part of `interval` inside `slice`, or `None` when unassigned or
/// when the clipped extent is empty.
pub fn clip<'a, T: Interval>(
    interval: &'a T,
    slice_index: usize,
    slice: &TimeRange,
) -> Option<ClippedInterval<'a, T>> {
    if !is_assigned(interval, slice) {
        return None;
    }
    let render_start = interval.start().max(slice.min);
    let effective_end = interval.end().min(slice.max);
    if effective_end <= render_start {
        return None;
    }
    Some(ClippedInterval {
        interval,
        slice_index,
        render_start,
        effective_end,
    })
}

pub struct SliceSelector<'s> {
    slices: &'s [TimeRange],
}

impl<'s> SliceSelector<'s> {
    pub fn new(slices: &'s [TimeRange]) -> Self {
        Self { slices }
    }

    /// Intervals clipped into one slice, in input order.
    pub fn select_in<'a, T: Interval>(
        &self,
        slice_index: usize,
        intervals: &'a [T],
    ) -> Vec<ClippedInterval<'a, T>> {
        let Some(slice) = self.slices.get(slice_index) else {
            return vec![];
        };
        intervals
            .iter()
            .filter_map(|interval| clip(interval, slice_index, slice))
            .collect()
    }

    /// Every (slice, interval) assignment, slice-major. An interval shows up
    /// once per slice it overlaps.
    pub fn select<'a, T: Interval>(&self, intervals: &'a [T]) -> Vec<ClippedInterval<'a, T>> {
        self.slices
            .iter()
            .enumerate()
            .cartesian_product(intervals.iter())
            .filter_map(|((slice_index, slice), interval)| clip(interval, slice_index, slice))
            .collect()
    }
}
