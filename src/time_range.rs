use serde::{Deserialize, Serialize};

/// Closed time window `[min, max]`, in simulation updates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[inline(always)]
    pub fn contains(&self, t: f64) -> bool {
        self.min <= t && t <= self.max
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn covers(&self, other: &TimeRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn union(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
