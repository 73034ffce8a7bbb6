//! Running min/max trackers for node coordinates.

use serde::{Deserialize, Serialize};

/// Min/max over one axis. Starts empty (`+inf`/`-inf`) and only ever widens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScalarRange {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl ScalarRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Widens the range to include `value`.
    ///
    /// NaN is not filtered: once it reaches a bound, that bound stays NaN.
    pub fn update(&mut self, value: f64) {
        if value.is_nan() || value < self.min {
            self.min = value;
        }
        if value.is_nan() || value > self.max {
            self.max = value;
        }
    }

    /// Same extent, shifted so that `min` is zero.
    pub fn rebase(&self) -> Self {
        Self {
            min: self.min - self.min,
            max: self.max - self.min,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max || self.min.is_nan() || self.max.is_nan()
    }

    /// Grows the range by `amount` on both ends.
    pub fn pad(&self, amount: f64) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }
}

/// Axis-aligned box over the x and y axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneBounds {
    pub x: ScalarRange,
    pub y: ScalarRange,
}

impl PlaneBounds {
    pub fn update(&mut self, x: f64, y: f64) {
        self.x.update(x);
        self.y.update(y);
    }

    pub fn rebase(&self) -> Self {
        Self {
            x: self.x.rebase(),
            y: self.y.rebase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        [self.x.min, self.x.max, self.y.min, self.y.max]
            .iter()
            .all(|v| v.is_finite())
    }
}
