use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::geometry::Point;

/// A loose box the caller expects the sites to fall in.
///
/// It only widens the region the sweep starts from. Edges are never clipped
/// to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryHint {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64
}

impl BoundaryHint {
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y].iter().all(|v| v.is_finite());

        if !finite || self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(VoronoiError::InvalidBoundary(*self));
        }

        Ok(())
    }
}

/// Tunables of a diagram computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiConfig {
    /// Fraction of the extent (plus one) added to each side of the bounds.
    pub margin: f64,
    /// How many bounding spans past the rightmost bound unbounded edges are
    /// cut off at.
    pub far_factor: f64,
    /// Absolute tolerance for simultaneous events, sites on breakpoints and
    /// zero-length edges.
    pub tolerance: f64
}

impl Default for VoronoiConfig {
    fn default() -> VoronoiConfig {
        VoronoiConfig {
            margin: 0.2,
            far_factor: 2.0,
            tolerance: 1e-9
        }
    }
}

/// The expanded bounding box of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64
}

impl Bounds {
    /// The box around `sites` and `hint`, grown by `config.margin` on each side.
    pub fn around(sites: &[Point], hint: Option<BoundaryHint>, config: &VoronoiConfig) -> Bounds {
        let mut bounds = match (hint, sites.first()) {
            (Some(hint), _) => Bounds { min_x: hint.min_x, min_y: hint.min_y, max_x: hint.max_x, max_y: hint.max_y },
            (None, Some(site)) => Bounds { min_x: site.x(), min_y: site.y(), max_x: site.x(), max_y: site.y() },
            (None, None) => Bounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 }
        };

        for site in sites {
            bounds.min_x = bounds.min_x.min(site.x());
            bounds.min_y = bounds.min_y.min(site.y());
            bounds.max_x = bounds.max_x.max(site.x());
            bounds.max_y = bounds.max_y.max(site.y());
        }

        let dx = (bounds.width() + 1.0) * config.margin;
        let dy = (bounds.height() + 1.0) * config.margin;

        Bounds {
            min_x: bounds.min_x - dx,
            min_y: bounds.min_y - dy,
            max_x: bounds.max_x + dx,
            max_y: bounds.max_y + dy
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// How far past the box unbounded edges are cut off.
    pub fn reach(&self, config: &VoronoiConfig) -> f64 {
        config.far_factor * (self.width() + self.height())
    }

    /// The sweep position unbounded edges are evaluated at when the sweep
    /// ends. It is past the box and past `sweep_x`, the last event, so every
    /// open edge has already left the vertex it started at.
    pub fn far_x(&self, sweep_x: f64, config: &VoronoiConfig) -> f64 {
        self.max_x.max(sweep_x) + self.reach(config)
    }
}
