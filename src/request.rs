use serde::{Deserialize, Serialize};

use crate::config::{BoundaryHint, VoronoiConfig};
use crate::error::Result;
use crate::geometry::Point;
use crate::logger::{DiscardLogger, FortuneLogger};

/// A diagram request as it arrives over the wire.
///
/// ```json
/// {"points": [[0, 0], [2, 0]], "boundaries": {"min_x": 0, "min_y": 0, "max_x": 2, "max_y": 1}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoronoiRequest {
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub boundaries: Option<BoundaryHint>
}

/// The sites back, and every edge flattened to `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoronoiResponse {
    pub points: Vec<[f64; 2]>,
    pub edges: Vec<[f64; 4]>
}

impl VoronoiRequest {
    pub fn sites(&self) -> Result<Vec<Point>> {
        self.points.iter().map(|&[x, y]| Ok(Point::new(x, y)?)).collect()
    }

    pub fn solve(&self, config: &VoronoiConfig) -> Result<VoronoiResponse> {
        self.solve_with_logger(config, DiscardLogger)
    }

    pub fn solve_with_logger<L>(&self, config: &VoronoiConfig, logger: L) -> Result<VoronoiResponse>
    where L: FortuneLogger
    {
        let sites = self.sites()?;
        let diagram = crate::compute_voronoi_with_logger(&sites, self.boundaries, config, logger)?;

        Ok(VoronoiResponse {
            points: self.points.clone(),
            edges: diagram.edges().iter().map(|edge| [edge.from.x(), edge.from.y(), edge.to.x(), edge.to.y()]).collect()
        })
    }
}
