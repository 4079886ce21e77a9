use std::fmt;

use serde::Serialize;

use crate::config::Bounds;
use crate::geometry::{scaled_tolerance, LineSegment, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub usize);

/// A half-edge. The start is known when it is created, the end once the
/// vertex it runs into is found or the sweep ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Option<Point>,

    /// The half-edge created alongside this one when a site split an arc.
    /// Both start at the split point and trace the same bisector in
    /// opposite directions.
    pub twin: Option<SegmentId>
}

impl Segment {
    pub fn new(start: Point) -> Segment {
        Segment { start, end: None, twin: None }
    }

    pub fn is_done(&self) -> bool {
        self.end.is_some()
    }

    /// Set the end of the segment. Does nothing if it already has one.
    ///
    /// Returns whether this call finished the segment.
    pub fn finish(&mut self, end: Point) -> bool {
        if self.is_done() {
            return false;
        }

        self.end = Some(end);
        true
    }

    pub fn as_line_segment(&self) -> Option<LineSegment> {
        self.end.map(|to| LineSegment { from: self.start, to })
    }
}

/// Counters of a single sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    pub site_events: usize,
    pub circle_events: usize,
    pub circles_scheduled: usize,
    pub circles_invalidated: usize
}

/// The result of a sweep.
#[derive(Debug, Clone)]
pub struct Diagram {
    sites: Vec<Point>,
    segments: Vec<Segment>,
    vertices: Vec<Point>,
    bounds: Bounds,
    tolerance: f64,
    stats: SweepStats
}

impl Diagram {
    pub(crate) fn new(sites: Vec<Point>, segments: Vec<Segment>, vertices: Vec<Point>, bounds: Bounds, tolerance: f64, stats: SweepStats) -> Diagram {
        Diagram { sites, segments, vertices, bounds, tolerance, stats }
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Every half-edge the sweep created, as `(start, end)`.
    pub fn segments(&self) -> Vec<LineSegment> {
        self.segments.iter().filter_map(Segment::as_line_segment).collect()
    }

    /// The edges of the diagram.
    ///
    /// Twin half-edges are joined into the single edge they form, and
    /// segments no longer than the tolerance, scaled to their coordinates,
    /// are left out.
    pub fn edges(&self) -> Vec<LineSegment> {
        self.segments.iter().enumerate().filter_map(|(ix, segment)| {
            let edge = match segment.twin {
                Some(SegmentId(twin)) if twin < ix => return None,
                Some(SegmentId(twin)) => LineSegment { from: self.segments[twin].end?, to: segment.end? },
                None => segment.as_line_segment()?
            };

            let tolerance = scaled_tolerance(self.tolerance, edge.from.magnitude().max(edge.to.magnitude()));
            if edge.length() <= tolerance { None } else { Some(edge) }
        }).collect()
    }

    /// The distinct Voronoi vertices, sorted.
    pub fn vertices(&self) -> Vec<Point> {
        let mut vertices = self.vertices.clone();
        vertices.sort();
        vertices.dedup_by(|a, b| a.approx_eq(b, scaled_tolerance(self.tolerance, a.magnitude())));
        vertices
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Diagram{{\n    {}\n}}", itertools::join(self.edges().iter(), ",\n    "))
    }
}
