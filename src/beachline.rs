use ordered_float::{FloatIsNan, NotNan};

use crate::diagram::{Segment, SegmentId};
use crate::error::{Result, VoronoiError};
use crate::event_queue::EventQueue;
use crate::geometry::{breakpoint, circumcircle, scaled_tolerance, FocusDirectrixParabola, Point};
use crate::logger::{FortuneLogMessage, FortuneLogger};

fn nan_breakpoint(_: FloatIsNan) -> VoronoiError {
    VoronoiError::Invariant("breakpoint is NaN")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircleId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcState {
    /// On the beachline.
    Active,
    /// Collapsed by its circle event. The slot is never reused.
    Removed
}

/// An arc on the beachline.
///
/// A parabola with the specified focus and a directrix of the sweep line.
/// Since the sweep line moves as the algorithm runs, this represents an
/// entire class of parabolas, though only one parabola at any point in time.
#[derive(Debug, Clone)]
pub struct Arc {
    /// The focus of the parabolas where the directrix is the sweep line.
    pub focus: Point,

    /// The arc below this one.
    pub prev: Option<ArcId>,

    /// The arc above this one.
    pub next: Option<ArcId>,

    /// The pending circle event that would remove this arc.
    pub circle_event: Option<CircleId>,

    /// The edge traced by the breakpoint with `prev`.
    pub left_segment: Option<SegmentId>,

    /// The edge traced by the breakpoint with `next`.
    pub right_segment: Option<SegmentId>,

    pub state: ArcState
}

impl Arc {
    fn new(focus: Point) -> Arc {
        Arc {
            focus,
            prev: None,
            next: None,
            circle_event: None,
            left_segment: None,
            right_segment: None,
            state: ArcState::Active
        }
    }
}

/// Handled when the sweep line reaches the rightmost point of the circle
/// through the arc's focus and its neighbours' foci.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleEvent {
    /// Where the sweep line is when the arc collapses.
    pub x: NotNan<f64>,

    /// The center of the circle, where the arc collapses into a point.
    pub vertex: Point,

    /// The arc that collapses.
    pub arc: ArcId
}

/// Every circle event of a sweep and the queue of the pending ones.
#[derive(Debug, Default)]
pub struct CircleQueue {
    events: Vec<CircleEvent>,
    queue: EventQueue<NotNan<f64>, CircleId>,
    invalidated: usize
}

impl CircleQueue {
    pub fn new() -> CircleQueue {
        CircleQueue::default()
    }

    fn schedule(&mut self, x: NotNan<f64>, vertex: Point, arc: ArcId) -> CircleId {
        let id = CircleId(self.events.len());
        self.events.push(CircleEvent { x, vertex, arc });
        self.queue.push(x, id);
        id
    }

    fn invalidate(&mut self, id: CircleId) {
        if self.queue.invalidate(id) {
            self.invalidated += 1;
        }
    }

    pub fn get(&self, id: CircleId) -> &CircleEvent {
        &self.events[id.0]
    }

    pub fn peek_x(&mut self) -> Option<NotNan<f64>> {
        self.queue.peek_min().map(|(x, _)| x)
    }

    pub fn pop(&mut self) -> Option<CircleId> {
        self.queue.pop_min().map(|(_, id)| id)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// How many circle events were ever created.
    pub fn scheduled(&self) -> usize {
        self.events.len()
    }

    pub fn invalidated(&self) -> usize {
        self.invalidated
    }
}

/// The half-edges and vertices found so far.
#[derive(Debug, Default)]
pub struct Edges {
    pub segments: Vec<Segment>,
    pub vertices: Vec<Point>,

    /// Segments between sites sharing the smallest `x`. They come in from
    /// the far left, so their start is only placed once the sweep is over.
    first_column: Vec<SegmentId>
}

impl Edges {
    fn start(&mut self, point: Point) -> SegmentId {
        self.segments.push(Segment::new(point));
        SegmentId(self.segments.len() - 1)
    }

    fn start_twins(&mut self, point: Point) -> (SegmentId, SegmentId) {
        let (first, second) = (self.start(point), self.start(point));
        self.segments[first.0].twin = Some(second);
        self.segments[second.0].twin = Some(first);
        (first, second)
    }

    fn finish(&mut self, id: Option<SegmentId>, point: Point) {
        if let Some(SegmentId(ix)) = id {
            self.segments[ix].finish(point);
        }
    }

    pub fn open(&self) -> usize {
        self.segments.iter().filter(|segment| !segment.is_done()).count()
    }

    /// Move the start of every first-column segment `reach` to the left of
    /// both its end and `min_x`.
    pub fn stretch_first_column(&mut self, min_x: f64, reach: f64) -> Result<()> {
        for &SegmentId(ix) in &self.first_column {
            let segment = &mut self.segments[ix];
            let end_x = segment.end.map_or(min_x, |end| end.x());

            segment.start = Point::new(end_x.min(min_x) - reach, segment.start.y())
                .map_err(|_| VoronoiError::Invariant("first column segment start is NaN"))?;
        }

        Ok(())
    }
}

/// Where a new site falls on an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// The point on the arc level with the site.
    pub split: Point,

    /// The lower arc of the breakpoint the site lies on, if it lies on one.
    pub on_breakpoint: Option<ArcId>
}

/// The beachline knows what all the arcs are and in which order they are,
/// bottom to top.
///
/// Arcs live in an arena and are never freed, so a stale circle event can
/// still name its arc after the arc is gone.
#[derive(Debug)]
pub struct Beachline {
    arcs: Vec<Arc>,
    head: Option<ArcId>,
    tolerance: f64
}

impl Beachline {
    pub fn new(tolerance: f64) -> Beachline {
        Beachline { arcs: Vec::new(), head: None, tolerance }
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id.0]
    }

    /// The active arcs, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        ::std::iter::successors(self.head, move |&id| self.arc(id).next)
    }

    fn add(&mut self, arc: Arc) -> ArcId {
        self.arcs.push(arc);
        ArcId(self.arcs.len() - 1)
    }

    fn scaled_tolerance(&self, magnitude: f64) -> f64 {
        scaled_tolerance(self.tolerance, magnitude)
    }

    /// Whether the arc is above `point` when the sweep line is at `point.x`.
    ///
    /// An arc whose focus is on the sweep line is a horizontal ray with no
    /// height, and never covers anything.
    pub fn arc_covers(&self, point: Point, id: ArcId) -> Result<Option<Coverage>> {
        let arc = self.arc(id);
        if arc.focus.x == point.x {
            return Ok(None);
        }

        let sweep_x = point.x();
        let low = match arc.prev {
            Some(prev) => breakpoint(self.arc(prev).focus, arc.focus, sweep_x).map_err(nan_breakpoint)?.y(),
            None => ::std::f64::NEG_INFINITY
        };
        let high = match arc.next {
            Some(next) => breakpoint(arc.focus, self.arc(next).focus, sweep_x).map_err(nan_breakpoint)?.y(),
            None => ::std::f64::INFINITY
        };

        if !(low <= point.y() && point.y() <= high) {
            return Ok(None);
        }

        let x = match FocusDirectrixParabola::new(arc.focus, sweep_x) {
            Some(parabola) => parabola.x_at(point.y()),
            None => return Ok(None)
        };
        let split = Point::new(x, point.y()).map_err(nan_breakpoint)?;

        let tolerance = self.scaled_tolerance(point.y());
        let on_breakpoint = if arc.next.is_some() && high - point.y() <= tolerance {
            Some(id)
        } else if arc.prev.is_some() && point.y() - low <= tolerance {
            arc.prev
        } else {
            None
        };

        Ok(Some(Coverage { split, on_breakpoint }))
    }

    /// Find the arc above `point`, scanning up from the bottom arc.
    pub fn locate(&self, point: Point) -> Result<Option<(ArcId, Coverage)>> {
        for id in self.iter() {
            if let Some(coverage) = self.arc_covers(point, id)? {
                return Ok(Some((id, coverage)));
            }
        }

        Ok(None)
    }

    /// Add the arc of a new site.
    pub fn insert_site<L>(&mut self, site: Point, edges: &mut Edges, circles: &mut CircleQueue, logger: &mut L) -> Result<ArcId>
    where L: FortuneLogger
    {
        let head = match self.head {
            Some(head) => head,
            None => {
                let id = self.add(Arc::new(site));
                self.head = Some(id);
                return Ok(id);
            }
        };

        let new = match self.locate(site)? {
            Some((_, Coverage { split, on_breakpoint: Some(lower) })) => self.insert_at_breakpoint(lower, site, split, edges),
            Some((id, Coverage { split, on_breakpoint: None })) => self.split(id, site, split, edges),
            None => {
                // Only the first sites, which all share the smallest `x`,
                // have no arc with a height to land on.
                if self.iter().any(|id| self.arc(id).focus.x != site.x) {
                    return Err(VoronoiError::Invariant("no arc above site"));
                }

                let top = self.iter().last().unwrap_or(head);
                return Ok(self.append_first_column(top, site, edges));
            }
        };

        let sweep_x = site.x();
        for id in [Some(new), self.arc(new).prev, self.arc(new).next].iter().flatten() {
            self.recheck_circle_event(*id, sweep_x, circles, logger);
        }

        Ok(new)
    }

    /// Replace `id` with a copy of itself below the site's arc and one above.
    fn split(&mut self, id: ArcId, site: Point, split: Point, edges: &mut Edges) -> ArcId {
        let old = self.arc(id).clone();

        let new = self.add(Arc::new(site));
        let upper = self.add(Arc {
            next: old.next,
            right_segment: old.right_segment,
            ..Arc::new(old.focus)
        });

        if let Some(next) = old.next {
            self.arcs[next.0].prev = Some(upper);
        }

        let (left_segment, right_segment) = edges.start_twins(split);

        self.arcs[id.0].next = Some(new);
        self.arcs[id.0].right_segment = Some(left_segment);

        self.arcs[new.0].prev = Some(id);
        self.arcs[new.0].next = Some(upper);
        self.arcs[new.0].left_segment = Some(left_segment);
        self.arcs[new.0].right_segment = Some(right_segment);

        self.arcs[upper.0].prev = Some(new);
        self.arcs[upper.0].left_segment = Some(right_segment);

        new
    }

    /// The site is level with the breakpoint above `lower`, which makes the
    /// breakpoint a Voronoi vertex. The new arc goes in between, no arc is
    /// copied.
    fn insert_at_breakpoint(&mut self, lower: ArcId, site: Point, vertex: Point, edges: &mut Edges) -> ArcId {
        let upper = self.arc(lower).next;

        edges.finish(self.arc(lower).right_segment, vertex);
        edges.vertices.push(vertex);

        let new = self.add(Arc::new(site));
        let (below, above) = (edges.start(vertex), edges.start(vertex));

        self.arcs[lower.0].next = Some(new);
        self.arcs[lower.0].right_segment = Some(below);

        self.arcs[new.0].prev = Some(lower);
        self.arcs[new.0].next = upper;
        self.arcs[new.0].left_segment = Some(below);
        self.arcs[new.0].right_segment = Some(above);

        if let Some(upper) = upper {
            self.arcs[upper.0].prev = Some(new);
            self.arcs[upper.0].left_segment = Some(above);
        }

        new
    }

    /// Put the site's arc on top of `top`, both having foci on the sweep line.
    fn append_first_column(&mut self, top: ArcId, site: Point, edges: &mut Edges) -> ArcId {
        let mid_y = (self.arc(top).focus.y() + site.y()) / 2.0;
        // Both coordinates are finite, so neither is NaN.
        let start = Point::new(site.x(), mid_y).unwrap_or(site);
        let segment = edges.start(start);
        edges.first_column.push(segment);

        let new = self.add(Arc { prev: Some(top), left_segment: Some(segment), ..Arc::new(site) });
        self.arcs[top.0].next = Some(new);
        self.arcs[top.0].right_segment = Some(segment);

        new
    }

    /// Take `id` off the beachline, collapsing it into `vertex`.
    ///
    /// The edges on both sides of the arc end at the vertex, and a new edge
    /// starts there between the neighbours.
    pub fn remove_arc<L>(&mut self, id: ArcId, vertex: Point, sweep_x: f64, edges: &mut Edges, circles: &mut CircleQueue, logger: &mut L) -> Result<()>
    where L: FortuneLogger
    {
        let arc = self.arc(id).clone();
        if arc.state != ArcState::Active {
            return Err(VoronoiError::Invariant("removing an arc twice"));
        }

        let (prev, next) = match (arc.prev, arc.next) {
            (Some(prev), Some(next)) => (prev, next),
            _ => return Err(VoronoiError::Invariant("collapsing arc is missing a neighbour"))
        };

        let segment = edges.start(vertex);

        self.arcs[prev.0].next = Some(next);
        self.arcs[prev.0].right_segment = Some(segment);
        self.arcs[next.0].prev = Some(prev);
        self.arcs[next.0].left_segment = Some(segment);

        edges.finish(arc.left_segment, vertex);
        edges.finish(arc.right_segment, vertex);
        edges.vertices.push(vertex);

        let removed = &mut self.arcs[id.0];
        removed.state = ArcState::Removed;
        removed.circle_event = None;

        self.recheck_circle_event(prev, sweep_x, circles, logger);
        self.recheck_circle_event(next, sweep_x, circles, logger);

        Ok(())
    }

    /// Bring the circle event of `id` up to date with its current neighbours.
    ///
    /// A pending event at the current sweep position is left alone while
    /// the neighbours still meet at its vertex, so that several arcs can
    /// collapse into one co-circular vertex.
    pub fn recheck_circle_event<L>(&mut self, id: ArcId, sweep_x: f64, circles: &mut CircleQueue, logger: &mut L)
    where L: FortuneLogger
    {
        let arc = self.arc(id);
        let circle = match (arc.prev, arc.next) {
            (Some(prev), Some(next)) => circumcircle(self.arc(prev).focus, arc.focus, self.arc(next).focus),
            _ => None
        };

        if let Some(live) = arc.circle_event {
            let event = *circles.get(live);
            let tolerance = self.scaled_tolerance(sweep_x);
            let simultaneous = (event.x.into_inner() - sweep_x).abs() <= tolerance;

            if simultaneous && circle.map_or(false, |circle| circle.center.approx_eq(&event.vertex, tolerance)) {
                return;
            }

            circles.invalidate(live);
            self.arcs[id.0].circle_event = None;
            logger.log(FortuneLogMessage::CircleInvalidated { x: event.x.into_inner() });
        }

        let circle = match circle {
            Some(circle) if circle.event_x() > sweep_x => circle,
            _ => return
        };

        if let Ok(x) = NotNan::new(circle.event_x()) {
            let event = circles.schedule(x, circle.center, id);
            self.arcs[id.0].circle_event = Some(event);
            logger.log(FortuneLogMessage::CircleScheduled { x: x.into_inner(), vertex: circle.center });
        }
    }

    /// End every open edge between neighbouring arcs where its breakpoint
    /// is when the sweep line is at `far_x`.
    pub fn finish_open_segments(&self, far_x: f64, edges: &mut Edges) -> Result<usize> {
        let mut finished = 0;

        for id in self.iter() {
            let arc = self.arc(id);
            let (next, segment) = match (arc.next, arc.right_segment) {
                (Some(next), Some(segment)) => (next, segment),
                _ => continue
            };

            if edges.segments[segment.0].is_done() {
                continue;
            }

            let end = breakpoint(arc.focus, self.arc(next).focus, far_x).map_err(nan_breakpoint)?;
            if edges.segments[segment.0].finish(end) {
                finished += 1;
            }
        }

        Ok(finished)
    }
}
