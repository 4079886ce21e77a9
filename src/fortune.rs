use crate::beachline::{Beachline, CircleId, CircleQueue, Edges};
use crate::config::{Bounds, VoronoiConfig};
use crate::diagram::{Diagram, SweepStats};
use crate::error::{Result, VoronoiError};
use crate::event_queue::EventQueue;
use crate::geometry::Point;
use crate::logger::{FortuneLogMessage, FortuneLogger};

/// An event to be processed in Fortune's Algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    /// Handled when the sweep line is passing this point.
    Site(Point),

    /// Handled when the associated arc collapsed into a single point.
    Circle(CircleId)
}

/// Everything a single sweep owns.
struct Sweep<L> where L: FortuneLogger {
    beachline: Beachline,
    circles: CircleQueue,
    edges: Edges,
    /// Where the sweep line is. Only ever moves right.
    sweep_x: f64,
    site_events: usize,
    circle_events: usize,
    logger: L
}

impl<L> Sweep<L> where L: FortuneLogger {
    fn advance(&mut self, x: f64) -> Result<()> {
        if x < self.sweep_x {
            return Err(VoronoiError::Invariant("sweep line moved backwards"));
        }

        self.sweep_x = x;
        Ok(())
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Site(site) => {
                self.advance(site.x())?;
                self.logger.log(FortuneLogMessage::SiteEvent { x: self.sweep_x, site });
                self.site_events += 1;

                self.beachline.insert_site(site, &mut self.edges, &mut self.circles, &mut self.logger)?;
            },
            Event::Circle(id) => {
                let event = *self.circles.get(id);
                self.advance(event.x.into_inner())?;
                self.logger.log(FortuneLogMessage::CircleEvent { x: self.sweep_x, vertex: event.vertex });
                self.circle_events += 1;

                if self.beachline.arc(event.arc).circle_event != Some(id) {
                    return Err(VoronoiError::Invariant("circle event no longer belongs to its arc"));
                }

                let sweep_x = self.sweep_x;
                self.beachline.remove_arc(event.arc, event.vertex, sweep_x, &mut self.edges, &mut self.circles, &mut self.logger)?;
            }
        };

        Ok(())
    }

    fn next_circle(&mut self) -> Result<Event> {
        self.circles.pop().map(Event::Circle).ok_or(VoronoiError::Invariant("popped an empty circle event queue"))
    }
}

/// Sweep `sites` left to right, building the diagram's edges.
///
/// The sites must already be valid: at least two, all finite and distinct.
/// Unbounded edges are cut off past the box and past the last event, see
/// `Bounds::far_x`. Edges coming in from the left start `Bounds::reach` left
/// of both the box and their end.
pub fn fortune<L>(sites: &[Point], bounds: Bounds, config: &VoronoiConfig, logger: L) -> Result<Diagram>
where L: FortuneLogger
{
    // Keyed by the point itself, so sites sharing an `x` go bottom to top.
    let mut site_queue: EventQueue<Point, usize> = EventQueue::new();
    for (ix, &site) in sites.iter().enumerate() {
        site_queue.push(site, ix);
    }

    let mut sweep = Sweep {
        beachline: Beachline::new(config.tolerance),
        circles: CircleQueue::new(),
        edges: Edges::default(),
        sweep_x: ::std::f64::NEG_INFINITY,
        site_events: 0,
        circle_events: 0,
        logger
    };

    sweep.logger.log(FortuneLogMessage::Start { sites: sites.len() });

    while let Some((site, _)) = site_queue.peek_min() {
        // Circle events go first when they tie with a site.
        let event = match sweep.circles.peek_x() {
            Some(x) if x <= site.x => sweep.next_circle()?,
            _ => {
                site_queue.pop_min().ok_or(VoronoiError::Invariant("popped an empty site event queue"))?;
                Event::Site(site)
            }
        };

        sweep.handle(event)?;
    }

    while !sweep.circles.is_empty() {
        let event = sweep.next_circle()?;
        sweep.handle(event)?;
    }

    let far_x = bounds.far_x(sweep.sweep_x, config);
    sweep.logger.log(FortuneLogMessage::Finalize { far_x, open: sweep.edges.open() });
    sweep.beachline.finish_open_segments(far_x, &mut sweep.edges)?;
    sweep.edges.stretch_first_column(bounds.min_x, bounds.reach(config))?;

    if sweep.edges.open() != 0 {
        return Err(VoronoiError::Invariant("segment left open after the sweep"));
    }

    sweep.logger.log(FortuneLogMessage::Done { segments: sweep.edges.segments.len() });

    let stats = SweepStats {
        site_events: sweep.site_events,
        circle_events: sweep.circle_events,
        circles_scheduled: sweep.circles.scheduled(),
        circles_invalidated: sweep.circles.invalidated()
    };

    let Edges { segments, vertices, .. } = sweep.edges;
    Ok(Diagram::new(sites.to_vec(), segments, vertices, bounds, config.tolerance, stats))
}
