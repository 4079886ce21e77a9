use std::fmt;

use tracing::{debug, info, trace};

use crate::geometry::Point;

/// What the sweep is doing, reported as it happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FortuneLogMessage {
    /// The sweep is about to start over `sites` sites.
    Start { sites: usize },
    /// A site was added to the beachline at sweep position `x`.
    SiteEvent { x: f64, site: Point },
    /// An arc collapsed into the Voronoi vertex `vertex` at sweep position `x`.
    CircleEvent { x: f64, vertex: Point },
    /// A circle event was scheduled for sweep position `x`.
    CircleScheduled { x: f64, vertex: Point },
    /// The circle event at sweep position `x` no longer applies.
    CircleInvalidated { x: f64 },
    /// The `open` unbounded edges are being cut off at sweep position `far_x`.
    Finalize { far_x: f64, open: usize },
    /// The sweep produced `segments` half-edges.
    Done { segments: usize }
}

impl FortuneLogMessage {
    /// The sweep position of an event message.
    pub fn sweep_x(&self) -> Option<f64> {
        match *self {
            FortuneLogMessage::SiteEvent { x, .. } | FortuneLogMessage::CircleEvent { x, .. } => Some(x),
            _ => None
        }
    }
}

impl fmt::Display for FortuneLogMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FortuneLogMessage::Start { sites } => write!(f, "Sweeping {} sites.", sites),
            FortuneLogMessage::SiteEvent { x, site } => write!(f, "[{}] Site {}", x, site),
            FortuneLogMessage::CircleEvent { x, vertex } => write!(f, "[{}] Circle at {}", x, vertex),
            FortuneLogMessage::CircleScheduled { x, vertex } => write!(f, "    scheduled circle at {} for {}", vertex, x),
            FortuneLogMessage::CircleInvalidated { x } => write!(f, "    invalidated circle for {}", x),
            FortuneLogMessage::Finalize { far_x, open } => write!(f, "Cutting {} open edges at {}.", open, far_x),
            FortuneLogMessage::Done { segments } => write!(f, "Done with {} segments.", segments)
        }
    }
}

/// Logger trait for Fortune's algorithm.
pub trait FortuneLogger {
    /// The function that gets a FortuneLogMessage and does the actual logging.
    fn log(&mut self, message: FortuneLogMessage);
}

impl<'a, L> FortuneLogger for &'a mut L where L: FortuneLogger {
    fn log(&mut self, message: FortuneLogMessage) {
        (**self).log(message)
    }
}

/// Keeps every message, mostly for looking at a run after the fact.
impl FortuneLogger for Vec<FortuneLogMessage> {
    fn log(&mut self, message: FortuneLogMessage) {
        self.push(message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardLogger;

impl FortuneLogger for DiscardLogger {
    fn log(&mut self, _message: FortuneLogMessage) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PrintlnLogger;

impl FortuneLogger for PrintlnLogger {
    fn log(&mut self, message: FortuneLogMessage) {
        println!("{}", message);
    }
}

/// Sends messages to `tracing` under the `fortune_voronoi` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl FortuneLogger for TracingLogger {
    fn log(&mut self, message: FortuneLogMessage) {
        match message {
            FortuneLogMessage::Start { sites } => info!(sites, "starting sweep"),
            FortuneLogMessage::SiteEvent { x, site } => debug!(x, site = %site, "site event"),
            FortuneLogMessage::CircleEvent { x, vertex } => debug!(x, vertex = %vertex, "circle event"),
            FortuneLogMessage::CircleScheduled { x, vertex } => trace!(x, vertex = %vertex, "circle scheduled"),
            FortuneLogMessage::CircleInvalidated { x } => trace!(x, "circle invalidated"),
            FortuneLogMessage::Finalize { far_x, open } => debug!(far_x, open, "finishing unbounded edges"),
            FortuneLogMessage::Done { segments } => info!(segments, "sweep done")
        }
    }
}
