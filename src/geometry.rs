use std::hash::{Hash, Hasher};
use std::ops::Sub;
use std::fmt;

use ordered_float::{FloatIsNan, NotNan};
use serde::{Deserialize, Serialize};

/// Basic Point type for usage in the Voronoi lib.
///
/// Points are ordered by `x` and then by `y`, which is the order the sweep
/// line visits them in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: NotNan<f64>,
    pub y: NotNan<f64>
}

impl Point {
    /// Create a new point. Returns Err(FloatIsNan) if either paramter is NaN.
    pub fn new(x: f64, y: f64) -> Result<Point, FloatIsNan> {
        Ok(Point { x: NotNan::new(x)?, y: NotNan::new(y)? })
    }

    /// Like new, but panics instead of return an Err.
    pub fn new_unwrap(x: f64, y: f64) -> Point {
        Point::new(x, y).expect("Points cannot have NaN values.")
    }

    pub fn x(&self) -> f64 {
        self.x.into_inner()
    }

    pub fn y(&self) -> f64 {
        self.y.into_inner()
    }

    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x() - other.x()).hypot(self.y() - other.y())
    }

    /// Whether both coordinates are within `tolerance` of the other point's.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x() - other.x()).abs() <= tolerance && (self.y() - other.y()).abs() <= tolerance
    }

    /// The larger absolute coordinate.
    pub fn magnitude(&self) -> f64 {
        self.x().abs().max(self.y().abs())
    }
}

/// `tolerance` grown with the size of the numbers it is compared against,
/// never below its own value.
pub fn scaled_tolerance(tolerance: f64, magnitude: f64) -> f64 {
    tolerance * magnitude.abs().max(1.0)
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Point {{ x: {}, y: {} }}", self.x(), self.y())
    }
}

/// A finished Voronoi edge. Equality and hashing ignore direction.
#[derive(Clone, Copy, Debug, Eq, PartialOrd, Ord)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        self.dx().hypot(self.dy())
    }

    pub fn midpoint(&self) -> Point {
        Point {
            x: NotNan::new((self.from.x() + self.to.x()) / 2f64).unwrap_or(self.from.x),
            y: NotNan::new((self.from.y() + self.to.y()) / 2f64).unwrap_or(self.from.y)
        }
    }

    pub fn dx(&self) -> f64 {
        self.to.x() - self.from.x()
    }

    pub fn dy(&self) -> f64 {
        self.to.y() - self.from.y()
    }

    /// Whether the segment touches `point`, within `tolerance`, at either end.
    pub fn has_endpoint(&self, point: &Point, tolerance: f64) -> bool {
        self.from.approx_eq(point, tolerance) || self.to.approx_eq(point, tolerance)
    }

    /// The same segment with its endpoints in ascending order.
    pub fn normalized(&self) -> LineSegment {
        if self.from <= self.to { *self } else { LineSegment { from: self.to, to: self.from } }
    }
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &LineSegment) -> bool {
        (self.from == other.from && self.to == other.to)
        || (self.from == other.to && self.to == other.from)
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\{{{} -> {}}}", self.from, self.to)
    }
}

impl Hash for LineSegment {
    fn hash<H>(&self, hasher: &mut H) where H: Hasher  {
        let normalized = self.normalized();
        normalized.from.hash(hasher);
        normalized.to.hash(hasher);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64
}

impl Circle {
    /// The rightmost point of the circle, which is where the sweep line has
    /// to be before the circle is known to be empty.
    pub fn event_x(&self) -> f64 {
        self.center.x() + self.radius
    }
}

/// Which direction the points of a triple are going in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriangleOrientation {
    /// Points go around like a clock.
    Clockwise,
    /// Points go around opposite of a clock.
    Counterclockwise,
    /// Points coincide on a line.
    Collinear
}

/// Find the orientation of the triple `a`, `b`, `c`.
///
/// This is the sign of the cross product `(b - a) x (c - a)`.
pub fn orientation(a: Point, b: Point, c: Point) -> TriangleOrientation {
    use self::TriangleOrientation::*;

    let det = (b.x() - a.x()) * (c.y() - a.y()) - (c.x() - a.x()) * (b.y() - a.y());
    if det > 0f64 { Counterclockwise } else if det < 0f64 { Clockwise } else { Collinear }
}

/// The circle through three consecutive beachline foci, ordered bottom to
/// top along the beachline.
///
/// Only a clockwise triple has converging breakpoints, so every other triple
/// returns `None`. This includes collinear triples, which have no circle.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<Circle> {
    if orientation(a, b, c) != TriangleOrientation::Clockwise {
        return None;
    }

    // Intersect the perpendicular bisectors of `ab` and `ac`.
    let (ba_x, ba_y) = (b.x() - a.x(), b.y() - a.y());
    let (ca_x, ca_y) = (c.x() - a.x(), c.y() - a.y());
    let e = ba_x * (a.x() + b.x()) + ba_y * (a.y() + b.y());
    let f = ca_x * (a.x() + c.x()) + ca_y * (a.y() + c.y());
    let g = 2f64 * (ba_x * (c.y() - b.y()) - ba_y * (c.x() - b.x()));

    if g == 0f64 {
        return None;
    }

    let center = Point::new((ca_y * e - ba_y * f) / g, (ba_x * f - ca_x * e) / g).ok()?;
    let radius = center.distance(&a);

    if !center.is_finite() || !radius.is_finite() {
        return None;
    }

    Some(Circle { center, radius })
}

/// A parabola described as a focus and a vertical directrix.
///
/// The parabola is the set of points where the distance between the focus
/// and the directrix are the same.
///
/// The focus cannot lie on the directrix.
#[derive(Debug, Clone, Copy)]
pub struct FocusDirectrixParabola {
    focus: Point,
    /// x = directrix
    directrix: f64
}

impl FocusDirectrixParabola {
    /// Create a new parabola with the specified focus and directrix.
    ///
    /// Returns `None` if the directrix passes through the focus. This would
    /// be a degenerate parabola.
    pub fn new(focus: Point, directrix: f64) -> Option<FocusDirectrixParabola> {
        if focus.x() == directrix {
            return None;
        }

        Some(FocusDirectrixParabola { focus, directrix })
    }

    /// The `x` of the parabola at height `y`.
    pub fn x_at(&self, y: f64) -> f64 {
        QuadraticParabola::from(*self).eval(y)
    }
}

/// A parabola described by the equation `x = ay^2 + by + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticParabola {
    a: f64,
    b: f64,
    c: f64
}

impl QuadraticParabola {
    pub fn eval(&self, y: f64) -> f64 {
        (self.a * y + self.b) * y + self.c
    }

    /// The root taken with the negative square root, `(-b - sqrt(b^2 - 4ac)) / 2a`.
    ///
    /// For the difference of a lower arc's parabola and an upper arc's
    /// parabola this is always the breakpoint between them, whichever of the
    /// two foci is closer to the sweep line. Returns `None` when the
    /// parabola is a line.
    pub fn lower_root(&self) -> Option<f64> {
        if self.a == 0f64 {
            return None;
        }

        // Rounding can push a double root slightly negative.
        let discriminant = (self.b * self.b - 4f64 * self.a * self.c).max(0f64);

        Some((-self.b - discriminant.sqrt()) / (2f64 * self.a))
    }
}

impl From<FocusDirectrixParabola> for QuadraticParabola {
    fn from(FocusDirectrixParabola { focus, directrix: d }: FocusDirectrixParabola) -> QuadraticParabola {
        // Let (x, y) be some point on the parabola. It is as far from the
        // focus as from the directrix, so
        //
        // (x - d)^2 = (x - fx)^2 + (y - fy)^2
        //
        // The x^2 terms cancel, leaving x linear in terms of y:
        //
        // 2*x*(fx - d) = (y - fy)^2 + fx^2 - d^2
        //
        // Expanding (y - fy)^2 and dividing by `z = 2*(fx - d)` gives the
        // a, b and c below. `z` is never 0 since the focus is not on the
        // directrix.
        let (fx, fy) = (focus.x(), focus.y());
        let z = 2f64 * (fx - d);

        QuadraticParabola {
            a: 1f64 / z,
            b: -2f64 * fy / z,
            c: (fy * fy + fx * fx - d * d) / z
        }
    }
}

impl<'p> Sub for &'p QuadraticParabola {
    type Output = QuadraticParabola;

    fn sub(self, other: &'p QuadraticParabola) -> QuadraticParabola {
        QuadraticParabola {
            a: self.a - other.a,
            b: self.b - other.b,
            c: self.c - other.c
        }
    }
}

/// The breakpoint between the arc with focus `lower` and the arc above it
/// with focus `upper`, when the sweep line is at `sweep_x`.
pub fn breakpoint(lower: Point, upper: Point, sweep_x: f64) -> Result<Point, FloatIsNan> {
    // `focus` is the parabola the `x` is read off once `y` is known.
    let (y, focus) = if lower.x() == upper.x() {
        ((lower.y() + upper.y()) / 2f64, lower)
    } else if upper.x() == sweep_x {
        (upper.y(), lower)
    } else if lower.x() == sweep_x {
        (lower.y(), upper)
    } else {
        let lower_parabola: QuadraticParabola = FocusDirectrixParabola { focus: lower, directrix: sweep_x }.into();
        let upper_parabola: QuadraticParabola = FocusDirectrixParabola { focus: upper, directrix: sweep_x }.into();

        let difference = &lower_parabola - &upper_parabola;
        // `a` is only 0 with equal `x` foci, which was handled above.
        (difference.lower_root().unwrap_or((lower.y() + upper.y()) / 2f64), lower)
    };

    // Both foci on the sweep line only separate by a horizontal ray ending at it.
    let x = match FocusDirectrixParabola::new(focus, sweep_x) {
        Some(parabola) => parabola.x_at(y),
        None => sweep_x
    };

    Point::new(x, y)
}
