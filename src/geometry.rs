//! Geometry primitives for slide layout.
//!
//! All coordinates use top-left origin convention:
//! - x increases rightward
//! - y increases downward
//! - `Rect.left`/`Rect.top` is the top-left corner of the rectangle
//!
//! This matches the presentation surface's coordinate system, so no
//! conversion happens at the rendering boundary.
//!
//! The load-bearing function here is [`connector`]: the rendering
//! primitive for a line is a thin rectangle that rotates around its own
//! *center*, not a corner, so a connector between two arbitrary points
//! must be authored horizontally at the midpoint and then rotated. Every
//! connector and arrow in the engine derives from this function rather
//! than ad-hoc corner-anchored placement.

use serde::Serialize;

/// A 2D point in slide units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// An axis-aligned rectangle (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Grow (or shrink, for negative amounts) by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect {
            left: self.left - amount,
            top: self.top - amount,
            width: (self.width + amount * 2.0).max(0.0),
            height: (self.height + amount * 2.0).max(0.0),
        }
    }

    /// Whether the open interior of the rectangle intersects the segment
    /// `from`-`to`. A segment grazing the boundary does not count, which
    /// keeps anchor-attached connectors from flagging their own node.
    pub fn intersects_segment(&self, from: Point, to: Point) -> bool {
        // Liang-Barsky clipping against the interior.
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [
            (-dx, from.x - self.left),
            (dx, self.right() - from.x),
            (-dy, from.y - self.top),
            (dy, self.bottom() - from.y),
        ] {
            if p.abs() <= f64::EPSILON {
                // Parallel to this boundary: outside, or lying exactly on
                // it, never enters the interior.
                if q <= 1e-9 {
                    return false;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return false;
            }
        }
        // Positive clipped length means the segment passes through the
        // interior rather than touching a corner or running along an edge.
        let clipped = (t1 - t0) * (dx * dx + dy * dy).sqrt();
        clipped > 1e-9
    }

    /// Intersection rectangle, or `None` when the rectangles do not
    /// overlap with positive area. Edge-touching rectangles do not count
    /// as overlapping.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

/// Placement of the thin rectangle that renders a line between two points.
///
/// The rectangle is authored horizontally (`length` × `thickness`) at
/// (`left`, `top`) and then rotated by `angle_deg` about its own center,
/// which lands its short edges on the two requested endpoints.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ConnectorGeometry {
    pub left: f64,
    pub top: f64,
    pub length: f64,
    pub thickness: f64,
    pub angle_deg: f64,
}

impl ConnectorGeometry {
    /// Zero-length connectors are valid output but must not be drawn.
    pub fn is_degenerate(&self) -> bool {
        self.length <= f64::EPSILON
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.length / 2.0,
            y: self.top + self.thickness / 2.0,
        }
    }

    /// The two endpoints of the rendered element after rotation about the
    /// center. Used by tests to verify the round-trip guarantee and by the
    /// arrow construction to place the head.
    pub fn endpoints(&self) -> (Point, Point) {
        let c = self.center();
        let half = self.length / 2.0;
        let rad = self.angle_deg.to_radians();
        let (dx, dy) = (rad.cos() * half, rad.sin() * half);
        (
            Point::new(c.x - dx, c.y - dy),
            Point::new(c.x + dx, c.y + dy),
        )
    }

    /// Axis-aligned bounding box of the rotated rectangle.
    pub fn bounding_rect(&self) -> Rect {
        let (a, b) = self.endpoints();
        let half = self.thickness / 2.0;
        let left = a.x.min(b.x) - half;
        let top = a.y.min(b.y) - half;
        Rect::new(left, top, a.x.max(b.x) - left + half, a.y.max(b.y) - top + half)
    }
}

/// Compute the unrotated placement of a line element from `from` to `to`.
///
/// Coincident points yield a degenerate result (`length == 0`) rather than
/// an error; callers skip drawing those.
pub fn connector(from: Point, to: Point, thickness: f64) -> ConnectorGeometry {
    let length = from.distance_to(to);
    let angle_deg = if length <= f64::EPSILON {
        0.0
    } else {
        (to.y - from.y).atan2(to.x - from.x).to_degrees()
    };
    let center = from.midpoint(to);
    ConnectorGeometry {
        left: center.x - length / 2.0,
        top: center.y - thickness / 2.0,
        length,
        thickness,
        angle_deg,
    }
}

/// A triangular arrowhead primitive.
///
/// The triangle is authored pointing *up* in its local space, so landing
/// its tip on the connector axis requires rotating by the connector angle
/// plus [`ArrowHead::ROTATION_OFFSET_DEG`]. That offset is a property of
/// this primitive; a differently-authored head would carry a different
/// constant.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ArrowHead {
    /// Extent along the connector axis.
    pub length: f64,
    /// Extent across the connector axis.
    pub width: f64,
}

impl ArrowHead {
    pub const ROTATION_OFFSET_DEG: f64 = 90.0;
}

/// Placement of the rotated arrowhead triangle.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ArrowHeadGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub angle_deg: f64,
    /// Where the triangle's tip lands after rotation.
    pub tip: Point,
}

/// Shaft plus head for a directed connector.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ArrowGeometry {
    pub shaft: ConnectorGeometry,
    pub head: ArrowHeadGeometry,
}

/// Compute arrow geometry from `from` to `to`.
///
/// The shaft is shortened by the head's along-axis extent so the triangle
/// tip, not the shaft end, lands exactly on `to`. Returns `None` when the
/// points are too close for the head to fit; the caller treats that like a
/// degenerate connector and skips the draw.
pub fn arrow(from: Point, to: Point, thickness: f64, head: ArrowHead) -> Option<ArrowGeometry> {
    let length = from.distance_to(to);
    if length <= head.length {
        return None;
    }
    let t = (length - head.length) / length;
    let shaft_end = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
    let shaft = connector(from, shaft_end, thickness);

    // The head's box is authored with the triangle pointing up, centered on
    // the midpoint between shaft end and tip, then rotated about its own
    // center like any other element.
    let head_center = shaft_end.midpoint(to);
    let angle_deg = shaft.angle_deg + ArrowHead::ROTATION_OFFSET_DEG;
    let head_geom = ArrowHeadGeometry {
        left: head_center.x - head.width / 2.0,
        top: head_center.y - head.length / 2.0,
        width: head.width,
        height: head.length,
        angle_deg,
        tip: to,
    };
    Some(ArrowGeometry {
        shaft,
        head: head_geom,
    })
}
