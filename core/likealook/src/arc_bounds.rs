use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::Serialize;

/// Angles at which a circle reaches an axis-aligned extreme.
const CARDINAL_ANGLES: [f64; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent, never negative for a well-formed arc.
    pub width: f64,
    /// Vertical extent, never negative for a well-formed arc.
    pub height: f64,
}

impl BoundingBox {
    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `point` lies inside or on the edge of the box.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// A circular arc swept from `start_angle` to `end_angle` (radians).
///
/// Angles are taken as given: they are not wrapped into `[0, 2π)`, and
/// `start_angle <= end_angle` is expected. A negative radius is accepted and
/// reflects every arc point through the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius; may be zero or negative.
    pub radius: f64,
    /// Sweep start in radians.
    pub start_angle: f64,
    /// Sweep end in radians.
    pub end_angle: f64,
}

impl Arc {
    /// Arc from its center, radius and sweep.
    pub fn new(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Full circle from 0 to 2π.
    pub fn full_circle(cx: f64, cy: f64, radius: f64) -> Self {
        Self::new(cx, cy, radius, 0.0, TAU)
    }

    /// Center of the circle.
    pub fn center(&self) -> Point {
        Point {
            x: self.cx,
            y: self.cy,
        }
    }

    /// Point on the circle at `angle`, whether or not it is inside the sweep.
    pub fn point_at(&self, angle: f64) -> Point {
        Point {
            x: self.cx + self.radius * angle.cos(),
            y: self.cy + self.radius * angle.sin(),
        }
    }

    fn spans(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle <= self.end_angle
    }

    /// Smallest axis-aligned box holding the arc and its center.
    ///
    /// The center is always part of the box: overlays rotate around it, so
    /// the box must contain the pivot even for short arcs.
    pub fn bounds(&self) -> BoundingBox {
        let candidates = [
            self.center(),
            self.point_at(self.start_angle),
            self.point_at(self.end_angle),
        ]
        .into_iter()
        .chain(
            CARDINAL_ANGLES
                .into_iter()
                .filter(|&angle| self.spans(angle))
                .map(|angle| self.point_at(angle)),
        );

        let center = self.center();
        let (mut min_x, mut min_y) = (center.x, center.y);
        let (mut max_x, mut max_y) = (center.x, center.y);
        for point in candidates {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }
}

/// Bounding box of the arc centered at (`cx`, `cy`) with the given radius,
/// swept from `start_angle` to `end_angle`. See [`Arc::bounds`].
pub fn arc_bounds(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> BoundingBox {
    Arc::new(cx, cy, radius, start_angle, end_angle).bounds()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_box_eq(actual: BoundingBox, expected: BoundingBox) {
        assert!(
            (actual.x - expected.x).abs() < EPS
                && (actual.y - expected.y).abs() < EPS
                && (actual.width - expected.width).abs() < EPS
                && (actual.height - expected.height).abs() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn bbox(x: f64, y: f64, width: f64, height: f64) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn full_circle_is_square_around_center() {
        for r in [1.0, 2.5, 40.0] {
            assert_box_eq(
                arc_bounds(0.0, 0.0, r, 0.0, TAU),
                bbox(-r, -r, 2.0 * r, 2.0 * r),
            );
        }
    }

    #[test]
    fn zero_span_arc_spans_center_and_one_point() {
        assert_eq!(
            arc_bounds(5.0, 5.0, 10.0, 0.0, 0.0),
            bbox(5.0, 5.0, 10.0, 0.0)
        );
    }

    #[test]
    fn quarter_arc_includes_center() {
        assert_box_eq(
            arc_bounds(0.0, 0.0, 1.0, 0.0, FRAC_PI_2),
            bbox(0.0, 0.0, 1.0, 1.0),
        );
    }

    #[test]
    fn half_arc_through_bottom() {
        // 0..π passes π/2, which is +y (screen down)
        assert_box_eq(
            arc_bounds(10.0, 10.0, 2.0, 0.0, PI),
            bbox(8.0, 10.0, 4.0, 2.0),
        );
    }

    #[test]
    fn short_arc_without_cardinals() {
        let start = PI / 6.0;
        let end = PI / 3.0;
        let b = arc_bounds(0.0, 0.0, 2.0, start, end);
        // endpoints (√3, 1) and (1, √3) plus the center
        assert_box_eq(b, bbox(0.0, 0.0, 3.0_f64.sqrt(), 3.0_f64.sqrt()));
    }

    #[test]
    fn zero_radius_collapses_to_center() {
        assert_eq!(
            arc_bounds(3.0, -4.0, 0.0, 0.0, TAU),
            bbox(3.0, -4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn negative_radius_mirrors_through_center() {
        // same sweep as the quarter arc, reflected into the opposite quadrant
        assert_box_eq(
            arc_bounds(0.0, 0.0, -1.0, 0.0, FRAC_PI_2),
            bbox(-1.0, -1.0, 1.0, 1.0),
        );
    }

    #[test]
    fn angles_are_not_wrapped() {
        // 2π..2π+π/2 is geometrically the quarter arc, but no cardinal angle
        // lies in the raw interval, so only the endpoints count.
        let b = arc_bounds(0.0, 0.0, 1.0, TAU, TAU + FRAC_PI_2);
        assert!((b.width - 1.0).abs() < EPS);
        assert!((b.height - 1.0).abs() < EPS);

        // A sweep through negative angles never sees 3π/2.
        let b = arc_bounds(0.0, 0.0, 1.0, -FRAC_PI_2, 0.0);
        assert_box_eq(b, bbox(0.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn cardinal_on_endpoint_is_inclusive() {
        let b = arc_bounds(0.0, 0.0, 1.0, PI, PI);
        assert_box_eq(b, bbox(-1.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn bounds_contain_every_sampled_point() {
        let arc = Arc::new(12.0, -7.0, 9.0, 0.3, 4.1);
        let b = arc.bounds();
        assert!(b.contains(arc.center()));
        let steps = 200;
        for i in 0..=steps {
            let t = arc.start_angle + (arc.end_angle - arc.start_angle) * i as f64 / steps as f64;
            let p = arc.point_at(t);
            let padded = bbox(b.x - EPS, b.y - EPS, b.width + 2.0 * EPS, b.height + 2.0 * EPS);
            assert!(padded.contains(p), "{p:?} outside {b:?}");
        }
    }

    #[test]
    fn growing_radius_never_shrinks_box() {
        let sweeps = [(0.0, FRAC_PI_2), (0.2, 2.0), (1.0, 5.5), (0.0, TAU), (0.7, 0.7)];
        for (start, end) in sweeps {
            let mut prev = arc_bounds(0.0, 0.0, 0.0, start, end);
            for step in 1..50 {
                let next = arc_bounds(0.0, 0.0, step as f64 * 0.5, start, end);
                assert!(next.width >= prev.width, "width shrank for {start}..{end}");
                assert!(next.height >= prev.height, "height shrank for {start}..{end}");
                prev = next;
            }
        }
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let a = arc_bounds(1.5, 2.5, 3.5, 0.25, 5.0);
        let b = arc_bounds(1.5, 2.5, 3.5, 0.25, 5.0);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.width.to_bits(), b.width.to_bits());
        assert_eq!(a.height.to_bits(), b.height.to_bits());
    }

    #[test]
    fn full_circle_constructor() {
        let arc = Arc::full_circle(100.0, 50.0, 20.0);
        let b = arc.bounds();
        assert_box_eq(b, bbox(80.0, 30.0, 40.0, 40.0));
        assert!((b.right() - 120.0).abs() < EPS);
        assert!((b.bottom() - 70.0).abs() < EPS);
    }
}
