use image::{Rgba, RgbaImage};

use crate::arc_bounds::{Arc, BoundingBox};
use crate::face_detector::Detection;

/// Stroke color for detection annotations.
pub const ANNOTATION_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Upper bound on arc samples per pixel of frame perimeter.
const MAX_SAMPLES_PER_PERIMETER_PX: usize = 4;

fn put_clipped(frame: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(frame.width()) || y >= i64::from(frame.height()) {
        return;
    }
    frame.put_pixel(x as u32, y as u32, color);
}

/// Draw a 1-pixel outline of `bounds`, clipped to the frame.
pub fn draw_bounds(frame: &mut RgbaImage, bounds: &BoundingBox, color: Rgba<u8>) {
    if ![bounds.x, bounds.y, bounds.right(), bounds.bottom()]
        .iter()
        .all(|v| v.is_finite())
    {
        return;
    }
    // edges past the frame collapse onto the off-screen row/column just
    // outside it, so the loops never exceed the frame size
    let (w, h) = (i64::from(frame.width()), i64::from(frame.height()));
    let left = (bounds.x.round() as i64).clamp(-1, w);
    let top = (bounds.y.round() as i64).clamp(-1, h);
    let right = (bounds.right().round() as i64).clamp(-1, w);
    let bottom = (bounds.bottom().round() as i64).clamp(-1, h);

    for x in left..=right {
        put_clipped(frame, x, top, color);
        put_clipped(frame, x, bottom, color);
    }
    for y in top..=bottom {
        put_clipped(frame, left, y, color);
        put_clipped(frame, right, y, color);
    }
}

/// Draw the arc by sampling it roughly once per pixel of arc length.
///
/// The sample count is capped by the frame perimeter, so very large arcs
/// may show gaps where they cross the frame.
pub fn draw_arc(frame: &mut RgbaImage, arc: &Arc, color: Rgba<u8>) {
    let sweep = arc.end_angle - arc.start_angle;
    if !sweep.is_finite() || sweep < 0.0 {
        return;
    }
    if !(arc.radius.is_finite() && arc.cx.is_finite() && arc.cy.is_finite()) {
        return;
    }
    let max_samples = MAX_SAMPLES_PER_PERIMETER_PX
        * 2
        * (frame.width() as usize + frame.height() as usize).max(1);
    let samples = ((sweep * arc.radius.abs()).ceil().max(1.0) as usize).min(max_samples);
    for i in 0..=samples {
        let angle = arc.start_angle + sweep * i as f64 / samples as f64;
        let point = arc.point_at(angle);
        put_clipped(frame, point.x.round() as i64, point.y.round() as i64, color);
    }
}

/// Mark every detection with its circle and the circle's bounding box.
pub fn annotate(frame: &mut RgbaImage, detections: &[Detection]) {
    for detection in detections {
        draw_arc(frame, &detection.overlay_arc(), ANNOTATION_COLOR);
        draw_bounds(frame, &detection.bounds(), ANNOTATION_COLOR);
    }
    log::debug!("Annotated {} detections", detections.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn painted(frame: &RgbaImage) -> usize {
        frame.pixels().filter(|p| **p == ANNOTATION_COLOR).count()
    }

    #[test]
    fn bounds_outline_only() {
        let mut frame = RgbaImage::from_pixel(20, 20, BLANK);
        let bounds = BoundingBox {
            x: 2.0,
            y: 3.0,
            width: 5.0,
            height: 4.0,
        };
        draw_bounds(&mut frame, &bounds, ANNOTATION_COLOR);
        assert_eq!(frame.get_pixel(2, 3), &ANNOTATION_COLOR);
        assert_eq!(frame.get_pixel(7, 7), &ANNOTATION_COLOR);
        assert_eq!(frame.get_pixel(4, 5), &BLANK);
        // perimeter of a 6x5 pixel rectangle
        assert_eq!(painted(&frame), 2 * 6 + 2 * 3);
    }

    #[test]
    fn drawing_is_clipped() {
        let mut frame = RgbaImage::from_pixel(10, 10, BLANK);
        let bounds = BoundingBox {
            x: -5.0,
            y: -5.0,
            width: 30.0,
            height: 30.0,
        };
        draw_bounds(&mut frame, &bounds, ANNOTATION_COLOR);
        assert_eq!(painted(&frame), 0);

        draw_arc(
            &mut frame,
            &Arc::full_circle(5.0, 5.0, 100.0),
            ANNOTATION_COLOR,
        );
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn huge_box_draws_only_visible_edge() {
        let mut frame = RgbaImage::from_pixel(10, 10, BLANK);
        // right edge lands at x = 5, every other edge is far off-screen
        let bounds = BoundingBox {
            x: -1e12,
            y: -1e12,
            width: 1e12 + 5.0,
            height: 2e12,
        };
        draw_bounds(&mut frame, &bounds, ANNOTATION_COLOR);
        assert_eq!(painted(&frame), 10);
        assert!((0..10).all(|y| frame.get_pixel(5, y) == &ANNOTATION_COLOR));
    }

    #[test]
    fn non_finite_geometry_draws_nothing() {
        let mut frame = RgbaImage::from_pixel(10, 10, BLANK);
        let bounds = BoundingBox {
            x: f64::NAN,
            y: 0.0,
            width: 5.0,
            height: 5.0,
        };
        draw_bounds(&mut frame, &bounds, ANNOTATION_COLOR);
        draw_arc(
            &mut frame,
            &Arc::full_circle(5.0, 5.0, f64::INFINITY),
            ANNOTATION_COLOR,
        );
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn huge_arc_is_bounded_by_frame() {
        let mut frame = RgbaImage::from_pixel(10, 10, BLANK);
        draw_arc(
            &mut frame,
            &Arc::full_circle(5.0, 5.0, 1e12),
            ANNOTATION_COLOR,
        );
        assert_eq!(painted(&frame), 0);

        let detection = Detection {
            row: -1e9,
            col: -1e9,
            scale: 1e11,
            score: 1.0,
        };
        annotate(&mut frame, &[detection]);
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn arc_hits_its_extremes() {
        let mut frame = RgbaImage::from_pixel(40, 40, BLANK);
        draw_arc(
            &mut frame,
            &Arc::full_circle(20.0, 20.0, 10.0),
            ANNOTATION_COLOR,
        );
        for (x, y) in [(30, 20), (20, 30), (10, 20), (20, 10)] {
            assert_eq!(frame.get_pixel(x, y), &ANNOTATION_COLOR, "({x}, {y})");
        }
        assert_eq!(frame.get_pixel(20, 20), &BLANK);
    }

    #[test]
    fn reversed_arc_draws_nothing() {
        let mut frame = RgbaImage::from_pixel(10, 10, BLANK);
        draw_arc(
            &mut frame,
            &Arc::new(5.0, 5.0, 3.0, 1.0, 0.0),
            ANNOTATION_COLOR,
        );
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn annotate_marks_each_detection() {
        let mut frame = RgbaImage::from_pixel(640, 480, BLANK);
        let detection = Detection {
            row: 100.0,
            col: 100.0,
            scale: 60.0,
            score: 5.0,
        };
        annotate(&mut frame, &[detection]);
        // box corners and the circle's rightmost point
        assert_eq!(frame.get_pixel(70, 70), &ANNOTATION_COLOR);
        assert_eq!(frame.get_pixel(130, 130), &ANNOTATION_COLOR);
        assert_eq!(frame.get_pixel(130, 100), &ANNOTATION_COLOR);
        assert_eq!(frame.get_pixel(100, 100), &BLANK);
    }
}
