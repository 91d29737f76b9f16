//! Turns strokes into fill geometry.
//!
//! The output is meant to be filled with the non-zero fill rule. Rather than
//! computing the actual outline of the stroke, the geometry is made of
//! overlapping pieces that all have the same orientation: a quad per segment,
//! a polygon per join and one per cap.
//!
//! Closed rectangles get a dedicated route that produces exact geometry (a
//! rectangle, a rounded rectangle or an octagon, possibly with a hole), so
//! that stroked rectangles can still be recognized as simple shapes.

use crate::stroke_rec::{LineCap, LineJoin, StrokeRec, StrokeStyle};
use shapekey_path::geom::RRect;
use shapekey_path::math::{outset, point, vector, Box2D, Point, Vector};
use shapekey_path::{Path, PathBuilder, PathEvent, Polyline, Winding, DEFAULT_TOLERANCE};

use std::f32::consts::SQRT_2;

const EPSILON: f32 = 1e-6;

pub(crate) fn stroke_path(src: &Path, rec: &StrokeRec) -> Path {
    let radius = rec.width() * 0.5;
    let mut builder = Path::builder();
    if !(radius > 0.0) {
        return builder.build();
    }

    if let Some(info) = src.is_rect() {
        if info.closed {
            log::trace!("stroking closed rect {:?}", info.rect);
            stroke_rect(&mut builder, &info.rect, rec);
            return builder.build();
        }
    }

    let tolerance = tolerance_for(rec.res_scale());
    let polylines = src.flattened(tolerance);
    let edges = edge_counts(src);
    debug_assert_eq!(polylines.len(), edges.len());

    let mut stroker = Stroker {
        builder: &mut builder,
        radius,
        rec,
    };
    for (polyline, edge_count) in polylines.iter().zip(edges) {
        // A lone move_to draws nothing.
        if edge_count > 0 {
            stroker.stroke_polyline(polyline);
        }
    }

    if rec.style() == StrokeStyle::StrokeAndFill {
        for polyline in &polylines {
            add_polygon(&mut builder, &polyline.points);
        }
    }

    builder.build()
}

pub(crate) fn tolerance_for(res_scale: f32) -> f32 {
    if res_scale > 0.0 && res_scale.is_finite() {
        DEFAULT_TOLERANCE / res_scale
    } else {
        DEFAULT_TOLERANCE
    }
}

fn edge_counts(src: &Path) -> Vec<usize> {
    let mut counts = Vec::new();
    let mut current = 0;
    for evt in src.iter() {
        match evt {
            PathEvent::Begin { .. } => current = 0,
            PathEvent::End { .. } => counts.push(current),
            _ => current += 1,
        }
    }
    counts
}

fn stroke_rect(builder: &mut PathBuilder, rect: &Box2D, rec: &StrokeRec) {
    let radius = rec.width() * 0.5;
    let outer = outset(rect, radius, radius);

    let mut join = rec.line_join();
    if join == LineJoin::Miter && rec.miter_limit() < SQRT_2 {
        join = LineJoin::Bevel;
    }

    match join {
        LineJoin::Miter => {
            builder.add_rect(&outer, Winding::Positive);
        }
        LineJoin::Round => {
            builder.add_rrect(
                &RRect::from_rect_xy(&outer, radius, radius),
                Winding::Positive,
            );
        }
        LineJoin::Bevel => {
            add_polygon(
                builder,
                &[
                    point(rect.min.x, outer.min.y),
                    point(rect.max.x, outer.min.y),
                    point(outer.max.x, rect.min.y),
                    point(outer.max.x, rect.max.y),
                    point(rect.max.x, outer.max.y),
                    point(rect.min.x, outer.max.y),
                    point(outer.min.x, rect.max.y),
                    point(outer.min.x, rect.min.y),
                ],
            );
        }
    }

    let min_side = f32::min(rect.width(), rect.height());
    if rec.style() == StrokeStyle::Stroke && rec.width() < min_side {
        builder.add_rect(&outset(rect, -radius, -radius), Winding::Negative);
    }
}

struct Stroker<'l> {
    builder: &'l mut PathBuilder,
    radius: f32,
    rec: &'l StrokeRec,
}

impl<'l> Stroker<'l> {
    fn stroke_polyline(&mut self, polyline: &Polyline) {
        let points = &polyline.points;
        let n = points.len();
        if n == 0 {
            return;
        }
        if n == 1 {
            self.dot(points[0]);
            return;
        }

        let mut segments = Vec::with_capacity(n);
        for i in 0..(n - 1) {
            segments.push((points[i], points[i + 1]));
        }
        if polyline.closed {
            segments.push((points[n - 1], points[0]));
        }

        for &(from, to) in &segments {
            self.segment(from, to);
        }

        for pair in segments.windows(2) {
            self.join(pair[0].1, direction(pair[0]), direction(pair[1]));
        }

        if polyline.closed {
            let last = segments[segments.len() - 1];
            self.join(points[0], direction(last), direction(segments[0]));
        } else {
            let first = segments[0];
            let last = segments[segments.len() - 1];
            self.cap(first.0, -direction(first));
            self.cap(last.1, direction(last));
        }
    }

    fn segment(&mut self, from: Point, to: Point) {
        let n = normal(direction((from, to))) * self.radius;
        add_polygon(self.builder, &[from + n, to + n, to - n, from - n]);
    }

    fn join(&mut self, at: Point, d0: Vector, d1: Vector) {
        let join = self.rec.line_join();
        if join == LineJoin::Round {
            self.circle(at);
            return;
        }

        let cross = d0.cross(d1);
        if cross.abs() < EPSILON {
            // Straight continuation, or a half turn which miter and bevel
            // joins leave as is.
            return;
        }

        let (o0, o1) = if cross > 0.0 {
            (-normal(d0) * self.radius, -normal(d1) * self.radius)
        } else {
            (normal(d0) * self.radius, normal(d1) * self.radius)
        };

        if join == LineJoin::Miter {
            let cos = d0.dot(d1);
            // Ratio between the miter length and the half width.
            let ratio = (2.0 / (1.0 + cos)).sqrt();
            if ratio <= self.rec.miter_limit() {
                let tip = at + (o0 + o1).normalize() * (self.radius * ratio);
                add_polygon(self.builder, &[at, at + o0, tip, at + o1]);
                return;
            }
        }

        add_polygon(self.builder, &[at, at + o0, at + o1]);
    }

    fn cap(&mut self, at: Point, dir: Vector) {
        match self.rec.line_cap() {
            LineCap::Butt => {}
            LineCap::Round => self.circle(at),
            LineCap::Square => {
                let n = normal(dir) * self.radius;
                let d = dir * self.radius;
                add_polygon(self.builder, &[at + n, at + n + d, at - n + d, at - n]);
            }
        }
    }

    // Zero-length contour.
    fn dot(&mut self, at: Point) {
        let r = self.radius;
        let square = Box2D {
            min: at - vector(r, r),
            max: at + vector(r, r),
        };
        match self.rec.line_cap() {
            LineCap::Butt => {}
            LineCap::Round => self.builder.add_oval(&square, Winding::Positive),
            LineCap::Square => self.builder.add_rect(&square, Winding::Positive),
        }
    }

    fn circle(&mut self, at: Point) {
        let r = self.radius;
        self.builder.add_oval(
            &Box2D {
                min: at - vector(r, r),
                max: at + vector(r, r),
            },
            Winding::Positive,
        );
    }
}

fn direction(segment: (Point, Point)) -> Vector {
    (segment.1 - segment.0).normalize()
}

fn normal(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

fn signed_area(points: &[Point]) -> f32 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

// Adds a closed contour with the same orientation as `add_rect` with
// `Winding::Positive`.
fn add_polygon(builder: &mut PathBuilder, points: &[Point]) {
    let n = points.len();
    if n < 3 {
        return;
    }
    let reverse = signed_area(points) < 0.0;
    let at = |i: usize| if reverse { points[n - 1 - i] } else { points[i] };

    builder.move_to(at(0));
    for i in 1..n {
        builder.line_to(at(i));
    }
    builder.close();
}
