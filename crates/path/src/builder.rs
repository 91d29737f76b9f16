//! Path construction.

use crate::geom::RRect;
use crate::math::{point, sorted, Box2D, Point};
use crate::path::{Path, ShapeHint};
use crate::{next_generation_id, Winding, EMPTY_GENERATION_ID};

/// Weight of the cubic control points approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Builds a [`Path`](struct.Path.html).
///
/// Unlike lyon's builders, drawing commands don't need to be preceded by a
/// `move_to`: a contour implicitly starts at the first point of the previous
/// contour (or at the origin).
///
/// The builder remembers when the whole path was produced by a single
/// `add_oval` or `add_rrect` call so that the resulting path can report its
/// exact form without analyzing curves.
pub struct PathBuilder {
    inner: lyon_path::path::Builder,
    min: Point,
    max: Point,
    first: Point,
    in_contour: bool,
    last_contour_closed: bool,
    verb_count: u32,
    contour_count: u32,
    // The hint and the verb count right after it was recorded.
    hint: Option<(ShapeHint, u32)>,
}

#[derive(Copy, Clone, Debug)]
enum Segment {
    Line(Point),
    Cubic(Point, Point, Point),
}

impl PathBuilder {
    pub fn new() -> Self {
        PathBuilder {
            inner: lyon_path::Path::builder(),
            min: point(f32::MAX, f32::MAX),
            max: point(f32::MIN, f32::MIN),
            first: point(0.0, 0.0),
            in_contour: false,
            last_contour_closed: false,
            verb_count: 0,
            contour_count: 0,
            hint: None,
        }
    }

    /// Returns true if no command was added so far.
    pub fn is_empty(&self) -> bool {
        self.verb_count == 0
    }

    /// Starts a new contour at `to`, ending the current one (without closing it).
    pub fn move_to(&mut self, to: Point) {
        self.end_contour();
        self.inner.begin(to);
        self.first = to;
        self.in_contour = true;
        self.contour_count += 1;
        self.verb_count += 1;
        self.add_point(to);
    }

    pub fn line_to(&mut self, to: Point) {
        self.ensure_contour();
        self.inner.line_to(to);
        self.verb_count += 1;
        self.add_point(to);
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.ensure_contour();
        self.inner.quadratic_bezier_to(ctrl, to);
        self.verb_count += 1;
        self.add_point(ctrl);
        self.add_point(to);
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.ensure_contour();
        self.inner.cubic_bezier_to(ctrl1, ctrl2, to);
        self.verb_count += 1;
        self.add_point(ctrl1);
        self.add_point(ctrl2);
        self.add_point(to);
    }

    /// Closes the current contour, if any.
    pub fn close(&mut self) {
        if !self.in_contour {
            return;
        }
        self.inner.end(true);
        self.in_contour = false;
        self.last_contour_closed = true;
        self.verb_count += 1;
    }

    /// Adds a closed rectangle contour.
    ///
    /// `Winding::Positive` visits the corners in the order
    /// `min`, `(max.x, min.y)`, `max`, `(min.x, max.y)`.
    pub fn add_rect(&mut self, rect: &Box2D, winding: Winding) {
        let segments = [
            Segment::Line(point(rect.max.x, rect.min.y)),
            Segment::Line(rect.max),
            Segment::Line(point(rect.min.x, rect.max.y)),
            Segment::Line(rect.min),
        ];
        self.add_closed_contour(rect.min, &segments, winding);
    }

    /// Adds the ellipse inscribed in `rect` as four cubic arcs.
    pub fn add_oval(&mut self, rect: &Box2D, winding: Winding) {
        let was_empty = self.is_empty();
        let rect = sorted(rect);

        let c = rect.center();
        let rx = rect.width() * 0.5;
        let ry = rect.height() * 0.5;
        let kx = rx * KAPPA;
        let ky = ry * KAPPA;

        let right = point(c.x + rx, c.y);
        let bottom = point(c.x, c.y + ry);
        let left = point(c.x - rx, c.y);
        let top = point(c.x, c.y - ry);

        let segments = [
            Segment::Cubic(point(right.x, c.y + ky), point(c.x + kx, bottom.y), bottom),
            Segment::Cubic(point(c.x - kx, bottom.y), point(left.x, c.y + ky), left),
            Segment::Cubic(point(left.x, c.y - ky), point(c.x - kx, top.y), top),
            Segment::Cubic(point(c.x + kx, top.y), point(right.x, c.y - ky), right),
        ];
        self.add_closed_contour(right, &segments, winding);

        if was_empty && !rect.is_empty() {
            self.hint = Some((ShapeHint::Oval(rect), self.verb_count));
        }
    }

    /// Adds a rounded rectangle.
    ///
    /// Rect and oval rounded rectangles are added with `add_rect` and
    /// `add_oval` respectively.
    pub fn add_rrect(&mut self, rrect: &RRect, winding: Winding) {
        if rrect.is_rect() || rrect.is_empty() {
            self.add_rect(rrect.rect(), winding);
            return;
        }
        if rrect.is_oval() {
            self.add_oval(rrect.rect(), winding);
            return;
        }

        let was_empty = self.is_empty();

        let r = rrect.rect();
        let [ul, ur, lr, ll] = *rrect.all_radii();
        let (l, t, rt, b) = (r.min.x, r.min.y, r.max.x, r.max.y);

        let start = point(l + ul.x, t);
        let segments = [
            Segment::Line(point(rt - ur.x, t)),
            Segment::Cubic(
                point(rt - ur.x + ur.x * KAPPA, t),
                point(rt, t + ur.y - ur.y * KAPPA),
                point(rt, t + ur.y),
            ),
            Segment::Line(point(rt, b - lr.y)),
            Segment::Cubic(
                point(rt, b - lr.y + lr.y * KAPPA),
                point(rt - lr.x + lr.x * KAPPA, b),
                point(rt - lr.x, b),
            ),
            Segment::Line(point(l + ll.x, b)),
            Segment::Cubic(
                point(l + ll.x - ll.x * KAPPA, b),
                point(l, b - ll.y + ll.y * KAPPA),
                point(l, b - ll.y),
            ),
            Segment::Line(point(l, t + ul.y)),
            Segment::Cubic(
                point(l, t + ul.y - ul.y * KAPPA),
                point(l + ul.x - ul.x * KAPPA, t),
                start,
            ),
        ];
        self.add_closed_contour(start, &segments, winding);

        if was_empty {
            self.hint = Some((ShapeHint::RRect(*rrect), self.verb_count));
        }
    }

    /// Adds a contour made of line segments.
    pub fn add_polyline(&mut self, points: &[Point], closed: bool) {
        let (first, rest) = match points.split_first() {
            Some(split) => split,
            None => return,
        };
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        if closed {
            self.close();
        } else {
            self.end_contour();
        }
    }

    /// Appends all contours of `path`.
    pub fn add_path(&mut self, path: &Path) {
        for evt in path.iter() {
            match evt {
                lyon_path::PathEvent::Begin { at } => self.move_to(at),
                lyon_path::PathEvent::Line { to, .. } => self.line_to(to),
                lyon_path::PathEvent::Quadratic { ctrl, to, .. } => self.quad_to(ctrl, to),
                lyon_path::PathEvent::Cubic {
                    ctrl1, ctrl2, to, ..
                } => self.cubic_to(ctrl1, ctrl2, to),
                lyon_path::PathEvent::End { close: true, .. } => self.close(),
                lyon_path::PathEvent::End { close: false, .. } => self.end_contour(),
            }
        }
    }

    pub fn build(mut self) -> Path {
        self.end_contour();

        if self.verb_count == 0 {
            return Path::from_parts(
                self.inner.build(),
                Box2D::zero(),
                0,
                0,
                false,
                ShapeHint::None,
                EMPTY_GENERATION_ID,
            );
        }

        let hint = match self.hint {
            Some((hint, verbs)) if verbs == self.verb_count => hint,
            _ => ShapeHint::None,
        };

        Path::from_parts(
            self.inner.build(),
            Box2D {
                min: self.min,
                max: self.max,
            },
            self.verb_count,
            self.contour_count,
            self.last_contour_closed,
            hint,
            next_generation_id(),
        )
    }

    fn ensure_contour(&mut self) {
        if !self.in_contour {
            let at = self.first;
            self.move_to(at);
        }
    }

    fn end_contour(&mut self) {
        if self.in_contour {
            self.inner.end(false);
            self.in_contour = false;
            self.last_contour_closed = false;
        }
    }

    fn add_point(&mut self, p: Point) {
        self.min = Point::min(self.min, p);
        self.max = Point::max(self.max, p);
    }

    fn add_closed_contour(&mut self, start: Point, segments: &[Segment], winding: Winding) {
        self.move_to(start);
        match winding {
            Winding::Positive => {
                for segment in segments {
                    match *segment {
                        Segment::Line(to) => self.line_to(to),
                        Segment::Cubic(ctrl1, ctrl2, to) => self.cubic_to(ctrl1, ctrl2, to),
                    }
                }
            }
            Winding::Negative => {
                // Walk the segments backwards, each one ending where the
                // previous one started.
                for i in (0..segments.len()).rev() {
                    let to = if i == 0 {
                        start
                    } else {
                        segment_end(&segments[i - 1])
                    };
                    match segments[i] {
                        Segment::Line(_) => self.line_to(to),
                        Segment::Cubic(ctrl1, ctrl2, _) => self.cubic_to(ctrl2, ctrl1, to),
                    }
                }
            }
        }
        self.close();
    }
}

fn segment_end(segment: &Segment) -> Point {
    match *segment {
        Segment::Line(to) | Segment::Cubic(_, _, to) => to,
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        PathBuilder::new()
    }
}

#[cfg(test)]
use crate::math::rect;

#[test]
fn implicit_move_to() {
    let mut builder = Path::builder();
    builder.line_to(point(1.0, 1.0));
    builder.line_to(point(2.0, 0.0));
    let path = builder.build();

    let mut events = path.iter();
    assert_eq!(
        events.next(),
        Some(lyon_path::PathEvent::Begin {
            at: point(0.0, 0.0)
        })
    );
    assert_eq!(path.contour_count(), 1);
    assert_eq!(path.bounds(), rect(0.0, 0.0, 2.0, 1.0));
}

#[test]
fn hints_need_a_fresh_builder() {
    let r = rect(0.0, 0.0, 10.0, 10.0);

    let mut builder = Path::builder();
    builder.move_to(point(-1.0, -1.0));
    builder.add_oval(&r, Winding::Positive);
    assert_eq!(builder.build().is_oval(), None);

    let mut builder = Path::builder();
    builder.add_oval(&r, Winding::Positive);
    builder.line_to(point(20.0, 20.0));
    assert_eq!(builder.build().is_oval(), None);

    let rrect = RRect::from_rect_xy(&r, 2.0, 2.0);
    let mut builder = Path::builder();
    builder.add_rrect(&rrect, Winding::Negative);
    let path = builder.build();
    assert_eq!(path.is_rrect(), Some(rrect));
    assert_eq!(path.bounds(), r);
    assert!(path.is_last_contour_closed());
}

#[test]
fn rrect_dispatch() {
    let r = rect(0.0, 0.0, 10.0, 10.0);

    let mut builder = Path::builder();
    builder.add_rrect(&RRect::from_rect(&r), Winding::Positive);
    let path = builder.build();
    assert_eq!(path.is_rrect(), None);
    assert_eq!(path.is_rect().map(|info| info.rect), Some(r));

    let mut builder = Path::builder();
    builder.add_rrect(&RRect::from_oval(&r), Winding::Positive);
    assert_eq!(builder.build().is_oval(), Some(r));
}

#[test]
fn negative_winding_rect() {
    let r = rect(0.0, 0.0, 10.0, 5.0);
    let mut builder = Path::builder();
    builder.add_rect(&r, Winding::Negative);
    let path = builder.build();

    let points: Vec<_> = path
        .iter()
        .filter_map(|evt| match evt {
            lyon_path::PathEvent::Line { to, .. } => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(
        points,
        vec![point(0.0, 5.0), point(10.0, 5.0), point(10.0, 0.0), point(0.0, 0.0)]
    );
    assert_eq!(path.is_rect().map(|info| info.rect), Some(r));
}
