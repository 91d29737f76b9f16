//! The `Path` data structure.

use crate::builder::PathBuilder;
use crate::flatten::{flatten, Polyline};
use crate::geom::RRect;
use crate::math::{Box2D, Point};
use crate::{PathEvent, DEFAULT_TOLERANCE};

use std::fmt;

/// Exact form of the path, as recorded by the builder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum ShapeHint {
    None,
    Oval(Box2D),
    RRect(RRect),
}

/// Result of [`Path::is_rect`](struct.Path.html#method.is_rect).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct RectInfo {
    /// The rectangle, sorted.
    pub rect: Box2D,
    /// Whether the contour ends with a close. Returning to the first point
    /// is not enough.
    pub closed: bool,
}

/// An immutable path.
///
/// Cloning a path produces an independent copy that keeps the generation id
/// since the content is identical. Building a path always draws a new
/// generation id, except for empty paths which all share
/// [`EMPTY_GENERATION_ID`](constant.EMPTY_GENERATION_ID.html).
#[derive(Clone)]
pub struct Path {
    raw: lyon_path::Path,
    bounds: Box2D,
    verb_count: u32,
    contour_count: u32,
    last_contour_closed: bool,
    hint: ShapeHint,
    generation_id: u32,
    volatile: bool,
}

impl Path {
    /// Creates a [`PathBuilder`](struct.PathBuilder.html).
    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    /// Creates an empty path.
    pub fn new() -> Self {
        PathBuilder::new().build()
    }

    pub(crate) fn from_parts(
        raw: lyon_path::Path,
        bounds: Box2D,
        verb_count: u32,
        contour_count: u32,
        last_contour_closed: bool,
        hint: ShapeHint,
        generation_id: u32,
    ) -> Self {
        Path {
            raw,
            bounds,
            verb_count,
            contour_count,
            last_contour_closed,
            hint,
            generation_id,
            volatile: false,
        }
    }

    /// Returns true if the path has no command at all.
    ///
    /// A path made of a single `move_to` is not empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verb_count == 0
    }

    /// Bounds of the endpoints and control points, computed when the path
    /// was built.
    #[inline]
    pub fn bounds(&self) -> Box2D {
        self.bounds
    }

    /// Smallest rectangle containing the curves.
    pub fn tight_bounds(&self) -> Box2D {
        lyon_algorithms::aabb::bounding_box(self.iter())
    }

    /// Identifies the content of the path.
    ///
    /// Two paths with the same generation id have the same content as long
    /// as neither is volatile.
    #[inline]
    pub fn generation_id(&self) -> u32 {
        self.generation_id
    }

    #[inline]
    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    /// Marks the path as likely to be regenerated soon (for example every
    /// frame), in which case it should not be cached.
    ///
    /// This does not change the generation id.
    #[inline]
    pub fn set_volatile(&mut self, volatile: bool) {
        self.volatile = volatile;
    }

    #[inline]
    pub fn contour_count(&self) -> u32 {
        self.contour_count
    }

    #[inline]
    pub fn is_last_contour_closed(&self) -> bool {
        self.last_contour_closed
    }

    /// Returns the bounds of the ellipse if the path was built with a single
    /// `add_oval`.
    pub fn is_oval(&self) -> Option<Box2D> {
        match self.hint {
            ShapeHint::Oval(rect) => Some(rect),
            _ => None,
        }
    }

    /// Returns the rounded rectangle if the path was built with a single
    /// `add_rrect` that could not be expressed as a rect or an oval.
    pub fn is_rrect(&self) -> Option<RRect> {
        match self.hint {
            ShapeHint::RRect(rrect) => Some(rrect),
            _ => None,
        }
    }

    /// Detects whether the path is an axis-aligned rectangle.
    ///
    /// The path must have a single contour made of axis-aligned line
    /// segments that alternate between horizontal and vertical without
    /// turning back. Collinear segments are merged, and the segment from the
    /// last point back to the first one counts even when the contour is not
    /// closed, so three sides of a rectangle are enough.
    pub fn is_rect(&self) -> Option<RectInfo> {
        detect_rect(self)
    }

    /// Iterates over the path's events.
    pub fn iter(&self) -> lyon_path::path::Iter {
        self.raw.iter()
    }

    /// The underlying lyon path.
    #[inline]
    pub fn as_lyon_path(&self) -> &lyon_path::Path {
        &self.raw
    }

    /// Approximates each contour with line segments.
    ///
    /// Non-positive tolerances fall back to `DEFAULT_TOLERANCE`.
    pub fn flattened(&self, tolerance: f32) -> Vec<Polyline> {
        let tolerance = if tolerance > 0.0 {
            tolerance
        } else {
            log::debug!("invalid flattening tolerance {:?}, using the default", tolerance);
            DEFAULT_TOLERANCE
        };
        flatten(self.iter(), tolerance)
    }
}

impl Default for Path {
    fn default() -> Self {
        Path::new()
    }
}

/// Compares the geometry. Generation ids and volatility are ignored.
impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.verb_count == other.verb_count && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Path")
            .field("generation_id", &self.generation_id)
            .field("volatile", &self.volatile)
            .field("bounds", &self.bounds)
            .field("events", &self.raw)
            .finish()
    }
}

impl std::iter::FromIterator<PathEvent> for Path {
    fn from_iter<T: IntoIterator<Item = PathEvent>>(iter: T) -> Path {
        let mut builder = PathBuilder::new();
        for evt in iter {
            match evt {
                PathEvent::Begin { at } => builder.move_to(at),
                PathEvent::Line { to, .. } => builder.line_to(to),
                PathEvent::Quadratic { ctrl, to, .. } => builder.quad_to(ctrl, to),
                PathEvent::Cubic {
                    ctrl1, ctrl2, to, ..
                } => builder.cubic_to(ctrl1, ctrl2, to),
                PathEvent::End { close: true, .. } => builder.close(),
                PathEvent::End { close: false, .. } => {}
            }
        }
        builder.build()
    }
}

impl<'l> From<&'l lyon_path::Path> for Path {
    fn from(path: &'l lyon_path::Path) -> Path {
        path.iter().collect()
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = PathEvent;
    type IntoIter = lyon_path::path::Iter<'l>;

    fn into_iter(self) -> lyon_path::path::Iter<'l> {
        self.iter()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    fn between(from: Point, to: Point) -> Option<Direction> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        match (dx == 0.0, dy == 0.0) {
            (false, true) if dx > 0.0 => Some(Direction::Right),
            (false, true) => Some(Direction::Left),
            (true, false) if dy > 0.0 => Some(Direction::Down),
            (true, false) => Some(Direction::Up),
            _ => None,
        }
    }

    fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

fn detect_rect(path: &Path) -> Option<RectInfo> {
    let mut corners: Vec<Point> = Vec::with_capacity(6);
    let mut current: Vec<Point> = Vec::with_capacity(6);
    let mut found = false;
    let mut explicit_close = false;

    for evt in path.iter() {
        match evt {
            PathEvent::Begin { at } => {
                current.clear();
                current.push(at);
            }
            PathEvent::Line { to, .. } => {
                // Anything drawn after the rectangle disqualifies it.
                if found {
                    return None;
                }
                if current.last() != Some(&to) {
                    current.push(to);
                }
            }
            PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {
                return None;
            }
            PathEvent::End { close, .. } => {
                // Contours without edges are ignored.
                if current.len() > 1 && !found {
                    std::mem::swap(&mut corners, &mut current);
                    found = true;
                    explicit_close = close;
                }
                current.clear();
            }
        }
    }

    if !found {
        return None;
    }

    // Returning to the first point only merges the corners. The contour is
    // closed only with an explicit close.
    if corners.first() == corners.last() {
        corners.pop();
    }

    let n = corners.len();
    let mut directions: Vec<Direction> = Vec::with_capacity(n);
    for i in 0..n {
        let dir = Direction::between(corners[i], corners[(i + 1) % n])?;
        if directions.last() != Some(&dir) {
            directions.push(dir);
        }
    }
    if directions.len() > 1 && directions.first() == directions.last() {
        directions.pop();
    }

    if directions.len() != 4 {
        return None;
    }
    for i in 0..4 {
        if directions[(i + 1) % 4] == directions[i].opposite() {
            return None;
        }
    }

    let mut min = corners[0];
    let mut max = corners[0];
    for p in &corners[1..] {
        min = Point::min(min, *p);
        max = Point::max(max, *p);
    }

    Some(RectInfo {
        rect: Box2D { min, max },
        closed: explicit_close,
    })
}

#[cfg(test)]
use crate::math::{point, rect};
#[cfg(test)]
use crate::EMPTY_GENERATION_ID;

#[cfg(test)]
fn polyline_path(points: &[(f32, f32)], close: bool) -> Path {
    let points: Vec<Point> = points.iter().map(|&(x, y)| point(x, y)).collect();
    let mut builder = Path::builder();
    builder.add_polyline(&points, close);
    builder.build()
}

#[test]
fn empty_path() {
    let path = Path::new();
    assert!(path.is_empty());
    assert_eq!(path.generation_id(), EMPTY_GENERATION_ID);
    assert_eq!(path.bounds(), Box2D::zero());
    assert_eq!(path.is_rect(), None);

    let mut builder = Path::builder();
    builder.move_to(point(1.0, 1.0));
    let path = builder.build();
    assert!(!path.is_empty());
    assert_ne!(path.generation_id(), EMPTY_GENERATION_ID);
}

#[test]
fn generation_ids() {
    let a = polyline_path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], false);
    let b = polyline_path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], false);
    assert_ne!(a.generation_id(), b.generation_id());
    assert!(a.generation_id() > EMPTY_GENERATION_ID);
    assert_eq!(a, b);

    let mut c = a.clone();
    assert_eq!(c.generation_id(), a.generation_id());
    c.set_volatile(true);
    assert!(c.is_volatile());
    assert!(!a.is_volatile());
    assert_eq!(c.generation_id(), a.generation_id());
}

#[test]
fn closed_rects() {
    let r = rect(0.0, 0.0, 10.0, 10.0);

    let closed = polyline_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true);
    assert_eq!(closed.is_rect(), Some(RectInfo { rect: r, closed: true }));

    // Starting in the middle of a side.
    let mid = polyline_path(
        &[(5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
        true,
    );
    assert_eq!(mid.is_rect(), Some(RectInfo { rect: r, closed: true }));

    // Counter-clockwise.
    let ccw = polyline_path(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)], true);
    assert_eq!(ccw.is_rect(), Some(RectInfo { rect: r, closed: true }));
}

#[test]
fn unclosed_rects() {
    let three_sides = polyline_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], false);
    assert_eq!(
        three_sides.is_rect(),
        Some(RectInfo {
            rect: rect(0.0, 0.0, 10.0, 10.0),
            closed: false
        })
    );

    // Four sides back to the start, without a close.
    let back_to_start = polyline_path(
        &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
        false,
    );
    assert_eq!(
        back_to_start.is_rect(),
        Some(RectInfo {
            rect: rect(0.0, 0.0, 10.0, 10.0),
            closed: false
        })
    );

    let two_sides = polyline_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], false);
    assert_eq!(two_sides.is_rect(), None);
}

#[test]
fn not_rects() {
    // Turns back on itself.
    let backtrack = polyline_path(
        &[(0.0, 0.0), (10.0, 0.0), (5.0, 0.0), (5.0, 10.0), (0.0, 10.0)],
        true,
    );
    assert_eq!(backtrack.is_rect(), None);

    // Diagonal edge.
    let diagonal = polyline_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (1.0, 10.0)], true);
    assert_eq!(diagonal.is_rect(), None);

    // L-shape.
    let l_shape = polyline_path(
        &[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, 5.0), (5.0, 10.0), (0.0, 10.0)],
        true,
    );
    assert_eq!(l_shape.is_rect(), None);

    // Two rectangles.
    let mut builder = Path::builder();
    builder.add_rect(&rect(0.0, 0.0, 1.0, 1.0), crate::Winding::Positive);
    builder.add_rect(&rect(2.0, 0.0, 1.0, 1.0), crate::Winding::Positive);
    assert_eq!(builder.build().is_rect(), None);

    // Curves.
    let mut builder = Path::builder();
    builder.move_to(point(0.0, 0.0));
    builder.quad_to(point(5.0, 5.0), point(10.0, 0.0));
    builder.close();
    assert_eq!(builder.build().is_rect(), None);

    // Degenerate.
    let line = polyline_path(&[(0.0, 0.0), (10.0, 0.0)], true);
    assert_eq!(line.is_rect(), None);
}

#[test]
fn rect_with_trailing_move_to() {
    let mut builder = Path::builder();
    builder.add_rect(&rect(0.0, 0.0, 4.0, 3.0), crate::Winding::Positive);
    builder.move_to(point(100.0, 100.0));
    let path = builder.build();
    assert_eq!(path.is_rect().map(|info| info.rect), Some(rect(0.0, 0.0, 4.0, 3.0)));
}

#[test]
fn from_lyon_path() {
    let mut builder = lyon_path::Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(3.0, 0.0));
    builder.line_to(point(3.0, 2.0));
    builder.line_to(point(0.0, 2.0));
    builder.close();
    let lyon = builder.build();

    let path = Path::from(&lyon);
    assert_eq!(path.bounds(), rect(0.0, 0.0, 3.0, 2.0));
    assert!(path.is_rect().unwrap().closed);
    assert!(path.is_last_contour_closed());
}

#[test]
fn tight_bounds() {
    let mut builder = Path::builder();
    builder.move_to(point(0.0, 0.0));
    builder.quad_to(point(5.0, 10.0), point(10.0, 0.0));
    let path = builder.build();
    assert_eq!(path.bounds(), rect(0.0, 0.0, 10.0, 10.0));
    let tight = path.tight_bounds();
    assert!((tight.max.y - 5.0).abs() < 1e-4);
}
