use crate::math::Point;
use crate::PathEvent;

use lyon_path::iterator::PathIterator;

/// A contour approximated with line segments.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Polyline {
    /// Consecutive duplicates are removed. A closed polyline does not repeat
    /// its first point at the end.
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    /// Sum of the segment lengths, including the closing segment if any.
    pub fn length(&self) -> f32 {
        let mut len = 0.0;
        for pair in self.points.windows(2) {
            len += (pair[1] - pair[0]).length();
        }
        if self.closed && self.points.len() > 2 {
            len += (self.points[0] - self.points[self.points.len() - 1]).length();
        }
        len
    }

    /// Segments as pairs of points, in order, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let count = if self.closed && n > 2 { n } else { n.saturating_sub(1) };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

pub(crate) fn flatten<Iter>(events: Iter, tolerance: f32) -> Vec<Polyline>
where
    Iter: Iterator<Item = PathEvent>,
{
    let mut output = Vec::new();
    let mut current = Polyline::default();

    for evt in events.flattened(tolerance) {
        match evt {
            PathEvent::Begin { at } => {
                current.points.clear();
                current.points.push(at);
            }
            PathEvent::Line { to, .. } => {
                if current.points.last() != Some(&to) {
                    current.points.push(to);
                }
            }
            PathEvent::End { close, .. } => {
                if close && current.points.len() > 1 && current.points.first() == current.points.last() {
                    current.points.pop();
                }
                current.closed = close;
                output.push(std::mem::take(&mut current));
            }
            // The flattening iterator only produces line segments.
            PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {}
        }
    }

    output
}

#[cfg(test)]
use crate::math::{point, rect};
#[cfg(test)]
use crate::{Path, Winding};

#[test]
fn flatten_polylines() {
    let mut builder = Path::builder();
    builder.add_rect(&rect(0.0, 0.0, 2.0, 1.0), Winding::Positive);
    builder.move_to(point(5.0, 5.0));
    builder.line_to(point(6.0, 5.0));
    builder.line_to(point(6.0, 5.0));
    let path = builder.build();

    let polylines = path.flattened(0.1);
    assert_eq!(polylines.len(), 2);
    assert!(polylines[0].closed);
    assert_eq!(polylines[0].points.len(), 4);
    assert_eq!(polylines[0].length(), 6.0);
    assert_eq!(polylines[0].segments().count(), 4);

    assert!(!polylines[1].closed);
    assert_eq!(polylines[1].points, vec![point(5.0, 5.0), point(6.0, 5.0)]);
    assert_eq!(polylines[1].segments().count(), 1);

    // An open contour that returns to its start keeps the last edge.
    let mut builder = Path::builder();
    builder.add_polyline(&[point(0.0, 0.0), point(2.0, 0.0), point(2.0, 1.0), point(0.0, 0.0)], false);
    let polylines = builder.build().flattened(0.1);
    assert!(!polylines[0].closed);
    assert_eq!(polylines[0].points.len(), 4);
    assert_eq!(polylines[0].segments().count(), 3);
}

#[test]
fn flatten_curves() {
    let mut builder = Path::builder();
    builder.add_oval(&rect(0.0, 0.0, 10.0, 10.0), Winding::Positive);
    let path = builder.build();

    let coarse = path.flattened(1.0);
    let fine = path.flattened(0.01);
    assert!(fine[0].points.len() > coarse[0].points.len());
    let circumference = std::f32::consts::PI * 10.0;
    assert!((fine[0].length() - circumference).abs() < 0.1);

    // Non-positive tolerances use the default.
    assert_eq!(path.flattened(0.0), path.flattened(crate::DEFAULT_TOLERANCE));
}
