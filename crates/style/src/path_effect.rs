//! Path effects transform a path before it is stroked or filled.

use crate::stroke_rec::{StrokeRec, StrokeStyle};
use crate::stroker::tolerance_for;
use shapekey_path::math::{Box2D, Point};
use shapekey_path::{Path, PathBuilder, Polyline};

use std::fmt;
use thiserror::Error;

/// Transforms a path before it is stroked or filled.
///
/// Implementations must be immutable: styles share effects between clones.
pub trait PathEffect: fmt::Debug + Send + Sync {
    /// Produces the filtered path, or `None` if the effect can't be applied to
    /// this input.
    ///
    /// The effect may modify the stroke parameters that will be used to
    /// render the filtered path. The cull rect, if provided, is a hint: the
    /// result only needs to be correct inside of it.
    fn filter_path(&self, src: &Path, rec: &mut StrokeRec, cull: Option<&Box2D>) -> Option<Path>;

    /// Conservative bounds of the filtered geometry given the bounds of the
    /// source.
    fn compute_fast_bounds(&self, src: &Box2D) -> Box2D {
        *src
    }

    /// Returns the dash parameters if the effect is a dash.
    ///
    /// Dashes are the only effects that can be described in a cache key.
    fn as_dash(&self) -> Option<DashInfo> {
        None
    }
}

/// Parameters of a dash effect.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DashInfo<'l> {
    /// Alternating on and off lengths.
    pub intervals: &'l [f32],
    pub phase: f32,
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum DashError {
    #[error("Dash intervals must come in pairs, got {0}.")]
    OddIntervalCount(usize),
    #[error("Dash interval {index} is negative or not finite.")]
    InvalidInterval { index: usize },
    #[error("The dash intervals have a zero total length.")]
    ZeroLength,
    #[error("The dash phase is not finite.")]
    NonFinitePhase,
}

/// Splits the contours into dashes.
///
/// Each contour is dashed independently, starting at the phase. Curves are
/// approximated with line segments before being dashed. The effect only
/// applies to strokes and hairlines.
#[derive(Clone, Debug, PartialEq)]
pub struct DashEffect {
    intervals: Vec<f32>,
    phase: f32,
    interval_length: f32,
    initial_index: usize,
    initial_length: f32,
}

impl DashEffect {
    /// Dashing fails when it would produce more dashes than this.
    pub const MAX_DASH_COUNT: usize = 1_000_000;

    pub fn new(intervals: &[f32], phase: f32) -> Result<Self, DashError> {
        if intervals.is_empty() || intervals.len() % 2 != 0 {
            return Err(DashError::OddIntervalCount(intervals.len()));
        }
        if !phase.is_finite() {
            return Err(DashError::NonFinitePhase);
        }

        let mut interval_length = 0.0;
        for (index, interval) in intervals.iter().enumerate() {
            if !(*interval >= 0.0) || !interval.is_finite() {
                return Err(DashError::InvalidInterval { index });
            }
            interval_length += *interval;
        }
        if !(interval_length > 0.0) || !interval_length.is_finite() {
            return Err(DashError::ZeroLength);
        }

        let phase = normalize_phase(phase, interval_length);
        let (initial_index, initial_length) = find_first_interval(intervals, phase);

        Ok(DashEffect {
            intervals: intervals.to_vec(),
            phase,
            interval_length,
            initial_index,
            initial_length,
        })
    }

    #[inline]
    pub fn intervals(&self) -> &[f32] {
        &self.intervals
    }

    /// The phase, in `[0, interval_length)`.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// The sum of the intervals.
    #[inline]
    pub fn interval_length(&self) -> f32 {
        self.interval_length
    }

    fn dash_polyline(&self, polyline: &Polyline, builder: &mut PathBuilder) {
        let mut index = self.initial_index;
        let mut remaining = self.initial_length;
        let mut drawing = false;
        let mut dashes: Vec<Vec<Point>> = Vec::new();

        for (from, to) in polyline.segments() {
            let segment_length = (to - from).length();
            let mut t = 0.0;
            while t < segment_length {
                let on = index % 2 == 0;
                let step = f32::min(remaining, segment_length - t);
                let end = t + step;
                if on {
                    if !drawing {
                        dashes.push(vec![from.lerp(to, t / segment_length)]);
                        drawing = true;
                    }
                    if let Some(dash) = dashes.last_mut() {
                        dash.push(from.lerp(to, end / segment_length));
                    }
                }
                t = end;
                remaining -= step;
                if remaining <= 0.0 {
                    index = (index + 1) % self.intervals.len();
                    remaining = self.intervals[index];
                    if drawing && index % 2 == 1 {
                        drawing = false;
                    }
                }
            }
        }

        // On a closed contour, a dash running through the start point is a
        // single dash.
        if polyline.closed && drawing && self.initial_index % 2 == 0 && dashes.len() > 1 {
            let first = dashes.remove(0);
            if let Some(last) = dashes.last_mut() {
                last.extend_from_slice(&first[1..]);
            }
        }

        for dash in &dashes {
            builder.add_polyline(dash, false);
        }
    }
}

impl PathEffect for DashEffect {
    fn filter_path(&self, src: &Path, rec: &mut StrokeRec, _cull: Option<&Box2D>) -> Option<Path> {
        // Filled geometry is not dashed.
        match rec.style() {
            StrokeStyle::Fill | StrokeStyle::StrokeAndFill => {
                return None;
            }
            StrokeStyle::Stroke | StrokeStyle::Hairline => {}
        }

        let polylines = src.flattened(tolerance_for(rec.res_scale()));

        let mut length = 0.0f64;
        for polyline in &polylines {
            length += polyline.length() as f64;
        }
        let pairs = self.intervals.len() as f64 / 2.0;
        let dash_count = (length / self.interval_length as f64 + 1.0) * pairs;
        if dash_count > Self::MAX_DASH_COUNT as f64 {
            log::debug!(
                "dashing would produce {} dashes, giving up",
                dash_count as u64
            );
            return None;
        }

        let mut builder = Path::builder();
        for polyline in &polylines {
            self.dash_polyline(polyline, &mut builder);
        }

        Some(builder.build())
    }

    fn as_dash(&self) -> Option<DashInfo> {
        Some(DashInfo {
            intervals: &self.intervals,
            phase: self.phase,
        })
    }
}

fn normalize_phase(phase: f32, interval_length: f32) -> f32 {
    if phase < 0.0 {
        let mut phase = -phase;
        if phase > interval_length {
            phase %= interval_length;
        }
        phase = interval_length - phase;
        // The subtraction can round up to the length.
        if phase == interval_length {
            phase = 0.0;
        }
        phase
    } else if phase >= interval_length {
        phase % interval_length
    } else {
        phase
    }
}

fn find_first_interval(intervals: &[f32], mut phase: f32) -> (usize, f32) {
    for (i, &gap) in intervals.iter().enumerate() {
        if phase > gap || (phase == gap && gap != 0.0) {
            phase -= gap;
        } else {
            return (i, gap - phase);
        }
    }
    // The phase is very close to the interval length.
    (0, intervals[0])
}

/// Replaces sharp corners with quadratic arcs of the given radius.
///
/// Curves are approximated with line segments first. The effect does not
/// describe itself to cache keys, so styles that use it can't be cached.
#[derive(Clone, Debug, PartialEq)]
pub struct CornerEffect {
    radius: f32,
}

impl CornerEffect {
    /// Returns `None` if the radius is not strictly positive.
    pub fn new(radius: f32) -> Option<Self> {
        if radius > 0.0 && radius.is_finite() {
            Some(CornerEffect { radius })
        } else {
            None
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn rounded_point(&self, corner: Point, neighbor: Point) -> Point {
        let v = neighbor - corner;
        let len = v.length();
        if len == 0.0 {
            return corner;
        }
        let dist = f32::min(self.radius, len * 0.5);
        corner + v * (dist / len)
    }

    fn round_polyline(&self, polyline: &Polyline, builder: &mut PathBuilder) {
        let points = &polyline.points;
        let n = points.len();

        if polyline.closed && n >= 3 {
            builder.move_to(points[n - 1].lerp(points[0], 0.5));
            for i in 0..n {
                let prev = points[(i + n - 1) % n];
                let next = points[(i + 1) % n];
                builder.line_to(self.rounded_point(points[i], prev));
                builder.quad_to(points[i], self.rounded_point(points[i], next));
            }
            builder.close();
            return;
        }

        if n < 2 {
            builder.add_polyline(points, false);
            return;
        }
        builder.move_to(points[0]);
        for i in 1..(n - 1) {
            builder.line_to(self.rounded_point(points[i], points[i - 1]));
            builder.quad_to(points[i], self.rounded_point(points[i], points[i + 1]));
        }
        builder.line_to(points[n - 1]);
        if polyline.closed {
            builder.close();
        }
    }
}

impl PathEffect for CornerEffect {
    fn filter_path(&self, src: &Path, rec: &mut StrokeRec, _cull: Option<&Box2D>) -> Option<Path> {
        let mut builder = Path::builder();
        for polyline in src.flattened(tolerance_for(rec.res_scale())) {
            self.round_polyline(&polyline, &mut builder);
        }
        Some(builder.build())
    }
}
