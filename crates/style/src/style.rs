use crate::path_effect::PathEffect;
use crate::stroke_rec::{InitStyle, LineJoin, StrokeRec};
use shapekey_path::math::{outset, Box2D};
use shapekey_path::Path;

use std::sync::Arc;

/// How much of a style to apply to a shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Apply {
    /// Only apply the path effect, keep the stroke as a style.
    PathEffectOnly,
    /// Apply the path effect and then the stroke.
    PathEffectAndStrokeRec,
}

/// Information about the geometry a style key is computed for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleKeyFlags(u32);

impl StyleKeyFlags {
    pub const NONE: Self = StyleKeyFlags(0);
    /// The geometry has no unclosed contours, so line caps don't affect it.
    pub const CLOSED: Self = StyleKeyFlags(1);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Stroke parameters and an optional path effect.
///
/// Cloning a style shares its path effect, which is immutable.
#[derive(Clone, Debug, Default)]
pub struct Style {
    stroke_rec: StrokeRec,
    path_effect: Option<Arc<dyn PathEffect>>,
}

// Number of words of the stroke segment of a key: scale, style/join/cap,
// miter limit and width.
const STROKE_KEY_SIZE: usize = 4;
// Bits of the style and join fields in the second word of the stroke segment.
const STYLE_BITS: u32 = 2;
const JOIN_BITS: u32 = 2;
const JOIN_SHIFT: u32 = STYLE_BITS;
const CAP_SHIFT: u32 = JOIN_SHIFT + JOIN_BITS;

impl Style {
    /// A simple fill.
    pub fn fill() -> Self {
        Style::default()
    }

    pub fn hairline() -> Self {
        Style::from_stroke_rec(StrokeRec::hairline())
    }

    pub fn from_stroke_rec(stroke_rec: StrokeRec) -> Self {
        Style {
            stroke_rec,
            path_effect: None,
        }
    }

    pub fn from_init_style(style: InitStyle) -> Self {
        Style::from_stroke_rec(StrokeRec::from_init_style(style))
    }

    pub fn new(stroke_rec: StrokeRec, path_effect: Option<Arc<dyn PathEffect>>) -> Self {
        Style {
            stroke_rec,
            path_effect,
        }
    }

    /// Replaces the style with a fill or a hairline without path effect.
    pub fn reset_to_init_style(&mut self, style: InitStyle) {
        self.stroke_rec = StrokeRec::from_init_style(style);
        self.path_effect = None;
    }

    #[inline]
    pub fn stroke_rec(&self) -> &StrokeRec {
        &self.stroke_rec
    }

    #[inline]
    pub fn path_effect(&self) -> Option<&Arc<dyn PathEffect>> {
        self.path_effect.as_ref()
    }

    #[inline]
    pub fn has_path_effect(&self) -> bool {
        self.path_effect.is_some()
    }

    /// Returns true if applying the style changes the geometry.
    #[inline]
    pub fn applies(&self) -> bool {
        self.has_path_effect() || self.stroke_rec.need_to_apply()
    }

    pub fn is_dashed(&self) -> bool {
        match &self.path_effect {
            Some(effect) => effect.as_dash().is_some(),
            None => false,
        }
    }

    pub fn has_non_dash_path_effect(&self) -> bool {
        self.has_path_effect() && !self.is_dashed()
    }

    /// The dash intervals, empty if the style is not dashed.
    pub fn dash_intervals(&self) -> &[f32] {
        match self.path_effect.as_ref().and_then(|effect| effect.as_dash()) {
            Some(dash) => dash.intervals,
            None => &[],
        }
    }

    /// The dash phase, zero if the style is not dashed.
    pub fn dash_phase(&self) -> f32 {
        match self.path_effect.as_ref().and_then(|effect| effect.as_dash()) {
            Some(dash) => dash.phase,
            None => 0.0,
        }
    }

    pub fn is_simple_fill(&self) -> bool {
        self.stroke_rec.is_fill() && !self.has_path_effect()
    }

    pub fn is_simple_hairline(&self) -> bool {
        self.stroke_rec.is_hairline() && !self.has_path_effect()
    }

    /// Bounds of the styled geometry given the bounds of the source.
    pub fn adjust_bounds(&self, bounds: &Box2D) -> Box2D {
        let bounds = match &self.path_effect {
            Some(effect) => effect.compute_fast_bounds(bounds),
            None => *bounds,
        };
        let radius = self.stroke_rec.inflation_radius();
        outset(&bounds, radius, radius)
    }

    /// Applies the path effect alone.
    ///
    /// Returns the filtered path along with the stroke parameters to render
    /// it with, or `None` if there is no path effect or it rejected the
    /// input.
    pub fn apply_path_effect_to_path(&self, src: &Path, res_scale: f32) -> Option<(Path, StrokeRec)> {
        let effect = self.path_effect.as_ref()?;
        let mut rec = self.stroke_rec;
        rec.set_res_scale(res_scale);
        let path = effect.filter_path(src, &mut rec, None)?;
        Some((path, rec))
    }

    /// Applies the path effect and then the stroke.
    ///
    /// Returns the resulting path and the style it should be rendered with,
    /// or `None` if the path effect rejected the input or if there is
    /// nothing to apply.
    pub fn apply_to_path(&self, src: &Path, res_scale: f32) -> Option<(Path, InitStyle)> {
        let mut rec = self.stroke_rec;
        rec.set_res_scale(res_scale);

        let filtered = match &self.path_effect {
            Some(effect) => Some(effect.filter_path(src, &mut rec, None)?),
            None => None,
        };
        let src = filtered.as_ref().unwrap_or(src);

        if rec.need_to_apply() {
            let stroked = rec.apply_to_path(src)?;
            return Some((stroked, InitStyle::Fill));
        }

        // Only the path effect was applied.
        let filtered = filtered?;
        let style = if rec.is_fill() {
            InitStyle::Fill
        } else {
            InitStyle::Hairline
        };

        Some((filtered, style))
    }

    /// Number of words needed to describe the style in a key, or `None` if
    /// the style can't be described (path effects other than dashes).
    ///
    /// The flags don't change the size of the key, only its content.
    pub fn key_size(style: &Style, apply: Apply, _flags: StyleKeyFlags) -> Option<usize> {
        let mut size = 0;
        if style.is_dashed() {
            size += 2 + style.dash_intervals().len();
        } else if style.has_path_effect() {
            return None;
        }

        if apply == Apply::PathEffectOnly {
            return Some(size);
        }

        if style.stroke_rec.need_to_apply() {
            size += STROKE_KEY_SIZE;
        }

        Some(size)
    }

    /// Writes the key of the style into `key`, which must be exactly
    /// `key_size` words long.
    ///
    /// Floats are written as their bit patterns. The dash segment is
    /// `[scale, phase, intervals...]` and the stroke segment is
    /// `[scale, style | join << 2 | cap << 4, miter limit, width]`.
    pub fn write_key(key: &mut [u32], style: &Style, apply: Apply, scale: f32, flags: StyleKeyFlags) {
        debug_assert_eq!(Some(key.len()), Style::key_size(style, apply, flags));

        let mut i = 0;
        if style.is_dashed() {
            let intervals = style.dash_intervals();
            key[i] = scale.to_bits();
            key[i + 1] = style.dash_phase().to_bits();
            i += 2;
            for interval in intervals {
                key[i] = interval.to_bits();
                i += 1;
            }
        } else {
            debug_assert!(!style.has_path_effect());
        }

        if apply == Apply::PathEffectOnly {
            return;
        }

        let rec = &style.stroke_rec;
        if rec.need_to_apply() {
            // Caps don't matter for closed geometry, unless a path effect
            // opens it.
            let cap = if flags.contains(StyleKeyFlags::CLOSED) && !style.has_path_effect() {
                StrokeRec::DEFAULT_LINE_CAP
            } else {
                rec.line_cap()
            };
            let join = rec.line_join();
            let miter = if join == LineJoin::Miter {
                rec.miter_limit()
            } else {
                -1.0
            };

            key[i] = scale.to_bits();
            key[i + 1] = rec.style() as u32 | (join as u32) << JOIN_SHIFT | (cap as u32) << CAP_SHIFT;
            key[i + 2] = miter.to_bits();
            key[i + 3] = rec.width().to_bits();
            i += STROKE_KEY_SIZE;
        }

        debug_assert_eq!(i, key.len());
    }
}

impl From<StrokeRec> for Style {
    fn from(rec: StrokeRec) -> Self {
        Style::from_stroke_rec(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_effect::{CornerEffect, DashEffect};
    use crate::stroke_rec::{LineCap, StrokeStyle};
    use shapekey_path::math::{point, rect};

    fn dashed(rec: StrokeRec) -> Style {
        Style::new(rec, Some(Arc::new(DashEffect::new(&[2.0, 1.0], 0.5).unwrap())))
    }

    fn cornered(rec: StrokeRec) -> Style {
        Style::new(rec, Some(Arc::new(CornerEffect::new(1.0).unwrap())))
    }

    fn style_key(style: &Style, apply: Apply, scale: f32, flags: StyleKeyFlags) -> Option<Vec<u32>> {
        let size = Style::key_size(style, apply, flags)?;
        let mut key = vec![0; size];
        Style::write_key(&mut key, style, apply, scale, flags);
        Some(key)
    }

    #[test]
    fn queries() {
        let fill = Style::fill();
        assert!(fill.is_simple_fill());
        assert!(!fill.applies());
        assert!(!fill.is_dashed());
        assert_eq!(fill.dash_intervals(), &[] as &[f32]);

        assert!(Style::hairline().is_simple_hairline());
        assert!(!Style::hairline().applies());
        assert!(Style::from(StrokeRec::stroke(1.0)).applies());

        let dash = dashed(StrokeRec::stroke(1.0));
        assert!(dash.applies());
        assert!(dash.is_dashed());
        assert!(!dash.has_non_dash_path_effect());
        assert_eq!(dash.dash_intervals(), &[2.0, 1.0]);
        assert_eq!(dash.dash_phase(), 0.5);

        let corner = cornered(StrokeRec::fill());
        assert!(corner.applies());
        assert!(!corner.is_dashed());
        assert!(corner.has_non_dash_path_effect());
        assert!(!corner.is_simple_fill());

        let mut reset = dash.clone();
        reset.reset_to_init_style(InitStyle::Hairline);
        assert!(reset.is_simple_hairline());
    }

    #[test]
    fn key_sizes() {
        let flags = StyleKeyFlags::NONE;
        let full = Apply::PathEffectAndStrokeRec;
        let only = Apply::PathEffectOnly;

        assert_eq!(Style::key_size(&Style::fill(), full, flags), Some(0));
        assert_eq!(Style::key_size(&Style::hairline(), full, flags), Some(0));
        assert_eq!(Style::key_size(&StrokeRec::stroke(1.0).into(), full, flags), Some(4));
        assert_eq!(Style::key_size(&StrokeRec::stroke(1.0).into(), only, flags), Some(0));

        assert_eq!(Style::key_size(&dashed(StrokeRec::stroke(1.0)), full, flags), Some(8));
        assert_eq!(Style::key_size(&dashed(StrokeRec::stroke(1.0)), only, flags), Some(4));
        assert_eq!(Style::key_size(&dashed(StrokeRec::hairline()), full, flags), Some(4));

        assert_eq!(Style::key_size(&cornered(StrokeRec::stroke(1.0)), full, flags), None);
        assert_eq!(Style::key_size(&cornered(StrokeRec::fill()), only, flags), None);
    }

    #[test]
    fn stroke_key_layout() {
        let rec = StrokeRec::stroke(3.0)
            .with_line_join(LineJoin::Bevel)
            .with_line_cap(LineCap::Round);
        let key = style_key(&rec.into(), Apply::PathEffectAndStrokeRec, 2.0, StyleKeyFlags::NONE).unwrap();
        assert_eq!(
            key,
            vec![
                2.0f32.to_bits(),
                StrokeStyle::Stroke as u32 | 2 << 2 | 1 << 4,
                (-1.0f32).to_bits(),
                3.0f32.to_bits(),
            ]
        );

        let miter = StrokeRec::stroke_and_fill(3.0).with_miter_limit(7.0);
        let key = style_key(&miter.into(), Apply::PathEffectAndStrokeRec, 1.0, StyleKeyFlags::NONE).unwrap();
        assert_eq!(key[1], StrokeStyle::StrokeAndFill as u32);
        assert_eq!(key[2], 7.0f32.to_bits());
    }

    #[test]
    fn caps_are_ignored_for_closed_geometry() {
        let full = Apply::PathEffectAndStrokeRec;
        let butt: Style = StrokeRec::stroke(1.0).into();
        let square: Style = StrokeRec::stroke(1.0).with_line_cap(LineCap::Square).into();

        assert!(StyleKeyFlags::CLOSED.contains(StyleKeyFlags::CLOSED));
        assert!(!StyleKeyFlags::NONE.contains(StyleKeyFlags::CLOSED));
        assert_eq!(StyleKeyFlags::default(), StyleKeyFlags::NONE);

        assert_ne!(
            style_key(&butt, full, 1.0, StyleKeyFlags::NONE),
            style_key(&square, full, 1.0, StyleKeyFlags::NONE)
        );
        assert_eq!(
            style_key(&butt, full, 1.0, StyleKeyFlags::CLOSED),
            style_key(&square, full, 1.0, StyleKeyFlags::CLOSED)
        );

        // Dashes open closed contours.
        let dashed_butt = dashed(StrokeRec::stroke(1.0));
        let dashed_square = dashed(StrokeRec::stroke(1.0).with_line_cap(LineCap::Square));
        assert_ne!(
            style_key(&dashed_butt, full, 1.0, StyleKeyFlags::CLOSED),
            style_key(&dashed_square, full, 1.0, StyleKeyFlags::CLOSED)
        );
    }

    #[test]
    fn dash_key_layout() {
        let style = dashed(StrokeRec::stroke(1.0));
        let key = style_key(&style, Apply::PathEffectOnly, 3.0, StyleKeyFlags::NONE).unwrap();
        assert_eq!(
            key,
            vec![
                3.0f32.to_bits(),
                0.5f32.to_bits(),
                2.0f32.to_bits(),
                1.0f32.to_bits()
            ]
        );
    }

    #[test]
    fn bounds() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(Style::fill().adjust_bounds(&r), r);
        assert_eq!(Style::hairline().adjust_bounds(&r), rect(-1.0, -1.0, 12.0, 12.0));

        let round: Style = StrokeRec::stroke(2.0).with_line_join(LineJoin::Round).into();
        assert_eq!(round.adjust_bounds(&r), rect(-1.0, -1.0, 12.0, 12.0));
    }

    #[test]
    fn apply_to_path() {
        let mut builder = Path::builder();
        builder.add_polyline(&[point(0.0, 0.0), point(8.0, 0.0)], false);
        let line = builder.build();

        assert!(Style::fill().apply_to_path(&line, 1.0).is_none());

        let (stroked, init) = Style::from(StrokeRec::stroke(2.0))
            .apply_to_path(&line, 1.0)
            .unwrap();
        assert_eq!(init, InitStyle::Fill);
        assert_eq!(stroked.bounds(), rect(0.0, -1.0, 8.0, 2.0));

        let (dashes, init) = dashed(StrokeRec::hairline()).apply_to_path(&line, 1.0).unwrap();
        assert_eq!(init, InitStyle::Hairline);
        assert_eq!(dashes.contour_count(), 3);

        // Dashing a fill is rejected.
        assert!(dashed(StrokeRec::fill()).apply_to_path(&line, 1.0).is_none());

        let (filtered, rec) = dashed(StrokeRec::stroke(2.0))
            .apply_path_effect_to_path(&line, 4.0)
            .unwrap();
        assert_eq!(rec.res_scale(), 4.0);
        assert_eq!(rec.style(), StrokeStyle::Stroke);
        assert_eq!(filtered.contour_count(), 3);
        assert!(Style::fill().apply_path_effect_to_path(&line, 1.0).is_none());
    }
}
