use crate::stroker::stroke_path;
use shapekey_path::Path;

/// Line cap as defined by the SVG specification.
///
/// The discriminants are part of style keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke ends exactly at the endpoint.
    Butt = 0,
    /// A half circle is added at each endpoint.
    Round = 1,
    /// The stroke is extended by half of its width past each endpoint.
    Square = 2,
}

/// Line join as defined by the SVG specification.
///
/// The discriminants are part of style keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

/// What a stroke rec does to the geometry.
///
/// The discriminants are part of style keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum StrokeStyle {
    Hairline = 0,
    Fill = 1,
    Stroke = 2,
    StrokeAndFill = 3,
}

/// The styles a shape can be left with once its stroke has been applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum InitStyle {
    Fill,
    Hairline,
}

/// Stroke parameters.
///
/// A negative width means fill, a zero width means hairline (a one pixel wide
/// stroke that is never turned into geometry).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StrokeRec {
    width: f32,
    stroke_and_fill: bool,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f32,
    res_scale: f32,
}

const FILL_WIDTH: f32 = -1.0;

impl StrokeRec {
    /// Default miter limit as defined by the SVG specification.
    pub const DEFAULT_MITER_LIMIT: f32 = 4.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_RES_SCALE: f32 = 1.0;

    pub const DEFAULT: Self = StrokeRec {
        width: FILL_WIDTH,
        stroke_and_fill: false,
        line_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        res_scale: Self::DEFAULT_RES_SCALE,
    };

    #[inline]
    pub const fn fill() -> Self {
        Self::DEFAULT
    }

    #[inline]
    pub const fn hairline() -> Self {
        Self::DEFAULT.with_width(0.0)
    }

    /// A plain stroke. Negative widths produce a fill and zero a hairline.
    #[inline]
    pub const fn stroke(width: f32) -> Self {
        Self::DEFAULT.with_width(width)
    }

    /// Strokes and fills. A zero width is the same as a fill.
    #[inline]
    pub fn stroke_and_fill(width: f32) -> Self {
        if width <= 0.0 {
            return Self::fill();
        }
        let mut rec = Self::DEFAULT.with_width(width);
        rec.stroke_and_fill = true;
        rec
    }

    #[inline]
    pub const fn from_init_style(style: InitStyle) -> Self {
        match style {
            InitStyle::Fill => Self::fill(),
            InitStyle::Hairline => Self::hairline(),
        }
    }

    #[inline]
    const fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        assert!(limit >= 0.0);
        self.miter_limit = limit;
        self
    }

    /// Scale factor applied to the tolerance when curves are approximated, so
    /// that geometry rendered at a larger scale gets more segments.
    #[inline]
    pub fn with_res_scale(mut self, scale: f32) -> Self {
        self.set_res_scale(scale);
        self
    }

    #[inline]
    pub fn set_res_scale(&mut self, scale: f32) {
        debug_assert!(scale > 0.0 && scale.is_finite());
        self.res_scale = scale;
    }

    /// Returns the stroke width, zero for hairlines and a negative value for fills.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    #[inline]
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    #[inline]
    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }

    #[inline]
    pub fn res_scale(&self) -> f32 {
        self.res_scale
    }

    pub fn style(&self) -> StrokeStyle {
        if self.width < 0.0 {
            StrokeStyle::Fill
        } else if self.width == 0.0 {
            StrokeStyle::Hairline
        } else if self.stroke_and_fill {
            StrokeStyle::StrokeAndFill
        } else {
            StrokeStyle::Stroke
        }
    }

    #[inline]
    pub fn is_fill(&self) -> bool {
        self.style() == StrokeStyle::Fill
    }

    #[inline]
    pub fn is_hairline(&self) -> bool {
        self.style() == StrokeStyle::Hairline
    }

    /// Returns true if the stroke changes the geometry, in other words for
    /// strokes and stroke-and-fills.
    #[inline]
    pub fn need_to_apply(&self) -> bool {
        match self.style() {
            StrokeStyle::Stroke | StrokeStyle::StrokeAndFill => true,
            StrokeStyle::Fill | StrokeStyle::Hairline => false,
        }
    }

    /// How far the stroked geometry can extend past the bounds of the source.
    pub fn inflation_radius(&self) -> f32 {
        match self.style() {
            StrokeStyle::Fill => 0.0,
            StrokeStyle::Hairline => 1.0,
            StrokeStyle::Stroke | StrokeStyle::StrokeAndFill => {
                let mut multiplier = 1.0;
                if self.line_join == LineJoin::Miter {
                    multiplier = f32::max(multiplier, self.miter_limit);
                }
                if self.line_cap == LineCap::Square {
                    multiplier = f32::max(multiplier, std::f32::consts::SQRT_2);
                }
                self.width * 0.5 * multiplier
            }
        }
    }

    /// Returns the outline of the stroke, or `None` if there is nothing to
    /// apply (fills and hairlines).
    pub fn apply_to_path(&self, src: &Path) -> Option<Path> {
        if !self.need_to_apply() {
            return None;
        }
        Some(stroke_path(src, self))
    }
}

impl Default for StrokeRec {
    fn default() -> Self {
        Self::DEFAULT
    }
}
