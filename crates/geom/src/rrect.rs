use crate::math::{is_finite, sorted, vector, Box2D, Vector};

use thiserror::Error;

/// Identifies one of the four corners of a rounded rectangle.
///
/// Corners are listed clockwise (in a y-down coordinate system), starting
/// from the upper left one. This is also the order in which the radii are
/// encoded by [`RRect::write_to_words`](struct.RRect.html#method.write_to_words).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Corner {
    UpperLeft = 0,
    UpperRight = 1,
    LowerRight = 2,
    LowerLeft = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::LowerRight,
        Corner::LowerLeft,
    ];
}

/// The simplest description of a rounded rectangle's radii.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum RRectType {
    /// Zero width or height.
    Empty,
    /// All corners are square.
    Rect,
    /// All radii are at least half of the width and height.
    Oval,
    /// All corners share the same radii.
    Simple,
    /// Left radii share their x values, right radii share their x values,
    /// and likewise for the top and bottom y values.
    NinePatch,
    /// Anything else.
    Complex,
}

/// Errors reported when decoding a rounded rectangle from key words.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum RRectError {
    #[error("Expected {expected} words, got {got}.")]
    BufferTooShort { expected: usize, got: usize },
    #[error("Word {index} does not encode a finite value.")]
    NonFinite { index: usize },
    #[error("The encoded rounded rectangle is not in canonical form.")]
    NotCanonical,
}

/// A rectangle with four elliptical corners.
///
/// Constructors always produce the canonical form of the requested geometry:
///
/// - the rectangle is sorted,
/// - a rectangle without area (or with non-finite coordinates) produces the
///   empty rounded rectangle, which has zero geometry,
/// - negative or non-finite radii are clamped to zero, and a corner with a
///   zero radius on either axis is square,
/// - radii that would overlap along a side are scaled down uniformly.
///
/// Two rounded rectangles describing the same geometry therefore compare
/// equal and encode to the same words.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct RRect {
    rect: Box2D,
    radii: [Vector; 4],
    kind: RRectType,
}

impl RRect {
    /// Number of 32 bits words written by `write_to_words`.
    ///
    /// Four words for the rectangle followed by two words per corner.
    pub const SIZE_IN_WORDS: usize = 12;

    /// The empty rounded rectangle.
    pub fn new() -> Self {
        RRect {
            rect: Box2D::zero(),
            radii: [vector(0.0, 0.0); 4],
            kind: RRectType::Empty,
        }
    }

    /// A rounded rectangle with square corners.
    pub fn from_rect(rect: &Box2D) -> Self {
        match Self::initialize_rect(rect) {
            Some(rect) => RRect {
                rect,
                radii: [vector(0.0, 0.0); 4],
                kind: RRectType::Rect,
            },
            None => Self::new(),
        }
    }

    /// The ellipse inscribed in `rect`.
    pub fn from_oval(rect: &Box2D) -> Self {
        match Self::initialize_rect(rect) {
            Some(rect) => RRect {
                rect,
                radii: [vector(rect.width() * 0.5, rect.height() * 0.5); 4],
                kind: RRectType::Oval,
            },
            None => Self::new(),
        }
    }

    /// A rounded rectangle where all corners share the radii `(rx, ry)`.
    pub fn from_rect_xy(rect: &Box2D, rx: f32, ry: f32) -> Self {
        let rect = match Self::initialize_rect(rect) {
            Some(rect) => rect,
            None => return Self::new(),
        };

        let (mut rx, mut ry) = if rx.is_finite() && ry.is_finite() {
            (rx, ry)
        } else {
            (0.0, 0.0)
        };

        let w = rect.width();
        let h = rect.height();
        if w < rx + rx || h < ry + ry {
            let scale = f32::min(w / (rx + rx), h / (ry + ry));
            rx *= scale;
            ry *= scale;
        }

        if rx <= 0.0 || ry <= 0.0 {
            return Self::from_rect(&rect);
        }

        let kind = if rx >= w * 0.5 && ry >= h * 0.5 {
            RRectType::Oval
        } else {
            RRectType::Simple
        };

        RRect {
            rect,
            radii: [vector(rx, ry); 4],
            kind,
        }
    }

    /// A rounded rectangle with per-corner radii, indexed by `Corner`.
    pub fn from_rect_radii(rect: &Box2D, radii: &[Vector; 4]) -> Self {
        let rect = match Self::initialize_rect(rect) {
            Some(rect) => rect,
            None => return Self::new(),
        };

        if !radii.iter().all(|r| r.x.is_finite() && r.y.is_finite()) {
            return Self::from_rect(&rect);
        }

        let mut radii = *radii;
        let mut all_corners_square = true;
        for r in &mut radii {
            if r.x <= 0.0 || r.y <= 0.0 {
                *r = vector(0.0, 0.0);
            } else {
                all_corners_square = false;
            }
        }

        if all_corners_square {
            return Self::from_rect(&rect);
        }

        let mut rrect = RRect {
            rect,
            radii,
            kind: RRectType::Complex,
        };
        rrect.scale_radii();
        rrect.kind = rrect.compute_type();

        rrect
    }

    fn initialize_rect(rect: &Box2D) -> Option<Box2D> {
        let rect = sorted(rect);
        if !is_finite(&rect) || !(rect.width() > 0.0 && rect.height() > 0.0) {
            return None;
        }

        Some(rect)
    }

    // Radii of adjacent corners must not add up to more than the side they share.
    fn scale_radii(&mut self) {
        let w = self.rect.width() as f64;
        let h = self.rect.height() as f64;
        let r = &self.radii;

        let mut scale = 1.0f64;
        scale = min_scale(r[0].x as f64, r[1].x as f64, w, scale);
        scale = min_scale(r[1].y as f64, r[2].y as f64, h, scale);
        scale = min_scale(r[2].x as f64, r[3].x as f64, w, scale);
        scale = min_scale(r[3].y as f64, r[0].y as f64, h, scale);

        if scale < 1.0 {
            for r in &mut self.radii {
                r.x = (r.x as f64 * scale) as f32;
                r.y = (r.y as f64 * scale) as f32;
            }
        }
    }

    fn compute_type(&self) -> RRectType {
        if self.rect.is_empty() {
            return RRectType::Empty;
        }

        let r = &self.radii;
        let mut all_radii_equal = true;
        let mut all_corners_square = r[0].x == 0.0 || r[0].y == 0.0;
        for i in 1..4 {
            if r[i].x != 0.0 && r[i].y != 0.0 {
                all_corners_square = false;
            }
            if r[i] != r[0] {
                all_radii_equal = false;
            }
        }

        if all_corners_square {
            return RRectType::Rect;
        }

        if all_radii_equal {
            if r[0].x >= self.rect.width() * 0.5 && r[0].y >= self.rect.height() * 0.5 {
                return RRectType::Oval;
            }
            return RRectType::Simple;
        }

        let ul = r[Corner::UpperLeft as usize];
        let ur = r[Corner::UpperRight as usize];
        let lr = r[Corner::LowerRight as usize];
        let ll = r[Corner::LowerLeft as usize];
        if ul.x == ll.x && ur.x == lr.x && ul.y == ur.y && ll.y == lr.y {
            return RRectType::NinePatch;
        }

        RRectType::Complex
    }

    #[inline]
    pub fn kind(&self) -> RRectType {
        self.kind
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kind == RRectType::Empty
    }

    #[inline]
    pub fn is_rect(&self) -> bool {
        self.kind == RRectType::Rect
    }

    #[inline]
    pub fn is_oval(&self) -> bool {
        self.kind == RRectType::Oval
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        self.kind == RRectType::Simple
    }

    #[inline]
    pub fn is_nine_patch(&self) -> bool {
        self.kind == RRectType::NinePatch
    }

    #[inline]
    pub fn is_complex(&self) -> bool {
        self.kind == RRectType::Complex
    }

    /// The sorted rectangle.
    #[inline]
    pub fn rect(&self) -> &Box2D {
        &self.rect
    }

    /// Same as `rect()`: corners never extend past the rectangle.
    #[inline]
    pub fn bounds(&self) -> &Box2D {
        &self.rect
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    #[inline]
    pub fn radii(&self, corner: Corner) -> Vector {
        self.radii[corner as usize]
    }

    #[inline]
    pub fn all_radii(&self) -> &[Vector; 4] {
        &self.radii
    }

    /// The radii shared by all corners of a simple, oval or rect rounded
    /// rectangle (the upper left radii otherwise).
    #[inline]
    pub fn simple_radii(&self) -> Vector {
        self.radii[0]
    }

    /// Writes `SIZE_IN_WORDS` words: the rectangle (left, top, right, bottom)
    /// followed by the x and y radii of each corner, every word holding the
    /// bit pattern of an `f32`.
    ///
    /// Panics if `dst` is shorter than `SIZE_IN_WORDS`.
    pub fn write_to_words(&self, dst: &mut [u32]) {
        let dst = &mut dst[..Self::SIZE_IN_WORDS];
        dst[0] = self.rect.min.x.to_bits();
        dst[1] = self.rect.min.y.to_bits();
        dst[2] = self.rect.max.x.to_bits();
        dst[3] = self.rect.max.y.to_bits();
        for (i, r) in self.radii.iter().enumerate() {
            dst[4 + i * 2] = r.x.to_bits();
            dst[5 + i * 2] = r.y.to_bits();
        }
    }

    /// Decodes words produced by `write_to_words`.
    ///
    /// Only canonical encodings are accepted: decoding the words of a
    /// rounded rectangle gives back an identical rounded rectangle.
    pub fn read_from_words(src: &[u32]) -> Result<RRect, RRectError> {
        if src.len() < Self::SIZE_IN_WORDS {
            return Err(RRectError::BufferTooShort {
                expected: Self::SIZE_IN_WORDS,
                got: src.len(),
            });
        }

        let mut values = [0.0f32; Self::SIZE_IN_WORDS];
        for (index, (word, value)) in src.iter().zip(values.iter_mut()).enumerate() {
            *value = f32::from_bits(*word);
            if !value.is_finite() {
                return Err(RRectError::NonFinite { index });
            }
        }

        let rect = Box2D {
            min: crate::math::point(values[0], values[1]),
            max: crate::math::point(values[2], values[3]),
        };
        let radii = [
            vector(values[4], values[5]),
            vector(values[6], values[7]),
            vector(values[8], values[9]),
            vector(values[10], values[11]),
        ];

        let empty = rect == Box2D::zero() && radii.iter().all(|r| *r == vector(0.0, 0.0));
        if empty {
            return Ok(RRect::new());
        }

        let decoded = RRect::from_rect_radii(&rect, &radii);
        if decoded.rect != rect || decoded.radii != radii || decoded.is_empty() {
            return Err(RRectError::NotCanonical);
        }

        Ok(decoded)
    }
}

impl Default for RRect {
    fn default() -> Self {
        RRect::new()
    }
}

fn min_scale(rad1: f64, rad2: f64, limit: f64, cur_min: f64) -> f64 {
    if rad1 + rad2 > limit {
        f64::min(cur_min, limit / (rad1 + rad2))
    } else {
        cur_min
    }
}

#[cfg(test)]
use crate::math::{point, rect};

#[test]
fn empty_rects() {
    assert!(RRect::new().is_empty());
    assert!(RRect::from_rect(&rect(0.0, 0.0, 0.0, 10.0)).is_empty());
    assert!(RRect::from_oval(&rect(0.0, 0.0, 10.0, 0.0)).is_empty());
    assert!(RRect::from_rect_xy(&rect(5.0, 5.0, 0.0, 0.0), 1.0, 1.0).is_empty());
    assert!(RRect::from_rect(&rect(0.0, 0.0, f32::INFINITY, 10.0)).is_empty());
    assert_eq!(*RRect::from_rect(&rect(3.0, 3.0, -0.0, 4.0)).rect(), Box2D::zero());
}

#[test]
fn rect_is_sorted() {
    let flipped = Box2D {
        min: point(10.0, 10.0),
        max: point(0.0, 0.0),
    };
    let rrect = RRect::from_rect(&flipped);
    assert!(rrect.is_rect());
    assert_eq!(*rrect.rect(), rect(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn classification() {
    let r = rect(0.0, 0.0, 100.0, 50.0);

    assert_eq!(RRect::from_rect(&r).kind(), RRectType::Rect);
    assert_eq!(RRect::from_oval(&r).kind(), RRectType::Oval);
    assert_eq!(RRect::from_rect_xy(&r, 5.0, 5.0).kind(), RRectType::Simple);
    assert_eq!(RRect::from_rect_xy(&r, 0.0, 5.0).kind(), RRectType::Rect);
    assert_eq!(RRect::from_rect_xy(&r, 50.0, 25.0).kind(), RRectType::Oval);

    let nine = [
        vector(5.0, 3.0),
        vector(7.0, 3.0),
        vector(7.0, 4.0),
        vector(5.0, 4.0),
    ];
    assert_eq!(RRect::from_rect_radii(&r, &nine).kind(), RRectType::NinePatch);

    let complex = [
        vector(5.0, 3.0),
        vector(7.0, 1.0),
        vector(2.0, 4.0),
        vector(5.0, 9.0),
    ];
    assert_eq!(RRect::from_rect_radii(&r, &complex).kind(), RRectType::Complex);

    let square = [vector(0.0, 3.0), vector(-1.0, 1.0), vector(2.0, 0.0), vector(0.0, 0.0)];
    assert_eq!(RRect::from_rect_radii(&r, &square).kind(), RRectType::Rect);
}

#[test]
fn oversized_radii_are_scaled() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    let rrect = RRect::from_rect_xy(&r, 20.0, 20.0);
    assert!(rrect.is_oval());
    assert_eq!(rrect.simple_radii(), vector(5.0, 5.0));

    let radii = [
        vector(8.0, 2.0),
        vector(8.0, 2.0),
        vector(2.0, 2.0),
        vector(2.0, 2.0),
    ];
    let rrect = RRect::from_rect_radii(&r, &radii);
    // The top side needs 16 units out of 10.
    let ul = rrect.radii(Corner::UpperLeft);
    assert!((ul.x - 5.0).abs() < 1e-5);
    assert!((ul.y - 1.25).abs() < 1e-5);
    let ur = rrect.radii(Corner::UpperRight);
    assert!(ul.x + ur.x <= 10.0);
}

#[test]
fn non_finite_radii() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    assert!(RRect::from_rect_xy(&r, f32::NAN, 2.0).is_rect());
    let radii = [vector(f32::INFINITY, 1.0); 4];
    assert!(RRect::from_rect_radii(&r, &radii).is_rect());
}

#[test]
fn words_round_trip() {
    let r = rect(1.0, 2.0, 30.0, 40.0);
    let radii = [
        vector(1.0, 2.0),
        vector(3.0, 4.0),
        vector(5.0, 6.0),
        vector(7.0, 8.0),
    ];

    for rrect in &[
        RRect::new(),
        RRect::from_rect(&r),
        RRect::from_oval(&r),
        RRect::from_rect_xy(&r, 4.0, 3.0),
        RRect::from_rect_radii(&r, &radii),
    ] {
        let mut words = [0u32; RRect::SIZE_IN_WORDS];
        rrect.write_to_words(&mut words);
        assert_eq!(RRect::read_from_words(&words), Ok(*rrect));
    }
}

#[test]
fn rect_words_layout() {
    let rrect = RRect::from_rect(&rect(0.0, 0.0, 10.0, 10.0));
    let mut words = [0xFFFF_FFFFu32; RRect::SIZE_IN_WORDS];
    rrect.write_to_words(&mut words);
    assert_eq!(words[0], 0.0f32.to_bits());
    assert_eq!(words[2], 10.0f32.to_bits());
    assert_eq!(words[3], 10.0f32.to_bits());
    assert!(words[4..].iter().all(|w| *w == 0));
}

#[test]
fn invalid_words() {
    assert_eq!(
        RRect::read_from_words(&[0; 4]),
        Err(RRectError::BufferTooShort { expected: 12, got: 4 })
    );

    let mut words = [0u32; RRect::SIZE_IN_WORDS];
    RRect::from_rect(&rect(0.0, 0.0, 10.0, 10.0)).write_to_words(&mut words);
    words[5] = f32::NAN.to_bits();
    assert_eq!(RRect::read_from_words(&words), Err(RRectError::NonFinite { index: 5 }));

    // Unsorted rectangle.
    let mut words = [0u32; RRect::SIZE_IN_WORDS];
    RRect::from_rect(&rect(0.0, 0.0, 10.0, 10.0)).write_to_words(&mut words);
    words.swap(0, 2);
    assert_eq!(RRect::read_from_words(&words), Err(RRectError::NotCanonical));
}
