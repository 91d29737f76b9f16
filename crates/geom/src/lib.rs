#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Rectangles and rounded rectangles on top of euclid.
//!
//! This crate is reexported in [shapekey](../shapekey/index.html).
//!
//! # Overview
//!
//! The main type is [`RRect`](struct.RRect.html): a rectangle with four
//! elliptical corners. Rounded rectangles are value types with a canonical
//! form (the input rectangle is sorted, radii are clamped and scaled so that
//! they fit), which makes them cheap to compare and to encode into cache keys.
//!
//! ```
//! use shapekey_geom::RRect;
//! use shapekey_geom::math::rect;
//!
//! let rrect = RRect::from_rect_xy(&rect(0.0, 0.0, 100.0, 50.0), 10.0, 10.0);
//! assert!(rrect.is_simple());
//!
//! let mut words = [0u32; RRect::SIZE_IN_WORDS];
//! rrect.write_to_words(&mut words);
//! assert_eq!(RRect::read_from_words(&words), Ok(rrect));
//! ```

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub use lyon_path::geom::euclid;

mod rrect;

#[doc(inline)]
pub use crate::rrect::{Corner, RRect, RRectError, RRectType};

pub mod math {
    //! f32 euclid aliases (reexported from `lyon_path`) and a few rectangle helpers.

    pub use lyon_path::math::{point, size, vector, Box2D, Point, Size, Vector};

    /// Shorthand for a box with origin `(x, y)` and size `(w, h)`.
    #[inline]
    pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Box2D {
        Box2D {
            min: point(x, y),
            max: point(x + w, y + h),
        }
    }

    /// Returns the box with `min` and `max` swapped where needed so that
    /// `min <= max` on both axes.
    #[inline]
    pub fn sorted(r: &Box2D) -> Box2D {
        Box2D {
            min: point(f32::min(r.min.x, r.max.x), f32::min(r.min.y, r.max.y)),
            max: point(f32::max(r.min.x, r.max.x), f32::max(r.min.y, r.max.y)),
        }
    }

    #[inline]
    pub fn is_finite(r: &Box2D) -> bool {
        r.min.x.is_finite() && r.min.y.is_finite() && r.max.x.is_finite() && r.max.y.is_finite()
    }

    /// Grows the box by `dx` horizontally and `dy` vertically on each side.
    #[inline]
    pub fn outset(r: &Box2D, dx: f32, dy: f32) -> Box2D {
        Box2D {
            min: point(r.min.x - dx, r.min.y - dy),
            max: point(r.max.x + dx, r.max.y + dy),
        }
    }

    #[test]
    fn sorted_boxes() {
        let b = Box2D {
            min: point(10.0, 0.0),
            max: point(0.0, 10.0),
        };
        assert_eq!(sorted(&b), rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(sorted(&rect(1.0, 2.0, 3.0, 4.0)), rect(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn outset_box() {
        assert_eq!(
            outset(&rect(0.0, 0.0, 10.0, 10.0), 1.0, 2.0),
            rect(-1.0, -2.0, 12.0, 14.0)
        );
    }
}
