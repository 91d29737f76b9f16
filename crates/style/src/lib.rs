#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Stroke parameters, path effects and their cache keys.
//!
//! This crate is reexported in [shapekey](../shapekey/index.html).
//!
//! A [`Style`](struct.Style.html) combines a [`StrokeRec`](struct.StrokeRec.html)
//! (fill, hairline, stroke or stroke-and-fill, with the usual cap, join and
//! miter limit parameters) and an optional [`PathEffect`](trait.PathEffect.html)
//! such as [`DashEffect`](struct.DashEffect.html).
//!
//! Styles can be applied to a [`Path`](../shapekey_path/struct.Path.html),
//! producing new fill geometry, and can describe themselves as a sequence of
//! `u32` words so that the result of applying them can be cached.
//!
//! # Examples
//!
//! ```
//! use shapekey_style::{Apply, LineJoin, StrokeRec, Style, StyleKeyFlags};
//!
//! let style = Style::from_stroke_rec(StrokeRec::stroke(2.0).with_line_join(LineJoin::Round));
//! assert!(style.applies());
//!
//! let flags = StyleKeyFlags::CLOSED;
//! let size = Style::key_size(&style, Apply::PathEffectAndStrokeRec, flags).unwrap();
//! let mut key = vec![0; size];
//! Style::write_key(&mut key, &style, Apply::PathEffectAndStrokeRec, 1.0, flags);
//! assert_eq!(key[3], 2.0f32.to_bits());
//! ```

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub use shapekey_path as path;

mod path_effect;
mod stroke_rec;
mod stroker;
mod style;

#[doc(inline)]
pub use crate::path_effect::{CornerEffect, DashEffect, DashError, DashInfo, PathEffect};
#[doc(inline)]
pub use crate::stroke_rec::{InitStyle, LineCap, LineJoin, StrokeRec, StrokeStyle};
#[doc(inline)]
pub use crate::style::{Apply, Style, StyleKeyFlags};
