#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Styled 2D shapes with cache keys.
//!
//! # Crates
//!
//! This meta-crate (`shapekey`) reexports the following sub-crates for convenience:
//!
//! * **shapekey_geom** - Rectangles and rounded rectangles.
//! * **shapekey_path** - Immutable paths with generation ids.
//! * **shapekey_style** - Stroke parameters, path effects and style keys.
//!
//! Each `shapekey_<name>` crate is reexported as a `<name>` module in `shapekey`.
//!
//! # Overview
//!
//! A [`Shape`](struct.Shape.html) is some geometry (nothing, a rounded
//! rectangle or a path) along with a [`Style`](style/struct.Style.html).
//! Shapes are meant to be used as the input of a cache of expensive,
//! resolution-dependent results such as tessellated or rasterized geometry.
//!
//! Two ideas make this work:
//!
//! - Geometry is always stored in its simplest form. A path that is exactly a
//!   rectangle produces the same key as the rectangle itself.
//! - Applying a style to a shape produces a new shape whose key is derived
//!   from the key of the original shape and from the style parameters. The
//!   result can be found in a cache without doing the work again, and applying
//!   the path effect and the stroke in two steps produces the same key as
//!   applying them at once.
//!
//! Paths marked as volatile can't be cached, and neither can anything derived
//! from them.
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Examples
//!
//! ```
//! use shapekey::Shape;
//! use shapekey::math::{point, rect};
//! use shapekey::path::Path;
//!
//! // A closed axis-aligned rectangle is stored as a rectangle.
//! let mut builder = Path::builder();
//! builder.move_to(point(0.0, 0.0));
//! builder.line_to(point(10.0, 0.0));
//! builder.line_to(point(10.0, 10.0));
//! builder.line_to(point(0.0, 10.0));
//! builder.close();
//! let shape = Shape::from_path(builder.build());
//!
//! assert!(shape.as_rrect().unwrap().is_rect());
//! assert_eq!(shape.bounds(), rect(0.0, 0.0, 10.0, 10.0));
//! assert_eq!(shape.unstyled_key(), Shape::from_rect(&rect(0.0, 0.0, 10.0, 10.0)).unstyled_key());
//! ```
//!
//! Applying a dashed stroke:
//!
//! ```
//! use std::sync::Arc;
//! use shapekey::Shape;
//! use shapekey::math::point;
//! use shapekey::path::Path;
//! use shapekey::style::{Apply, DashEffect, StrokeRec, Style};
//!
//! let mut builder = Path::builder();
//! builder.move_to(point(0.0, 0.0));
//! builder.quad_to(point(50.0, 50.0), point(100.0, 0.0));
//! let path = builder.build();
//!
//! let dash = DashEffect::new(&[10.0, 5.0], 0.0).unwrap();
//! let style = Style::new(StrokeRec::stroke(2.0), Some(Arc::new(dash)));
//! let shape = Shape::from_path_with_style(path, style);
//!
//! let stroked = shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
//! assert!(stroked.style().is_simple_fill());
//!
//! let in_two_steps = shape
//!     .apply_style(Apply::PathEffectOnly, 1.0)
//!     .apply_style(Apply::PathEffectAndStrokeRec, 1.0);
//! assert_eq!(stroked.unstyled_key(), in_two_steps.unstyled_key());
//! ```

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub extern crate shapekey_geom;
pub extern crate shapekey_path;
pub extern crate shapekey_style;

pub use shapekey_geom as geom;
pub use shapekey_path as path;
pub use shapekey_style as style;

pub use path::math;

mod shape;

#[cfg(test)]
mod shape_tests;

#[doc(inline)]
pub use crate::shape::{Geometry, Shape, ShapeKey, EMPTY_KEY_TAG};
