#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Immutable paths that know enough about themselves to be used as cache keys.
//!
//! This crate is reexported in [shapekey](../shapekey/index.html).
//!
//! A [`Path`](struct.Path.html) stores its geometry in a `lyon_path::Path`
//! and carries a few extra pieces of information:
//!
//! - its bounds, computed once when the path is built,
//! - a generation id identifying its content,
//! - a volatility flag, set by callers that regenerate the path every frame,
//! - whether it is exactly an oval or a rounded rectangle (recorded by the
//!   builder) or a rectangle (detected from the geometry).
//!
//! # Examples
//!
//! ```
//! use shapekey_path::{Path, Winding};
//! use shapekey_path::math::{point, rect};
//!
//! let mut builder = Path::builder();
//! builder.add_oval(&rect(0.0, 0.0, 10.0, 20.0), Winding::Positive);
//! let oval = builder.build();
//! assert_eq!(oval.is_oval(), Some(rect(0.0, 0.0, 10.0, 20.0)));
//!
//! let mut builder = Path::builder();
//! builder.move_to(point(0.0, 0.0));
//! builder.line_to(point(10.0, 0.0));
//! builder.line_to(point(10.0, 10.0));
//! builder.line_to(point(0.0, 10.0));
//! builder.close();
//! let square = builder.build();
//! assert!(square.is_rect().unwrap().closed);
//! assert_ne!(square.generation_id(), oval.generation_id());
//! ```

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub use shapekey_geom as geom;

mod builder;
mod flatten;
mod path;

#[doc(inline)]
pub use crate::builder::PathBuilder;
#[doc(inline)]
pub use crate::flatten::Polyline;
#[doc(inline)]
pub use crate::path::{Path, RectInfo};
pub use lyon_path::{PathEvent, Winding};

pub use shapekey_geom::math;

use std::sync::atomic::{AtomicU32, Ordering};

/// Default maximum distance between a curve and its flattened approximation.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Generation id of every empty path.
///
/// Non-empty paths never use this value (nor zero), so it can double as a
/// tag for "no geometry" in cache keys.
pub const EMPTY_GENERATION_ID: u32 = 1;

static NEXT_GENERATION_ID: AtomicU32 = AtomicU32::new(EMPTY_GENERATION_ID + 1);

pub(crate) fn next_generation_id() -> u32 {
    loop {
        let id = NEXT_GENERATION_ID.fetch_add(1, Ordering::Relaxed);
        // Skip the reserved values when the counter wraps.
        if id > EMPTY_GENERATION_ID {
            return id;
        }
    }
}
