use crate::geom::RRect;
use crate::math::Box2D;
use crate::path::{Path, Winding, EMPTY_GENERATION_ID};
use crate::style::{Apply, Style, StyleKeyFlags};

/// First (and only) word of the key of an empty shape.
///
/// Generation ids of non-empty paths never take this value.
pub const EMPTY_KEY_TAG: u32 = EMPTY_GENERATION_ID;

/// The geometry of a [`Shape`](struct.Shape.html).
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Empty,
    RRect(RRect),
    Path(Path),
}

/// An owned, hashable shape key.
///
/// See [`Shape::unstyled_key`](struct.Shape.html#method.unstyled_key).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ShapeKey(Vec<u32>);

impl ShapeKey {
    #[inline]
    pub fn as_words(&self) -> &[u32] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Some geometry and the style it is meant to be rendered with.
///
/// Geometry is stored in the simplest form that can represent it: paths that
/// are exactly rectangles, ovals or rounded rectangles are stored as
/// [`RRect`](../geom/struct.RRect.html)s and empty paths as
/// `Geometry::Empty`.
///
/// Applying the style produces a new shape that remembers where it comes
/// from through an inherited key, so that the expensive result can be cached
/// and found again from the original shape and style.
#[derive(Clone, Debug)]
pub struct Shape {
    geometry: Geometry,
    style: Style,
    // Only ever set on shapes with path geometry.
    inherited_key: Vec<u32>,
    // Built from or through a volatile path. Survives reduction.
    volatile: bool,
}

impl Shape {
    /// An empty shape with the default (fill) style.
    pub fn new() -> Self {
        Shape {
            geometry: Geometry::Empty,
            style: Style::fill(),
            inherited_key: Vec::new(),
            volatile: false,
        }
    }

    pub fn from_rect(rect: &Box2D) -> Self {
        Shape::from_rect_with_style(rect, Style::fill())
    }

    pub fn from_rect_with_style(rect: &Box2D, style: Style) -> Self {
        Shape::from_rrect_with_style(&RRect::from_rect(rect), style)
    }

    pub fn from_rrect(rrect: &RRect) -> Self {
        Shape::from_rrect_with_style(rrect, Style::fill())
    }

    pub fn from_rrect_with_style(rrect: &RRect, style: Style) -> Self {
        let geometry = if rrect.is_empty() {
            Geometry::Empty
        } else {
            Geometry::RRect(*rrect)
        };

        Shape {
            geometry,
            style,
            inherited_key: Vec::new(),
            volatile: false,
        }
    }

    pub fn from_path(path: Path) -> Self {
        Shape::from_path_with_style(path, Style::fill())
    }

    pub fn from_path_with_style(path: Path, style: Style) -> Self {
        let mut shape = Shape {
            geometry: Geometry::Path(path),
            style,
            inherited_key: Vec::new(),
            volatile: false,
        };
        if let Geometry::Path(path) = &shape.geometry {
            shape.volatile = path.is_volatile();
        }
        shape.attempt_to_reduce();
        shape
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.geometry == Geometry::Empty
    }

    /// Returns true if the shape was built from a volatile path or derived
    /// through one. Volatile shapes can't be cached even when their geometry
    /// was reduced to a rounded rectangle.
    #[inline]
    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    pub fn as_rrect(&self) -> Option<RRect> {
        match &self.geometry {
            Geometry::RRect(rrect) => Some(*rrect),
            _ => None,
        }
    }

    /// Returns the geometry as a path.
    ///
    /// Rounded rectangles are converted, which loses their exact form until
    /// the path is reduced again.
    pub fn as_path(&self) -> Path {
        match &self.geometry {
            Geometry::Empty => Path::new(),
            Geometry::RRect(rrect) => {
                let mut builder = Path::builder();
                builder.add_rrect(rrect, Winding::Positive);
                builder.build()
            }
            Geometry::Path(path) => path.clone(),
        }
    }

    /// Bounds of the geometry, ignoring the style.
    pub fn bounds(&self) -> Box2D {
        match &self.geometry {
            Geometry::Empty => Box2D::zero(),
            Geometry::RRect(rrect) => *rrect.bounds(),
            Geometry::Path(path) => path.bounds(),
        }
    }

    /// Bounds of the geometry once the style is applied.
    pub fn styled_bounds(&self) -> Box2D {
        if self.is_empty() && !self.style.has_non_dash_path_effect() {
            return Box2D::zero();
        }

        self.style.adjust_bounds(&self.bounds())
    }

    /// Returns true if the geometry has no unclosed contour.
    ///
    /// Paths are conservatively assumed to be open.
    pub fn known_to_be_closed(&self) -> bool {
        match self.geometry {
            Geometry::Empty | Geometry::RRect(_) => true,
            Geometry::Path(_) => false,
        }
    }

    /// Number of words of the key identifying the geometry, or `None` if the
    /// shape can't be cached (volatile paths and anything derived from them).
    ///
    /// The key does not include the shape's own style.
    pub fn unstyled_key_size(&self) -> Option<usize> {
        if self.volatile {
            return None;
        }

        if !self.inherited_key.is_empty() {
            return Some(self.inherited_key.len());
        }

        match &self.geometry {
            Geometry::Empty => Some(1),
            Geometry::RRect(_) => Some(RRect::SIZE_IN_WORDS),
            Geometry::Path(path) => {
                if path.is_volatile() {
                    None
                } else {
                    Some(1)
                }
            }
        }
    }

    /// Writes the key identifying the geometry.
    ///
    /// # Panics
    ///
    /// If the shape can't be cached or if `key` is not exactly
    /// `unstyled_key_size()` words long.
    pub fn write_unstyled_key(&self, key: &mut [u32]) {
        assert_eq!(
            Some(key.len()),
            self.unstyled_key_size(),
            "unexpected key buffer size"
        );

        if !self.inherited_key.is_empty() {
            key.copy_from_slice(&self.inherited_key);
            return;
        }

        match &self.geometry {
            Geometry::Empty => {
                key[0] = EMPTY_KEY_TAG;
            }
            Geometry::RRect(rrect) => {
                rrect.write_to_words(key);
            }
            Geometry::Path(path) => {
                key[0] = path.generation_id();
            }
        }
    }

    /// Returns the key identifying the geometry, or `None` if the shape can't
    /// be cached.
    pub fn unstyled_key(&self) -> Option<ShapeKey> {
        let size = self.unstyled_key_size()?;
        let mut key = vec![0; size];
        self.write_unstyled_key(&mut key);

        Some(ShapeKey(key))
    }

    /// Applies the style (or only its path effect) and returns the resulting
    /// shape.
    ///
    /// The scale is the resolution the result is meant to be rendered at. It
    /// affects how curves are approximated and is part of the resulting key.
    ///
    /// Applying a path effect and then the stroke produces the same key as
    /// applying both at once.
    ///
    /// If there is nothing to apply, the result is empty. It keeps the style
    /// but not the geometry.
    pub fn apply_style(&self, apply: Apply, scale: f32) -> Shape {
        if !self.style.applies()
            || (apply == Apply::PathEffectOnly && !self.style.has_path_effect())
        {
            log::trace!("nothing to apply, dropping the geometry");
            return Shape {
                geometry: Geometry::Empty,
                style: self.style.clone(),
                inherited_key: Vec::new(),
                volatile: self.volatile,
            };
        }

        let materialized;
        let src = match &self.geometry {
            Geometry::Path(path) => path,
            _ => {
                materialized = self.as_path();
                &materialized
            }
        };

        let mut result = Shape::new();
        // The shape to derive the key from, when it isn't `self`.
        let mut key_parent = None;

        if let Some(effect) = self.style.path_effect() {
            let mut rec = *self.style.stroke_rec();
            rec.set_res_scale(scale);
            let filtered = match effect.filter_path(src, &mut rec, None) {
                Some(path) => path,
                None => {
                    log::debug!("path effect {:?} rejected the geometry", effect);
                    let mut empty = Shape::new();
                    empty.volatile = self.volatile;
                    return empty;
                }
            };

            if apply == Apply::PathEffectAndStrokeRec && rec.need_to_apply() {
                // If the filtered path is simpler than a path, key it as such
                // so that applying the stroke separately later matches.
                let residual = Style::from_stroke_rec(rec);
                key_parent = match reduced_geometry(&filtered, &residual) {
                    Some(Geometry::Empty) => Some(Shape::new()),
                    Some(Geometry::RRect(rrect)) => {
                        Some(Shape::from_rrect_with_style(&rrect, residual))
                    }
                    _ => None,
                };
                if let Some(stroked) = rec.apply_to_path(&filtered) {
                    result.geometry = Geometry::Path(stroked);
                }
            } else {
                result.geometry = Geometry::Path(filtered);
                result.style = Style::from_stroke_rec(rec);
            }
        } else if let Some((path, init)) = self.style.apply_to_path(src, scale) {
            result.geometry = Geometry::Path(path);
            result.style = Style::from_init_style(init);
        }

        result.attempt_to_reduce();
        if self.volatile {
            result.mark_volatile();
        } else {
            result.set_inherited_key(key_parent.as_ref().unwrap_or(self), apply, scale);
        }

        result
    }

    fn attempt_to_reduce(&mut self) {
        let path = match &self.geometry {
            Geometry::Path(path) => path,
            _ => return,
        };

        if let Some(geometry) = reduced_geometry(path, &self.style) {
            log::trace!("reduced path {} to {:?}", path.generation_id(), geometry);
            self.geometry = geometry;
            self.inherited_key.clear();
        }
    }

    fn mark_volatile(&mut self) {
        self.volatile = true;
        self.inherited_key.clear();
        if let Geometry::Path(path) = &mut self.geometry {
            path.set_volatile(true);
        }
    }

    // Derives the key of a path produced by applying the style of `parent`.
    fn set_inherited_key(&mut self, parent: &Shape, apply: Apply, scale: f32) {
        if !matches!(self.geometry, Geometry::Path(_)) {
            return;
        }

        let parent_size = match parent.unstyled_key_size() {
            Some(size) => size,
            None => {
                log::debug!("parent shape can't be cached, marking the result volatile");
                self.mark_volatile();
                return;
            }
        };

        let flags = if parent.known_to_be_closed() {
            StyleKeyFlags::CLOSED
        } else {
            StyleKeyFlags::NONE
        };

        let style_size = match Style::key_size(&parent.style, apply, flags) {
            Some(size) => size,
            None => {
                log::debug!("style can't be cached, marking the result volatile");
                self.mark_volatile();
                return;
            }
        };

        let mut key = vec![0; parent_size + style_size];
        parent.write_unstyled_key(&mut key[..parent_size]);
        Style::write_key(&mut key[parent_size..], &parent.style, apply, scale, flags);
        log::trace!("inherited key {:?}", key);

        self.inherited_key = key;
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::new()
    }
}

// Returns the simpler geometry equivalent to `path` rendered with `style`, or
// `None` if the path can't be simplified.
fn reduced_geometry(path: &Path, style: &Style) -> Option<Geometry> {
    if path.is_empty() {
        return Some(Geometry::Empty);
    }

    if let Some(rrect) = path.is_rrect() {
        return Some(Geometry::RRect(rrect));
    }

    if let Some(oval) = path.is_oval() {
        return Some(Geometry::RRect(RRect::from_oval(&oval)));
    }

    if let Some(info) = path.is_rect() {
        // Strokes and path effects see the difference between an open and a
        // closed rectangle, fills don't.
        if info.closed || (!style.has_path_effect() && style.stroke_rec().is_fill()) {
            let rrect = RRect::from_rect(&info.rect);
            if rrect.is_empty() {
                return Some(Geometry::Empty);
            }
            return Some(Geometry::RRect(rrect));
        }
    }

    None
}
