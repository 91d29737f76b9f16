use crate::geom::RRect;
use crate::math::{point, rect, Box2D, Point};
use crate::path::{Path, PathEvent, Winding};
use crate::style::{
    Apply, CornerEffect, DashEffect, LineCap, LineJoin, PathEffect, StrokeRec, Style,
};
use crate::{Geometry, Shape, EMPTY_KEY_TAG};

use std::sync::Arc;

fn polyline(points: &[(f32, f32)], closed: bool) -> Path {
    let points: Vec<Point> = points.iter().map(|&(x, y)| point(x, y)).collect();
    let mut builder = Path::builder();
    builder.add_polyline(&points, closed);
    builder.build()
}

fn triangle() -> Path {
    polyline(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)], true)
}

fn square(closed: bool) -> Path {
    polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], closed)
}

fn has_vertex(path: &Path, p: Point) -> bool {
    path.iter().any(|evt| match evt {
        PathEvent::Begin { at } => at == p,
        PathEvent::Line { to, .. } => to == p,
        _ => false,
    })
}

fn dash() -> Option<Arc<dyn PathEffect>> {
    Some(Arc::new(DashEffect::new(&[3.0, 2.0], 1.0).unwrap()))
}

fn words(shape: &Shape) -> Option<Vec<u32>> {
    shape.unstyled_key().map(|key| key.as_words().to_vec())
}

// Replaces the geometry with its bounding rectangle.
#[derive(Debug)]
struct ToBounds;

impl PathEffect for ToBounds {
    fn filter_path(&self, src: &Path, _: &mut StrokeRec, _: Option<&Box2D>) -> Option<Path> {
        let mut builder = Path::builder();
        builder.add_rect(&src.bounds(), Winding::Positive);
        Some(builder.build())
    }
}

#[derive(Debug)]
struct RejectEverything;

impl PathEffect for RejectEverything {
    fn filter_path(&self, _: &Path, _: &mut StrokeRec, _: Option<&Box2D>) -> Option<Path> {
        None
    }
}

#[test]
fn exact_shapes_are_reduced() {
    let r = rect(0.0, 0.0, 10.0, 20.0);

    let mut builder = Path::builder();
    builder.add_oval(&r, Winding::Positive);
    let oval = Shape::from_path(builder.build());
    assert_eq!(oval.as_rrect(), Some(RRect::from_oval(&r)));
    assert_eq!(oval.bounds(), r);

    let rrect = RRect::from_rect_xy(&r, 2.0, 3.0);
    let mut builder = Path::builder();
    builder.add_rrect(&rrect, Winding::Negative);
    let shape = Shape::from_path(builder.build());
    assert_eq!(shape.as_rrect(), Some(rrect));
    assert_eq!(shape.bounds(), r);

    let closed = Shape::from_path(square(true));
    assert_eq!(closed.as_rrect(), Some(RRect::from_rect(&rect(0.0, 0.0, 10.0, 10.0))));
    assert_eq!(closed.bounds(), rect(0.0, 0.0, 10.0, 10.0));
    assert!(closed.known_to_be_closed());

    let general = Shape::from_path(triangle());
    assert!(matches!(general.geometry(), Geometry::Path(_)));
    assert!(!general.known_to_be_closed());
    assert_eq!(general.bounds(), rect(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn open_rects_are_only_reduced_when_filled() {
    let filled = Shape::from_path(square(false));
    assert!(filled.as_rrect().unwrap().is_rect());

    let stroked = Shape::from_path_with_style(square(false), StrokeRec::stroke(1.0).into());
    assert!(matches!(stroked.geometry(), Geometry::Path(_)));

    let dashed_fill = Shape::from_path_with_style(square(false), Style::new(StrokeRec::fill(), dash()));
    assert!(matches!(dashed_fill.geometry(), Geometry::Path(_)));

    let hairline = Shape::from_path_with_style(square(true), Style::hairline());
    assert!(hairline.as_rrect().is_some());
}

#[test]
fn returning_to_the_start_does_not_close_a_rect() {
    let back_to_start = || polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)], false);

    // Fills don't care.
    assert!(Shape::from_path(back_to_start()).as_rrect().is_some());

    let open = Shape::from_path_with_style(back_to_start(), StrokeRec::stroke(2.0).into());
    assert!(matches!(open.geometry(), Geometry::Path(_)));
    assert_eq!(open.unstyled_key_size(), Some(1));

    let closed = Shape::from_path_with_style(square(true), StrokeRec::stroke(2.0).into());
    assert!(closed.as_rrect().is_some());

    let full = Apply::PathEffectAndStrokeRec;
    let open_stroke = open.apply_style(full, 1.0);
    let closed_stroke = closed.apply_style(full, 1.0);
    assert_ne!(words(&open_stroke), words(&closed_stroke));
    assert_eq!(open_stroke.unstyled_key_size(), Some(1 + 4));

    // Butt caps leave the start corner notched.
    let open_path = open_stroke.as_path();
    assert!(has_vertex(&open_path, point(0.0, -1.0)));
    assert!(has_vertex(&open_path, point(-1.0, 0.0)));
    assert!(!has_vertex(&open_path, point(-1.0, -1.0)));
    assert!(has_vertex(&closed_stroke.as_path(), point(-1.0, -1.0)));
}

#[test]
fn empty_shapes() {
    let empty = Shape::new();
    assert!(empty.is_empty());
    assert!(empty.style().is_simple_fill());
    assert_eq!(empty.bounds(), Box2D::zero());
    assert_eq!(words(&empty), Some(vec![EMPTY_KEY_TAG]));

    assert!(Shape::from_path(Path::new()).is_empty());
    assert!(Shape::from_rect(&rect(1.0, 1.0, 0.0, 5.0)).is_empty());
    assert!(Shape::from_rrect(&RRect::new()).is_empty());
    assert!(empty.as_path().is_empty());
}

#[test]
fn rect_key() {
    let shape = Shape::from_rect(&rect(0.0, 0.0, 10.0, 10.0));
    assert_eq!(shape.bounds(), rect(0.0, 0.0, 10.0, 10.0));
    assert_eq!(shape.unstyled_key_size(), Some(RRect::SIZE_IN_WORDS));

    let key = words(&shape).unwrap();
    assert_eq!(&key[..4], &[0.0f32.to_bits(), 0.0f32.to_bits(), 10.0f32.to_bits(), 10.0f32.to_bits()]);
    assert_eq!(RRect::read_from_words(&key), Ok(shape.as_rrect().unwrap()));

    let rrect = RRect::from_rect_xy(&rect(0.0, 0.0, 10.0, 10.0), 2.0, 1.0);
    let key = words(&Shape::from_rrect(&rrect)).unwrap();
    assert_eq!(RRect::read_from_words(&key), Ok(rrect));

    // The conversion to a path and back doesn't change the key.
    let round_trip = Shape::from_path(Shape::from_rrect(&rrect).as_path());
    assert_eq!(words(&round_trip), Some(key));
}

#[test]
fn path_keys() {
    let a = Shape::from_path(triangle());
    let b = Shape::from_path(polyline(&[(0.0, 0.0), (10.0, 10.0), (5.0, 0.0)], true));
    assert_eq!(a.bounds(), b.bounds());
    assert_eq!(a.unstyled_key_size(), Some(1));
    assert_ne!(words(&a), words(&b));
    assert_ne!(words(&a), Some(vec![EMPTY_KEY_TAG]));

    // Same content, same key.
    assert_eq!(words(&a.clone()), words(&a));
}

#[test]
fn volatile_paths_are_not_cacheable() {
    let mut path = triangle();
    path.set_volatile(true);
    let shape = Shape::from_path_with_style(path, StrokeRec::stroke(2.0).into());
    assert_eq!(shape.unstyled_key_size(), None);
    assert_eq!(shape.unstyled_key(), None);

    let stroked = shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(matches!(stroked.geometry(), Geometry::Path(_)));
    assert_eq!(stroked.unstyled_key(), None);

    let dashed = Shape::from_path_with_style(stroked.as_path(), Style::new(StrokeRec::stroke(1.0), dash()));
    // A copy of the path keeps its volatility.
    assert_eq!(dashed.unstyled_key(), None);
    assert_eq!(dashed.apply_style(Apply::PathEffectOnly, 1.0).unstyled_key(), None);
}

#[test]
fn volatile_paths_are_not_cacheable_once_reduced() {
    let mut path = square(true);
    path.set_volatile(true);
    let shape = Shape::from_path_with_style(path, StrokeRec::stroke(2.0).into());
    assert!(shape.as_rrect().is_some());
    assert!(shape.is_volatile());
    assert_eq!(shape.unstyled_key_size(), None);
    assert_eq!(shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0).unstyled_key(), None);

    let mut builder = Path::builder();
    builder.add_oval(&rect(0.0, 0.0, 4.0, 2.0), Winding::Positive);
    let mut oval = builder.build();
    oval.set_volatile(true);
    let oval = Shape::from_path(oval);
    assert!(oval.as_rrect().is_some());
    assert_eq!(oval.unstyled_key(), None);

    let mut empty = Path::new();
    empty.set_volatile(true);
    assert_eq!(Shape::from_path(empty).unstyled_key(), None);

    // Results reduced to a rect stay volatile.
    let mut path = triangle();
    path.set_volatile(true);
    let bounded = Shape::from_path_with_style(path, Style::new(StrokeRec::stroke(2.0), Some(Arc::new(ToBounds))));
    let result = bounded.apply_style(Apply::PathEffectOnly, 1.0);
    assert_eq!(result.as_rrect(), Some(RRect::from_rect(&rect(0.0, 0.0, 10.0, 10.0))));
    assert!(result.is_volatile());
    assert_eq!(result.unstyled_key(), None);

    // Nothing to apply, still derived from the volatile path.
    let mut path = square(true);
    path.set_volatile(true);
    let filled = Shape::from_path(path);
    let result = filled.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(result.is_empty());
    assert_eq!(result.unstyled_key(), None);
}

#[test]
#[should_panic]
fn writing_the_key_of_a_volatile_shape() {
    let mut path = triangle();
    path.set_volatile(true);
    let shape = Shape::from_path(path);
    let mut key = [0u32; 1];
    shape.write_unstyled_key(&mut key);
}

#[test]
#[should_panic]
fn writing_a_key_into_the_wrong_buffer() {
    let shape = Shape::from_rect(&rect(0.0, 0.0, 1.0, 1.0));
    let mut key = [0u32; 4];
    shape.write_unstyled_key(&mut key);
}

#[test]
fn styled_bounds() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(Shape::from_rect(&r).styled_bounds(), r);

    let hairline = Shape::from_rect_with_style(&r, Style::hairline());
    assert_eq!(hairline.styled_bounds(), rect(-1.0, -1.0, 12.0, 12.0));

    // Miter joins can extend up to the miter limit.
    let stroked = Shape::from_rect_with_style(&r, StrokeRec::stroke(2.0).into());
    assert_eq!(stroked.styled_bounds(), rect(-4.0, -4.0, 18.0, 18.0));
    let round = Shape::from_rect_with_style(&r, StrokeRec::stroke(2.0).with_line_join(LineJoin::Round).into());
    assert_eq!(round.styled_bounds(), rect(-1.0, -1.0, 12.0, 12.0));

    let empty = Shape::from_rect_with_style(&rect(0.0, 0.0, 0.0, 0.0), StrokeRec::stroke(2.0).into());
    assert!(empty.is_empty());
    assert_eq!(empty.styled_bounds(), Box2D::zero());

    let dashed = Shape::from_rect_with_style(&rect(0.0, 0.0, 0.0, 0.0), Style::new(StrokeRec::hairline(), dash()));
    assert_eq!(dashed.styled_bounds(), Box2D::zero());

    // Other path effects could produce geometry out of nothing.
    let corner = Style::new(StrokeRec::hairline(), Some(Arc::new(CornerEffect::new(1.0).unwrap())));
    let cornered = Shape::from_rect_with_style(&rect(0.0, 0.0, 0.0, 0.0), corner);
    assert_eq!(cornered.styled_bounds(), rect(-1.0, -1.0, 2.0, 2.0));
}

#[test]
fn two_steps_match_one() {
    let style = Style::new(StrokeRec::stroke(2.0).with_line_cap(LineCap::Round), dash());

    let shapes = [
        Shape::from_path_with_style(triangle(), style.clone()),
        Shape::from_path_with_style(square(false), style.clone()),
        Shape::from_rrect_with_style(&RRect::from_rect_xy(&rect(0.0, 0.0, 20.0, 10.0), 3.0, 3.0), style.clone()),
        Shape::from_rect_with_style(&rect(0.0, 0.0, 20.0, 10.0), style),
    ];

    for shape in &shapes {
        for &scale in &[1.0, 2.5] {
            let at_once = shape.apply_style(Apply::PathEffectAndStrokeRec, scale);
            let first = shape.apply_style(Apply::PathEffectOnly, scale);
            assert!(!first.style().has_path_effect());
            assert!(first.style().stroke_rec().need_to_apply());
            let then = first.apply_style(Apply::PathEffectAndStrokeRec, scale);

            assert!(at_once.unstyled_key().is_some());
            assert_eq!(at_once.unstyled_key(), then.unstyled_key());
            assert!(at_once.style().is_simple_fill());
            assert!(then.style().is_simple_fill());
        }
    }
}

#[test]
fn effect_results_simpler_than_a_path_key_as_such() {
    let style = Style::new(StrokeRec::stroke(2.0), Some(Arc::new(ToBounds)));
    let shape = Shape::from_path_with_style(triangle(), style);

    // The effect can't be described in a key...
    assert!(shape.apply_style(Apply::PathEffectOnly, 1.0).as_rrect().is_some());

    // ...but its output is a rectangle which can.
    let at_once = shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    let then = shape
        .apply_style(Apply::PathEffectOnly, 1.0)
        .apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(at_once.unstyled_key().is_some());
    assert_eq!(at_once.unstyled_key(), then.unstyled_key());

    let rect_key = words(&Shape::from_rect(&rect(0.0, 0.0, 10.0, 10.0))).unwrap();
    let key = words(&at_once).unwrap();
    assert_eq!(&key[..RRect::SIZE_IN_WORDS], &rect_key[..]);
}

#[test]
fn stroke_and_fill_rect() {
    let style = StrokeRec::stroke_and_fill(2.0).into();
    let shape = Shape::from_path_with_style(square(true), style);
    assert!(shape.as_rrect().is_some());

    let result = shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    let outline = rect(-1.0, -1.0, 12.0, 12.0);
    assert_eq!(result.as_rrect(), Some(RRect::from_rect(&outline)));
    assert!(result.style().is_simple_fill());
    assert_eq!(result.unstyled_key(), Shape::from_rect(&outline).unstyled_key());
}

#[test]
fn stroked_keys() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    let butt = Shape::from_rect_with_style(&r, StrokeRec::stroke(2.0).into());
    let square_cap = Shape::from_rect_with_style(&r, StrokeRec::stroke(2.0).with_line_cap(LineCap::Square).into());

    let a = butt.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    let b = square_cap.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(matches!(a.geometry(), Geometry::Path(_)));
    assert_eq!(a.unstyled_key_size(), Some(RRect::SIZE_IN_WORDS + 4));
    // Caps don't matter for rectangles.
    assert_eq!(a.unstyled_key(), b.unstyled_key());
    assert_eq!(&words(&a).unwrap()[..RRect::SIZE_IN_WORDS], &words(&butt).unwrap()[..]);

    // They do for open paths.
    let line = polyline(&[(0.0, 0.0), (10.0, 5.0)], false);
    let a = Shape::from_path_with_style(line.clone(), StrokeRec::stroke(2.0).into());
    let b = Shape::from_path_with_style(line, StrokeRec::stroke(2.0).with_line_cap(LineCap::Square).into());
    assert_ne!(
        a.apply_style(Apply::PathEffectAndStrokeRec, 1.0).unstyled_key(),
        b.apply_style(Apply::PathEffectAndStrokeRec, 1.0).unstyled_key()
    );

    // The scale is part of the key.
    assert_ne!(
        butt.apply_style(Apply::PathEffectAndStrokeRec, 1.0).unstyled_key(),
        butt.apply_style(Apply::PathEffectAndStrokeRec, 2.0).unstyled_key()
    );

    // The parent is left untouched.
    assert_eq!(words(&butt), words(&Shape::from_rect(&r)));
}

#[test]
fn non_dash_effects_are_not_cacheable() {
    let corner = Style::new(StrokeRec::stroke(1.0), Some(Arc::new(CornerEffect::new(2.0).unwrap())));
    let shape = Shape::from_path_with_style(triangle(), corner);
    assert!(shape.unstyled_key().is_some());

    let result = shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(matches!(result.geometry(), Geometry::Path(_)));
    assert_eq!(result.unstyled_key(), None);
}

#[test]
fn noop_style_application_discards_geometry() {
    // Nothing to apply: the result is empty rather than a copy of the shape.
    let filled = Shape::from_path(triangle());
    let result = filled.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(result.is_empty());
    assert!(result.style().is_simple_fill());
    assert_eq!(words(&result), Some(vec![EMPTY_KEY_TAG]));

    let hairline = Shape::from_rect_with_style(&rect(0.0, 0.0, 5.0, 5.0), Style::hairline());
    assert!(hairline.apply_style(Apply::PathEffectAndStrokeRec, 1.0).is_empty());

    // Same when only the path effect is requested and there is none. The
    // style is kept.
    let stroked = Shape::from_path_with_style(triangle(), StrokeRec::stroke(3.0).into());
    let result = stroked.apply_style(Apply::PathEffectOnly, 1.0);
    assert!(result.is_empty());
    assert_eq!(result.style().stroke_rec(), &StrokeRec::stroke(3.0));
}

#[test]
fn rejected_geometry_becomes_empty() {
    let style = Style::new(StrokeRec::stroke(2.0), Some(Arc::new(RejectEverything)));
    let shape = Shape::from_path_with_style(triangle(), style);
    for &apply in &[Apply::PathEffectOnly, Apply::PathEffectAndStrokeRec] {
        let result = shape.apply_style(apply, 1.0);
        assert!(result.is_empty());
        assert!(result.style().is_simple_fill());
    }

    // Dashes don't apply to fills.
    let dashed_fill = Shape::from_path_with_style(triangle(), Style::new(StrokeRec::fill(), dash()));
    assert!(dashed_fill.apply_style(Apply::PathEffectOnly, 1.0).is_empty());
}

#[test]
fn path_effect_only_keeps_the_stroke() {
    let shape = Shape::from_path_with_style(triangle(), Style::new(StrokeRec::stroke(2.0), dash()));
    let dashed = shape.apply_style(Apply::PathEffectOnly, 1.0);
    assert!(matches!(dashed.geometry(), Geometry::Path(_)));
    assert_eq!(dashed.style().stroke_rec().width(), 2.0);
    assert!(!dashed.style().has_path_effect());
    // Parent key, scale, phase and two intervals.
    assert_eq!(dashed.unstyled_key_size(), Some(1 + 4));

    // Hairline dashes stay hairlines.
    let shape = Shape::from_path_with_style(triangle(), Style::new(StrokeRec::hairline(), dash()));
    let dashed = shape.apply_style(Apply::PathEffectAndStrokeRec, 1.0);
    assert!(dashed.style().is_simple_hairline());
    assert_eq!(dashed.unstyled_key_size(), Some(1 + 4));
}
