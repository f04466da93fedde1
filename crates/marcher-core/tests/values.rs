//! Dynamic value tests: ownership modes, live-count accounting, the coercion table
//! and growable color arrays.

use std::rc::Rc;

use marcher_core::runtime::value::live_owned;
use marcher_core::types::arrays::{ColorImage, ColorRow};
use marcher_core::types::entity::Entity;
use marcher_core::types::vectors::{Color, M3d, V3d};
use marcher_core::{ErrorCode, Ownership, Runtime, TypeKey, Value};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn rt() -> Runtime {
    Runtime::standard().unwrap_or_else(|e| panic!("Runtime::standard failed: {e:?}"))
}

fn v3d(v: &Value<'_>) -> V3d {
    *v.downcast_ref::<V3d>().unwrap_or_else(|e| panic!("expected v3d: {e}"))
}

fn color(v: &Value<'_>) -> Color {
    *v.downcast_ref::<Color>().unwrap_or_else(|e| panic!("expected color: {e}"))
}

// ─── Ownership ───────────────────────────────────────────────────────────────

#[test]
fn created_values_are_owned_and_defaulted() {
    let rt = rt();
    let v = rt.types().create(TypeKey::of("v3d")).unwrap();
    assert_eq!(v.ownership(), Ownership::Owned);
    assert_eq!(v.type_name(), "v3d");
    assert_eq!(v.type_key(), TypeKey::of("v3d"));
    assert_eq!(v3d(&v), V3d::default());
}

#[test]
fn live_count_tracks_owned_payloads() {
    let base = live_owned();
    let a = Value::num(1.0);
    let b = Value::new(V3d::new(1.0, 2.0, 3.0));
    let c = b.clone();
    assert_eq!(live_owned(), base + 3);
    a.release();
    drop(b);
    assert_eq!(live_owned(), base + 1);
    c.release();
    assert_eq!(live_owned(), base);
}

#[test]
fn borrowed_and_shared_do_not_count() {
    let base = live_owned();
    let payload = V3d::new(4.0, 5.0, 6.0);
    let borrowed = Value::wrap_borrowed(&payload);
    let shared = Value::wrap_shared(Rc::new(Color::new(0.1, 0.2, 0.3)));
    assert_eq!(live_owned(), base);
    assert_eq!(borrowed.ownership(), Ownership::Borrowed);
    assert_eq!(shared.ownership(), Ownership::Shared);
    assert_eq!(v3d(&borrowed), payload);

    let copy = borrowed.into_owned();
    assert_eq!(copy.ownership(), Ownership::Owned);
    assert_eq!(live_owned(), base + 1);
    drop(copy);
    shared.release();
    assert_eq!(live_owned(), base);
}

#[test]
fn only_owned_values_are_mutable() {
    let mut owned = Value::new(V3d::default());
    owned.downcast_mut::<V3d>().unwrap().z = 9.0;
    assert_eq!(v3d(&owned).z, 9.0);

    let mut shared = Value::wrap_shared(Rc::new(V3d::default()));
    let err = shared.downcast_mut::<V3d>().unwrap_err();
    assert_eq!(err.code(), ErrorCode::V001);
}

#[test]
fn primitive_coercions() {
    assert_eq!(Value::int(3).to_number().unwrap(), 3.0);
    assert!(Value::num(0.5).to_bool().unwrap());
    assert!(!Value::bool(false).to_bool().unwrap());
    assert_eq!(Value::bool(true).to_number().unwrap(), 1.0);
    assert_eq!(Value::text("abc").to_text().unwrap(), "abc");
    assert_eq!(Value::num(2.5).to_text().unwrap(), "2.5");

    let err = Value::new(V3d::default()).to_number().unwrap_err();
    assert_eq!(err.code(), ErrorCode::V001);
    assert!(err.is_fatal());
    assert!(Value::text("1").to_number().is_err());
}

// ─── Coercion table ──────────────────────────────────────────────────────────

#[test]
fn vector_color_round_trip() {
    let rt = rt();
    let v = Value::new(V3d::new(1.0, 2.0, 3.0));
    let c = v.convert(rt.types(), TypeKey::of("color")).unwrap();
    assert_eq!(color(&c), Color::new(1.0, 2.0, 3.0));

    let back = c.convert(rt.types(), TypeKey::of("v3d")).unwrap();
    assert_eq!(v3d(&back), V3d::new(1.0, 2.0, 3.0));
}

#[test]
fn copy_convert_writes_into_existing_storage() {
    let rt = rt();
    let mut dst = rt.types().construct(TypeKey::of("color")).unwrap();
    rt.types().copy_convert(dst.as_mut(), &V3d::new(0.25, 0.5, 0.75)).unwrap();
    assert_eq!(dst.downcast_ref::<Color>(), Some(&Color::new(0.25, 0.5, 0.75)));

    rt.types().copy_convert(dst.as_mut(), &Color::new(1.0, 1.0, 1.0)).unwrap();
    assert_eq!(dst.downcast_ref::<Color>(), Some(&Color::new(1.0, 1.0, 1.0)));
}

#[test]
fn other_pairs_are_unsupported() {
    let rt = rt();
    let v = Value::new(V3d::new(1.0, 2.0, 3.0));
    for target in ["m3d", "v2d", "f64", "ray"] {
        let err = v.convert(rt.types(), TypeKey::of(target)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::V002, "{target}: {err}");
        assert!(err.is_fatal());
    }

    let m = Value::new(M3d::identity());
    let err = m.convert(rt.types(), TypeKey::of("color")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::V002);

    let same = m.convert(rt.types(), TypeKey::of("m3d")).unwrap();
    assert_eq!(same.downcast_ref::<M3d>().unwrap(), &M3d::identity());
}

// ─── Growable arrays ─────────────────────────────────────────────────────────

#[test]
fn image_resize_keeps_dimensions_consistent() {
    let fill = Color::new(0.1, 0.2, 0.3);
    let mut img = ColorImage::default();
    img.set_size_2d(4, 3, fill).unwrap();
    assert_eq!(img.len(), 12);
    assert_eq!(img.width() * img.height(), img.len());
    assert!(img.pixels().iter().all(|p| *p == fill));

    let fill2 = Color::new(1.0, 0.0, 0.0);
    img.set_size_2d(2, 2, fill2).unwrap();
    assert_eq!(img.len(), 4);
    assert_eq!(img.width() * img.height(), img.len());
    assert!(img.pixels().iter().all(|p| *p == fill2));
}

#[test]
fn image_overflowing_size_rejected() {
    let mut img = ColorImage::default();
    let err = img.set_size_2d(usize::MAX, 2, Color::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::C006);
    assert!(img.is_empty());
}

#[test]
fn array_elements_are_borrowed_views() {
    let base = live_owned();
    let mut row = ColorRow::default();
    row.set_size(3, Color::new(0.5, 0.5, 0.5)).unwrap();
    let e = row.element(1).unwrap();
    assert_eq!(e.ownership(), Ownership::Borrowed);
    assert_eq!(e.type_key(), ColorRow::ELEMENT);
    assert_eq!(ColorImage::ELEMENT, ColorRow::ELEMENT);
    assert_eq!(color(&e), Color::new(0.5, 0.5, 0.5));
    assert!(row.element(3).is_none());
    assert_eq!(live_owned(), base);
}

#[test]
fn values_display_their_text_form() {
    assert_eq!(Value::num(1.5).to_string(), "1.5");
    assert_eq!(Value::text("torus").to_string(), "torus");
    assert!(Value::new(V3d::new(1.0, 2.0, 3.0)).to_string().contains("V3d"));
    let e: &dyn Entity = &V3d::default();
    assert!(e.is::<V3d>());
}
