//! Flat numeric entities: vectors, the 3×3 matrix, rays, and colors.
//! Matrices are stored as three row vectors.

use crate::error::{Result, RuntimeError};
use super::entity::{entity, Entity, FlatEntity};

// ─── V2d ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct V2d {
    pub x: f64,
    pub y: f64,
}

impl FlatEntity for V2d {
    const SCHEMA: &'static str = "v2d = { f64 x; f64 y; }";
    fn to_slots(&self) -> Vec<f64> { vec![self.x, self.y] }
    fn from_slots(s: &[f64]) -> Self { Self { x: s[0], y: s[1] } }
}

entity!(V2d, "v2d", flat);

// ─── V3d ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct V3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl V3d {
    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    pub fn dot(self, o: V3d) -> f64 { self.x * o.x + self.y * o.y + self.z * o.z }
}

impl FlatEntity for V3d {
    const SCHEMA: &'static str = "v3d = { f64 x; f64 y; f64 z; }";
    fn to_slots(&self) -> Vec<f64> { vec![self.x, self.y, self.z] }
    fn from_slots(s: &[f64]) -> Self { Self::new(s[0], s[1], s[2]) }
}

entity!(V3d, "v3d", flat);

// ─── M3d ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct M3d {
    pub x: V3d,
    pub y: V3d,
    pub z: V3d,
}

impl M3d {
    pub const fn identity() -> Self {
        Self {
            x: V3d::new(1., 0., 0.),
            y: V3d::new(0., 1., 0.),
            z: V3d::new(0., 0., 1.),
        }
    }

    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: V3d::new(1., 0., 0.),
            y: V3d::new(0., c, -s),
            z: V3d::new(0., s,  c),
        }
    }

    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: V3d::new( c, 0., s),
            y: V3d::new(0., 1., 0.),
            z: V3d::new(-s, 0., c),
        }
    }

    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: V3d::new(c, -s, 0.),
            y: V3d::new(s,  c, 0.),
            z: V3d::new(0., 0., 1.),
        }
    }

    pub fn mul_vec(&self, v: V3d) -> V3d {
        V3d::new(self.x.dot(v), self.y.dot(v), self.z.dot(v))
    }
}

impl FlatEntity for M3d {
    const SCHEMA: &'static str = "m3d = { v3d x; v3d y; v3d z; }";
    fn to_slots(&self) -> Vec<f64> {
        [self.x, self.y, self.z].iter().flat_map(|r| r.to_slots()).collect()
    }
    fn from_slots(s: &[f64]) -> Self {
        Self {
            x: V3d::from_slots(&s[0..3]),
            y: V3d::from_slots(&s[3..6]),
            z: V3d::from_slots(&s[6..9]),
        }
    }
}

entity!(M3d, "m3d", flat);

// ─── Ray / RayCone ────────────────────────────────────────────────────────────

/// Origin `p` and direction `d`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ray {
    pub p: V3d,
    pub d: V3d,
}

impl FlatEntity for Ray {
    const SCHEMA: &'static str = "ray = { v3d p; v3d d; }";
    fn to_slots(&self) -> Vec<f64> {
        let mut s = self.p.to_slots();
        s.extend(self.d.to_slots());
        s
    }
    fn from_slots(s: &[f64]) -> Self {
        Self { p: V3d::from_slots(&s[0..3]), d: V3d::from_slots(&s[3..6]) }
    }
}

entity!(Ray, "ray", flat);

/// A ray widened into a cone; `cos_rs` is the cosine of the half opening angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RayCone {
    pub ray:    Ray,
    pub cos_rs: f64,
}

impl FlatEntity for RayCone {
    const SCHEMA: &'static str = "ray_cone = { ray ray; f64 cos_rs; }";
    fn to_slots(&self) -> Vec<f64> {
        let mut s = self.ray.to_slots();
        s.push(self.cos_rs);
        s
    }
    fn from_slots(s: &[f64]) -> Self {
        Self { ray: Ray::from_slots(&s[0..6]), cos_rs: s[6] }
    }
}

entity!(RayCone, "ray_cone", flat);

// ─── Color ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self { Self { r, g, b } }

    /// Tone-map one color: clamp each channel to [0, 1], then apply `gamma`.
    pub fn sat(self, gamma: f64) -> Self {
        let f = |c: f64| c.clamp(0.0, 1.0).powf(gamma);
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl FlatEntity for Color {
    /// Same slot layout as `v3d`; schema field paths are `x`, `y`, `z` for r, g, b.
    const SCHEMA: &'static str = "color = v3d";
    fn to_slots(&self) -> Vec<f64> { vec![self.r, self.g, self.b] }
    fn from_slots(s: &[f64]) -> Self { Self::new(s[0], s[1], s[2]) }
}

entity!(Color, "color", flat);

impl From<V3d> for Color {
    fn from(v: V3d) -> Self { Self::new(v.x, v.y, v.z) }
}

impl From<Color> for V3d {
    fn from(c: Color) -> Self { Self::new(c.r, c.g, c.b) }
}

// ─── Coercion table ───────────────────────────────────────────────────────────

/// `copy_typed` for `color`: accepts `color` and `v3d`.
pub(crate) fn color_copy_typed(dst: &mut dyn Entity, src: &dyn Entity) -> Result<()> {
    let dst_name = dst.type_name();
    let Some(out) = dst.downcast_mut::<Color>() else {
        return Err(RuntimeError::type_mismatch("color", dst_name));
    };
    if let Some(c) = src.downcast_ref::<Color>() {
        *out = *c;
    } else if let Some(v) = src.downcast_ref::<V3d>() {
        *out = Color::from(*v);
    } else {
        return Err(unsupported(src, "color"));
    }
    Ok(())
}

/// `copy_typed` for `v3d`: accepts `v3d` and `color`.
pub(crate) fn v3d_copy_typed(dst: &mut dyn Entity, src: &dyn Entity) -> Result<()> {
    let dst_name = dst.type_name();
    let Some(out) = dst.downcast_mut::<V3d>() else {
        return Err(RuntimeError::type_mismatch("v3d", dst_name));
    };
    if let Some(v) = src.downcast_ref::<V3d>() {
        *out = *v;
    } else if let Some(c) = src.downcast_ref::<Color>() {
        *out = V3d::from(*c);
    } else {
        return Err(unsupported(src, "v3d"));
    }
    Ok(())
}

fn unsupported(src: &dyn Entity, to: &str) -> RuntimeError {
    RuntimeError::UnsupportedConversion { from: src.type_name().to_string(), to: to.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: V3d, b: V3d) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
    }

    #[test]
    fn rotations_are_right_handed() {
        let q = std::f64::consts::FRAC_PI_2;
        assert!(close(M3d::rot_z(q).mul_vec(V3d::new(1., 0., 0.)), V3d::new(0., 1., 0.)));
        assert!(close(M3d::rot_x(q).mul_vec(V3d::new(0., 1., 0.)), V3d::new(0., 0., 1.)));
        assert!(close(M3d::rot_y(q).mul_vec(V3d::new(0., 0., 1.)), V3d::new(1., 0., 0.)));
    }

    #[test]
    fn slots_follow_schema_order() {
        let r = RayCone { ray: Ray { p: V3d::new(1., 2., 3.), d: V3d::new(4., 5., 6.) }, cos_rs: 7. };
        assert_eq!(r.to_slots(), vec![1., 2., 3., 4., 5., 6., 7.]);
        assert_eq!(RayCone::from_slots(&r.to_slots()), r);
        assert_eq!(M3d::identity().to_slots(), vec![1., 0., 0., 0., 1., 0., 0., 0., 1.]);
    }

    #[test]
    fn sat_clamps_then_applies_gamma() {
        let c = Color::new(-0.5, 0.25, 4.0).sat(0.5);
        assert_eq!(c, Color::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn set_slots_rejects_wrong_width() {
        let mut v = V3d::default();
        assert!(!v.set_slots(&[1., 2.]));
        assert!(v.set_slots(&[1., 2., 3.]));
        assert_eq!(v, V3d::new(1., 2., 3.));
    }
}
