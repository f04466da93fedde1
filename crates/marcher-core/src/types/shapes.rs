//! Scene objects as plain data. The distance-field engine that consumes them lives
//! outside this crate; here they only carry the parameters a script set up.

use crate::error::{Result, RuntimeError};
use super::entity::entity;
use super::vectors::{M3d, V3d};

/// Placement shared by every scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pos:   V3d,
    pub rot:   M3d,
    pub scale: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self { pos: V3d::default(), rot: M3d::identity(), scale: 1.0 }
    }
}

/// Bounding sphere used to skip distance evaluation far from an object.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Envelope {
    pub pos:    V3d,
    pub radius: f64,
}

// ─── Plane ────────────────────────────────────────────────────────────────────

/// The z = 0 plane in object space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plane {
    pub pose: Pose,
}

entity!(Plane, "plane");

// ─── Sphere ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub pose:     Pose,
    pub radius:   f64,
    pub envelope: Option<Envelope>,
}

impl Default for Sphere {
    fn default() -> Self {
        Self { pose: Pose::default(), radius: 1.0, envelope: None }
    }
}

entity!(Sphere, "sphere");

impl Sphere {
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.envelope = Some(Envelope { pos: self.pose.pos, radius });
    }
}

// ─── Squaroid ─────────────────────────────────────────────────────────────────

/// Quadric surface `a·x² + b·y² + c·z² = r`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Squaroid {
    pub pose: Pose,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r: f64,
}

entity!(Squaroid, "squaroid");

impl Squaroid {
    pub fn new(a: f64, b: f64, c: f64, r: f64) -> Self {
        Self { pose: Pose::default(), a, b, c, r }
    }

    /// Infinite cylinder along z with elliptic cross-section.
    pub fn cylinder(rx: f64, ry: f64) -> Result<Self> {
        Ok(Self::new(inv_sqr("create_cylinder", rx)?, inv_sqr("create_cylinder", ry)?, 0.0, 1.0))
    }

    pub fn ellipsoid(rx: f64, ry: f64, rz: f64) -> Result<Self> {
        let (a, b, c) = inv_sqr3("create_ellipsoid", rx, ry, rz)?;
        Ok(Self::new(a, b, c, 1.0))
    }

    /// Hyperboloid of one sheet, open along z.
    pub fn hyperboloid1(rx: f64, ry: f64, rz: f64) -> Result<Self> {
        let (a, b, c) = inv_sqr3("create_hyperboloid1", rx, ry, rz)?;
        Ok(Self::new(a, b, -c, 1.0))
    }

    /// Hyperboloid of two sheets, separated along z.
    pub fn hyperboloid2(rx: f64, ry: f64, rz: f64) -> Result<Self> {
        let (a, b, c) = inv_sqr3("create_hyperboloid2", rx, ry, rz)?;
        Ok(Self::new(a, b, -c, -1.0))
    }

    /// Double cone along z with its apex at the origin.
    pub fn cone(rx: f64, ry: f64, rz: f64) -> Result<Self> {
        let (a, b, c) = inv_sqr3("create_cone", rx, ry, rz)?;
        Ok(Self::new(a, b, -c, 0.0))
    }
}

fn inv_sqr(name: &str, radius: f64) -> Result<f64> {
    if radius == 0.0 || !radius.is_finite() {
        return Err(RuntimeError::invalid_argument(name, format!("radius must be finite and non-zero, got {radius}")));
    }
    Ok(1.0 / (radius * radius))
}

fn inv_sqr3(name: &str, rx: f64, ry: f64, rz: f64) -> Result<(f64, f64, f64)> {
    Ok((inv_sqr(name, rx)?, inv_sqr(name, ry)?, inv_sqr(name, rz)?))
}

// ─── Torus ────────────────────────────────────────────────────────────────────

/// Torus in the xy plane. The unscaled torus has a major radius of 1 and a tube
/// radius of `ex_radius`; `pose.scale` brings it to world size.
#[derive(Debug, Clone, PartialEq)]
pub struct Torus {
    pub pose:      Pose,
    pub ex_radius: f64,
    pub envelope:  Option<Envelope>,
}

impl Default for Torus {
    fn default() -> Self {
        Self { pose: Pose::default(), ex_radius: 0.5, envelope: None }
    }
}

entity!(Torus, "torus");

impl Torus {
    /// Major radius `radius1`, tube radius `radius2`. The envelope encloses the whole
    /// torus, widened by `margin`.
    pub fn with_radii(radius1: f64, radius2: f64, margin: f64) -> Result<Self> {
        if radius1 == 0.0 || !radius1.is_finite() {
            return Err(RuntimeError::invalid_argument(
                "create_torus",
                format!("radius1 must be finite and non-zero, got {radius1}"),
            ));
        }
        let pose = Pose { scale: radius1, ..Pose::default() };
        Ok(Self {
            pose,
            ex_radius: radius2 / radius1,
            envelope: Some(Envelope { pos: pose.pos, radius: (radius1 + radius2) * margin }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadric_coefficients() {
        let e = Squaroid::ellipsoid(1.0, 2.0, 4.0).unwrap();
        assert_eq!((e.a, e.b, e.c, e.r), (1.0, 0.25, 0.0625, 1.0));

        let h = Squaroid::hyperboloid2(1.0, 1.0, 2.0).unwrap();
        assert_eq!((h.c, h.r), (-0.25, -1.0));

        let c = Squaroid::cylinder(2.0, 2.0).unwrap();
        assert_eq!((c.c, c.r), (0.0, 1.0));
    }

    #[test]
    fn zero_radius_rejected() {
        assert!(Squaroid::cone(1.0, 0.0, 1.0).is_err());
        assert!(Torus::with_radii(0.0, 1.0, 1.01).is_err());
    }

    #[test]
    fn torus_scale_and_envelope() {
        let t = Torus::with_radii(2.0, 0.5, 1.01).unwrap();
        assert_eq!(t.pose.scale, 2.0);
        assert_eq!(t.ex_radius, 0.25);
        let env = t.envelope.unwrap();
        assert!((env.radius - 2.525).abs() < 1e-12);
    }
}
