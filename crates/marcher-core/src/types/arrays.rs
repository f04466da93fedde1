//! Growable buffers of flat entities: a color row and a 2D color image.

use rayon::prelude::*;

use crate::error::{Result, RuntimeError};
use crate::runtime::value::Value;
use super::entity::{entity, Entity};
use super::key::TypeKey;
use super::vectors::Color;

// ─── ColorRow ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorRow {
    pub data: Vec<Color>,
}

entity!(ColorRow, "color_row");

impl ColorRow {
    pub const ELEMENT: TypeKey = TypeKey::of("color");

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Resize to `size` elements, every one set to `fill`. Prior contents are discarded.
    /// On failure the row is left unchanged.
    pub fn set_size(&mut self, size: usize, fill: Color) -> Result<()> {
        self.data = filled("set_size", size, fill)?;
        Ok(())
    }

    /// Zero-copy view of element `i`.
    pub fn element(&self, i: usize) -> Option<Value<'_>> {
        self.data.get(i).map(|c| Value::wrap_borrowed(c as &dyn Entity))
    }
}

// ─── ColorImage ───────────────────────────────────────────────────────────────

/// Row-major image; pixel (x, y) lives at `data[y * width + x]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorImage {
    width:  usize,
    height: usize,
    data:   Vec<Color>,
}

entity!(ColorImage, "color_image");

impl ColorImage {
    pub const ELEMENT: TypeKey = TypeKey::of("color");

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn len(&self)    -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    pub fn pixels(&self) -> &[Color] { &self.data }

    /// Resize to `width * height` pixels, every one set to `fill`.
    pub fn set_size_2d(&mut self, width: usize, height: usize, fill: Color) -> Result<()> {
        let size = width.checked_mul(height).ok_or_else(|| RuntimeError::invalid_argument(
            "set_size_2d",
            format!("{width} x {height} overflows the element count"),
        ))?;
        self.data = filled("set_size_2d", size, fill)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Returns false if (x, y) is outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, c: Color) -> bool {
        match self.index(x, y) {
            Some(i) => { self.data[i] = c; true }
            None => false,
        }
    }

    /// Zero-copy view of pixel `i` in row-major order.
    pub fn element(&self, i: usize) -> Option<Value<'_>> {
        self.data.get(i).map(|c| Value::wrap_borrowed(c as &dyn Entity))
    }

    /// Tone-map every pixel in place. Images with at least `parallel_min` pixels are
    /// processed on the rayon pool.
    pub fn saturate(&mut self, gamma: f64, parallel_min: usize) {
        if self.data.len() >= parallel_min {
            self.data.par_iter_mut().for_each(|c| *c = c.sat(gamma));
        } else {
            self.data.iter_mut().for_each(|c| *c = c.sat(gamma));
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

/// A fresh buffer of `size` copies of `fill`. Sizes past the address space and failed
/// allocations come back as errors instead of aborting.
fn filled(name: &str, size: usize, fill: Color) -> Result<Vec<Color>> {
    let addressable = size.checked_mul(size_of::<Color>()).is_some_and(|bytes| bytes <= isize::MAX as usize);
    if !addressable {
        return Err(RuntimeError::invalid_argument(name, format!("{size} elements exceed the addressable size")));
    }
    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|e| RuntimeError::invalid_argument(name, format!("cannot allocate {size} elements: {e}")))?;
    data.resize(size, fill);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_set_size_fills_every_slot() {
        let mut row = ColorRow::default();
        row.set_size(3, Color::new(0.1, 0.2, 0.3)).unwrap();
        row.set_size(5, Color::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(row.len(), 5);
        assert!(row.data.iter().all(|c| *c == Color::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn image_overflow_is_rejected() {
        let mut img = ColorImage::default();
        assert!(img.set_size_2d(usize::MAX, 2, Color::default()).is_err());
        assert_eq!(img.len(), 0);
    }

    #[test]
    fn unaddressable_sizes_leave_contents_alone() {
        let mut row = ColorRow::default();
        row.set_size(2, Color::new(0.5, 0.5, 0.5)).unwrap();
        let err = row.set_size(usize::MAX / 8, Color::default()).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::C006);
        assert_eq!(row.len(), 2);

        let mut img = ColorImage::default();
        img.set_size_2d(2, 2, Color::default()).unwrap();
        assert!(img.set_size_2d(1 << 60, 1, Color::default()).is_err());
        assert_eq!((img.width(), img.height(), img.len()), (2, 2, 4));
    }

    #[test]
    fn pixel_addressing_is_row_major() {
        let mut img = ColorImage::default();
        img.set_size_2d(3, 2, Color::default()).unwrap();
        assert!(img.set_pixel(2, 1, Color::new(1., 1., 1.)));
        assert!(!img.set_pixel(3, 0, Color::default()));
        assert_eq!(img.pixels()[5], Color::new(1., 1., 1.));
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn parallel_and_serial_saturate_agree() {
        let mut a = ColorImage::default();
        a.set_size_2d(64, 64, Color::new(2.0, 0.25, -1.0)).unwrap();
        let mut b = a.clone();
        a.saturate(0.5, 0);
        b.saturate(0.5, usize::MAX);
        assert_eq!(a, b);
        assert!(a.pixels().iter().all(|c| *c == Color::new(1.0, 0.5, 0.0)));
    }
}
