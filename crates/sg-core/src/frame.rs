use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::CoreError;

/// Buffer de pixels possédé, tel que produit par le décodage d'une image.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use sg_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer transparent noir aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Crée un buffer dont chaque pixel vaut `rgba`.
    ///
    /// # Example
    /// ```
    /// use sg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, [255, 0, 0, 255]);
    /// assert_eq!(&fb.data[4..8], &[255, 0, 0, 255]);
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            data: rgba.repeat(width as usize * height as usize),
            width,
            height,
        }
    }

    /// Borrow the buffer as a validated, read-only `PixelBuffer`.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or the data length is wrong.
    ///
    /// # Example
    /// ```
    /// use sg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(3, 2);
    /// let view = fb.view().unwrap();
    /// assert_eq!((view.width(), view.height()), (3, 2));
    /// ```
    pub fn view(&self) -> Result<PixelBuffer<'_>, CoreError> {
        PixelBuffer::new(&self.data, self.width, self.height)
    }

    /// Write pixel (x, y). Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }
}

/// Vue immuable sur des pixels RGBA8 row-major. Jamais modifiée par le pipeline.
///
/// Construite uniquement via [`PixelBuffer::new`], qui garantit
/// `width > 0`, `height > 0` et `data.len() == width * height * 4`.
///
/// # Example
/// ```
/// use sg_core::frame::PixelBuffer;
/// let data = [10u8, 20, 30, 255];
/// let view = PixelBuffer::new(&data, 1, 1).unwrap();
/// assert_eq!(view.pixel(0, 0), [10, 20, 30, 255]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Validate and wrap raw RGBA bytes.
    ///
    /// # Errors
    /// `CoreError::InvalidDimensions` if a dimension is zero,
    /// `CoreError::BufferSize` if `data` is not exactly `width * height * 4` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Accès au pixel (x, y) → [r, g, b, a].
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// Un échantillon classé : position source, symbole, couleur exacte du pixel.
///
/// # Example
/// ```
/// use sg_core::frame::Glyph;
/// use sg_core::color::Rgb;
/// let g = Glyph { x: 4, y: 8, symbol: '@', color: Rgb::new(255, 255, 255) };
/// assert_eq!(g.color.to_string(), "rgb(255,255,255)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Glyph {
    /// Source pixel column.
    pub x: u32,
    /// Source pixel row.
    pub y: u32,
    /// Symbol to paint. Never blank.
    pub symbol: char,
    /// Fill color, the sampled RGB.
    pub color: Rgb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_zero_dimensions() {
        let err = PixelBuffer::new(&[], 0, 4).unwrap_err();
        assert_eq!(err, CoreError::InvalidDimensions { width: 0, height: 4 });
    }

    #[test]
    fn view_rejects_wrong_length() {
        let data = [0u8; 15];
        let err = PixelBuffer::new(&data, 2, 2).unwrap_err();
        assert_eq!(
            err,
            CoreError::BufferSize {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn pixel_is_row_major() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set_pixel(2, 1, [1, 2, 3, 4]);
        let view = fb.view().unwrap();
        assert_eq!(view.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(&fb.data[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn set_pixel_out_of_bounds_is_ignored() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.set_pixel(5, 5, [9, 9, 9, 9]);
        assert_eq!(fb.data, vec![0, 0, 0, 0]);
    }
}
