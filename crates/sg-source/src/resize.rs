use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};
use sg_core::frame::FrameBuffer;

/// Resizer réutilisable wrappant fast_image_resize.
///
/// # Example
/// ```
/// use sg_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (fast_image_resize wants `&mut` on it).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if the resize operation fails.
    ///
    /// # Example
    /// ```
    /// use sg_source::resize::Resizer;
    /// use sg_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let src = FrameBuffer::new(100, 100);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("invalid source dimensions")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("resize failed")?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dimensions after shrinking `(width, height)` to fit in `max_w × max_h`.
///
/// Aspect ratio is kept, images are never enlarged, and each side stays ≥ 1.
///
/// # Example
/// ```
/// use sg_source::resize::fitted_size;
/// assert_eq!(fitted_size(1600, 1200, 800, 600), (800, 600));
/// assert_eq!(fitted_size(1000, 200, 800, 600), (800, 160));
/// assert_eq!(fitted_size(320, 240, 800, 600), (320, 240));
/// ```
#[must_use]
pub fn fitted_size(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = (f64::from(max_w) / f64::from(width)).min(f64::from(max_h) / f64::from(height));
    let w = ((f64::from(width) * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((f64::from(height) * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Réduit une image pour tenir dans la taille d'affichage maximale.
///
/// Retourne une copie inchangée si l'image tient déjà.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use sg_source::resize::fit_within;
/// use sg_core::frame::FrameBuffer;
/// let src = FrameBuffer::new(1600, 400);
/// let dst = fit_within(&src, 800, 600).unwrap();
/// assert_eq!((dst.width, dst.height), (800, 200));
/// ```
pub fn fit_within(src: &FrameBuffer, max_w: u32, max_h: u32) -> Result<FrameBuffer> {
    let (width, height) = fitted_size(src.width, src.height, max_w, max_h);
    if (width, height) == (src.width, src.height) {
        return Ok(src.clone());
    }
    log::info!(
        "fitting {}x{} into {}x{}",
        src.width,
        src.height,
        width,
        height
    );
    let mut dst = FrameBuffer::new(width, height);
    Resizer::new().resize_into(src, &mut dst)?;
    Ok(dst)
}
