use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, point};
use anyhow::{Context, Result};
use rayon::prelude::*;
use sg_core::color::Rgb;
use sg_core::frame::FrameBuffer;
use sg_core::stride::SampleStride;
use sg_core::traits::Surface;

/// Plafond de pixels de l'image exportée ; au-delà, l'agrandissement est réduit.
pub const MAX_RASTER_PIXELS: u64 = 64 * 1024 * 1024;

/// Surface raster RGBA : peint les glyphes d'un balayage dans une image.
///
/// L'image de sortie fait `source × scale`, où `scale` garantit une case de
/// glyphe d'au moins `min_font_px` pixels : chaque glyphe occupe la case
/// `stride × scale` ancrée en `(x × scale, y × scale)`.
///
/// Sans police, chaque glyphe est peint comme un bloc plein de sa couleur.
pub struct Rasterizer {
    font: Option<FontVec>,
    source_size: (u32, u32),
    background: Rgb,
    min_font_px: f32,
    scale: u32,
    slot: u32,
    fill: Rgb,
    canvas: FrameBuffer,
    /// Masques alpha par (symbole, taille de case), `slot × slot` octets.
    glyph_cache: HashMap<(char, u32), Vec<u8>>,
}

impl Rasterizer {
    /// Create a surface drawing glyph outlines from a TTF/OTF font.
    ///
    /// # Errors
    /// Returns an error if the font data is invalid.
    pub fn with_font(
        font_data: Vec<u8>,
        source_size: (u32, u32),
        background: Rgb,
        min_font_px: f32,
    ) -> Result<Self> {
        let font = FontVec::try_from_vec(font_data).context("invalid font data")?;
        let mut r = Self::blocks(source_size, background, min_font_px);
        r.font = Some(font);
        Ok(r)
    }

    /// Load the font from disk, see [`Rasterizer::with_font`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a font.
    pub fn from_font_file(
        path: &Path,
        source_size: (u32, u32),
        background: Rgb,
        min_font_px: f32,
    ) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("cannot read font {}", path.display()))?;
        Self::with_font(data, source_size, background, min_font_px)
    }

    /// Create a surface painting each glyph as a solid block.
    ///
    /// # Example
    /// ```
    /// use sg_core::color::Rgb;
    /// use sg_core::stride::SampleStride;
    /// use sg_core::traits::Surface;
    /// use sg_export::rasterizer::Rasterizer;
    ///
    /// let mut r = Rasterizer::blocks((4, 4), Rgb::BLACK, 1.0);
    /// r.clear(SampleStride::new(2).unwrap());
    /// r.set_fill(Rgb::new(255, 0, 0));
    /// r.paint('@', 2, 2);
    /// assert_eq!(r.frame().view().unwrap().pixel(3, 3), [255, 0, 0, 255]);
    /// assert_eq!(r.frame().view().unwrap().pixel(0, 0), [0, 0, 0, 255]);
    /// ```
    #[must_use]
    pub fn blocks(source_size: (u32, u32), background: Rgb, min_font_px: f32) -> Self {
        Self {
            font: None,
            source_size,
            background,
            min_font_px: min_font_px.max(1.0),
            scale: 1,
            slot: 1,
            fill: Rgb::BLACK,
            canvas: FrameBuffer::new(source_size.0.max(1), source_size.1.max(1)),
            glyph_cache: HashMap::new(),
        }
    }

    /// Scale factor keeping the glyph slot at or above `min_font_px`,
    /// lowered if needed so the output stays within [`MAX_RASTER_PIXELS`].
    #[must_use]
    pub fn scale_for_stride(&self, stride: SampleStride) -> u32 {
        let wanted = scale_for(stride, self.min_font_px);
        let limit = max_scale(self.source_size);
        if wanted > limit {
            log::warn!(
                "raster scale {wanted} would exceed {MAX_RASTER_PIXELS} pixels, using {limit}"
            );
        }
        wanted.min(limit)
    }

    /// Painted image.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.canvas
    }

    /// Save the painted image as PNG.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let img = image::RgbaImage::from_raw(
            self.canvas.width,
            self.canvas.height,
            self.canvas.data.clone(),
        )
        .context("raster buffer does not match its dimensions")?;
        img.save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("cannot write {}", path.display()))?;
        log::info!(
            "raster exported to {} ({}x{})",
            path.display(),
            self.canvas.width,
            self.canvas.height
        );
        Ok(())
    }

    fn ensure_mask(&mut self, symbol: char) {
        let slot = self.slot;
        if let Some(font) = &self.font {
            self.glyph_cache
                .entry((symbol, slot))
                .or_insert_with(|| rasterize_glyph(font, symbol, slot));
        }
    }
}

/// Facteur d'agrandissement pour qu'une case `stride` fasse au moins `min_font_px`.
///
/// # Example
/// ```
/// use sg_core::stride::SampleStride;
/// use sg_export::rasterizer::scale_for;
/// assert_eq!(scale_for(SampleStride::new(2).unwrap(), 8.0), 4);
/// assert_eq!(scale_for(SampleStride::new(12).unwrap(), 8.0), 1);
/// ```
#[must_use]
pub fn scale_for(stride: SampleStride, min_font_px: f32) -> u32 {
    let step = stride.get() as f32;
    if step >= min_font_px {
        1
    } else {
        (min_font_px / step).ceil().max(1.0) as u32
    }
}

/// Plus grand facteur tel que `source × facteur` tienne dans [`MAX_RASTER_PIXELS`], au moins 1.
fn max_scale((width, height): (u32, u32)) -> u32 {
    let area = u64::from(width.max(1)) * u64::from(height.max(1));
    let limit = (MAX_RASTER_PIXELS as f64 / area as f64).sqrt().floor() as u64;
    limit.clamp(1, u64::from(u32::MAX)) as u32
}

/// Alpha mask `slot × slot` of one symbol, centred horizontally.
fn rasterize_glyph(font: &FontVec, symbol: char, slot: u32) -> Vec<u8> {
    let mut buffer = vec![0u8; slot as usize * slot as usize];
    let gid = font.glyph_id(symbol);
    // glyph_id 0 = .notdef : pas de boîte « ? » dans l'export.
    if gid.0 == 0 {
        return buffer;
    }

    let scale = PxScale::from(slot as f32);
    let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
    let advance = font.h_advance_unscaled(gid) * scale.x / font.height_unscaled();
    let x_off = ((slot as f32 - advance) / 2.0).max(0.0);
    let glyph = gid.with_scale_and_position(scale, point(x_off, ascent_px));

    if let Some(outline) = font.outline_glyph(glyph) {
        let bounds = outline.px_bounds();
        #[allow(clippy::cast_possible_wrap)]
        outline.draw(|x, y, v| {
            let px = x as i32 + bounds.min.x as i32;
            let py = y as i32 + bounds.min.y as i32;
            if px >= 0 && py >= 0 && (px as u32) < slot && (py as u32) < slot {
                buffer[py as usize * slot as usize + px as usize] = (v * 255.0).round() as u8;
            }
        });
    }
    buffer
}

impl Surface for Rasterizer {
    fn clear(&mut self, stride: SampleStride) {
        self.scale = self.scale_for_stride(stride);
        let width = self.source_size.0.max(1).saturating_mul(self.scale);
        let height = self.source_size.1.max(1).saturating_mul(self.scale);
        // Une case plus grande que l'image serait de toute façon rognée.
        self.slot = stride.get().saturating_mul(self.scale).min(width.min(height));
        if self.canvas.width != width || self.canvas.height != height {
            self.canvas = FrameBuffer::new(width, height);
        }
        let bg = [self.background.r, self.background.g, self.background.b, 255];
        self.canvas
            .data
            .par_chunks_exact_mut(4)
            .for_each(|px| px.copy_from_slice(&bg));
    }

    fn set_fill(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn paint(&mut self, symbol: char, x: u32, y: u32) {
        let (Some(ox), Some(oy)) = (x.checked_mul(self.scale), y.checked_mul(self.scale)) else {
            return;
        };
        let (cw, ch) = (self.canvas.width, self.canvas.height);
        if ox >= cw || oy >= ch {
            return;
        }
        let slot = self.slot;
        let fill = self.fill;
        let w = slot.min(cw - ox) as usize;
        let h = slot.min(ch - oy) as usize;
        let (ox, oy, cw, slot_len) = (ox as usize, oy as usize, cw as usize, slot as usize);

        self.ensure_mask(symbol);
        let mask = self.glyph_cache.get(&(symbol, slot));
        let data = &mut self.canvas.data;
        for dy in 0..h {
            for dx in 0..w {
                let alpha = match mask {
                    Some(m) => f32::from(m[dy * slot_len + dx]) / 255.0,
                    None => 1.0,
                };
                if alpha <= 0.0 {
                    continue;
                }
                let idx = ((oy + dy) * cw + ox + dx) * 4;
                let px = &mut data[idx..idx + 4];
                let under = Rgb::new(px[0], px[1], px[2]);
                let out = fill.blend_over(under, alpha);
                px.copy_from_slice(&[out.r, out.g, out.b, 255]);
            }
        }
    }
}
