use sg_core::charset::{SymbolLut, SymbolTable};
use sg_core::color::Rgb;
use sg_core::config::DEFAULT_ALPHA_THRESHOLD;
use sg_core::frame::{Glyph, PixelBuffer};
use sg_core::stride::SampleStride;

use crate::result::ScanResult;

/// Classifie des échantillons de pixels en symboles, avec leur couleur.
///
/// Sans état mutable : un même `Quantizer` peut servir à autant de balayages
/// que nécessaire, chacun indépendant et idempotent.
///
/// # Example
/// ```
/// use sg_ascii::sampler::Quantizer;
/// let q = Quantizer::default();
/// assert_eq!(q.classify([255, 255, 255, 255]), Some('@'));
/// assert_eq!(q.classify([255, 255, 255, 128]), None);
/// ```
#[derive(Clone)]
pub struct Quantizer {
    lut: SymbolLut,
    alpha_threshold: u8,
}

impl Quantizer {
    /// Build a quantizer from a symbol table and an alpha threshold.
    #[must_use]
    pub fn new(table: &SymbolTable, alpha_threshold: u8) -> Self {
        Self {
            lut: SymbolLut::new(table),
            alpha_threshold,
        }
    }

    /// Symbol for one RGBA sample, `None` for blank.
    #[inline(always)]
    #[must_use]
    pub fn classify(&self, [r, g, b, a]: [u8; 4]) -> Option<char> {
        if a <= self.alpha_threshold {
            return None;
        }
        self.lut.map(Rgb::new(r, g, b).channel_sum())
    }

    /// Balaye `buffer` au pas `stride` et produit glyphes et lignes en une passe.
    ///
    /// Échantillonnage au coin haut-gauche de chaque case, sans interpolation.
    /// Les lignes et colonnes restantes ne sont prises que si elles tombent sur
    /// une coordonnée échantillonnée.
    ///
    /// # Example
    /// ```
    /// use sg_ascii::sampler::Quantizer;
    /// use sg_core::frame::FrameBuffer;
    /// use sg_core::stride::SampleStride;
    ///
    /// let fb = FrameBuffer::filled(4, 4, [255, 255, 255, 255]);
    /// let result = Quantizer::default().scan(&fb.view().unwrap(), SampleStride::ONE);
    /// assert_eq!(result.text(), "@@@@\n@@@@\n@@@@\n@@@@");
    /// assert_eq!(result.glyphs().len(), 16);
    /// ```
    #[must_use]
    pub fn scan(&self, buffer: &PixelBuffer<'_>, stride: SampleStride) -> ScanResult {
        let step = stride.get() as usize;
        let columns = stride.samples(buffer.width());
        let rows_expected = stride.samples(buffer.height()) as usize;

        let mut glyphs = Vec::new();
        let mut rows = Vec::with_capacity(rows_expected);

        for y in (0..buffer.height()).step_by(step) {
            let mut row = String::with_capacity(columns as usize);
            for x in (0..buffer.width()).step_by(step) {
                let rgba = buffer.pixel(x, y);
                match self.classify(rgba) {
                    Some(symbol) => {
                        glyphs.push(Glyph {
                            x,
                            y,
                            symbol,
                            color: Rgb::new(rgba[0], rgba[1], rgba[2]),
                        });
                        row.push(symbol);
                    }
                    None => row.push(' '),
                }
            }
            rows.push(row);
        }

        log::debug!(
            "scan {}x{} stride {stride}: {} cells, {} glyphs",
            buffer.width(),
            buffer.height(),
            u64::from(columns) * rows.len() as u64,
            glyphs.len()
        );

        ScanResult::from_scan(glyphs, rows, stride, columns)
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(&SymbolTable::default(), DEFAULT_ALPHA_THRESHOLD)
    }
}

/// Balaye avec la table et le seuil alpha par défaut.
///
/// # Example
/// ```
/// use sg_ascii::sampler::scan;
/// use sg_core::frame::FrameBuffer;
/// use sg_core::stride::SampleStride;
///
/// let fb = FrameBuffer::new(4, 4);
/// let result = scan(&fb.view().unwrap(), SampleStride::ONE);
/// assert!(result.glyphs().is_empty());
/// ```
#[must_use]
pub fn scan(buffer: &PixelBuffer<'_>, stride: SampleStride) -> ScanResult {
    Quantizer::default().scan(buffer, stride)
}

#[cfg(test)]
mod tests {
    use sg_core::frame::FrameBuffer;

    use super::*;

    fn gray(v: u8) -> [u8; 4] {
        [v, v, v, 255]
    }

    fn stride(step: u32) -> SampleStride {
        SampleStride::new(step).unwrap()
    }

    #[test]
    fn alpha_threshold_is_inclusive() {
        let q = Quantizer::default();
        assert_eq!(q.classify([255, 255, 255, 128]), None);
        assert_eq!(q.classify([255, 255, 255, 129]), Some('@'));
    }

    #[test]
    fn black_is_blank() {
        assert_eq!(Quantizer::default().classify(gray(0)), None);
    }

    #[test]
    fn two_by_two_mixed() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(0, 0, gray(255));
        fb.set_pixel(1, 0, gray(30));
        fb.set_pixel(0, 1, gray(10));
        fb.set_pixel(1, 1, gray(150));
        let result = scan(&fb.view().unwrap(), SampleStride::ONE);
        // Le scénario 2×2 documenté donne '%' pour 150, mais la table met 150
        // dans [140, 160), soit '_'. La table fait foi.
        assert_eq!(result.rows(), &["@W".to_string(), " _".to_string()]);
        let symbols: Vec<char> = result.glyphs().iter().map(|g| g.symbol).collect();
        assert_eq!(symbols, vec!['@', 'W', '_']);
        assert_eq!((result.glyphs()[2].x, result.glyphs()[2].y), (1, 1));
    }

    #[test]
    fn glyph_color_is_exact_sample() {
        let fb = FrameBuffer::filled(1, 1, [240, 200, 10, 255]);
        let result = scan(&fb.view().unwrap(), SampleStride::ONE);
        assert_eq!(result.glyphs()[0].color, Rgb::new(240, 200, 10));
        // (240 + 200 + 10) / 3 = 150
        assert_eq!(result.glyphs()[0].symbol, '_');
    }

    #[test]
    fn stride_samples_top_left_of_each_cell() {
        let mut fb = FrameBuffer::new(5, 5);
        fb.set_pixel(0, 0, gray(255));
        fb.set_pixel(1, 1, gray(255));
        fb.set_pixel(4, 4, gray(255));
        let result = scan(&fb.view().unwrap(), stride(2));
        assert_eq!(result.columns(), 3);
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.text(), "@  \n   \n  @");
        let positions: Vec<(u32, u32)> = result.glyphs().iter().map(|g| (g.x, g.y)).collect();
        assert_eq!(positions, vec![(0, 0), (4, 4)]);
    }

    #[test]
    fn oversized_stride_is_single_sample() {
        let fb = FrameBuffer::filled(7, 3, gray(200));
        let result = scan(&fb.view().unwrap(), stride(50));
        assert_eq!(result.cell_count(), 1);
        assert_eq!(result.text(), "#");
    }

    #[test]
    fn custom_alpha_threshold() {
        let q = Quantizer::new(&SymbolTable::default(), 0);
        assert_eq!(q.classify([255, 255, 255, 1]), Some('@'));
        assert_eq!(q.classify([255, 255, 255, 0]), None);
    }
}
