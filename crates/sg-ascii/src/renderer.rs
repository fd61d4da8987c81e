use sg_core::config::ScanConfig;
use sg_core::frame::{Glyph, PixelBuffer};
use sg_core::stride::SampleStride;
use sg_core::traits::Surface;

use crate::result::ScanResult;
use crate::sampler::Quantizer;

/// Sortie double d'un seul balayage : glyphes à peindre, texte à exporter.
///
/// Les deux chemins lisent le même `ScanResult` ; il n'existe pas de
/// balayage « aperçu » distinct d'un balayage « export ».
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    scan: ScanResult,
}

impl Rendered {
    /// Glyphs for the draw path, in scan order.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        self.scan.glyphs()
    }

    /// Export text, rows joined by `\n`, verbatim.
    #[must_use]
    pub fn text(&self) -> String {
        export(&self.scan)
    }

    /// The underlying scan.
    #[must_use]
    pub fn scan(&self) -> &ScanResult {
        &self.scan
    }

    /// Paint the glyphs on `surface`.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        draw(&self.scan, surface);
    }
}

/// Compositor du double rendu : délègue entièrement au `Quantizer`.
///
/// # Example
/// ```
/// use sg_ascii::renderer::Renderer;
/// use sg_core::frame::FrameBuffer;
/// use sg_core::stride::SampleStride;
///
/// let fb = FrameBuffer::filled(4, 4, [255, 255, 255, 0]);
/// let rendered = Renderer::default().render(&fb.view().unwrap(), SampleStride::ONE);
/// assert!(rendered.glyphs().is_empty());
/// assert_eq!(rendered.text(), "    \n    \n    \n    ");
/// ```
#[derive(Clone, Default)]
pub struct Renderer {
    quantizer: Quantizer,
}

impl Renderer {
    /// Create a renderer around a quantizer.
    #[must_use]
    pub fn new(quantizer: Quantizer) -> Self {
        Self { quantizer }
    }

    /// Create a renderer from a config's symbol table and alpha threshold.
    ///
    /// # Errors
    /// Returns an error if the config carries a malformed symbol table.
    pub fn from_config(config: &ScanConfig) -> anyhow::Result<Self> {
        let table = config.symbol_table()?;
        Ok(Self::new(Quantizer::new(&table, config.alpha_threshold)))
    }

    /// One scan, packaged for both consumers.
    #[must_use]
    pub fn render(&self, buffer: &PixelBuffer<'_>, stride: SampleStride) -> Rendered {
        Rendered {
            scan: self.quantizer.scan(buffer, stride),
        }
    }

    /// One scan, painted on `surface`; returns the export text of that same scan.
    pub fn present<S: Surface + ?Sized>(
        &self,
        buffer: &PixelBuffer<'_>,
        stride: SampleStride,
        surface: &mut S,
    ) -> String {
        let rendered = self.render(buffer, stride);
        rendered.draw(surface);
        rendered.text()
    }
}

/// Efface la surface puis peint chaque glyphe avec sa couleur à sa position.
///
/// # Example
/// ```
/// use sg_ascii::renderer::draw;
/// use sg_ascii::sampler::scan;
/// use sg_core::color::Rgb;
/// use sg_core::frame::FrameBuffer;
/// use sg_core::stride::SampleStride;
/// use sg_core::traits::Surface;
///
/// #[derive(Default)]
/// struct Count { cleared: bool, painted: usize }
/// impl Surface for Count {
///     fn clear(&mut self, _: SampleStride) { self.cleared = true; self.painted = 0; }
///     fn set_fill(&mut self, _: Rgb) {}
///     fn paint(&mut self, _: char, _: u32, _: u32) { self.painted += 1; }
/// }
///
/// let fb = FrameBuffer::filled(3, 3, [255, 255, 255, 255]);
/// let mut surface = Count::default();
/// draw(&scan(&fb.view().unwrap(), SampleStride::ONE), &mut surface);
/// assert!(surface.cleared);
/// assert_eq!(surface.painted, 9);
/// ```
pub fn draw<S: Surface + ?Sized>(scan: &ScanResult, surface: &mut S) {
    surface.clear(scan.stride());
    for glyph in scan.glyphs() {
        surface.set_fill(glyph.color);
        surface.paint(glyph.symbol, glyph.x, glyph.y);
    }
}

/// Texte d'export : lignes jointes par `\n`, sans rognage ni reformatage.
#[must_use]
pub fn export(scan: &ScanResult) -> String {
    scan.text()
}
