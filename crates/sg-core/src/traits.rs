use crate::color::Rgb;
use crate::stride::SampleStride;

/// Surface d'affichage qui peint des glyphes positionnés en coordonnées pixel source.
///
/// Implémenté par : `TerminalSurface` (ratatui), `Rasterizer` (RGBA, ab_glyph).
///
/// # Example
/// ```
/// use sg_core::traits::Surface;
/// use sg_core::color::Rgb;
/// use sg_core::stride::SampleStride;
///
/// #[derive(Default)]
/// struct Recorder { painted: Vec<(char, u32, u32, Rgb)>, fill: Rgb }
/// impl Surface for Recorder {
///     fn clear(&mut self, _stride: SampleStride) { self.painted.clear(); }
///     fn set_fill(&mut self, color: Rgb) { self.fill = color; }
///     fn paint(&mut self, symbol: char, x: u32, y: u32) {
///         self.painted.push((symbol, x, y, self.fill));
///     }
/// }
/// ```
pub trait Surface {
    /// Efface tout le contenu précédent et prépare une peinture au pas `stride`.
    ///
    /// Appelé avant chaque nouvelle peinture ; le pas fixe la taille des cases
    /// de glyphes (pas plus grand, cases plus grandes).
    fn clear(&mut self, stride: SampleStride);

    /// Couleur utilisée par les appels `paint` suivants.
    fn set_fill(&mut self, color: Rgb);

    /// Peint `symbol` à la position pixel source (x, y).
    fn paint(&mut self, symbol: char, x: u32, y: u32);
}
