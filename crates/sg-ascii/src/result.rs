use sg_core::frame::Glyph;
use sg_core::stride::SampleStride;

/// Résultat atomique d'un balayage : glyphes pour le rendu et lignes de texte pour l'export.
///
/// Seul le sampler de ce crate construit un `ScanResult`, en une seule
/// traversée ; les deux moitiés ne peuvent donc pas diverger.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanResult {
    glyphs: Vec<Glyph>,
    rows: Vec<String>,
    stride: SampleStride,
    columns: u32,
}

impl ScanResult {
    /// Assemble a result from one traversal.
    pub(crate) fn from_scan(
        glyphs: Vec<Glyph>,
        rows: Vec<String>,
        stride: SampleStride,
        columns: u32,
    ) -> Self {
        let result = Self {
            glyphs,
            rows,
            stride,
            columns,
        };
        debug_assert!(result.is_consistent(), "glyphs and rows disagree");
        result
    }

    /// Chaque cellule non vide du texte correspond, dans l'ordre, à exactement
    /// un glyphe de même symbole en `(colonne × pas, ligne × pas)`.
    fn is_consistent(&self) -> bool {
        let step = self.stride.get();
        let mut glyphs = self.glyphs.iter();
        for (r, row) in self.rows.iter().enumerate() {
            if row.chars().count() != self.columns as usize {
                return false;
            }
            for (c, symbol) in row.chars().enumerate() {
                if symbol == ' ' {
                    continue;
                }
                let expected = (c as u32 * step, r as u32 * step, symbol);
                match glyphs.next() {
                    Some(g) if (g.x, g.y, g.symbol) == expected => {}
                    _ => return false,
                }
            }
        }
        glyphs.next().is_none()
    }

    /// Glyphs in scan order (ascending y, then x).
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Text rows in ascending y order.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Stride used by the scan.
    #[must_use]
    pub fn stride(&self) -> SampleStride {
        self.stride
    }

    /// Sampled columns per row.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Sampled rows.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Total sampled cells, blank or not.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.columns) * self.rows.len() as u64
    }

    /// Rows joined by `\n`, no trailing newline.
    #[must_use]
    pub fn text(&self) -> String {
        self.rows.join("\n")
    }
}
