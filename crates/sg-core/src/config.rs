use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{SymbolBound, SymbolTable};
use crate::color::Rgb;
use crate::stride::{DEFAULT_MAX_CELLS, SampleStride};

/// Seuil alpha par défaut : un échantillon avec A ≤ 128 est vide.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Configuration complète d'un balayage et de son affichage.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use sg_core::config::ScanConfig;
/// let config = ScanConfig::default();
/// assert_eq!(config.max_cells, 100_000);
/// assert_eq!(config.alpha_threshold, 128);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScanConfig {
    // === Échantillonnage ===
    /// Pas demandé, avant application du plafond de cellules.
    pub stride: u32,
    /// Plafond de cellules échantillonnées. Le pas est relevé pour le respecter.
    pub max_cells: u64,
    /// Opacité en dessous ou égale à laquelle un échantillon est vide.
    pub alpha_threshold: u8,
    /// Table de symboles personnalisée. `None` = table par défaut.
    pub symbols: Option<Vec<SymbolBound>>,

    // === Affichage ===
    /// Largeur maximale de l'image après ajustement (réduction uniquement).
    pub max_display_width: u32,
    /// Hauteur maximale de l'image après ajustement.
    pub max_display_height: u32,
    /// Couleur de fond des surfaces raster.
    pub background: Rgb,
    /// Taille de police minimale en pixels pour les surfaces raster.
    pub min_font_px: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            stride: 1,
            max_cells: DEFAULT_MAX_CELLS,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            symbols: None,
            max_display_width: 800,
            max_display_height: 600,
            background: Rgb::BLACK,
            min_font_px: 6.0,
        }
    }
}

impl ScanConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.stride = self.stride.max(1);
        self.max_cells = self.max_cells.max(1);
        self.max_display_width = self.max_display_width.clamp(1, 16_384);
        self.max_display_height = self.max_display_height.clamp(1, 16_384);
        self.min_font_px = self.min_font_px.clamp(1.0, 256.0);
    }

    /// Requested stride as a typed value.
    #[must_use]
    pub fn requested_stride(&self) -> SampleStride {
        SampleStride::new(self.stride).unwrap_or(SampleStride::ONE)
    }

    /// Build the symbol table this config selects.
    ///
    /// # Errors
    /// Returns an error if the custom table is malformed.
    pub fn symbol_table(&self) -> Result<SymbolTable> {
        match &self.symbols {
            Some(bounds) => SymbolTable::new(bounds.clone()).context("[scan].symbols rejected"),
            None => Ok(SymbolTable::default()),
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    scan: Option<ScanSection>,
    display: Option<DisplaySection>,
}

/// `[scan]` section, all fields optional for partial override.
#[derive(Deserialize)]
struct ScanSection {
    stride: Option<u32>,
    max_cells: Option<u64>,
    alpha_threshold: Option<u8>,
    symbols: Option<Vec<SymbolBound>>,
}

/// `[display]` section, all fields optional.
#[derive(Deserialize)]
struct DisplaySection {
    max_width: Option<u32>,
    max_height: Option<u32>,
    background: Option<Rgb>,
    min_font_px: Option<f32>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or carries a
/// malformed symbol table.
///
/// # Example
/// ```no_run
/// use sg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid config in {}", path.display()))
}

/// Parse TOML text into a config, merged over defaults.
///
/// # Errors
/// Returns an error on TOML syntax errors or a malformed symbol table.
///
/// # Example
/// ```
/// use sg_core::config::parse_config;
/// let config = parse_config("[scan]\nstride = 3\n").unwrap();
/// assert_eq!(config.stride, 3);
/// assert_eq!(config.max_cells, 100_000);
/// ```
pub fn parse_config(content: &str) -> Result<ScanConfig> {
    let file: ConfigFile = toml::from_str(content).context("TOML parse error")?;

    let mut config = ScanConfig::default();

    if let Some(s) = file.scan {
        if let Some(v) = s.stride {
            config.stride = v;
        }
        if let Some(v) = s.max_cells {
            config.max_cells = v;
        }
        if let Some(v) = s.alpha_threshold {
            config.alpha_threshold = v;
        }
        if let Some(v) = s.symbols {
            config.symbols = Some(v);
        }
    }

    if let Some(d) = file.display {
        if let Some(v) = d.max_width {
            config.max_display_width = v;
        }
        if let Some(v) = d.max_height {
            config.max_display_height = v;
        }
        if let Some(v) = d.background {
            config.background = v;
        }
        if let Some(v) = d.min_font_px {
            config.min_font_px = v;
        }
    }

    config.clamp_all();
    // Une table invalide est refusée au chargement, pas au premier balayage.
    config.symbol_table()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config(
            "[scan]\nmax_cells = 5000\n\n[display]\nmax_width = 320\nbackground = { r = 10, g = 20, b = 30 }\n",
        )
        .unwrap();
        assert_eq!(config.max_cells, 5000);
        assert_eq!(config.max_display_width, 320);
        assert_eq!(config.max_display_height, 600);
        assert_eq!(config.background, Rgb::new(10, 20, 30));
        assert_eq!(config.stride, 1);
    }

    #[test]
    fn zero_values_are_clamped() {
        let config = parse_config("[scan]\nstride = 0\nmax_cells = 0\n").unwrap();
        assert_eq!(config.stride, 1);
        assert_eq!(config.max_cells, 1);
    }

    #[test]
    fn custom_symbols_are_validated() {
        let ok = parse_config(
            "[scan]\nsymbols = [{ min = 100.0, symbol = \"#\" }, { min = 0.0, symbol = \".\" }]\n",
        )
        .unwrap();
        let table = ok.symbol_table().unwrap();
        assert_eq!(table.classify(0.0), Some('.'));

        let bad = parse_config(
            "[scan]\nsymbols = [{ min = 0.0, symbol = \".\" }, { min = 100.0, symbol = \"#\" }]\n",
        );
        assert!(bad.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scan]\nstride = 7\nalpha_threshold = 10").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.stride, 7);
        assert_eq!(config.alpha_threshold, 10);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/definitely/not/here.toml")).is_err());
    }
}
