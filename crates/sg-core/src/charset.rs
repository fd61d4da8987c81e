use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Table par défaut : (borne inférieure inclusive, symbole), strictement décroissante.
///
/// En dessous de la dernière borne, l'échantillon est vide.
pub const DEFAULT_SYMBOLS: &[(f32, char)] = &[
    (250.0, '@'),
    (240.0, '*'),
    (220.0, '+'),
    (200.0, '#'),
    (180.0, '&'),
    (160.0, '%'),
    (140.0, '_'),
    (120.0, ':'),
    (100.0, '$'),
    (80.0, '/'),
    (60.0, '-'),
    (40.0, 'X'),
    (20.0, 'W'),
];

/// One row of a symbol table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct SymbolBound {
    /// Inclusive lower brightness bound, [0.0, 255.0].
    pub min: f32,
    /// Symbol emitted when brightness ≥ `min`.
    pub symbol: char,
}

/// Brightness → symbol table, tested top-down, first match wins.
///
/// # Example
/// ```
/// use sg_core::charset::SymbolTable;
/// let table = SymbolTable::default();
/// assert_eq!(table.classify(250.0), Some('@'));
/// assert_eq!(table.classify(19.0), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolTable {
    bounds: Vec<SymbolBound>,
}

impl SymbolTable {
    /// Build a table from bounds ordered from brightest to darkest.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the table is empty, a bound lies outside
    /// [0, 255], bounds are not strictly descending, or a symbol is a space.
    ///
    /// # Example
    /// ```
    /// use sg_core::charset::{SymbolBound, SymbolTable};
    /// let table = SymbolTable::new(vec![
    ///     SymbolBound { min: 128.0, symbol: '#' },
    ///     SymbolBound { min: 0.0, symbol: '.' },
    /// ]).unwrap();
    /// assert_eq!(table.classify(0.0), Some('.'));
    /// ```
    pub fn new(bounds: Vec<SymbolBound>) -> Result<Self, CoreError> {
        if bounds.is_empty() {
            return Err(CoreError::Config("symbol table is empty".into()));
        }
        for b in &bounds {
            if !(0.0..=255.0).contains(&b.min) {
                return Err(CoreError::Config(format!(
                    "symbol bound {} for '{}' outside [0, 255]",
                    b.min, b.symbol
                )));
            }
            if b.symbol.is_whitespace() {
                return Err(CoreError::Config(
                    "symbol table entries must be visible characters".into(),
                ));
            }
        }
        if bounds.windows(2).any(|w| w[0].min <= w[1].min) {
            return Err(CoreError::Config(
                "symbol bounds must be strictly descending".into(),
            ));
        }
        Ok(Self { bounds })
    }

    /// Map an average brightness to a symbol, `None` meaning blank.
    ///
    /// # Example
    /// ```
    /// use sg_core::charset::SymbolTable;
    /// let table = SymbolTable::default();
    /// assert_eq!(table.classify(249.999), Some('*'));
    /// assert_eq!(table.classify(20.0), Some('W'));
    /// ```
    #[must_use]
    pub fn classify(&self, brightness: f32) -> Option<char> {
        self.bounds
            .iter()
            .find(|b| brightness >= b.min)
            .map(|b| b.symbol)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            bounds: DEFAULT_SYMBOLS
                .iter()
                .map(|&(min, symbol)| SymbolBound { min, symbol })
                .collect(),
        }
    }
}

/// Nombre de sommes de canaux possibles : R+G+B ∈ [0, 765].
const SUM_LEVELS: usize = 766;

/// Lookup table mapping a channel sum (R+G+B) → symbol.
///
/// Pre-computed once from a `SymbolTable` for O(1) per-sample cost. The entry
/// for sum `s` is exactly `table.classify(s / 3.0)`.
///
/// # Example
/// ```
/// use sg_core::charset::{SymbolLut, SymbolTable};
/// let lut = SymbolLut::new(&SymbolTable::default());
/// assert_eq!(lut.map(765), Some('@'));
/// assert_eq!(lut.map(0), None);
/// ```
#[derive(Clone)]
pub struct SymbolLut {
    lut: [Option<char>; SUM_LEVELS],
}

impl SymbolLut {
    /// Build the LUT from a table.
    #[must_use]
    pub fn new(table: &SymbolTable) -> Self {
        let mut lut = [None; SUM_LEVELS];
        for (sum, slot) in lut.iter_mut().enumerate() {
            *slot = table.classify(sum as f32 / 3.0);
        }
        Self { lut }
    }

    /// Map a channel sum to a symbol. Sums above 765 saturate.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, channel_sum: u16) -> Option<char> {
        self.lut[usize::from(channel_sum).min(SUM_LEVELS - 1)]
    }
}

impl Default for SymbolLut {
    fn default() -> Self {
        Self::new(&SymbolTable::default())
    }
}
