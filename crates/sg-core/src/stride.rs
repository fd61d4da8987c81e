use std::fmt;
use std::num::NonZeroU32;

use crate::error::CoreError;

/// Plafond recommandé de cellules échantillonnées par balayage.
pub const DEFAULT_MAX_CELLS: u64 = 100_000;

/// Pas d'échantillonnage en pixels, identique sur les deux axes. 1 = par pixel.
///
/// # Example
/// ```
/// use sg_core::stride::SampleStride;
/// let s = SampleStride::new(4).unwrap();
/// assert_eq!(s.cells(10, 9), 3 * 3);
/// assert!(SampleStride::new(0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleStride(NonZeroU32);

impl SampleStride {
    /// Per-pixel sampling.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Validate a raw stride.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidStride` for zero.
    pub fn new(step: u32) -> Result<Self, CoreError> {
        NonZeroU32::new(step)
            .map(Self)
            .ok_or(CoreError::InvalidStride(step))
    }

    /// Stride as a plain integer.
    #[inline(always)]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Sampled positions along an axis of `len` pixels: `⌈len / stride⌉`.
    #[inline(always)]
    #[must_use]
    pub fn samples(self, len: u32) -> u32 {
        len.div_ceil(self.get())
    }

    /// Cell count of a scan: `⌈width/stride⌉ × ⌈height/stride⌉`.
    #[must_use]
    pub fn cells(self, width: u32, height: u32) -> u64 {
        u64::from(self.samples(width)) * u64::from(self.samples(height))
    }

    /// Smallest stride whose cell count fits in `max_cells`.
    ///
    /// Starts from the analytic lower bound `⌈sqrt(width·height / max)⌉` and
    /// steps up until the ceiling-rounded count fits. A `max_cells` of zero is
    /// treated as one.
    ///
    /// # Example
    /// ```
    /// use sg_core::stride::SampleStride;
    /// let s = SampleStride::min_for_budget(1600, 1200, 100_000);
    /// assert_eq!(s.get(), 5);
    /// ```
    #[must_use]
    pub fn min_for_budget(width: u32, height: u32, max_cells: u64) -> Self {
        let max_cells = max_cells.max(1);
        let area = u64::from(width) * u64::from(height);
        let ratio = area as f64 / max_cells as f64;
        let mut step = (ratio.sqrt().ceil() as u32).max(1);
        // Flottant : la borne analytique peut dépasser d'un cran, on redescend.
        while step > 1 && Self::from_raw(step - 1).cells(width, height) <= max_cells {
            step -= 1;
        }
        let ceiling = width.max(height).max(1);
        while step < ceiling && Self::from_raw(step).cells(width, height) > max_cells {
            step += 1;
        }
        Self::from_raw(step)
    }

    /// Raise `requested` until the scan fits in `max_cells`.
    ///
    /// # Example
    /// ```
    /// use sg_core::stride::SampleStride;
    /// let wanted = SampleStride::new(2).unwrap();
    /// assert_eq!(SampleStride::bounded(wanted, 1600, 1200, 100_000).get(), 5);
    /// let coarse = SampleStride::new(9).unwrap();
    /// assert_eq!(SampleStride::bounded(coarse, 1600, 1200, 100_000).get(), 9);
    /// ```
    #[must_use]
    pub fn bounded(requested: Self, width: u32, height: u32, max_cells: u64) -> Self {
        requested.max(Self::min_for_budget(width, height, max_cells))
    }

    /// Next coarser stride.
    #[must_use]
    pub fn coarser(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Next finer stride, never below 1.
    #[must_use]
    pub fn finer(self) -> Self {
        Self::from_raw(self.get().saturating_sub(1))
    }

    fn from_raw(step: u32) -> Self {
        Self(NonZeroU32::new(step).unwrap_or(NonZeroU32::MIN))
    }
}

impl Default for SampleStride {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for SampleStride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(step: u32) -> SampleStride {
        SampleStride::new(step).unwrap()
    }

    #[test]
    fn cells_use_ceiling() {
        assert_eq!(s(1).cells(4, 4), 16);
        assert_eq!(s(3).cells(10, 7), 4 * 3);
        assert_eq!(s(100).cells(10, 7), 1);
    }

    #[test]
    fn cells_never_grow_with_stride() {
        let (w, h) = (317, 211);
        let mut prev = s(1).cells(w, h);
        for step in 2..=400 {
            let c = s(step).cells(w, h);
            assert!(c <= prev, "stride {step}: {c} > {prev}");
            prev = c;
        }
    }

    #[test]
    fn budget_stride_is_smallest_fitting() {
        let (w, h, max) = (1600, 1200, 100_000);
        let stride = SampleStride::min_for_budget(w, h, max);
        assert!(stride.cells(w, h) <= max);
        assert!(s(stride.get() - 1).cells(w, h) > max);
        assert_eq!(stride.get(), 5);
    }

    #[test]
    fn budget_for_small_images_is_one() {
        assert_eq!(SampleStride::min_for_budget(800, 600, 100_000), SampleStride::ONE);
        assert_eq!(SampleStride::min_for_budget(1, 1, 1), SampleStride::ONE);
    }

    #[test]
    fn budget_is_smallest_across_shapes() {
        for &(w, h, max) in &[(1000, 10, 7), (333, 777, 1234), (4096, 4096, 100_000), (5, 5000, 3)] {
            let stride = SampleStride::min_for_budget(w, h, max);
            assert!(stride.cells(w, h) <= max, "{w}x{h} max {max}");
            if stride.get() > 1 {
                assert!(s(stride.get() - 1).cells(w, h) > max, "{w}x{h} max {max}");
            }
        }
    }

    #[test]
    fn zero_budget_degenerates_to_single_cell() {
        let stride = SampleStride::min_for_budget(640, 480, 0);
        assert_eq!(stride.cells(640, 480), 1);
    }

    #[test]
    fn finer_stops_at_one() {
        assert_eq!(SampleStride::ONE.finer(), SampleStride::ONE);
        assert_eq!(s(3).finer(), s(2));
        assert_eq!(s(3).coarser(), s(4));
    }
}
