use std::fmt;

use serde::{Deserialize, Serialize};

/// Couleur RGB 8 bits, telle que lue dans le pixel source (jamais moyennée).
///
/// `Display` produit la forme CSS `rgb(R,G,B)` utilisée comme couleur de remplissage.
///
/// # Example
/// ```
/// use sg_core::color::Rgb;
/// let c = Rgb::new(255, 128, 0);
/// assert_eq!(c.to_string(), "rgb(255,128,0)");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black, the default surface background.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of the three channels, 0..=765.
    ///
    /// # Example
    /// ```
    /// use sg_core::color::Rgb;
    /// assert_eq!(Rgb::new(255, 255, 255).channel_sum(), 765);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn channel_sum(self) -> u16 {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b)
    }

    /// Luminosité moyenne `(R+G+B)/3` en flottant, dans [0.0, 255.0].
    ///
    /// # Example
    /// ```
    /// use sg_core::color::Rgb;
    /// assert!((Rgb::new(250, 250, 250).brightness() - 250.0).abs() < f32::EPSILON);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn brightness(self) -> f32 {
        f32::from(self.channel_sum()) / 3.0
    }

    /// Linear blend of `self` over `bg` by `alpha` in [0.0, 1.0].
    #[inline(always)]
    #[must_use]
    pub fn blend_over(self, bg: Self, alpha: f32) -> Self {
        let mix = |fg: u8, bg: u8| {
            (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self::new(mix(self.r, bg.r), mix(self.g, bg.g), mix(self.b, bg.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_is_unweighted_mean() {
        let c = Rgb::new(90, 0, 0);
        assert!((c.brightness() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn blend_extremes() {
        let fg = Rgb::new(200, 100, 50);
        assert_eq!(fg.blend_over(Rgb::BLACK, 1.0), fg);
        assert_eq!(fg.blend_over(Rgb::BLACK, 0.0), Rgb::BLACK);
    }

    #[test]
    fn blend_rounds_to_nearest() {
        // 255 × 0.5 = 127.5 → 128 ; 3 × 0.5 = 1.5 → 2
        let out = Rgb::new(255, 3, 0).blend_over(Rgb::BLACK, 0.5);
        assert_eq!(out, Rgb::new(128, 2, 0));
    }
}
