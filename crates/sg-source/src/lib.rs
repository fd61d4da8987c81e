//! Image sources for scanglyph: decoding and display-size fitting.

pub mod image;
pub mod resize;

pub use self::image::{decode_image, load_image};
pub use resize::fit_within;
