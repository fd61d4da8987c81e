//! Shared types, traits, and configuration for scanglyph.
//!
//! This crate holds the pixel buffer view, the sampling stride, the glyph
//! record, the brightness → symbol table, and the TOML config
//! used across the workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod stride;
pub mod traits;

pub use charset::{SymbolLut, SymbolTable};
pub use color::Rgb;
pub use config::ScanConfig;
pub use error::CoreError;
pub use frame::{FrameBuffer, Glyph, PixelBuffer};
pub use stride::SampleStride;
pub use traits::Surface;
