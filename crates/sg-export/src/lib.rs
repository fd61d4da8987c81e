//! Export paths for scanglyph: plain text, glyph JSON and raster images.

pub mod rasterizer;
pub mod text;
