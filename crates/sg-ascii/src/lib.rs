/// ASCII conversion engine for scanglyph.
///
/// One pass over a pixel buffer yields both the colored glyph list and the
/// plain text grid.
pub mod renderer;
pub mod result;
pub mod sampler;

pub use renderer::{Rendered, Renderer};
pub use result::ScanResult;
pub use sampler::{Quantizer, scan};
