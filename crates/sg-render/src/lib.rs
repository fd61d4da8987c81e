pub mod canvas;
/// Terminal rendering for scanglyph.
///
/// Provides a `Surface` over a ratatui buffer and the viewer layout.
pub mod ui;
