use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use sg_core::color::Rgb;
use sg_core::stride::SampleStride;
use sg_core::traits::Surface;

/// Surface qui écrit directement dans un `ratatui::Buffer`.
///
/// Une cellule terminal par case échantillonnée : le glyphe en (x, y) pixel
/// source va dans la cellule (x / stride, y / stride) de `area`. Les glyphes
/// hors de `area` sont ignorés et comptés.
///
/// # Example
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use sg_core::color::Rgb;
/// use sg_core::stride::SampleStride;
/// use sg_core::traits::Surface;
/// use sg_render::canvas::TerminalSurface;
///
/// let area = Rect::new(0, 0, 4, 2);
/// let mut buf = Buffer::empty(area);
/// let mut surface = TerminalSurface::new(&mut buf, area);
/// surface.clear(SampleStride::new(2).unwrap());
/// surface.set_fill(Rgb::new(255, 0, 0));
/// surface.paint('@', 4, 2);
/// drop(surface);
/// assert_eq!(buf[(2, 1)].symbol(), "@");
/// ```
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    stride: u32,
    fill: Color,
    clipped: usize,
}

impl<'a> TerminalSurface<'a> {
    /// Wrap the `area` region of `buf`.
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self {
            buf,
            area,
            stride: 1,
            fill: Color::Reset,
            clipped: 0,
        }
    }

    /// Glyphs dropped since the last clear because they fell outside the area.
    #[must_use]
    pub fn clipped(&self) -> usize {
        self.clipped
    }
}

impl Surface for TerminalSurface<'_> {
    fn clear(&mut self, stride: SampleStride) {
        self.stride = stride.get();
        self.clipped = 0;
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.reset();
                }
            }
        }
    }

    fn set_fill(&mut self, color: Rgb) {
        self.fill = Color::Rgb(color.r, color.g, color.b);
    }

    fn paint(&mut self, symbol: char, x: u32, y: u32) {
        let cx = x / self.stride;
        let cy = y / self.stride;
        if cx >= u32::from(self.area.width) || cy >= u32::from(self.area.height) {
            self.clipped += 1;
            return;
        }
        let pos = (self.area.x + cx as u16, self.area.y + cy as u16);
        if let Some(cell) = self.buf.cell_mut(pos) {
            cell.set_char(symbol).set_fg(self.fill);
        }
    }
}

/// Plus petit pas dont la grille tient dans `area` (une cellule par case).
///
/// # Example
/// ```
/// use ratatui::layout::Rect;
/// use sg_render::canvas::stride_to_fit;
/// let s = stride_to_fit(800, 600, Rect::new(0, 0, 100, 40));
/// assert_eq!(s.get(), 15);
/// ```
#[must_use]
pub fn stride_to_fit(width: u32, height: u32, area: Rect) -> SampleStride {
    let cols = u32::from(area.width).max(1);
    let rows = u32::from(area.height).max(1);
    let step = width.div_ceil(cols).max(height.div_ceil(rows)).max(1);
    SampleStride::new(step).unwrap_or(SampleStride::ONE)
}

#[cfg(test)]
mod tests {
    use sg_ascii::renderer::Renderer;
    use sg_core::frame::FrameBuffer;

    use super::*;

    #[test]
    fn clear_wipes_previous_glyphs() {
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        {
            let mut surface = TerminalSurface::new(&mut buf, area);
            surface.clear(SampleStride::ONE);
            surface.paint('#', 2, 2);
            surface.clear(SampleStride::ONE);
        }
        assert_eq!(buf[(2, 2)].symbol(), " ");
    }

    #[test]
    fn offscreen_glyphs_are_clipped() {
        let area = Rect::new(1, 1, 2, 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        let mut surface = TerminalSurface::new(&mut buf, area);
        surface.clear(SampleStride::ONE);
        surface.paint('@', 5, 0);
        surface.paint('@', 1, 1);
        assert_eq!(surface.clipped(), 1);
        drop(surface);
        assert_eq!(buf[(2, 2)].symbol(), "@");
    }

    #[test]
    fn renders_scan_with_colors() {
        let fb = FrameBuffer::filled(4, 4, [255, 255, 255, 255]);
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buf, area);
        Renderer::default()
            .render(&fb.view().unwrap(), SampleStride::new(2).unwrap())
            .draw(&mut surface);
        assert_eq!(surface.clipped(), 0);
        drop(surface);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(buf[(x, y)].symbol(), "@");
            assert_eq!(buf[(x, y)].fg, Color::Rgb(255, 255, 255));
        }
    }

    #[test]
    fn fit_accounts_for_both_axes() {
        assert_eq!(stride_to_fit(10, 10, Rect::new(0, 0, 10, 10)).get(), 1);
        assert_eq!(stride_to_fit(10, 100, Rect::new(0, 0, 10, 10)).get(), 10);
        assert_eq!(stride_to_fit(1, 1, Rect::new(0, 0, 0, 0)).get(), 1);
    }
}
