use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use sg_ascii::renderer::Rendered;
use sg_core::stride::SampleStride;

use crate::canvas::TerminalSurface;

/// Largeur de la sidebar, bordure comprise.
pub const SIDEBAR_WIDTH: u16 = 24;

/// Everything the viewer shows besides the glyphs themselves.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Nom du fichier chargé.
    pub file_name: String,
    /// Dimensions de l'image après ajustement.
    pub image_size: (u32, u32),
    /// Pas demandé par l'utilisateur.
    pub requested: SampleStride,
    /// Pas effectivement utilisé (après plafond de cellules).
    pub effective: SampleStride,
    /// Plafond de cellules en vigueur.
    pub max_cells: u64,
    /// Dernier message d'état (export, rechargement, erreur).
    pub status: Option<String>,
    /// Overlay d'aide affiché.
    pub show_help: bool,
}

/// Horizontal split: [canvas | sidebar].
fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::horizontal([Constraint::Min(10), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Canvas region for a terminal of `area` size.
#[must_use]
pub fn canvas_area(area: Rect) -> Rect {
    split(area).0
}

/// Draw the full UI: canvas + sidebar (+ help overlay).
///
/// Returns the number of glyphs that did not fit in the canvas.
pub fn draw(frame: &mut Frame, rendered: &Rendered, view: &ViewState) -> usize {
    let area = frame.area();
    let (canvas, sidebar) = split(area);

    // === Canvas ===
    let mut surface = TerminalSurface::new(frame.buffer_mut(), canvas);
    rendered.draw(&mut surface);
    let clipped = surface.clipped();

    // === Sidebar ===
    draw_sidebar(frame, sidebar, rendered, view, clipped);

    if view.show_help {
        draw_help_overlay(frame, area);
    }
    clipped
}

fn draw_sidebar(
    frame: &mut Frame,
    area: Rect,
    rendered: &Rendered,
    view: &ViewState,
    clipped: usize,
) {
    let scan = rendered.scan();
    let header = Style::default().fg(Color::Yellow);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", view.file_name),
            Style::default().fg(Color::Green),
        )),
        Line::from(format!(" {}x{} px", view.image_size.0, view.image_size.1)),
        Line::from(""),
        Line::from(Span::styled("─ Scan ──────", header)),
        Line::from(format!(" Stride: {}", view.effective)),
    ];
    if view.requested != view.effective {
        lines.push(Line::from(Span::styled(
            format!(" (asked {})", view.requested),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend([
        Line::from(format!(" Grid: {}x{}", scan.columns(), scan.row_count())),
        Line::from(format!(" Cells: {}", scan.cell_count())),
        Line::from(format!(" Max: {}", view.max_cells)),
        Line::from(format!(" Glyphs: {}", scan.glyphs().len())),
    ]);
    if clipped > 0 {
        lines.push(Line::from(Span::styled(
            format!(" Clipped: {clipped}"),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(status) = &view.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("─ Status ────", header)));
        lines.push(Line::from(format!(" {status}")));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ? = help",
        Style::default().fg(Color::DarkGray),
    )));

    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" Scan "));
    frame.render_widget(sidebar, area);
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " scanglyph : Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" q/Esc    Quit"),
        Line::from(" +/=      Coarser stride"),
        Line::from(" -        Finer stride"),
        Line::from(" f        Fit to terminal"),
        Line::from(" e        Export text"),
        Line::from(" ?        Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 32u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use sg_ascii::renderer::Renderer;
    use sg_core::frame::FrameBuffer;

    use super::*;

    #[test]
    fn draws_canvas_and_sidebar() {
        let fb = FrameBuffer::filled(8, 4, [255, 255, 255, 255]);
        let rendered = Renderer::default().render(&fb.view().unwrap(), SampleStride::ONE);
        let view = ViewState {
            file_name: "white.png".into(),
            image_size: (8, 4),
            max_cells: 100_000,
            ..ViewState::default()
        };

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        let mut clipped = usize::MAX;
        terminal
            .draw(|f| clipped = draw(f, &rendered, &view))
            .unwrap();
        assert_eq!(clipped, 0);

        let buf = terminal.backend().buffer();
        assert_eq!(buf[(0, 0)].symbol(), "@");
        assert_eq!(buf[(7, 3)].symbol(), "@");
        assert_eq!(buf[(8, 0)].symbol(), " ");
    }

    #[test]
    fn canvas_leaves_room_for_sidebar() {
        let area = canvas_area(Rect::new(0, 0, 100, 30));
        assert_eq!(area.width, 100 - SIDEBAR_WIDTH);
        assert_eq!(area.height, 30);
    }
}
