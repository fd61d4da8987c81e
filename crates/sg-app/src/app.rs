use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use sg_ascii::renderer::{Rendered, Renderer};
use sg_core::config::ScanConfig;
use sg_core::stride::SampleStride;
use sg_export::text::write_text;
use sg_render::canvas::stride_to_fit;
use sg_render::ui::{self, ViewState};

use crate::pipeline::{self, ExportTargets, LoadedImage};

/// Délai de polling des événements : borne aussi la latence du hot-reload.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Affichage normal.
    Running,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Fermeture au prochain tour de boucle.
    Quitting,
}

/// Visionneuse terminal : une image, un balayage courant, redessiné à la demande.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Config partagée avec le watcher (lecture via arc-swap).
    config: Arc<ArcSwap<ScanConfig>>,
    /// Dernière config appliquée, pour détecter un rechargement.
    applied: Arc<ScanConfig>,
    image_path: PathBuf,
    source: LoadedImage,
    renderer: Renderer,
    /// Pas demandé (clavier ou config), avant plafond de cellules.
    requested: SampleStride,
    rendered: Rendered,
    /// Destination de la touche `e`.
    export_path: PathBuf,
    status: Option<String>,
    /// Zone canvas connue au dernier dessin.
    canvas: Rect,
    /// Un nouveau dessin est nécessaire.
    dirty: bool,
}

impl App {
    /// Build the viewer and run the first scan.
    ///
    /// # Errors
    /// Returns an error if the symbol table is invalid or the image is empty.
    pub fn new(
        config: Arc<ArcSwap<ScanConfig>>,
        image_path: PathBuf,
        source: LoadedImage,
        export_path: PathBuf,
    ) -> Result<Self> {
        let applied = config.load_full();
        let renderer = Renderer::from_config(&applied)?;
        let requested = applied.requested_stride();
        let rendered =
            pipeline::render_frame(&renderer, &source.frame, requested, applied.max_cells)?;
        Ok(Self {
            state: AppState::Running,
            config,
            applied,
            image_path,
            source,
            renderer,
            requested,
            rendered,
            export_path,
            status: None,
            canvas: Rect::default(),
            dirty: true,
        })
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            if self.state == AppState::Quitting {
                break;
            }

            // === Config rechargée par le watcher ? ===
            self.sync_config();

            // === Vérifier resize terminal ===
            let size = terminal.size()?;
            let canvas = ui::canvas_area(Rect::new(0, 0, size.width, size.height));
            if canvas != self.canvas {
                self.canvas = canvas;
                self.dirty = true;
            }

            if self.dirty {
                let view = self.view_state();
                let rendered = &self.rendered;
                terminal.draw(|frame| {
                    ui::draw(frame, rendered, &view);
                })?;
                self.dirty = false;
            }

            if event::poll(POLL_INTERVAL)? {
                self.handle_event(&event::read()?);
            }
        }
        Ok(())
    }

    /// Write the exports named on the command line from the scan on screen.
    ///
    /// # Errors
    /// Returns an error if any export fails.
    pub fn export_startup(&self, targets: &ExportTargets<'_>) -> Result<()> {
        pipeline::export_all(&self.rendered, &self.source.frame, &self.applied, targets)
    }

    fn view_state(&self) -> ViewState {
        ViewState {
            file_name: self.source.name.clone(),
            image_size: (self.source.frame.width, self.source.frame.height),
            requested: self.requested,
            effective: self.rendered.scan().stride(),
            max_cells: self.applied.max_cells,
            status: self.status.clone(),
            show_help: self.state == AppState::Help,
        }
    }

    /// Rebalaye au pas demandé. Garde l'ancien rendu en cas d'erreur.
    fn rescan(&mut self) {
        match pipeline::render_frame(
            &self.renderer,
            &self.source.frame,
            self.requested,
            self.applied.max_cells,
        ) {
            Ok(rendered) => self.rendered = rendered,
            Err(e) => {
                log::warn!("Balayage impossible : {e:#}");
                self.status = Some(format!("scan failed: {e}"));
            }
        }
        self.dirty = true;
    }

    /// Apply a config stored by the watcher since the last check.
    pub fn sync_config(&mut self) {
        let latest = self.config.load_full();
        if Arc::ptr_eq(&latest, &self.applied) {
            return;
        }
        let previous = std::mem::replace(&mut self.applied, latest);
        let config = Arc::clone(&self.applied);

        let mut status = String::from("config reloaded");
        match Renderer::from_config(&config) {
            Ok(renderer) => self.renderer = renderer,
            Err(e) => {
                log::warn!("Table de symboles rejetée : {e:#}");
                status = format!("symbols rejected: {e}");
            }
        }

        if config.max_display_width != previous.max_display_width
            || config.max_display_height != previous.max_display_height
        {
            match pipeline::load_source(&self.image_path, &config) {
                Ok(source) => self.source = source,
                Err(e) => log::warn!("Rechargement image impossible : {e:#}"),
            }
        }
        if config.stride != previous.stride {
            self.requested = config.requested_stride();
        }

        self.status = Some(status);
        self.rescan();
    }

    /// Handle a terminal event.
    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(..) => self.dirty = true,
            _ => {}
        }
    }

    /// Keyboard dispatch.
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.state = AppState::Quitting,
            KeyCode::Esc => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Quitting
                };
            }
            KeyCode::Char('?') => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Help
                };
            }
            KeyCode::Char('+' | '=') => self.set_stride(self.requested.coarser()),
            KeyCode::Char('-') => self.set_stride(self.requested.finer()),
            KeyCode::Char('f') => {
                let fit = stride_to_fit(
                    self.source.frame.width,
                    self.source.frame.height,
                    self.canvas,
                );
                self.set_stride(fit);
            }
            KeyCode::Char('e') => self.export_text(),
            _ => return,
        }
        self.dirty = true;
    }

    fn set_stride(&mut self, stride: SampleStride) {
        if stride != self.requested {
            self.requested = stride;
            self.rescan();
        }
    }

    fn export_text(&mut self) {
        self.status = Some(match write_text(&self.export_path, &self.rendered.text()) {
            Ok(()) => format!("saved {}", self.export_path.display()),
            Err(e) => {
                log::warn!("Export texte impossible : {e:#}");
                format!("export failed: {e}")
            }
        });
    }
}
