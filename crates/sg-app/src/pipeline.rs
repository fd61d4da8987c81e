use std::path::Path;

use anyhow::Result;
use sg_ascii::renderer::{Rendered, Renderer};
use sg_core::config::{ScanConfig, load_config};
use sg_core::frame::FrameBuffer;
use sg_core::stride::SampleStride;
use sg_export::rasterizer::Rasterizer;
use sg_export::text::{write_glyphs_json, write_text};
use sg_source::image::load_image;
use sg_source::resize::fit_within;

use crate::cli::Cli;

/// Image décodée et ajustée à la taille d'affichage, prête à balayer.
pub struct LoadedImage {
    /// File name shown in the viewer.
    pub name: String,
    /// RGBA pixels after fitting.
    pub frame: FrameBuffer,
}

/// Files requested for export.
#[derive(Clone, Debug, Default)]
pub struct ExportTargets<'a> {
    pub text: Option<&'a Path>,
    pub json: Option<&'a Path>,
    pub png: Option<&'a Path>,
    pub font: Option<&'a Path>,
}

impl<'a> ExportTargets<'a> {
    /// Targets named on the command line.
    #[must_use]
    pub fn from_cli(cli: &'a Cli) -> Self {
        Self {
            text: cli.export_text.as_deref(),
            json: cli.export_json.as_deref(),
            png: cli.export_png.as_deref(),
            font: cli.font.as_deref(),
        }
    }
}

/// Flags CLI qui priment sur le fichier de config, y compris après rechargement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub stride: Option<u32>,
    pub max_cells: Option<u64>,
    pub max_size: Option<(u32, u32)>,
}

impl Overrides {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            stride: cli.stride,
            max_cells: cli.max_cells,
            max_size: cli.max_size,
        }
    }

    /// Apply the flags over a loaded config, then clamp it.
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(max) = self.max_cells {
            config.max_cells = max;
        }
        if let Some((w, h)) = self.max_size {
            config.max_display_width = w;
            config.max_display_height = h;
        }
        config.clamp_all();
    }
}

/// Resolve config: file (or defaults when missing), then CLI overrides.
///
/// # Errors
/// Returns an error if the config file exists but is invalid.
pub fn resolve_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        ScanConfig::default()
    };
    Overrides::from_cli(cli).apply(&mut config);
    Ok(config)
}

/// Décode l'image puis la réduit à la taille d'affichage maximale.
///
/// # Errors
/// Returns an error if the file is missing, not an image, or cannot be resized.
pub fn load_source(path: &Path, config: &ScanConfig) -> Result<LoadedImage> {
    let decoded = load_image(path)?;
    let frame = fit_within(
        &decoded,
        config.max_display_width,
        config.max_display_height,
    )?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.display().to_string(), String::from);
    Ok(LoadedImage { name, frame })
}

/// Pas effectif : le pas demandé, relevé jusqu'à respecter le plafond de cellules.
#[must_use]
pub fn effective_stride(
    requested: SampleStride,
    frame: &FrameBuffer,
    max_cells: u64,
) -> SampleStride {
    let stride = SampleStride::bounded(requested, frame.width, frame.height, max_cells);
    if stride != requested {
        log::info!(
            "stride {requested} would sample {} cells (max {max_cells}), using {stride}",
            requested.cells(frame.width, frame.height)
        );
    }
    stride
}

/// Un seul balayage au pas effectif.
///
/// # Errors
/// Returns an error if the frame is empty or the symbol table is invalid.
pub fn render_frame(
    renderer: &Renderer,
    frame: &FrameBuffer,
    requested: SampleStride,
    max_cells: u64,
) -> Result<Rendered> {
    let view = frame.view()?;
    let stride = effective_stride(requested, frame, max_cells);
    Ok(renderer.render(&view, stride))
}

/// Écrit toutes les sorties demandées à partir du même rendu.
///
/// # Errors
/// Returns an error if any export fails.
pub fn export_all(
    rendered: &Rendered,
    frame: &FrameBuffer,
    config: &ScanConfig,
    targets: &ExportTargets<'_>,
) -> Result<()> {
    if let Some(path) = targets.text {
        write_text(path, &rendered.text())?;
    }
    if let Some(path) = targets.json {
        write_glyphs_json(path, rendered.scan())?;
    }
    if let Some(path) = targets.png {
        let size = (frame.width, frame.height);
        let mut raster = match targets.font {
            Some(font) => {
                Rasterizer::from_font_file(font, size, config.background, config.min_font_px)?
            }
            None => {
                log::warn!("no --font given, painting glyphs as blocks");
                Rasterizer::blocks(size, config.background, config.min_font_px)
            }
        };
        rendered.draw(&mut raster);
        raster.save_png(path)?;
    }
    Ok(())
}

/// Mode sans terminal : un balayage, exports, texte sur stdout si rien d'autre.
///
/// # Errors
/// Returns an error if loading, rendering, or exporting fails.
pub fn run_headless(cli: &Cli, config: &ScanConfig) -> Result<()> {
    let source = load_source(&cli.image, config)?;
    let renderer = Renderer::from_config(config)?;
    let rendered = render_frame(
        &renderer,
        &source.frame,
        config.requested_stride(),
        config.max_cells,
    )?;
    export_all(&rendered, &source.frame, config, &ExportTargets::from_cli(cli))?;
    if !cli.has_exports() {
        println!("{}", rendered.text());
    }
    Ok(())
}
