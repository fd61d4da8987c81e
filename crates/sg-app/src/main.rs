use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;

pub mod app;
pub mod cli;
pub mod hotreload;
pub mod pipeline;

/// Destination de la touche `e` sans `--export-text`.
const DEFAULT_EXPORT_TEXT: &str = "scanglyph.txt";

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config + overrides CLI
    let config = pipeline::resolve_config(&cli)?;

    // 4. Mode sans terminal : un balayage, exports, sortie
    if cli.headless {
        return pipeline::run_headless(&cli, &config);
    }

    // 5. Source
    let source = pipeline::load_source(&cli.image, &config)?;
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 6. Hot-reload config (thread interne notify), seulement si le fichier existe
    let overrides = pipeline::Overrides::from_cli(&cli);
    let _watcher = if cli.config.exists() {
        Some(hotreload::spawn_config_watcher(
            &cli.config,
            &config,
            move |c| overrides.apply(c),
        )?)
    } else {
        None
    };

    // 7. Construire l'App
    let export_path = cli
        .export_text
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_TEXT));
    let mut app_instance = app::App::new(config, cli.image.clone(), source, export_path)?;

    // 7b. Exports demandés au lancement, depuis le balayage affiché
    if cli.has_exports() {
        app_instance.export_startup(&pipeline::ExportTargets::from_cli(&cli))?;
    }

    // 8. Initialiser le terminal ratatui + boucle principale
    let terminal = ratatui::init();
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}
