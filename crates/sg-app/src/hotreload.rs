use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use sg_core::config::ScanConfig;

/// Lance un thread qui surveille le fichier config et met à jour l'`ArcSwap`.
///
/// `overrides` est réappliqué à chaque rechargement pour que les flags CLI
/// gardent la priorité sur le fichier.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher<F>(
    config_path: &Path,
    config: &Arc<ArcSwap<ScanConfig>>,
    overrides: F,
) -> Result<impl Watcher + use<F>>
where
    F: Fn(&mut ScanConfig) + Send + 'static,
{
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_))
        {
            match sg_core::config::load_config(&path) {
                Ok(mut new_config) => {
                    overrides(&mut new_config);
                    config.store(Arc::new(new_config));
                    log::info!("Config rechargée depuis {}", path.display());
                }
                Err(e) => {
                    // On garde l'ancienne config.
                    log::warn!("Erreur de rechargement config : {e:#}");
                }
            }
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
