//! Initial watch registration for the configured directories.

use crate::{config::WatchConfig, traits::WatchRegistrar};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Register watches for every configured directory and return how many were
/// added.
///
/// In recursive mode every directory below each watch root is registered,
/// except excluded directories and everything beneath them. Failures are
/// logged and skipped.
pub fn register_watches<R>(config: &WatchConfig, registrar: &mut R) -> usize
where
    R: WatchRegistrar + ?Sized,
{
    info!("Starting watcher for directories: {:?}", config.watch_dirs);
    if config.recursive {
        info!("Recursive mode enabled.");
    }
    info!("Watching for patterns: {:?}", config.patterns);
    info!("Triggering on events: {:?}", config.event_types);
    info!("Command template configured: {}", config.command_template);

    let excluded = absolute_excludes(config);
    let mut added = 0;

    for dir in &config.watch_dirs {
        if !config.recursive {
            info!("Adding watch for: {}", dir.display());
            match registrar.add_watch(dir) {
                Ok(()) => added += 1,
                Err(e) => warn!("Failed to add watch for {}: {}", dir.display(), e),
            }
            continue;
        }

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && is_excluded(entry.path(), &excluded))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error accessing path: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            debug!("Adding recursive watch for: {}", entry.path().display());
            match registrar.add_watch(entry.path()) {
                Ok(()) => added += 1,
                Err(e) => warn!(
                    "Failed to add recursive watch for {}: {}",
                    entry.path().display(),
                    e
                ),
            }
        }
    }

    if added == 0 {
        warn!("No directories are being watched");
    }
    added
}

fn absolute_excludes(config: &WatchConfig) -> Vec<PathBuf> {
    if config.exclude_dirs.is_empty() {
        return Vec::new();
    }
    info!("Excluding directories: {:?}", config.exclude_dirs);

    config
        .exclude_dirs
        .iter()
        .filter_map(|dir| match std::path::absolute(dir) {
            Ok(abs) => Some(abs),
            Err(e) => {
                warn!(
                    "Could not get absolute path for excluded directory {}: {}",
                    dir.display(),
                    e
                );
                None
            }
        })
        .collect()
}

/// Whether `path` is an excluded directory or lies beneath one.
fn is_excluded(path: &Path, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() {
        return false;
    }
    match std::path::absolute(path) {
        Ok(abs) => {
            let skip = excluded.iter().any(|ex| abs.starts_with(ex));
            if skip {
                debug!("Skipping excluded directory: {}", path.display());
            }
            skip
        }
        Err(e) => {
            warn!("Could not get absolute path for {}: {}", path.display(), e);
            false
        }
    }
}
