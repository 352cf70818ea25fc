//! Handling of directories created while watching recursively.
//!
//! The backend only watches directories registered with it, so a directory
//! created mid-session must be registered on the fly. Files that landed in it
//! before the watch existed are picked up with a one-level scan. Deeper trees
//! created in one go are only seen through later notifications from the new
//! watch.

use crate::{
    classifier::EventKind,
    events::{EnrichedEvent, RawNotification},
    filter::PatternSet,
    traits::WatchRegistrar,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Handle `raw` if it reports a newly created directory in recursive mode.
///
/// Returns `None` when the notification is not a directory creation (or the
/// path cannot be stat'ed) and should go through normal filtering. Otherwise
/// returns the `CREATE` events synthesized for matching files already inside
/// the directory; the directory notification itself is consumed.
pub fn handle_directory_create<R>(
    raw: &RawNotification,
    recursive: bool,
    registrar: &mut R,
    patterns: &PatternSet,
) -> Option<Vec<EnrichedEvent>>
where
    R: WatchRegistrar + ?Sized,
{
    if !recursive || !raw.kinds.contains(EventKind::CREATE) {
        return None;
    }

    match fs::metadata(&raw.path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return None,
        Err(e) => {
            debug!("Could not stat created path {}: {}", raw.path.display(), e);
            return None;
        }
    }

    debug!(
        "Detected directory creation: {}. Adding watch and scanning...",
        raw.path.display()
    );

    if let Err(e) = registrar.add_watch(&raw.path) {
        warn!(
            "Failed to add recursive watch for newly created directory {}: {}",
            raw.path.display(),
            e
        );
    }

    Some(scan_new_directory(&raw.path, patterns))
}

fn scan_new_directory(dir: &Path, patterns: &PatternSet) -> Vec<EnrichedEvent> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Failed to read newly created directory {} for initial scan: {}",
                dir.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to read entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| patterns.matches(name))
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let path = dir.join(&name);
            info!("Detected matching file in new directory: {}", path.display());
            EnrichedEvent::new(path, EventKind::CREATE.label())
        })
        .collect()
}
