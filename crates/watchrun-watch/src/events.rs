//! Raw notifications and the enriched events handed to the executor.

use crate::classifier::EventKind;
use std::path::{Path, PathBuf};

/// A change notification as delivered by the notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNotification {
    /// Path the notification refers to.
    pub path: PathBuf,

    /// Every kind reported for this path.
    pub kinds: EventKind,
}

impl RawNotification {
    /// Create a new raw notification.
    pub fn new(path: impl Into<PathBuf>, kinds: EventKind) -> Self {
        Self {
            path: path.into(),
            kinds,
        }
    }
}

/// A filtered event together with the metadata substituted into the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEvent {
    /// Path as reported by the backend.
    pub path: PathBuf,

    /// Base file name.
    pub name: String,

    /// Label of the kind that triggered this event, e.g. `WRITE`.
    pub event: String,

    /// Extension of `name` including the leading dot, empty if none.
    pub ext: String,

    /// Directory containing the file.
    pub dir: PathBuf,

    /// `name` without `ext`.
    pub base_name: String,
}

impl EnrichedEvent {
    /// Build an event for `path`, labelled with `event`.
    pub fn new(path: impl Into<PathBuf>, event: impl Into<String>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        let ext = extension(&name).to_string();
        let base_name = name[..name.len() - ext.len()].to_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => path.clone(),
        };

        Self {
            path,
            name,
            event: event.into(),
            ext,
            dir,
            base_name,
        }
    }
}

/// Final path component, falling back to the whole path for roots and `..`.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Suffix of `name` starting at its last dot, empty when there is no dot.
fn extension(name: &str) -> &str {
    name.rfind('.').map(|i| &name[i..]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enriched_event_splits_name() {
        let ev = EnrichedEvent::new("/src/app/main.go", "WRITE");
        assert_eq!(ev.name, "main.go");
        assert_eq!(ev.ext, ".go");
        assert_eq!(ev.base_name, "main");
        assert_eq!(ev.dir, PathBuf::from("/src/app"));
        assert_eq!(ev.event, "WRITE");
    }

    #[test]
    fn extension_uses_last_dot() {
        let ev = EnrichedEvent::new("backup/archive.tar.gz", "CREATE");
        assert_eq!(ev.ext, ".gz");
        assert_eq!(ev.base_name, "archive.tar");
    }

    #[test]
    fn no_extension_leaves_name_intact() {
        let ev = EnrichedEvent::new("/repo/Makefile", "CHMOD");
        assert_eq!(ev.ext, "");
        assert_eq!(ev.base_name, "Makefile");
    }

    #[test]
    fn dotfile_is_all_extension() {
        let ev = EnrichedEvent::new("/home/me/.bashrc", "WRITE");
        assert_eq!(ev.ext, ".bashrc");
        assert_eq!(ev.base_name, "");
    }

    #[test]
    fn bare_file_name_lives_in_current_dir() {
        let ev = EnrichedEvent::new("notes.txt", "WRITE");
        assert_eq!(ev.dir, PathBuf::from("."));
        assert_eq!(ev.path, PathBuf::from("notes.txt"));
    }
}
