//! Notify-based notification source.

use crate::{
    classifier::EventKind,
    error::{Error, Result},
    events::RawNotification,
    traits::WatchRegistrar,
};
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, error, trace, warn};

/// Receiving halves of a notification source: notifications and fatal errors.
pub type SourceChannels = (
    mpsc::UnboundedReceiver<RawNotification>,
    mpsc::UnboundedReceiver<Error>,
);

/// Notification source backed by the platform's recommended notify watcher.
///
/// Every directory is watched non-recursively; recursive sessions register
/// each directory individually so newly created ones can be added on the fly.
pub struct NotifySource {
    watcher: RecommendedWatcher,
}

impl NotifySource {
    /// Create a source and the channels it delivers on.
    ///
    /// Only notifications whose kind is in `forwarded` reach the event
    /// channel; see [`crate::classifier::source_kinds`].
    pub fn new(forwarded: EventKind) -> Result<(Self, SourceChannels)> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    if event.need_rescan() {
                        warn!("Notification queue overflowed; some events were lost");
                    }
                    for raw in convert_notify_event(event, forwarded) {
                        if event_tx.send(raw).is_err() {
                            trace!("Event receiver dropped");
                        }
                    }
                }
                Err(e) if is_transient(&e) => {
                    warn!("Watcher error: {}", e);
                }
                Err(e) => {
                    error!("Fatal watcher error: {}", e);
                    let _ = error_tx.send(Error::from(e));
                }
            }
        })
        .map_err(|e| Error::Watch(format!("Failed to create notify watcher: {}", e)))?;

        Ok((Self { watcher }, (event_rx, error_rx)))
    }
}

impl WatchRegistrar for NotifySource {
    fn add_watch(&mut self, path: &Path) -> Result<()> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("Failed to watch {}: {}", path.display(), e)))?;
        debug!("Added watch: {}", path.display());
        Ok(())
    }
}

/// Errors about paths that vanished between notification and handling.
fn is_transient(err: &notify::Error) -> bool {
    matches!(
        err.kind,
        notify::ErrorKind::PathNotFound | notify::ErrorKind::WatchNotFound
    )
}

/// Convert a notify event into one raw notification per affected path.
///
/// Rename pairs reported as `Name(Both)` are skipped: the backends that emit
/// them also report the `From` and `To` halves separately. Kinds outside
/// `forwarded` are dropped.
pub(crate) fn convert_notify_event(
    event: notify::Event,
    forwarded: EventKind,
) -> Vec<RawNotification> {
    use notify::EventKind as Kind;

    let kinds = match event.kind {
        Kind::Create(_) => EventKind::CREATE,
        Kind::Modify(ModifyKind::Metadata(_)) => EventKind::CHMOD,
        Kind::Modify(ModifyKind::Name(RenameMode::To)) => EventKind::CREATE,
        Kind::Modify(ModifyKind::Name(RenameMode::Both)) => EventKind::empty(),
        Kind::Modify(ModifyKind::Name(_)) => EventKind::RENAME,
        Kind::Modify(_) => EventKind::WRITE,
        Kind::Remove(_) => EventKind::REMOVE,
        Kind::Access(AccessKind::Open(_)) => EventKind::OPEN,
        Kind::Access(AccessKind::Read) => EventKind::READ,
        Kind::Access(AccessKind::Close(AccessMode::Write)) => EventKind::CLOSE_WRITE,
        Kind::Access(AccessKind::Close(_)) => EventKind::CLOSE_READ,
        Kind::Access(_) | Kind::Any | Kind::Other => EventKind::empty(),
    };

    if !forwarded.intersects(kinds) {
        trace!("Ignoring notify event {:?} for {:?}", event.kind, event.paths);
        return Vec::new();
    }

    event
        .paths
        .into_iter()
        .map(|path| RawNotification::new(path, kinds))
        .collect()
}
