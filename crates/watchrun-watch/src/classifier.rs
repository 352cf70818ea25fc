//! Event kinds and resolution of configured event-type names.

use crate::error::{Error, Result};
use bitflags::bitflags;
use std::fmt;
use tracing::{debug, warn};

bitflags! {
    /// Operation kinds carried by a raw notification.
    ///
    /// A single notification may report several kinds at once (e.g. a write
    /// that also touched permissions). The last four kinds are only produced
    /// by inotify-style kernels; see [`EventKind::fine_grained_supported`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventKind: u16 {
        /// File or directory was created.
        const CREATE = 1 << 0;
        /// File content was written.
        const WRITE = 1 << 1;
        /// File or directory was removed.
        const REMOVE = 1 << 2;
        /// File or directory was renamed away from this path.
        const RENAME = 1 << 3;
        /// Attributes or permissions changed.
        const CHMOD = 1 << 4;
        /// File was opened.
        const OPEN = 1 << 5;
        /// File was read.
        const READ = 1 << 6;
        /// File opened for writing was closed.
        const CLOSE_WRITE = 1 << 7;
        /// File opened read-only was closed.
        const CLOSE_READ = 1 << 8;
    }
}

impl EventKind {
    /// Kinds every notification backend can report.
    pub const PORTABLE: EventKind = EventKind::CREATE
        .union(EventKind::WRITE)
        .union(EventKind::REMOVE)
        .union(EventKind::RENAME)
        .union(EventKind::CHMOD);

    /// Kinds only reported by inotify-style kernels.
    pub const FINE_GRAINED: EventKind = EventKind::OPEN
        .union(EventKind::READ)
        .union(EventKind::CLOSE_WRITE)
        .union(EventKind::CLOSE_READ);

    /// Order in which kinds are checked when labelling a notification.
    pub const PRIORITY: [EventKind; 9] = [
        EventKind::CREATE,
        EventKind::WRITE,
        EventKind::REMOVE,
        EventKind::RENAME,
        EventKind::CHMOD,
        EventKind::OPEN,
        EventKind::READ,
        EventKind::CLOSE_WRITE,
        EventKind::CLOSE_READ,
    ];

    /// Whether the running platform reports open/read/close notifications.
    pub fn fine_grained_supported() -> bool {
        cfg!(any(target_os = "linux", target_os = "freebsd"))
    }

    /// Every kind the running platform can report.
    pub fn supported() -> EventKind {
        Self::supported_for(Self::fine_grained_supported())
    }

    fn supported_for(fine_grained: bool) -> EventKind {
        if fine_grained {
            Self::PORTABLE | Self::FINE_GRAINED
        } else {
            Self::PORTABLE
        }
    }

    /// Label substituted into the `Event` placeholder.
    ///
    /// Only meaningful for a single kind; combined sets report the label of
    /// their highest-priority member.
    pub fn label(self) -> &'static str {
        match Self::PRIORITY.iter().find(|k| self.contains(**k)) {
            Some(&k) if k == Self::CREATE => "CREATE",
            Some(&k) if k == Self::WRITE => "WRITE",
            Some(&k) if k == Self::REMOVE => "REMOVE",
            Some(&k) if k == Self::RENAME => "RENAME",
            Some(&k) if k == Self::CHMOD => "CHMOD",
            Some(&k) if k == Self::OPEN => "OPEN",
            Some(&k) if k == Self::READ => "READ",
            Some(&k) if k == Self::CLOSE_WRITE => "CLOSE_WRITE",
            Some(_) => "CLOSE_READ",
            None => "",
        }
    }

    /// Parse a single configured event-type name, ignoring case.
    ///
    /// Returns `None` for unknown names and for `all`, which is handled by
    /// [`resolve`].
    pub fn parse_name(name: &str) -> Option<EventKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "create" => Some(Self::CREATE),
            "write" => Some(Self::WRITE),
            "remove" => Some(Self::REMOVE),
            "rename" => Some(Self::RENAME),
            "chmod" => Some(Self::CHMOD),
            "open" => Some(Self::OPEN),
            "read" => Some(Self::READ),
            "closewrite" => Some(Self::CLOSE_WRITE),
            "closeread" => Some(Self::CLOSE_READ),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = Self::PRIORITY
            .iter()
            .filter(|k| self.contains(**k))
            .map(|k| k.label())
            .collect();
        write!(f, "{}", labels.join("|"))
    }
}

/// The immutable set of kinds allowed to trigger a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowedEvents(EventKind);

impl AllowedEvents {
    /// Wrap an explicit set of kinds.
    pub fn new(kinds: EventKind) -> Self {
        Self(kinds)
    }

    /// The underlying kind set.
    pub fn kinds(&self) -> EventKind {
        self.0
    }

    /// Whether no kind is allowed at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First allowed kind (in [`EventKind::PRIORITY`] order) present in `raw`.
    pub fn first_match(&self, raw: EventKind) -> Option<EventKind> {
        EventKind::PRIORITY
            .into_iter()
            .find(|k| self.0.contains(*k) && raw.contains(*k))
    }
}

/// Resolve configured event-type names for the running platform.
pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<AllowedEvents> {
    resolve_for_platform(names, EventKind::fine_grained_supported())
}

/// Resolve configured event-type names, stating whether the platform reports
/// fine-grained (open/read/close) notifications.
///
/// `all` anywhere in the list wins over every other name. Unknown names are
/// logged and dropped. Requesting a fine-grained kind without platform support
/// is a hard error.
pub fn resolve_for_platform<S: AsRef<str>>(
    names: &[S],
    fine_grained: bool,
) -> Result<AllowedEvents> {
    if names
        .iter()
        .any(|n| n.as_ref().trim().eq_ignore_ascii_case("all"))
    {
        let kinds = EventKind::supported_for(fine_grained);
        debug!("Event type 'all' resolved to {}", kinds);
        return Ok(AllowedEvents(kinds));
    }

    let mut kinds = EventKind::empty();
    for name in names {
        let name = name.as_ref();
        match EventKind::parse_name(name) {
            Some(kind) if EventKind::FINE_GRAINED.contains(kind) && !fine_grained => {
                return Err(Error::UnsupportedEvent(name.trim().to_ascii_lowercase()));
            }
            Some(kind) => kinds |= kind,
            None => warn!("Unknown event type '{}' ignored", name),
        }
    }

    if kinds.is_empty() {
        warn!("No recognised event types configured; no event will trigger the command");
    }

    Ok(AllowedEvents(kinds))
}

/// Kinds the notification source should forward for `names`.
///
/// inotify reports open, read and close activity unconditionally. Those kinds
/// are forwarded only when requested by name, never through `all`; otherwise a
/// command that reads the changed file would trigger itself again.
pub fn source_kinds<S: AsRef<str>>(names: &[S]) -> EventKind {
    names
        .iter()
        .filter_map(|n| EventKind::parse_name(n.as_ref()))
        .filter(|k| EventKind::FINE_GRAINED.contains(*k))
        .fold(EventKind::PORTABLE, |acc, k| acc | k)
}
