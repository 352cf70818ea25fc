//! Kind and glob filtering of raw notifications.

use crate::{
    classifier::AllowedEvents,
    events::{file_name, EnrichedEvent, RawNotification},
};
use globset::{Glob, GlobMatcher};
use tracing::{info, trace, warn};

/// Compiled glob patterns matched against base file names.
///
/// Character classes negate with either `[!...]` or `[^...]`.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<GlobMatcher>,
}

impl PatternSet {
    /// Compile `patterns`, logging and skipping any that are malformed.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Glob::new(p.as_ref()) {
                Ok(glob) => Some(glob.compile_matcher()),
                Err(e) => {
                    warn!("Skipping malformed pattern '{}': {}", p.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Whether `name` matches at least one pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no usable pattern was configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Decides which raw notifications become [`EnrichedEvent`]s.
///
/// Filtering is pure: it never touches watch registration, which is the
/// job of [`crate::recursive`].
#[derive(Debug, Clone)]
pub struct EventFilter {
    allowed: AllowedEvents,
    patterns: PatternSet,
}

impl EventFilter {
    /// Create a filter from the resolved kinds and compiled patterns.
    pub fn new(allowed: AllowedEvents, patterns: PatternSet) -> Self {
        Self { allowed, patterns }
    }

    /// Compiled patterns.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Match `raw` against the allowed kinds, then the patterns.
    pub fn filter(&self, raw: &RawNotification) -> Option<EnrichedEvent> {
        let Some(kind) = self.allowed.first_match(raw.kinds) else {
            trace!("Ignoring event type {} for {}", raw.kinds, raw.path.display());
            return None;
        };

        let name = file_name(&raw.path);
        if !self.patterns.matches(&name) {
            trace!("Ignoring file {} (no pattern match)", raw.path.display());
            return None;
        }

        info!("Detected {} event for: {}", kind.label(), raw.path.display());
        Some(EnrichedEvent::new(raw.path.clone(), kind.label()))
    }
}
