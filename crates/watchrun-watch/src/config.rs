//! Configuration for a watch session.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Default pattern: any file name containing a dot.
pub const DEFAULT_PATTERN: &str = "*.*";

/// Default event type: every kind the platform reports.
pub const DEFAULT_EVENT_TYPE: &str = "all";

/// Immutable configuration for one watch session.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    /// Directories to watch.
    pub watch_dirs: Vec<PathBuf>,

    /// Directories skipped by the recursive setup walk.
    pub exclude_dirs: Vec<PathBuf>,

    /// Glob patterns matched against base file names.
    pub patterns: Vec<String>,

    /// Requested event-type names, resolved by [`crate::classifier::resolve`].
    pub event_types: Vec<String>,

    /// Command template, e.g. `go test {{.Dir}}`.
    pub command_template: String,

    /// Watch subdirectories and pick up newly created ones.
    pub recursive: bool,

    /// Quiescence period before firing; zero fires every event immediately.
    pub debounce: Duration,

    /// Clear the terminal before each command.
    pub clear_terminal: bool,

    /// Run the command once before the first event.
    pub run_on_start: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watch_dirs: vec![PathBuf::from(".")],
            exclude_dirs: Vec::new(),
            patterns: vec![DEFAULT_PATTERN.to_string()],
            event_types: vec![DEFAULT_EVENT_TYPE.to_string()],
            command_template: String::new(),
            recursive: false,
            debounce: Duration::ZERO,
            clear_terminal: false,
            run_on_start: false,
        }
    }
}

impl WatchConfig {
    /// Create a configuration running `command_template` with default settings.
    pub fn new(command_template: impl Into<String>) -> Self {
        Self {
            command_template: command_template.into(),
            ..Self::default()
        }
    }

    /// Replace the watched directories.
    pub fn with_watch_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.watch_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the excluded directories.
    pub fn with_exclude_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the file name patterns.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the requested event types.
    pub fn with_event_types<I, S>(mut self, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types = event_types.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable recursive watching.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the debounce period.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Clear the terminal before each command.
    pub fn with_clear_terminal(mut self, clear: bool) -> Self {
        self.clear_terminal = clear;
        self
    }

    /// Run the command once at startup.
    pub fn with_run_on_start(mut self, run: bool) -> Self {
        self.run_on_start = run;
        self
    }

    /// Check the configuration before a session starts.
    pub fn validate(&self) -> Result<()> {
        if self.command_template.trim().is_empty() {
            return Err(Error::Config("command template must not be empty".to_string()));
        }

        if self.watch_dirs.is_empty() {
            return Err(Error::Config(
                "at least one watch directory is required".to_string(),
            ));
        }

        if self.patterns.is_empty() {
            warn!("No patterns configured; no file will trigger the command");
        }

        if !self.exclude_dirs.is_empty() && !self.recursive {
            warn!("Excluded directories only apply in recursive mode");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_watch_current_dir_for_everything() {
        let config = WatchConfig::new("echo {{.Path}}");
        assert_eq!(config.watch_dirs, vec![PathBuf::from(".")]);
        assert_eq!(config.patterns, vec!["*.*"]);
        assert_eq!(config.event_types, vec!["all"]);
        assert_eq!(config.debounce, Duration::ZERO);
        assert!(!config.recursive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = WatchConfig::new("make")
            .with_watch_dirs(["src", "tests"])
            .with_exclude_dirs(["src/target"])
            .with_patterns(["*.rs"])
            .with_event_types(["write", "create"])
            .with_recursive(true)
            .with_debounce(Duration::from_millis(300))
            .with_clear_terminal(true)
            .with_run_on_start(true);

        assert_eq!(config.watch_dirs.len(), 2);
        assert_eq!(config.exclude_dirs, vec![PathBuf::from("src/target")]);
        assert_eq!(config.event_types, vec!["write", "create"]);
        assert!(config.recursive && config.clear_terminal && config.run_on_start);
        assert_eq!(config.debounce, Duration::from_millis(300));
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = WatchConfig::new("   ").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_watch_dirs_are_rejected() {
        let config = WatchConfig::new("make").with_watch_dirs(Vec::<PathBuf>::new());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
