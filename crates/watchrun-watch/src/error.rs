//! Error types for the watch-and-run engine.

use thiserror::Error;

/// Errors that can occur while configuring or running a watch session.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An event type that only exists on inotify-style kernels was requested elsewhere.
    #[error("'{0}' event is only supported on Linux and FreeBSD")]
    UnsupportedEvent(String),

    /// File system watching error.
    #[error("File watching error: {0}")]
    Watch(String),

    /// Command template error.
    #[error("Template error: {0}")]
    Template(String),

    /// Command execution error.
    #[error("Execution error: {0}")]
    Execution(String),
}

/// Result type for watch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert notify errors to our error type.
impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_errors_become_watch_errors() {
        let err: Error = notify::Error::generic("inotify limit reached").into();
        assert!(matches!(err, Error::Watch(msg) if msg.contains("inotify limit")));
    }

    #[test]
    fn unsupported_event_names_the_event() {
        let err = Error::UnsupportedEvent("closewrite".into());
        assert_eq!(
            err.to_string(),
            "'closewrite' event is only supported on Linux and FreeBSD"
        );
    }
}
