//! Notification backends.

pub mod notify_backend;

pub use notify_backend::{NotifySource, SourceChannels};
