//! # watchrun file watching engine
//!
//! Watches directories, filters change notifications by event kind and file
//! name pattern, coalesces bursts with a debounce timer and runs a command
//! template for each resulting event.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │  NotifySource   │───▶│   EventFilter    │───▶│   Coordinator   │
//! │ (raw + errors)  │    │ (kinds, globs)   │    │  (debounce)     │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//!         ▲                       │                       │
//!         │                       ▼                       ▼
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │  setup walk /   │◀───│ recursive create │    │  EventExecutor  │
//! │  WatchRegistrar │    │     handler      │    │  (shell)        │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! Everything after the notification source runs on a single task, so the
//! executor never runs concurrently with itself.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod backends;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod executor;
pub mod filter;
mod manager;
pub mod recursive;
pub mod setup;
pub mod template;
pub mod traits;

pub use backends::{NotifySource, SourceChannels};
pub use classifier::{resolve, resolve_for_platform, source_kinds, AllowedEvents, EventKind};
pub use config::WatchConfig;
pub use debounce::Coordinator;
pub use error::*;
pub use events::{EnrichedEvent, RawNotification};
pub use executor::ShellExecutor;
pub use filter::{EventFilter, PatternSet};
pub use manager::run;
pub use template::{CommandTemplate, Placeholder};
pub use traits::{EventExecutor, WatchRegistrar};
