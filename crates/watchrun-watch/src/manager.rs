//! Session wiring: configuration, backend, setup walk and coordinator.

use crate::{
    backends::NotifySource,
    classifier::{self, EventKind},
    config::WatchConfig,
    debounce::Coordinator,
    error::Result,
    setup,
    template::CommandTemplate,
    traits::EventExecutor,
};
use tracing::{debug, info};

/// Run a complete watch session with the notify backend.
///
/// Configuration errors (including malformed command templates and event
/// types the platform cannot report) are returned before any watch is
/// registered. Afterwards the call only returns when the notification source
/// closes or fails.
pub async fn run<E>(config: WatchConfig, executor: E) -> Result<()>
where
    E: EventExecutor,
{
    run_on_platform(config, executor, EventKind::fine_grained_supported()).await
}

async fn run_on_platform<E>(config: WatchConfig, executor: E, fine_grained: bool) -> Result<()>
where
    E: EventExecutor,
{
    config.validate()?;
    debug!(config = ?config, "Starting watch session");
    let template = CommandTemplate::parse(&config.command_template)?;
    debug!(
        "Command template placeholders: {:?}",
        template.placeholders().collect::<Vec<_>>()
    );
    let allowed = classifier::resolve_for_platform(&config.event_types, fine_grained)?;
    info!("Resolved event kinds: {}", allowed.kinds());

    let forwarded = classifier::source_kinds(&config.event_types);
    let (mut source, (events, errors)) = NotifySource::new(forwarded)?;
    setup::register_watches(&config, &mut source);

    Coordinator::new(config, allowed, source, executor)
        .run(events, errors)
        .await
}
