//! The debounce coordinator: one loop that filters notifications, coalesces
//! bursts and fires the executor.
//!
//! The loop is the only owner of the debounce state, so no locking is needed.
//! The timer is a single pinned [`Sleep`] that is reset in place; a deadline
//! that elapsed but was never polled is simply overwritten by the reset, so a
//! stale tick can never fire twice. The timer branch is polled before new
//! notifications, so an event arriving after the quiescence period has
//! already passed does not swallow the pending one.

use crate::{
    classifier::AllowedEvents,
    config::WatchConfig,
    error::{Error, Result},
    events::{EnrichedEvent, RawNotification},
    filter::{EventFilter, PatternSet},
    recursive,
    traits::{EventExecutor, WatchRegistrar},
};
use std::pin::Pin;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, Sleep};
use tracing::{debug, error, info};

/// Coordinator-local debounce state.
#[derive(Debug, Default)]
enum DebounceState {
    /// No timer armed.
    #[default]
    Idle,
    /// Timer armed; the newest event waits for quiescence.
    Pending(EnrichedEvent),
}

impl DebounceState {
    fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Drives a watch session from raw notifications to command execution.
pub struct Coordinator<R, E> {
    config: WatchConfig,
    filter: EventFilter,
    registrar: R,
    executor: E,
}

impl<R, E> Coordinator<R, E>
where
    R: WatchRegistrar,
    E: EventExecutor,
{
    /// Create a coordinator for `config`.
    ///
    /// `allowed` must already be resolved from `config.event_types`, so that
    /// configuration errors surface before any watch is registered.
    pub fn new(config: WatchConfig, allowed: AllowedEvents, registrar: R, executor: E) -> Self {
        let filter = EventFilter::new(allowed, PatternSet::new(&config.patterns));
        Self {
            config,
            filter,
            registrar,
            executor,
        }
    }

    /// Run until the notification source closes or reports a fatal error.
    pub async fn run(
        mut self,
        mut events: UnboundedReceiver<RawNotification>,
        mut errors: UnboundedReceiver<Error>,
    ) -> Result<()> {
        if !self.config.debounce.is_zero() {
            info!("Debounce delay set to: {:?}", self.config.debounce);
        }

        if self.config.run_on_start {
            info!("Running command once at startup");
            self.executor.execute(&self.config, None).await;
        }

        let timer = tokio::time::sleep(self.config.debounce);
        tokio::pin!(timer);
        let mut state = DebounceState::Idle;

        loop {
            tokio::select! {
                biased;

                err = errors.recv() => match err {
                    Some(e) => {
                        error!("Watcher error: {}", e);
                        return Err(e);
                    }
                    None => {
                        debug!("Error channel closed");
                        break;
                    }
                },

                () = &mut timer, if state.is_pending() => {
                    debug!("Debounce timer fired");
                    if let DebounceState::Pending(event) = std::mem::take(&mut state) {
                        self.executor.execute(&self.config, Some(&event)).await;
                    }
                }

                raw = events.recv() => match raw {
                    Some(raw) => {
                        for event in self.dispatch(&raw) {
                            self.submit(event, &mut state, timer.as_mut()).await;
                        }
                    }
                    None => {
                        debug!("Event channel closed");
                        break;
                    }
                },
            }
        }

        if let DebounceState::Pending(event) = state {
            debug!("Dropping pending event for {} at shutdown", event.path.display());
        }
        info!("Watcher stopped.");
        Ok(())
    }

    /// Turn one notification into zero or more events.
    fn dispatch(&mut self, raw: &RawNotification) -> Vec<EnrichedEvent> {
        if let Some(events) = recursive::handle_directory_create(
            raw,
            self.config.recursive,
            &mut self.registrar,
            self.filter.patterns(),
        ) {
            return events;
        }
        self.filter.filter(raw).into_iter().collect()
    }

    /// Fire immediately or (re)arm the debounce timer.
    async fn submit(
        &self,
        event: EnrichedEvent,
        state: &mut DebounceState,
        timer: Pin<&mut Sleep>,
    ) {
        if self.config.debounce.is_zero() {
            self.executor.execute(&self.config, Some(&event)).await;
            return;
        }

        if state.is_pending() {
            debug!("Resetting debounce timer for {}", event.path.display());
        } else {
            debug!("Debouncing event for {}", event.path.display());
        }
        *state = DebounceState::Pending(event);
        timer.reset(Instant::now() + self.config.debounce);
    }
}
