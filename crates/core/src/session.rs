//! Async driver connecting a [`SearchController`] to its debounce timer and a
//! [`SearchProvider`].
//!
//! The session owns the firing half of the debounce channel and the completion
//! channel for in-flight provider calls. Each [`step`](SearchSession::step)
//! applies exactly one of them to the controller, so every controller mutation
//! still happens synchronously inside one turn.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::{FetchTicket, SearchController};
use crate::debounce::DebounceReceiver;
use crate::error::{ConfigError, ProviderError};
use crate::provider::SearchProvider;
use crate::types::{FilterConfig, SearchResultItem};

type Completion<R> = (FetchTicket, Result<Vec<R>, ProviderError>);

/// What one [`SearchSession::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStep {
    /// The debounce fired and a provider call went out.
    Issued(FetchTicket),
    /// The debounce fired for a query below the minimum length.
    Skipped,
    /// A provider call finished and its result was applied.
    Applied { generation: u64 },
    /// A provider call finished after being superseded; its result was dropped.
    Discarded { generation: u64 },
}

/// A controller plus everything needed to run it against a provider.
pub struct SearchSession<P: SearchProvider, T> {
    controller: SearchController<P::Record, T>,
    triggers: DebounceReceiver<String>,
    provider: Arc<P>,
    completions_tx: mpsc::UnboundedSender<Completion<P::Record>>,
    completions_rx: mpsc::UnboundedReceiver<Completion<P::Record>>,
    in_flight: usize,
}

impl<P: SearchProvider, T: Clone> SearchSession<P, T> {
    pub fn new<F>(provider: P, mapper: F) -> Self
    where
        F: Fn(P::Record) -> SearchResultItem<T> + Send + Sync + 'static,
    {
        let (controller, triggers) = SearchController::new(mapper);
        Self::from_parts(provider, controller, triggers)
    }

    /// Wrap an already-configured controller.
    pub fn from_parts(
        provider: P,
        controller: SearchController<P::Record, T>,
        triggers: DebounceReceiver<String>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            triggers,
            provider: Arc::new(provider),
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn with_filters(mut self, filters: Vec<FilterConfig<T>>) -> Result<Self, ConfigError> {
        self.controller.set_filters(filters)?;
        Ok(self)
    }

    pub fn controller(&self) -> &SearchController<P::Record, T> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SearchController<P::Record, T> {
        &mut self.controller
    }

    pub fn into_controller(self) -> SearchController<P::Record, T> {
        self.controller
    }

    /// Provider calls issued and not yet completed (stale ones included).
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether a debounce is pending or a provider call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.controller.debounce_pending() || self.in_flight > 0
    }

    /// Wait for the next debounce fire or provider completion and apply it.
    ///
    /// Blocks indefinitely when nothing is pending; check [`is_busy`](Self::is_busy) first.
    pub async fn step(&mut self) -> SessionStep {
        tokio::select! {
            Some(text) = self.triggers.recv() => {
                match self.controller.begin_fetch(text) {
                    Some(ticket) => {
                        self.in_flight += 1;
                        let provider = Arc::clone(&self.provider);
                        let tx = self.completions_tx.clone();
                        let issued = ticket.clone();
                        tokio::spawn(async move {
                            let result = provider.query(issued.query()).await;
                            let _ = tx.send((issued, result));
                        });
                        SessionStep::Issued(ticket)
                    }
                    None => SessionStep::Skipped,
                }
            }
            Some((ticket, result)) = self.completions_rx.recv() => {
                self.in_flight -= 1;
                let generation = ticket.generation();
                if self.controller.complete_fetch(ticket, result) {
                    SessionStep::Applied { generation }
                } else {
                    SessionStep::Discarded { generation }
                }
            }
        }
    }

    /// Step until no debounce is pending and no provider call is outstanding.
    pub async fn settle(&mut self) -> Vec<SessionStep> {
        let mut steps = Vec::new();
        while self.is_busy() {
            let step = self.step().await;
            debug!(?step, "Session step");
            steps.push(step);
        }
        steps
    }
}
