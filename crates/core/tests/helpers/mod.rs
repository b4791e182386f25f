//! Test harness for session integration tests.
//!
//! `ScriptedProvider` answers each query text from a script (delay + outcome)
//! and records every query it receives, so tests can count provider calls and
//! stage out-of-order responses under tokio's paused clock.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use smartsearch_core::{ProviderError, SearchProvider, SearchResultItem, SearchSession};

#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub id: &'static str,
    pub name: &'static str,
}

pub fn fruit(id: &'static str, name: &'static str) -> Fruit {
    Fruit { id, name }
}

pub fn map_fruit(f: Fruit) -> SearchResultItem<Fruit> {
    SearchResultItem::new(f.id, f.name, f.clone())
}

#[derive(Clone)]
struct Script {
    delay: Duration,
    outcome: Result<Vec<Fruit>, ProviderError>,
}

#[derive(Clone, Default)]
pub struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `records` after `delay_ms`.
    pub fn answer(mut self, query: &str, delay_ms: u64, records: Vec<Fruit>) -> Self {
        self.scripts.insert(
            query.to_string(),
            Script { delay: Duration::from_millis(delay_ms), outcome: Ok(records) },
        );
        self
    }

    /// Fail `query` after `delay_ms`.
    pub fn fail(mut self, query: &str, delay_ms: u64) -> Self {
        self.scripts.insert(
            query.to_string(),
            Script {
                delay: Duration::from_millis(delay_ms),
                outcome: Err(ProviderError::Unavailable("scripted outage".into())),
            },
        );
        self
    }

    /// Shared log of every query received.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

impl SearchProvider for ScriptedProvider {
    type Record = Fruit;

    fn query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Fruit>, ProviderError>> + Send {
        self.calls.lock().unwrap().push(text.to_string());
        let script = self
            .scripts
            .get(text)
            .cloned()
            .unwrap_or(Script { delay: Duration::from_millis(50), outcome: Ok(vec![]) });
        async move {
            tokio::time::sleep(script.delay).await;
            script.outcome
        }
    }
}

/// A session over `provider` with the fruit mapper and no filters.
pub fn session(provider: ScriptedProvider) -> SearchSession<ScriptedProvider, Fruit> {
    SearchSession::new(provider, map_fruit)
}
