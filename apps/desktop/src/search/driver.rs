//! Runs a widget's searches: debounced query text in, provider results out.

use dioxus::prelude::*;
use smartsearch_core::debounce::DebounceReceiver;
use smartsearch_core::{SearchController, SearchProvider};
use smartsearch_mock::{DemoRecord, MockProvider};

pub type Controller = SearchController<DemoRecord, DemoRecord>;

/// Pump debounced query text into `controller`, calling `provider` for each
/// fetch it issues. Ends when the controller (and its debouncer) is dropped.
pub async fn drive(
    mut controller: Signal<Controller>,
    mut triggers: DebounceReceiver<String>,
    provider: MockProvider,
) {
    while let Some(text) = triggers.recv().await {
        let Some(ticket) = controller.write().begin_fetch(text) else {
            continue;
        };
        let provider = provider.clone();
        // One task per fetch; stale completions are discarded by the controller.
        spawn(async move {
            let result = provider.query(ticket.query()).await;
            controller.write().complete_fetch(ticket, result);
        });
    }
}
