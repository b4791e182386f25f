//! Global application state using Dioxus signals.

use dioxus::prelude::*;
use smartsearch_core::position::Point;
use smartsearch_core::{SearchConfig, SearchResultItem};
use smartsearch_mock::{Dataset, DemoRecord};

/// A pointer-down anywhere in the window. `seq` distinguishes repeated
/// presses at the same spot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerDown {
    pub seq: u64,
    pub point: Point,
}

// ---------------------------------------------------------------------------
// Global signals
// ---------------------------------------------------------------------------

/// Widget configuration, seeded from `.smartsearch.toml` at startup
pub static CONFIG: GlobalSignal<SearchConfig> = Signal::global(|| {
    crate::INITIAL_CONFIG
        .lock()
        .ok()
        .and_then(|mut slot| slot.take())
        .unwrap_or_default()
});

/// Dataset the widget searches
pub static DATASET: GlobalSignal<Dataset> = Signal::global(|| Dataset::Customers);

/// Item from the last `search-item-selected` event
pub static LAST_SELECTED: GlobalSignal<Option<SearchResultItem<DemoRecord>>> =
    Signal::global(|| None);

/// Latest window-level pointer-down, for outside-click detection
pub static POINTER_DOWN: GlobalSignal<Option<PointerDown>> = Signal::global(|| None);
