//! SmartSearch core: headless search orchestration for a type-ahead search widget.
//!
//! The widget is a text input that queries an external provider as the user
//! types, shows results in a positioned dropdown, supports keyboard and pointer
//! navigation, and narrows results with auxiliary filters. This crate holds
//! everything that is not rendering.
//!
//! # Modules
//!
//! - [`controller`]: The state machine: query, cache, filters, focus, selection, ARIA state
//! - [`session`]: Async driver wiring the controller to its debounce timer and provider
//! - [`debounce`]: Generation-checked trailing-edge debounce on tokio timers
//! - [`filter`]: Ordered filter pipeline and filter configuration validation
//! - [`provider`]: The `SearchProvider` boundary
//! - [`position`]: Positioning adapter boundary, hit testing, dropdown placement
//! - [`config`]: `.smartsearch.toml` loading
//! - [`types`]: Result items, filter configuration, filter state
//! - [`error`]: Provider and configuration errors

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod position;
pub mod provider;
pub mod session;
pub mod types;

pub use config::{load_smartsearch_config, SearchConfig, Theme};
pub use controller::{
    DisplayState, FetchTicket, Key, KeyOutcome, Phase, RenderSnapshot, SearchController, SearchEvent,
    MIN_QUERY_LEN,
};
pub use debounce::DEBOUNCE_INTERVAL;
pub use error::{ConfigError, ProviderError};
pub use provider::SearchProvider;
pub use session::{SearchSession, SessionStep};
pub use types::{
    ComponentType, FilterConfig, FilterOption, FilterState, FilterValue, SearchResultItem,
};
