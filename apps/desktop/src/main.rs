//! SmartSearch Desktop: Dioxus demo of the type-ahead search widget.

use std::sync::Mutex;

use dioxus::prelude::*;
use smartsearch_core::{load_smartsearch_config, SearchConfig};

mod app;
mod search;
mod state;

use app::App;

/// Pre-runtime storage: loaded before Dioxus launches, consumed on first render.
pub static INITIAL_CONFIG: Mutex<Option<SearchConfig>> = Mutex::new(None);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartsearch=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let root = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let config = load_smartsearch_config(&root);
    if let Ok(mut slot) = INITIAL_CONFIG.lock() {
        *slot = Some(config);
    }

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

        LaunchBuilder::new()
            .with_cfg(
                Config::default()
                    .with_menu(None)
                    .with_disable_context_menu(true)
                    .with_window(
                        WindowBuilder::new()
                            .with_title("SmartSearch")
                            .with_inner_size(LogicalSize::new(960.0, 720.0))
                            .with_min_inner_size(LogicalSize::new(480.0, 400.0))
                            .with_resizable(true),
                    ),
            )
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        dioxus::launch(App);
    }
}
