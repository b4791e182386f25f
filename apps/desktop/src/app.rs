//! Root application component: dataset tabs, the widget, and the selection panel.

use dioxus::prelude::*;
use smartsearch_core::position::Point;
use smartsearch_core::{Theme, DEBOUNCE_INTERVAL, MIN_QUERY_LEN};
use smartsearch_mock::Dataset;

use crate::search::SmartSearch;
use crate::state::*;

static VARIABLES_CSS: Asset = asset!("/assets/styles/variables.css");
static APP_CSS: Asset = asset!("/assets/styles/app.css");

#[component]
pub fn App() -> Element {
    let config = CONFIG.read().clone();
    let dataset = *DATASET.read();

    rsx! {
        document::Stylesheet { href: VARIABLES_CSS }
        document::Stylesheet { href: APP_CSS }

        div {
            class: "app-shell theme-{config.theme.as_str()}",
            onpointerdown: move |e: PointerEvent| {
                let p = e.client_coordinates();
                let seq = POINTER_DOWN.peek().map(|d| d.seq + 1).unwrap_or(0);
                *POINTER_DOWN.write() = Some(PointerDown { seq, point: Point::new(p.x, p.y) });
            },

            div {
                class: "titlebar",
                span { class: "titlebar-title", "SmartSearch" }
                ThemePicker {}
            }

            DatasetTabs {}

            div {
                class: "content-area",

                // Remount per dataset: fresh controller, filters and provider
                SmartSearch {
                    key: "{dataset.name()}",
                    dataset,
                    config: config.clone(),
                    onselect: move |item| *LAST_SELECTED.write() = Some(item),
                    onclear: move |_| *LAST_SELECTED.write() = None,
                }

                SelectionPanel {}
            }

            StatusBar {}
        }
    }
}

#[component]
fn ThemePicker() -> Element {
    let current = CONFIG.read().theme;

    rsx! {
        select {
            class: "theme-picker",
            aria_label: "Theme",
            onchange: move |e: Event<FormData>| {
                if let Some(theme) = Theme::from_name(&e.value()) {
                    CONFIG.write().theme = theme;
                }
            },
            for theme in [Theme::Light, Theme::Dark, Theme::Ocean] {
                option {
                    value: "{theme.as_str()}",
                    selected: theme == current,
                    "{theme.as_str()}"
                }
            }
        }
    }
}

#[component]
fn DatasetTabs() -> Element {
    let active = *DATASET.read();

    rsx! {
        div {
            class: "dataset-tabs",
            role: "tablist",
            for dataset in Dataset::ALL {
                button {
                    class: if dataset == active { "dataset-tab active" } else { "dataset-tab" },
                    role: "tab",
                    aria_selected: "{dataset == active}",
                    onclick: move |_| {
                        *DATASET.write() = dataset;
                        *LAST_SELECTED.write() = None;
                    },
                    "{dataset.label()}"
                }
            }
        }
    }
}

/// Shows the record carried by the last selection event.
#[component]
fn SelectionPanel() -> Element {
    let selected = LAST_SELECTED.read();

    let Some(item) = selected.as_ref() else {
        return rsx! {
            div {
                class: "selection-empty",
                span { "Select a result to see its record" }
            }
        };
    };

    let record = serde_json::to_string_pretty(&item.original).unwrap_or_default();

    rsx! {
        div {
            class: "selection-panel",
            div { class: "selection-title", "{item.primary_text}" }
            if let Some(secondary) = &item.secondary_text {
                div { class: "selection-subtitle", "{secondary}" }
            }
            pre { class: "selection-record", "{record}" }
        }
    }
}

#[component]
fn StatusBar() -> Element {
    let dataset = *DATASET.read();
    let theme = CONFIG.read().theme;

    rsx! {
        div {
            class: "statusbar",
            span { "{dataset.label()}" }
            span { class: "statusbar-sep", "|" }
            span { "theme: {theme.as_str()}" }
            span { class: "statusbar-sep", "|" }
            span { "debounce {DEBOUNCE_INTERVAL.as_millis()}ms, min {MIN_QUERY_LEN} chars" }
        }
    }
}
