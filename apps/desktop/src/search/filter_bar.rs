//! Filter controls above the input: one per configured filter.

use dioxus::prelude::*;
use smartsearch_core::{ComponentType, FilterValue};

use super::driver::Controller;

#[component]
pub fn FilterBar(controller: Signal<Controller>) -> Element {
    let c = controller.read();
    if c.filters().is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "filter-bar",
            for filter in c.filters() {
                {
                    let id = filter.filter_id.clone();
                    let value = c
                        .filter_state()
                        .get(&filter.filter_id)
                        .cloned()
                        .unwrap_or_else(|| filter.initial_value());
                    match filter.component_type {
                        ComponentType::Checkbox => rsx! {
                            label {
                                key: "{filter.filter_id}",
                                class: "filter-control filter-checkbox",
                                input {
                                    r#type: "checkbox",
                                    checked: value.as_flag(),
                                    onchange: move |e: Event<FormData>| {
                                        controller.write().on_filter_change(&id, FilterValue::Flag(e.checked()));
                                    },
                                }
                                "{filter.label}"
                            }
                        },
                        ComponentType::Dropdown => rsx! {
                            label {
                                key: "{filter.filter_id}",
                                class: "filter-control",
                                span { "{filter.label}" }
                                select {
                                    onchange: move |e: Event<FormData>| {
                                        controller.write().on_filter_change(&id, FilterValue::from(e.value()));
                                    },
                                    for opt in filter.options.iter() {
                                        option {
                                            value: "{opt.value}",
                                            selected: opt.value == value.as_text(),
                                            "{opt.label}"
                                        }
                                    }
                                }
                            }
                        },
                        ComponentType::DatePicker => rsx! {
                            label {
                                key: "{filter.filter_id}",
                                class: "filter-control",
                                span { "{filter.label}" }
                                input {
                                    r#type: "date",
                                    value: "{value.as_text()}",
                                    onchange: move |e: Event<FormData>| {
                                        controller.write().on_filter_change(&id, FilterValue::from(e.value()));
                                    },
                                }
                            }
                        },
                    }
                }
            }
        }
    }
}
