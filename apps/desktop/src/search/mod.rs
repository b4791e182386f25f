//! The SmartSearch widget: filter bar, combobox input, and positioned dropdown.

mod driver;
mod filter_bar;
mod positioner;

use std::rc::Rc;

use dioxus::prelude::*;
use smartsearch_core::position::{Placement, Rect};
use smartsearch_core::{
    DisplayState, Key, SearchConfig, SearchController, SearchEvent, SearchResultItem,
};
use smartsearch_mock::{filters_for, map_record, Dataset, DemoRecord, MockProvider};
use tracing::warn;

use crate::state::POINTER_DOWN;
use driver::Controller;
use filter_bar::FilterBar;
use positioner::{placement_style, DomPositioner};

/// Client rects of the widget's mounted surfaces; stale mounts are skipped.
async fn hit_area(mounts: [Option<Rc<MountedData>>; 2]) -> Vec<Rect> {
    let mut rects = Vec::new();
    for mounted in mounts.into_iter().flatten() {
        if let Ok(r) = mounted.get_client_rect().await {
            rects.push(Rect::new(r.origin.x, r.origin.y, r.size.width, r.size.height));
        }
    }
    rects
}

/// Scrolls the option with `id` into the listbox's visible area, if it exists.
fn reveal_script(id: &str) -> String {
    let id = serde_json::Value::from(id).to_string();
    format!(r#"document.getElementById({id})?.scrollIntoView({{ block: "nearest" }});"#)
}

#[component]
pub fn SmartSearch(
    dataset: Dataset,
    config: SearchConfig,
    onselect: EventHandler<SearchResultItem<DemoRecord>>,
    onclear: EventHandler<()>,
) -> Element {
    let placement = use_signal(|| None::<Placement>);
    let mut root_mount = use_signal(|| None::<Rc<MountedData>>);
    let mut dropdown_mount = use_signal(|| None::<Rc<MountedData>>);

    let mut controller: Signal<Controller> = use_hook(|| {
        let (mut controller, triggers) = SearchController::new(map_record);
        controller = controller.with_config(&config).with_positioner(DomPositioner::new(placement));
        if let Err(e) = controller.set_filters(filters_for(dataset)) {
            warn!(error = %e, dataset = dataset.name(), "Invalid filter configuration, filters disabled");
        }
        let controller = Signal::new(controller);
        spawn(driver::drive(controller, triggers, MockProvider::new(dataset)));
        controller
    });

    // Outside-click: only while something is shown.
    use_effect(move || {
        let Some(down) = *POINTER_DOWN.read() else {
            return;
        };
        if !controller.peek().wants_outside_clicks() {
            return;
        }
        let mounts = [root_mount.peek().clone(), dropdown_mount.peek().clone()];
        spawn(async move {
            let rects = hit_area(mounts).await;
            controller.write().on_pointer_down(rects.as_slice(), down.point);
        });
    });

    // Keep the keyboard-focused option visible in a scrolled listbox.
    use_effect(move || {
        let Some(id) = controller.read().active_descendant().map(str::to_string) else {
            return;
        };
        document::eval(&reveal_script(&id));
    });

    let mut emit = move || {
        let events = controller.write().take_events();
        for event in events {
            match event {
                SearchEvent::ItemSelected(item) => onselect.call(item),
                SearchEvent::Cleared => onclear.call(()),
            }
        }
    };

    let c = controller.read();
    let display = c.display();
    let dropdown_style = placement_style(*placement.read());
    let sanitizer = config.clone();

    rsx! {
        div {
            class: "smart-search",
            onmounted: move |e: MountedEvent| root_mount.set(Some(e.data())),

            FilterBar { controller }

            div {
                class: if c.query_text().is_empty() { "search-input-row" } else { "search-input-row has-query" },

                svg {
                    class: "search-icon",
                    width: "16",
                    height: "16",
                    view_box: "0 0 24 24",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "2",
                    circle { cx: "11", cy: "11", r: "8" }
                    line { x1: "21", y1: "21", x2: "16.65", y2: "16.65" }
                }

                input {
                    id: "{c.input_id()}",
                    class: "search-input",
                    r#type: "text",
                    role: "combobox",
                    autocomplete: "off",
                    aria_autocomplete: "list",
                    aria_expanded: "{c.expanded()}",
                    aria_controls: "{c.listbox_id()}",
                    aria_activedescendant: c.active_descendant().map(str::to_string),
                    placeholder: "{config.placeholder}",
                    maxlength: config.max_length.map(|n| n.to_string()),
                    value: "{c.query_text()}",
                    autofocus: true,
                    oninput: move |e: Event<FormData>| {
                        let text = sanitizer.sanitize(&e.value());
                        controller.write().on_query_change(text);
                    },
                    onfocus: move |_| controller.write().on_focus_in(),
                    onkeydown: move |e: Event<KeyboardData>| {
                        let key = Key::from_name(&e.key().to_string());
                        let outcome = controller.write().on_key_down(key);
                        if outcome.prevent_default {
                            e.prevent_default();
                        }
                        emit();
                    },
                }

                if c.is_loading() {
                    span { class: "search-spinner", role: "status", aria_label: "Loading" }
                }

                if !c.query_text().is_empty() {
                    button {
                        class: "search-clear",
                        aria_label: "Clear search",
                        onclick: move |_| {
                            controller.write().on_clear();
                            emit();
                        },
                        "\u{00D7}"
                    }
                }
            }

            if display != DisplayState::Hidden {
                div {
                    class: "search-dropdown",
                    style: "{dropdown_style}",
                    onmounted: move |e: MountedEvent| dropdown_mount.set(Some(e.data())),

                    {match &display {
                        DisplayState::Error(message) => rsx! {
                            div { class: "dropdown-status dropdown-error", role: "alert", "{message}" }
                        },
                        DisplayState::NoResults => rsx! {
                            div { class: "dropdown-status", "{config.no_results_message}" }
                        },
                        DisplayState::Loading if c.visible_items().is_empty() => rsx! {
                            div { class: "dropdown-status", "Loading..." }
                        },
                        _ => rsx! {
                            ul {
                                id: "{c.listbox_id()}",
                                class: "dropdown-listbox",
                                role: "listbox",
                                for item in c.visible_items() {
                                    ResultRow {
                                        key: "{item.id}",
                                        item: item.clone(),
                                        focused: c.focused_item_id() == Some(item.id.as_str()),
                                        onhover: move |id: String| controller.write().on_item_hover(&id),
                                        onpick: move |id: String| {
                                            controller.write().on_item_select(&id);
                                            emit();
                                        },
                                    }
                                }
                            }
                        },
                    }}
                }
            }
        }
    }
}

#[component]
fn ResultRow(
    item: SearchResultItem<DemoRecord>,
    focused: bool,
    onhover: EventHandler<String>,
    onpick: EventHandler<String>,
) -> Element {
    let class = match (focused, item.is_disabled) {
        (_, true) => "dropdown-item disabled",
        (true, false) => "dropdown-item focused",
        (false, false) => "dropdown-item",
    };
    let hover_id = item.id.clone();
    let pick_id = item.id.clone();

    rsx! {
        li {
            id: "{item.id}",
            class: "{class}",
            role: "option",
            aria_selected: "{focused}",
            aria_disabled: "{item.is_disabled}",
            onmouseenter: move |_| onhover.call(hover_id.clone()),
            // Keep focus in the input.
            onmousedown: move |e: MouseEvent| e.prevent_default(),
            onclick: move |_| onpick.call(pick_id.clone()),

            if let Some(icon) = &item.icon {
                span { class: "item-icon icon-{icon}" }
            }
            div {
                class: "item-text",
                span { class: "item-primary", "{item.primary_text}" }
                if let Some(secondary) = &item.secondary_text {
                    span { class: "item-secondary", "{secondary}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_script_scrolls_nearest() {
        assert_eq!(
            reveal_script("acc-101"),
            r#"document.getElementById("acc-101")?.scrollIntoView({ block: "nearest" });"#
        );
    }

    #[test]
    fn reveal_script_quotes_the_id() {
        assert!(reveal_script(r#"x"); alert("#).contains(r#"getElementById("x\"); alert(")"#));
    }
}
