//! DOM-backed dropdown positioner.
//!
//! Measures the input and listbox through a JS eval, runs
//! [`compute_position`] on the result, and publishes the placement through a
//! signal the dropdown styles itself from. While attached, window resizes and
//! scrolls (at most one per animation frame) trigger a fresh placement.

use dioxus::prelude::*;
use serde::Deserialize;
use smartsearch_core::position::{compute_position, Placement, Positioner, Rect, SurfaceHandle};

const MEASURE_JS: &str = r#"
    const [inputId, listboxId] = await dioxus.recv();
    await new Promise((resolve) => requestAnimationFrame(resolve));
    const input = document.getElementById(inputId);
    const listbox = document.getElementById(listboxId);
    if (!input) {
        dioxus.send(null);
    } else {
        const r = input.getBoundingClientRect();
        dioxus.send({
            reference: { x: r.left, y: r.top, width: r.width, height: r.height },
            floating_height: listbox ? listbox.scrollHeight : 0,
            viewport: { x: 0, y: 0, width: window.innerWidth, height: window.innerHeight },
        });
    }
"#;

#[derive(Deserialize)]
struct Bounds {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        Rect::new(b.x, b.y, b.width, b.height)
    }
}

#[derive(Deserialize)]
struct Measurement {
    reference: Bounds,
    floating_height: f64,
    viewport: Bounds,
}

/// Registers resize and scroll listeners under `key`, replacing any earlier
/// registration, and reports each burst once per animation frame.
fn watch_script(key: &str) -> String {
    let key = serde_json::Value::from(key).to_string();
    format!(
        r#"
    const watchers = (window.__smartSearchWatchers ??= {{}});
    watchers[{key}]?.();
    let queued = false;
    const notify = () => {{
        if (queued) return;
        queued = true;
        requestAnimationFrame(() => {{
            queued = false;
            dioxus.send(true);
        }});
    }};
    window.addEventListener("resize", notify);
    window.addEventListener("scroll", notify, true);
    watchers[{key}] = () => {{
        window.removeEventListener("resize", notify);
        window.removeEventListener("scroll", notify, true);
    }};
    await dioxus.recv();
"#
    )
}

fn unwatch_script(key: &str) -> String {
    let key = serde_json::Value::from(key).to_string();
    format!(
        r#"
    const watchers = window.__smartSearchWatchers;
    if (watchers && watchers[{key}]) {{
        watchers[{key}]();
        delete watchers[{key}];
    }}
"#
    )
}

async fn measure(input: &str, listbox: &str) -> Result<Option<Measurement>, String> {
    let mut eval = document::eval(MEASURE_JS);
    eval.send([input, listbox]).map_err(|e| e.to_string())?;
    eval.recv::<Option<Measurement>>().await.map_err(|e| e.to_string())
}

async fn place(input: &str, listbox: &str, mut placement: Signal<Option<Placement>>) {
    match measure(input, listbox).await {
        Ok(Some(m)) => {
            let p = compute_position(m.reference.into(), m.floating_height, m.viewport.into());
            placement.set(Some(p));
        }
        Ok(None) => tracing::debug!(input = %input, "Input not in the DOM, skipping placement"),
        Err(e) => tracing::warn!(error = %e, "Dropdown measurement failed"),
    }
}

pub struct DomPositioner {
    placement: Signal<Option<Placement>>,
    surfaces: Option<(String, String)>,
    pending: Option<Task>,
    watcher: Option<Task>,
}

impl DomPositioner {
    pub fn new(placement: Signal<Option<Placement>>) -> Self {
        Self { placement, surfaces: None, pending: None, watcher: None }
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    fn unwatch(&mut self) {
        if let Some(task) = self.watcher.take() {
            task.cancel();
        }
        if let Some((input, _)) = &self.surfaces {
            document::eval(&unwatch_script(input));
        }
    }
}

impl Positioner for DomPositioner {
    fn attach(&mut self, input: &SurfaceHandle, dropdown: &SurfaceHandle) {
        self.unwatch();
        let (input, listbox) = (input.id().to_string(), dropdown.id().to_string());
        self.surfaces = Some((input.clone(), listbox.clone()));

        let placement = self.placement;
        self.watcher = Some(spawn(async move {
            let mut eval = document::eval(&watch_script(&input));
            while eval.recv::<serde_json::Value>().await.is_ok() {
                place(&input, &listbox, placement).await;
            }
            tracing::debug!(input = %input, "Placement watcher stopped");
        }));
    }

    fn recompute(&mut self) {
        let Some((input, listbox)) = self.surfaces.clone() else {
            return;
        };
        self.cancel_pending();
        let placement = self.placement;
        self.pending = Some(spawn(async move { place(&input, &listbox, placement).await }));
    }

    fn release(&mut self) {
        self.cancel_pending();
        self.unwatch();
        self.surfaces = None;
        self.placement.set(None);
    }
}

/// Inline style for the dropdown container.
pub fn placement_style(placement: Option<Placement>) -> String {
    match placement {
        Some(p) => format!(
            "position: fixed; left: {}px; top: {}px; width: {}px; max-height: {}px;",
            p.x, p.y, p.width, p.max_height
        ),
        None => String::new(),
    }
}
