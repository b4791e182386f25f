//! Scripted widget interactions for `smartsearch replay`.
//!
//! Each step is one argument: `type:<text>`, `key:<KeyName>`, `hover:<id>`,
//! `select:<id>`, `filter:<id>=<value>`, `focus`, `clear`, `outside`, `wait`.

use std::fmt;
use std::str::FromStr;

use smartsearch_core::{FilterValue, Key, SearchConfig, SearchProvider, SearchSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Type(String),
    Key(Key),
    Hover(String),
    Select(String),
    Filter { id: String, raw: String },
    Focus,
    Clear,
    Outside,
    /// Let every pending debounce and provider call finish.
    Wait,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        match (verb, arg) {
            ("type", Some(text)) => Ok(Step::Type(text.to_string())),
            ("key", Some(name)) => match Key::from_name(name) {
                Key::Other => Err(format!("Unknown key '{name}'")),
                key => Ok(Step::Key(key)),
            },
            ("hover", Some(id)) => Ok(Step::Hover(id.to_string())),
            ("select", Some(id)) => Ok(Step::Select(id.to_string())),
            ("filter", Some(assignment)) => {
                let (id, raw) = parse_assignment(assignment)?;
                Ok(Step::Filter { id, raw })
            }
            ("focus", None) => Ok(Step::Focus),
            ("clear", None) => Ok(Step::Clear),
            ("outside", None) => Ok(Step::Outside),
            ("wait", None) => Ok(Step::Wait),
            _ => Err(format!("Unrecognized step '{s}'")),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Type(text) => write!(f, "type {text:?}"),
            Step::Key(key) => write!(f, "key {key:?}"),
            Step::Hover(id) => write!(f, "hover {id}"),
            Step::Select(id) => write!(f, "select {id}"),
            Step::Filter { id, raw } => write!(f, "filter {id}={raw}"),
            Step::Focus => f.write_str("focus"),
            Step::Clear => f.write_str("clear"),
            Step::Outside => f.write_str("outside"),
            Step::Wait => f.write_str("wait"),
        }
    }
}

/// Split `id=value`. The value may be empty (resets a dropdown to "All").
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((id, raw)) if !id.is_empty() => Ok((id.to_string(), raw.to_string())),
        _ => Err(format!("Expected <filter-id>=<value>, got '{s}'")),
    }
}

/// Set a filter by id, parsing `raw` for the filter's control type.
pub fn apply_filter<P, T>(
    session: &mut SearchSession<P, T>,
    id: &str,
    raw: &str,
) -> Result<(), String>
where
    P: SearchProvider,
    T: Clone,
{
    let component_type = session
        .controller()
        .filters()
        .iter()
        .find(|f| f.filter_id == id)
        .map(|f| f.component_type)
        .ok_or_else(|| format!("Unknown filter '{id}'"))?;
    session.controller_mut().on_filter_change(id, FilterValue::parse(component_type, raw));
    Ok(())
}

/// Feed one step to the session.
pub async fn apply<P, T>(
    session: &mut SearchSession<P, T>,
    step: &Step,
    config: &SearchConfig,
) -> Result<(), String>
where
    P: SearchProvider,
    T: Clone,
{
    match step {
        Step::Type(text) => session.controller_mut().on_query_change(config.sanitize(text)),
        Step::Key(key) => {
            session.controller_mut().on_key_down(*key);
        }
        Step::Hover(id) => session.controller_mut().on_item_hover(id),
        Step::Select(id) => {
            if !session.controller_mut().on_item_select(id) {
                tracing::warn!(id = %id, "Selection refused");
            }
        }
        Step::Filter { id, raw } => apply_filter(session, id, raw)?,
        Step::Focus => session.controller_mut().on_focus_in(),
        Step::Clear => session.controller_mut().on_clear(),
        Step::Outside => session.controller_mut().on_click_outside(),
        Step::Wait => {
            session.settle().await;
        }
    }
    Ok(())
}
