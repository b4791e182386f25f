//! Core types shared across SmartSearch: normalized result items, filter
//! configuration, filter values, and the per-widget filter state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Result items
// ---------------------------------------------------------------------------

/// A provider record normalized for display in the dropdown.
///
/// `original` carries the raw record through untouched so hosts receive it back
/// in the selection event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResultItem<T> {
    pub id: String,
    #[serde(rename = "primaryText")]
    pub primary_text: String,
    #[serde(rename = "secondaryText", skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "isDisabled")]
    pub is_disabled: bool,
    pub original: T,
}

impl<T> SearchResultItem<T> {
    pub fn new(id: impl Into<String>, primary_text: impl Into<String>, original: T) -> Self {
        Self {
            id: id.into(),
            primary_text: primary_text.into(),
            secondary_text: None,
            icon: None,
            value: None,
            is_disabled: false,
            original,
        }
    }

    pub fn with_secondary(mut self, text: impl Into<String>) -> Self {
        self.secondary_text = Some(text.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = disabled;
        self
    }
}

/// Maps one raw provider record into a result item.
pub type ResultMapper<R, T> = Arc<dyn Fn(R) -> SearchResultItem<T> + Send + Sync>;

// ---------------------------------------------------------------------------
// Filter configuration
// ---------------------------------------------------------------------------

/// Which leaf control renders a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Checkbox,
    Dropdown,
    DatePicker,
}

impl ComponentType {
    /// Value a filter starts from when its configuration has no explicit default.
    pub fn default_value(self) -> FilterValue {
        match self {
            ComponentType::Checkbox => FilterValue::Flag(false),
            ComponentType::Dropdown | ComponentType::DatePicker => FilterValue::Text(String::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Checkbox => "checkbox",
            ComponentType::Dropdown => "dropdown",
            ComponentType::DatePicker => "date-picker",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of one filter control: a checkbox state or a text value
/// (dropdown option value, ISO date).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Flag(bool),
    Text(String),
}

impl FilterValue {
    /// Interpret the value as a checkbox state. Non-empty text counts as set.
    pub fn as_flag(&self) -> bool {
        match self {
            FilterValue::Flag(b) => *b,
            FilterValue::Text(s) => !s.is_empty(),
        }
    }

    /// Interpret the value as text. Flags have no text form.
    pub fn as_text(&self) -> &str {
        match self {
            FilterValue::Flag(_) => "",
            FilterValue::Text(s) => s,
        }
    }

    /// Whether this value is of the kind a control of `component_type` emits.
    pub fn matches_kind(&self, component_type: ComponentType) -> bool {
        matches!(
            (self, component_type),
            (FilterValue::Flag(_), ComponentType::Checkbox)
                | (FilterValue::Text(_), ComponentType::Dropdown | ComponentType::DatePicker)
        )
    }

    /// Parse a raw control value for a filter of the given type.
    /// Checkboxes accept `true/false`, `1/0`, `yes/no`, `on/off`.
    pub fn parse(component_type: ComponentType, raw: &str) -> Self {
        match component_type {
            ComponentType::Checkbox => FilterValue::Flag(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )),
            ComponentType::Dropdown | ComponentType::DatePicker => FilterValue::Text(raw.to_string()),
        }
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Flag(false)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Flag(b)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Flag(b) => write!(f, "{b}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// One selectable option of a dropdown filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

/// Transform applied by a filter: receives the output of the previous filter and
/// this filter's current value. Must be pure.
pub type FilterHandler<T> =
    Arc<dyn Fn(Vec<SearchResultItem<T>>, &FilterValue) -> Vec<SearchResultItem<T>> + Send + Sync>;

/// A configured filter: how it renders, where it starts, and how it narrows results.
pub struct FilterConfig<T> {
    pub filter_id: String,
    pub component_type: ComponentType,
    pub label: String,
    pub options: Vec<FilterOption>,
    pub default_value: Option<FilterValue>,
    pub handler: FilterHandler<T>,
}

impl<T> Clone for FilterConfig<T> {
    fn clone(&self) -> Self {
        Self {
            filter_id: self.filter_id.clone(),
            component_type: self.component_type,
            label: self.label.clone(),
            options: self.options.clone(),
            default_value: self.default_value.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for FilterConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterConfig")
            .field("filter_id", &self.filter_id)
            .field("component_type", &self.component_type)
            .field("label", &self.label)
            .field("options", &self.options)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}

impl<T> FilterConfig<T> {
    pub fn new(
        filter_id: impl Into<String>,
        component_type: ComponentType,
        label: impl Into<String>,
        handler: FilterHandler<T>,
    ) -> Self {
        Self {
            filter_id: filter_id.into(),
            component_type,
            label: label.into(),
            options: Vec::new(),
            default_value: None,
            handler,
        }
    }

    pub fn checkbox(
        filter_id: impl Into<String>,
        label: impl Into<String>,
        handler: FilterHandler<T>,
    ) -> Self {
        Self::new(filter_id, ComponentType::Checkbox, label, handler)
    }

    pub fn dropdown(
        filter_id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
        handler: FilterHandler<T>,
    ) -> Self {
        let mut config = Self::new(filter_id, ComponentType::Dropdown, label, handler);
        config.options = options;
        config
    }

    pub fn date_picker(
        filter_id: impl Into<String>,
        label: impl Into<String>,
        handler: FilterHandler<T>,
    ) -> Self {
        Self::new(filter_id, ComponentType::DatePicker, label, handler)
    }

    pub fn with_default(mut self, value: impl Into<FilterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// The value this filter holds right after (re)configuration.
    pub fn initial_value(&self) -> FilterValue {
        self.default_value.clone().unwrap_or_else(|| self.component_type.default_value())
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Current value of every configured filter, keyed by `filter_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterState(BTreeMap<String, FilterValue>);

impl FilterState {
    /// One entry per filter, each at its initial value.
    pub fn from_configs<T>(filters: &[FilterConfig<T>]) -> Self {
        Self(filters.iter().map(|f| (f.filter_id.clone(), f.initial_value())).collect())
    }

    pub fn get(&self, filter_id: &str) -> Option<&FilterValue> {
        self.0.get(filter_id)
    }

    pub fn set(&mut self, filter_id: impl Into<String>, value: FilterValue) {
        self.0.insert(filter_id.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
