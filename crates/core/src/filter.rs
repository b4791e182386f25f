//! Filter pipeline: ordered application of configured filter handlers to the
//! cached result set.
//!
//! Filters compose, so a change to any single filter re-runs the whole chain in
//! declaration order against the raw cache. Handlers are trusted to be pure and
//! total; a panicking handler is not caught here.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::types::{ComponentType, FilterConfig, FilterHandler, FilterState, FilterValue, SearchResultItem};

/// Run every filter in `filters`, in order, starting from `items`.
///
/// Each handler receives the previous handler's output and its own current value
/// from `state` (falling back to the filter's initial value). With no filters the
/// input is returned unchanged.
pub fn apply_filters<T: Clone>(
    items: &[SearchResultItem<T>],
    filters: &[FilterConfig<T>],
    state: &FilterState,
) -> Vec<SearchResultItem<T>> {
    filters.iter().fold(items.to_vec(), |acc, filter| {
        let fallback;
        let value = match state.get(&filter.filter_id) {
            Some(v) => v,
            None => {
                fallback = filter.initial_value();
                &fallback
            }
        };
        (filter.handler)(acc, value)
    })
}

/// Check a filter configuration before the controller adopts it.
pub fn validate_filters<T>(filters: &[FilterConfig<T>]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for filter in filters {
        if !seen.insert(filter.filter_id.as_str()) {
            return Err(ConfigError::DuplicateFilterId(filter.filter_id.clone()));
        }
        if filter.component_type == ComponentType::Dropdown && filter.options.is_empty() {
            return Err(ConfigError::MissingOptions(filter.filter_id.clone()));
        }
        if let Some(default) = &filter.default_value {
            if !default.matches_kind(filter.component_type) {
                return Err(ConfigError::DefaultKindMismatch {
                    filter_id: filter.filter_id.clone(),
                    component_type: filter.component_type,
                });
            }
        }
    }
    Ok(())
}

/// Build a handler that keeps the items for which `keep(item, value)` holds.
pub fn retain_where<T, F>(keep: F) -> FilterHandler<T>
where
    T: 'static,
    F: Fn(&SearchResultItem<T>, &FilterValue) -> bool + Send + Sync + 'static,
{
    Arc::new(move |items: Vec<SearchResultItem<T>>, value: &FilterValue| {
        items.into_iter().filter(|item| keep(item, value)).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FilterOption;

    fn items(names: &[&str]) -> Vec<SearchResultItem<u32>> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| SearchResultItem::new(*name, *name, i as u32))
            .collect()
    }

    fn ids(items: &[SearchResultItem<u32>]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn even_only() -> FilterConfig<u32> {
        FilterConfig::checkbox(
            "even",
            "Even only",
            retain_where(|item: &SearchResultItem<u32>, v| !v.as_flag() || item.original % 2 == 0),
        )
    }

    fn prefix() -> FilterConfig<u32> {
        FilterConfig::dropdown(
            "prefix",
            "Starts with",
            vec![FilterOption::new("Any", ""), FilterOption::new("A", "a")],
            retain_where(|item: &SearchResultItem<u32>, v| item.id.starts_with(v.as_text())),
        )
    }

    #[test]
    fn no_filters_returns_input_unchanged() {
        let raw = items(&["alpha", "beta"]);
        let out = apply_filters(&raw, &[], &FilterState::default());
        assert_eq!(out, raw);
    }

    #[test]
    fn filters_compose_in_declared_order() {
        let raw = items(&["alpha", "beta", "axe", "avocado"]);
        let filters = vec![even_only(), prefix()];
        let mut state = FilterState::from_configs(&filters);
        state.set("even", FilterValue::Flag(true));
        state.set("prefix", FilterValue::from("a"));

        let out = apply_filters(&raw, &filters, &state);
        // originals: alpha=0, beta=1, axe=2, avocado=3
        assert_eq!(ids(&out), vec!["alpha", "axe"]);
    }

    #[test]
    fn handler_sees_previous_handler_output() {
        let truncate: FilterConfig<u32> = FilterConfig::checkbox(
            "first-two",
            "First two",
            Arc::new(|items: Vec<SearchResultItem<u32>>, _: &FilterValue| {
                items.into_iter().take(2).collect()
            }),
        );
        let count_seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&count_seen);
        let observe: FilterConfig<u32> = FilterConfig::checkbox(
            "observe",
            "Observe",
            Arc::new(move |items: Vec<SearchResultItem<u32>>, _: &FilterValue| {
                seen.store(items.len(), std::sync::atomic::Ordering::SeqCst);
                items
            }),
        );
        let filters = vec![truncate, observe];
        let out = apply_filters(&items(&["a", "b", "c", "d"]), &filters, &FilterState::from_configs(&filters));
        assert_eq!(out.len(), 2);
        assert_eq!(count_seen.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn applying_same_state_twice_is_idempotent() {
        let raw = items(&["alpha", "beta", "axe"]);
        let filters = vec![even_only(), prefix()];
        let mut state = FilterState::from_configs(&filters);
        state.set("even", FilterValue::Flag(true));
        let first = apply_filters(&raw, &filters, &state);
        let second = apply_filters(&raw, &filters, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_state_entry_uses_initial_value() {
        let raw = items(&["alpha", "beta"]);
        let filters = vec![even_only().with_default(true)];
        let out = apply_filters(&raw, &filters, &FilterState::default());
        assert_eq!(ids(&out), vec!["alpha"]);
    }

    #[test]
    fn state_initializes_by_component_type() {
        let filters = vec![
            even_only(),
            prefix(),
            FilterConfig::date_picker("before", "Before", retain_where(|_: &SearchResultItem<u32>, _| true)),
        ];
        let state = FilterState::from_configs(&filters);
        assert_eq!(state.len(), 3);
        assert_eq!(state.get("even"), Some(&FilterValue::Flag(false)));
        assert_eq!(state.get("prefix"), Some(&FilterValue::Text(String::new())));
        assert_eq!(state.get("before"), Some(&FilterValue::Text(String::new())));
    }

    #[test]
    fn validation_rejects_duplicates_and_optionless_dropdowns() {
        let dup = vec![even_only(), even_only()];
        assert_eq!(validate_filters(&dup), Err(ConfigError::DuplicateFilterId("even".into())));

        let bare: Vec<FilterConfig<u32>> = vec![FilterConfig::dropdown(
            "kind",
            "Kind",
            vec![],
            retain_where(|_: &SearchResultItem<u32>, _| true),
        )];
        assert_eq!(validate_filters(&bare), Err(ConfigError::MissingOptions("kind".into())));

        let mismatched = vec![even_only().with_default("yes")];
        assert!(matches!(
            validate_filters(&mismatched),
            Err(ConfigError::DefaultKindMismatch { .. })
        ));

        assert!(validate_filters(&[even_only(), prefix()]).is_ok());
    }
}
