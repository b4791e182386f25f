//! Widget configuration: presentational settings a host may tune.
//!
//! Loaded from `.smartsearch.toml` in a project root, merged over defaults.
//! The minimum query length and the debounce interval are fixed constants
//! ([`crate::controller::MIN_QUERY_LEN`], [`crate::debounce::DEBOUNCE_INTERVAL`])
//! and deliberately not configurable.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

/// Name of the per-project config file.
pub const CONFIG_FILE: &str = ".smartsearch.toml";

/// Known keys in `.smartsearch.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["placeholder", "error_message", "no_results_message", "theme", "max_length", "exclude"];

/// Colour scheme of the widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Ocean,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "ocean" => Some(Theme::Ocean),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Ocean => "ocean",
        }
    }
}

/// Runtime configuration for one widget instance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchConfig {
    pub placeholder: String,
    /// Generic text shown when the provider fails. The failure reason is never shown.
    pub error_message: String,
    pub no_results_message: String,
    pub theme: Theme,
    /// Maximum number of characters the input accepts.
    pub max_length: Option<usize>,
    /// Characters the input refuses.
    pub exclude: BTreeSet<char>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            placeholder: "Search...".to_string(),
            error_message: "Something went wrong while searching. Please try again.".to_string(),
            no_results_message: "No results found".to_string(),
            theme: Theme::Light,
            max_length: None,
            exclude: BTreeSet::new(),
        }
    }
}

impl SearchConfig {
    /// Apply the input constraints: drop excluded characters, then cap the length.
    pub fn sanitize(&self, text: &str) -> String {
        let kept = text.chars().filter(|c| !self.exclude.contains(c));
        match self.max_length {
            Some(max) => kept.take(max).collect(),
            None => kept.collect(),
        }
    }
}

/// Levenshtein distance over chars, used to suggest the intended key for a typo.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    // row[j] is the distance between the prefix of `a` seen so far and b[..j].
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb { diag } else { 1 + diag.min(above).min(row[j]) };
            diag = above;
        }
    }
    row[b.len()]
}

/// Load widget configuration from `.smartsearch.toml` in the given project root.
///
/// A missing file gives defaults. An unparsable file gives defaults with a warning. Unknown keys
/// and ill-typed values are warned about and ignored.
pub fn load_smartsearch_config(project_root: &Path) -> SearchConfig {
    let config_path = project_root.join(CONFIG_FILE);
    if !config_path.exists() {
        return SearchConfig::default();
    }

    debug!(path = %config_path.display(), "Loading .smartsearch.toml");
    match std::fs::read_to_string(&config_path) {
        Ok(content) => parse_smartsearch_config(&content),
        Err(e) => {
            warn!(error = %e, "Failed to read .smartsearch.toml");
            SearchConfig::default()
        }
    }
}

/// Parse the contents of a `.smartsearch.toml` file over the defaults.
pub fn parse_smartsearch_config(content: &str) -> SearchConfig {
    let mut config = SearchConfig::default();

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "Failed to parse .smartsearch.toml");
            return config;
        }
    };

    // Validate keys, warn on unknown
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(s) if edit_distance(key, s) <= 3 => warn!(
                key = key.as_str(),
                suggestion = *s,
                "Unknown key in .smartsearch.toml, did you mean '{s}'?"
            ),
            _ => warn!(
                key = key.as_str(),
                "Unknown key in .smartsearch.toml (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }

    if let Some(s) = table.get("placeholder").and_then(|v| v.as_str()) {
        config.placeholder = s.to_string();
    }
    if let Some(s) = table.get("error_message").and_then(|v| v.as_str()) {
        config.error_message = s.to_string();
    }
    if let Some(s) = table.get("no_results_message").and_then(|v| v.as_str()) {
        config.no_results_message = s.to_string();
    }

    if let Some(name) = table.get("theme").and_then(|v| v.as_str()) {
        match Theme::from_name(name) {
            Some(theme) => config.theme = theme,
            None => warn!(theme = name, "Unknown theme in .smartsearch.toml (light, dark, ocean)"),
        }
    }

    if let Some(v) = table.get("max_length") {
        match v.as_integer().and_then(|n| usize::try_from(n).ok()) {
            Some(n) if n > 0 => config.max_length = Some(n),
            _ => warn!("max_length in .smartsearch.toml must be a positive integer"),
        }
    }

    if let Some(s) = table.get("exclude").and_then(|v| v.as_str()) {
        config.exclude = s.chars().collect();
    }

    config
}
