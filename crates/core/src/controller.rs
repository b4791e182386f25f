//! Search orchestration controller.
//!
//! [`SearchController`] is the only writer of the widget state. Every public
//! `on_*` method is one synchronous state transition; hosts call them from their
//! input, dropdown, filter and clear controls and render from the read-only
//! accessors or a [`RenderSnapshot`].
//!
//! Fetching is split in two so the ordering guarantee can be tested without
//! timers: [`begin_fetch`](SearchController::begin_fetch) issues a
//! generation-tagged [`FetchTicket`], and
//! [`complete_fetch`](SearchController::complete_fetch) applies a provider
//! result only if its ticket is still the latest one issued.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::debounce::{self, DebounceReceiver, Debouncer, DEBOUNCE_INTERVAL};
use crate::error::{ConfigError, ProviderError};
use crate::filter::{apply_filters, validate_filters};
use crate::position::{HitTest, NoopPositioner, Point, Positioner, SurfaceHandle};
use crate::types::{FilterConfig, FilterState, FilterValue, ResultMapper, SearchResultItem};

/// Queries shorter than this (in characters) never reach the provider.
pub const MIN_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Event contract
// ---------------------------------------------------------------------------

/// Keys the controller reacts to. Everything else is [`Key::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"ArrowDown"`, `"Enter"`, ...) to a [`Key`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            _ => Key::Other,
        }
    }
}

/// What the host should do with the original key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The controller acted on the key.
    pub handled: bool,
    /// The host must suppress its default behaviour (scrolling for arrow keys).
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub const IGNORED: Self = Self { handled: false, prevent_default: false };
    pub const HANDLED: Self = Self { handled: true, prevent_default: false };
    pub const CAPTURED: Self = Self { handled: true, prevent_default: true };
}

/// Public events emitted to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchEvent<T> {
    /// `search-item-selected`: the user committed to an item.
    ItemSelected(SearchResultItem<T>),
    /// The clear control reset the query.
    Cleared,
}

/// A provider call the controller has issued and is waiting on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: String,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything the controller owns. Exposed read-only.
#[derive(Clone, Debug)]
pub struct ControllerState<T> {
    pub query_text: String,
    /// Mapped items of the most recent applied fetch, before filtering.
    pub raw_cache: Vec<SearchResultItem<T>>,
    /// `raw_cache` after the filter pipeline. Never assigned any other way.
    pub visible_items: Vec<SearchResultItem<T>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub focused_item_id: Option<String>,
    pub selected_item: Option<SearchResultItem<T>>,
    pub filter_state: FilterState,
    pub show_no_results: bool,
}

impl<T> Default for ControllerState<T> {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            raw_cache: Vec::new(),
            visible_items: Vec::new(),
            is_loading: false,
            error_message: None,
            focused_item_id: None,
            selected_item: None,
            filter_state: FilterState::default(),
            show_no_results: false,
        }
    }
}

/// Conceptual widget state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Debouncing,
    Loading,
    Showing,
    Empty,
    Error,
}

/// The single condition driving what the dropdown area shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "kebab-case")]
pub enum DisplayState {
    Hidden,
    Loading,
    Error(String),
    NoResults,
    Results,
}

/// Render-facing view of the controller, including the ARIA wiring.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot<T> {
    pub query_text: String,
    pub is_loading: bool,
    pub visible_items: Vec<SearchResultItem<T>>,
    pub focused_item_id: Option<String>,
    pub show_no_results: bool,
    pub error_message: Option<String>,
    /// `aria-expanded`
    pub expanded: bool,
    /// `aria-activedescendant`
    pub active_descendant: Option<String>,
    /// Shared by the input (`aria-controls`) and the listbox (`id`).
    pub listbox_id: String,
    pub input_id: String,
    pub display: DisplayState,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Orchestrates querying, caching, filtering, focus and selection for one widget.
///
/// `R` is the raw provider record, `T` the payload carried by result items.
pub struct SearchController<R, T> {
    mapper: ResultMapper<R, T>,
    filters: Vec<FilterConfig<T>>,
    state: ControllerState<T>,
    debouncer: Debouncer<String>,
    /// Generation of the latest issued fetch. Bumped on every issue and on dismissal.
    generation: u64,
    positioner: Box<dyn Positioner>,
    positioner_attached: bool,
    input_handle: SurfaceHandle,
    listbox_handle: SurfaceHandle,
    error_text: String,
    events: Vec<SearchEvent<T>>,
}

impl<R, T: Clone> SearchController<R, T> {
    /// Create a controller with no filters and a no-op positioner.
    ///
    /// The returned receiver yields debounced query text; whoever drives the
    /// controller feeds each value to [`begin_fetch`](Self::begin_fetch).
    /// Debounce timers run on the ambient tokio runtime, so input events must
    /// arrive from inside one; outside a runtime they update the query but
    /// never trigger a search.
    pub fn new<F>(mapper: F) -> (Self, DebounceReceiver<String>)
    where
        F: Fn(R) -> SearchResultItem<T> + Send + Sync + 'static,
    {
        let (debouncer, triggers) = debounce::channel(DEBOUNCE_INTERVAL);
        let instance = Uuid::new_v4().simple().to_string();
        let instance = &instance[..8];
        let controller = Self {
            mapper: Arc::new(mapper),
            filters: Vec::new(),
            state: ControllerState::default(),
            debouncer,
            generation: 0,
            positioner: Box::new(NoopPositioner),
            positioner_attached: false,
            input_handle: SurfaceHandle::new(format!("smart-search-{instance}-input")),
            listbox_handle: SurfaceHandle::new(format!("smart-search-{instance}-dropdown-listbox")),
            error_text: SearchConfig::default().error_message,
            events: Vec::new(),
        };
        (controller, triggers)
    }

    pub fn with_filters(mut self, filters: Vec<FilterConfig<T>>) -> Result<Self, ConfigError> {
        self.set_filters(filters)?;
        Ok(self)
    }

    pub fn with_positioner(mut self, positioner: impl Positioner + 'static) -> Self {
        self.positioner = Box::new(positioner);
        self
    }

    pub fn with_config(mut self, config: &SearchConfig) -> Self {
        self.error_text = config.error_message.clone();
        self
    }

    /// Replace the filter configuration. Filter state is re-initialized from the
    /// new defaults and the visible set recomputed. An invalid configuration is
    /// rejected and the previous one kept.
    pub fn set_filters(&mut self, filters: Vec<FilterConfig<T>>) -> Result<(), ConfigError> {
        validate_filters(&filters)?;
        self.state.filter_state = FilterState::from_configs(&filters);
        self.filters = filters;
        debug!(count = self.filters.len(), "Filter configuration replaced");
        if !self.state.raw_cache.is_empty() {
            self.refresh_visible();
            self.state.show_no_results = self.state.visible_items.is_empty();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input events
    // -----------------------------------------------------------------------

    /// The input text changed. Schedules a search on the current tokio runtime.
    pub fn on_query_change(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.state.selected_item = None;
        self.state.focused_item_id = None;
        self.state.error_message = None;
        self.state.query_text = text.clone();
        self.debouncer.schedule(text);
    }

    /// The input regained focus: search again for whatever is already typed.
    pub fn on_focus_in(&mut self) {
        self.debouncer.schedule(self.state.query_text.clone());
    }

    // -----------------------------------------------------------------------
    // Fetch lifecycle
    // -----------------------------------------------------------------------

    /// Start a search for debounced `text`.
    ///
    /// Returns the ticket the provider result must be completed with, or `None`
    /// when the text is below [`MIN_QUERY_LEN`]; in that case the result set is
    /// emptied, no-results is suppressed, and nothing is fetched. Either way any
    /// fetch still in flight is superseded.
    pub fn begin_fetch(&mut self, text: String) -> Option<FetchTicket> {
        self.generation += 1;

        if text.chars().count() < MIN_QUERY_LEN {
            debug!(query = %text, "Query below minimum length, not searching");
            self.close_dropdown();
            return None;
        }

        self.state.is_loading = true;
        self.state.error_message = None;
        self.state.show_no_results = false;
        debug!(generation = self.generation, query = %text, "Issuing search");
        Some(FetchTicket { generation: self.generation, query: text })
    }

    /// Apply a provider result. Returns `false` (and changes nothing) when the
    /// ticket has been superseded by a later fetch or a dismissal.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<R>, ProviderError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                query = %ticket.query,
                "Discarding stale search response"
            );
            return false;
        }

        self.state.is_loading = false;
        match result {
            Ok(records) => {
                let mut seen = HashSet::new();
                let mut items = Vec::with_capacity(records.len());
                for record in records {
                    let item = (self.mapper)(record);
                    if seen.insert(item.id.clone()) {
                        items.push(item);
                    } else {
                        warn!(id = %item.id, "Dropping result with duplicate id");
                    }
                }
                debug!(generation = ticket.generation, results = items.len(), "Search completed");
                self.state.raw_cache = items;
                self.refresh_visible();
                self.state.show_no_results = self.state.visible_items.is_empty();
            }
            Err(e) => {
                warn!(error = %e, query = %ticket.query, "Search provider failed");
                self.state.error_message = Some(self.error_text.clone());
                self.state.focused_item_id = None;
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Dropdown events
    // -----------------------------------------------------------------------

    /// Pointer moved over an item.
    pub fn on_item_hover(&mut self, item_id: &str) {
        if self.list_shown() && self.position_of(item_id).is_some() {
            self.state.focused_item_id = Some(item_id.to_string());
        }
    }

    pub fn on_key_down(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::ArrowDown => {
                self.move_focus(true);
                KeyOutcome::CAPTURED
            }
            Key::ArrowUp => {
                self.move_focus(false);
                KeyOutcome::CAPTURED
            }
            Key::Enter => match self.state.focused_item_id.clone() {
                Some(id) if self.on_item_select(&id) => KeyOutcome::HANDLED,
                _ => KeyOutcome::IGNORED,
            },
            Key::Escape => {
                self.dismiss();
                KeyOutcome::HANDLED
            }
            // Close, but let focus advance.
            Key::Tab => {
                self.dismiss();
                KeyOutcome::HANDLED
            }
            Key::Other => KeyOutcome::IGNORED,
        }
    }

    /// Commit to an item (click or Enter).
    ///
    /// Unknown ids and disabled items are refused. Returns whether the selection
    /// happened; exactly one [`SearchEvent::ItemSelected`] is queued when it did.
    pub fn on_item_select(&mut self, item_id: &str) -> bool {
        if !self.list_shown() {
            debug!(id = item_id, "Ignoring selection while the result list is hidden");
            return false;
        }
        let Some(idx) = self.position_of(item_id) else {
            debug!(id = item_id, "Ignoring selection of unknown item");
            return false;
        };
        let item = self.state.visible_items[idx].clone();
        if item.is_disabled {
            debug!(id = item_id, "Ignoring selection of disabled item");
            return false;
        }

        info!(id = %item.id, text = %item.primary_text, "Item selected");
        self.state.query_text = item.primary_text.clone();
        self.state.selected_item = Some(item.clone());
        self.dismiss();
        self.events.push(SearchEvent::ItemSelected(item));
        true
    }

    // -----------------------------------------------------------------------
    // Filter, outside-click and clear events
    // -----------------------------------------------------------------------

    /// A filter control emitted `filter-applied`.
    pub fn on_filter_change(&mut self, filter_id: &str, value: FilterValue) -> bool {
        if !self.filters.iter().any(|f| f.filter_id == filter_id) {
            warn!(filter = filter_id, "Ignoring change to unknown filter");
            return false;
        }
        debug!(filter = filter_id, value = %value, "Filter applied");
        self.state.filter_state.set(filter_id, value);
        if !self.state.raw_cache.is_empty() {
            self.refresh_visible();
            self.state.show_no_results = self.state.visible_items.is_empty();
        }
        true
    }

    /// Whether the host needs to report pointer-downs right now. Outside-click
    /// tracking only matters while the dropdown is open.
    pub fn wants_outside_clicks(&self) -> bool {
        self.is_open()
    }

    /// A pointer went down at `point`; `root` is the widget's hit area. Closes
    /// the dropdown when the point is outside. Returns whether it closed.
    pub fn on_pointer_down<H>(&mut self, root: &H, point: Point) -> bool
    where
        H: HitTest + ?Sized,
    {
        if !self.is_open() || root.contains_point(point) {
            return false;
        }
        self.on_click_outside();
        true
    }

    /// A pointer went down outside the widget (host already did the hit test).
    pub fn on_click_outside(&mut self) {
        debug!("Pointer down outside widget");
        self.dismiss();
    }

    /// The clear control was pressed.
    pub fn on_clear(&mut self) {
        self.state.query_text.clear();
        self.dismiss();
        self.events.push(SearchEvent::Cleared);
    }

    /// Drain queued public events.
    pub fn take_events(&mut self) -> Vec<SearchEvent<T>> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Read-only view
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &ControllerState<T> {
        &self.state
    }

    pub fn query_text(&self) -> &str {
        &self.state.query_text
    }

    pub fn visible_items(&self) -> &[SearchResultItem<T>] {
        &self.state.visible_items
    }

    pub fn focused_item_id(&self) -> Option<&str> {
        self.state.focused_item_id.as_deref()
    }

    pub fn selected_item(&self) -> Option<&SearchResultItem<T>> {
        self.state.selected_item.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Error text, suppressed while loading.
    pub fn error_message(&self) -> Option<&str> {
        if self.state.is_loading {
            return None;
        }
        self.state.error_message.as_deref()
    }

    /// "No results" indicator, suppressed while loading or showing an error.
    pub fn show_no_results(&self) -> bool {
        self.state.show_no_results && !self.state.is_loading && self.state.error_message.is_none()
    }

    pub fn filters(&self) -> &[FilterConfig<T>] {
        &self.filters
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state.filter_state
    }

    /// `aria-expanded`: the result list is on screen.
    pub fn expanded(&self) -> bool {
        self.list_shown()
    }

    /// `aria-activedescendant`: mirrors the focused item id.
    pub fn active_descendant(&self) -> Option<&str> {
        self.focused_item_id()
    }

    pub fn listbox_id(&self) -> &str {
        self.listbox_handle.id()
    }

    pub fn input_id(&self) -> &str {
        self.input_handle.id()
    }

    pub fn debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The dropdown area shows something (results, spinner, or a message).
    pub fn is_open(&self) -> bool {
        self.display() != DisplayState::Hidden
    }

    pub fn display(&self) -> DisplayState {
        if self.state.is_loading {
            DisplayState::Loading
        } else if let Some(msg) = &self.state.error_message {
            DisplayState::Error(msg.clone())
        } else if !self.state.visible_items.is_empty() {
            DisplayState::Results
        } else if self.state.show_no_results {
            DisplayState::NoResults
        } else {
            DisplayState::Hidden
        }
    }

    pub fn phase(&self) -> Phase {
        match self.display() {
            DisplayState::Loading => Phase::Loading,
            DisplayState::Error(_) => Phase::Error,
            DisplayState::Results => Phase::Showing,
            DisplayState::NoResults => Phase::Empty,
            DisplayState::Hidden if self.debouncer.is_pending() => Phase::Debouncing,
            DisplayState::Hidden => Phase::Idle,
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot<T> {
        RenderSnapshot {
            query_text: self.state.query_text.clone(),
            is_loading: self.state.is_loading,
            visible_items: self.state.visible_items.clone(),
            focused_item_id: self.state.focused_item_id.clone(),
            show_no_results: self.show_no_results(),
            error_message: self.error_message().map(str::to_string),
            expanded: self.expanded(),
            active_descendant: self.active_descendant().map(str::to_string),
            listbox_id: self.listbox_id().to_string(),
            input_id: self.input_id().to_string(),
            display: self.display(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Visible items are rendered: showing results, or loading over a previous
    /// result set. An error replaces the list even though the cache survives.
    fn list_shown(&self) -> bool {
        !self.state.visible_items.is_empty() && self.state.error_message.is_none()
    }

    fn position_of(&self, item_id: &str) -> Option<usize> {
        self.state.visible_items.iter().position(|i| i.id == item_id)
    }

    /// Circular focus movement over the visible items.
    fn move_focus(&mut self, forward: bool) {
        let len = self.state.visible_items.len();
        if !self.list_shown() {
            return;
        }
        let current = self.state.focused_item_id.as_deref().and_then(|id| self.position_of(id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.state.focused_item_id = Some(self.state.visible_items[next].id.clone());
    }

    /// Recompute `visible_items` from the cache and keep focus and the
    /// positioner consistent with it.
    fn refresh_visible(&mut self) {
        let was_shown = !self.state.visible_items.is_empty();
        self.state.visible_items =
            apply_filters(&self.state.raw_cache, &self.filters, &self.state.filter_state);

        if let Some(id) = self.state.focused_item_id.as_deref() {
            if self.position_of(id).is_none() {
                self.state.focused_item_id = None;
            }
        }

        if !was_shown && !self.state.visible_items.is_empty() {
            if !self.positioner_attached {
                self.positioner.attach(&self.input_handle, &self.listbox_handle);
                self.positioner_attached = true;
            }
            self.positioner.recompute();
        }
    }

    /// Back to Idle: nothing shown, nothing focused, positioner released.
    fn close_dropdown(&mut self) {
        self.state.raw_cache.clear();
        self.state.visible_items.clear();
        self.state.show_no_results = false;
        self.state.focused_item_id = None;
        self.state.error_message = None;
        self.state.is_loading = false;
        if self.positioner_attached {
            self.positioner.release();
            self.positioner_attached = false;
        }
    }

    /// Close and make sure nothing pending reopens the dropdown: the debounce is
    /// cancelled and any in-flight fetch superseded.
    fn dismiss(&mut self) {
        self.debouncer.cancel();
        self.generation += 1;
        self.close_dropdown();
    }
}
