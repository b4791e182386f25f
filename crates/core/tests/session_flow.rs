//! End-to-end controller behaviour through a `SearchSession`, with tokio's
//! clock paused so debounce and provider latency are deterministic.

mod helpers;

use std::time::Duration;

use helpers::{fruit, session, Fruit, ScriptedProvider};
use smartsearch_core::filter::retain_where;
use smartsearch_core::{
    DisplayState, FilterConfig, FilterOption, FilterValue, Key, Phase, SearchEvent,
    SearchResultItem, SessionStep,
};
use tokio::time::advance;

// ---------------------------------------------------------------------------
// Debounce and fetch
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn burst_of_edits_issues_one_fetch_with_last_text() {
    let provider = ScriptedProvider::new().answer("app", 100, vec![fruit("1", "Apple")]);
    let calls = provider.calls();
    let mut s = session(provider);

    s.controller_mut().on_query_change("a");
    advance(Duration::from_millis(100)).await;
    s.controller_mut().on_query_change("ap");
    advance(Duration::from_millis(100)).await;
    s.controller_mut().on_query_change("app");
    assert_eq!(s.controller().phase(), Phase::Debouncing);

    s.settle().await;
    assert_eq!(*calls.lock().unwrap(), vec!["app".to_string()]);
    assert_eq!(s.controller().visible_items().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn short_query_never_reaches_provider() {
    let provider = ScriptedProvider::new();
    let calls = provider.calls();
    let mut s = session(provider);

    s.controller_mut().on_query_change("a");
    let steps = s.settle().await;

    assert_eq!(steps, vec![SessionStep::Skipped]);
    assert!(calls.lock().unwrap().is_empty());
    assert!(s.controller().visible_items().is_empty());
    assert!(!s.controller().show_no_results());
    assert_eq!(s.controller().phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn phases_follow_the_fetch_lifecycle() {
    let provider = ScriptedProvider::new().answer("ap", 500, vec![fruit("1", "Apple")]);
    let mut s = session(provider);
    assert_eq!(s.controller().phase(), Phase::Idle);

    s.controller_mut().on_query_change("ap");
    assert_eq!(s.controller().phase(), Phase::Debouncing);

    assert!(matches!(s.step().await, SessionStep::Issued(_)));
    assert_eq!(s.controller().phase(), Phase::Loading);
    assert!(s.controller().is_loading());

    assert_eq!(s.step().await, SessionStep::Applied { generation: 1 });
    assert_eq!(s.controller().phase(), Phase::Showing);
    assert!(!s.controller().is_loading());
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn apple_is_found_navigated_and_selected() {
    let provider = ScriptedProvider::new().answer("ap", 500, vec![fruit("1", "Apple")]);
    let mut s = session(provider);

    s.controller_mut().on_query_change("ap");
    s.settle().await;

    let c = s.controller();
    assert_eq!(c.visible_items().len(), 1);
    assert_eq!(c.visible_items()[0].primary_text, "Apple");
    assert!(!c.show_no_results());
    assert!(c.expanded());

    let c = s.controller_mut();
    c.on_key_down(Key::ArrowDown);
    assert_eq!(c.active_descendant(), Some("1"));
    c.on_key_down(Key::Enter);

    assert_eq!(c.query_text(), "Apple");
    assert!(!c.expanded());
    let events = c.take_events();
    assert_eq!(
        events,
        vec![SearchEvent::ItemSelected(SearchResultItem::new("1", "Apple", fruit("1", "Apple")))]
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_query_shows_error_without_no_results() {
    let provider = ScriptedProvider::new().fail("xx", 200);
    let mut s = session(provider);

    s.controller_mut().on_query_change("xx");
    s.settle().await;

    let c = s.controller();
    assert!(c.error_message().is_some());
    assert!(c.visible_items().is_empty());
    assert!(!c.show_no_results());
    assert!(matches!(c.display(), DisplayState::Error(_)));

    // Still interactive: a new query recovers.
    s.controller_mut().on_query_change("xy");
    assert_eq!(s.controller().error_message(), None);
}

#[tokio::test(start_paused = true)]
async fn empty_provider_answer_shows_no_results() {
    let provider = ScriptedProvider::new().answer("zz", 100, vec![]);
    let mut s = session(provider);

    s.controller_mut().on_query_change("zz");
    s.settle().await;

    assert!(s.controller().show_no_results());
    assert_eq!(s.controller().display(), DisplayState::NoResults);
    assert!(!s.controller().expanded());
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn slow_earlier_response_cannot_overwrite_newer_one() {
    let provider = ScriptedProvider::new()
        .answer("ab", 500, vec![fruit("old", "Abacus")])
        .answer("abc", 100, vec![fruit("new", "Abc Corp")]);
    let calls = provider.calls();
    let mut s = session(provider);

    s.controller_mut().on_query_change("ab");
    assert!(matches!(s.step().await, SessionStep::Issued(_)));

    s.controller_mut().on_query_change("abc");
    let steps = s.settle().await;

    assert!(matches!(steps[0], SessionStep::Issued(_)));
    assert_eq!(steps[1], SessionStep::Applied { generation: 2 });
    assert_eq!(steps[2], SessionStep::Discarded { generation: 1 });
    assert_eq!(calls.lock().unwrap().len(), 2);

    let c = s.controller();
    assert_eq!(c.visible_items().len(), 1);
    assert_eq!(c.visible_items()[0].id, "new");
    assert!(!c.is_loading());
}

#[tokio::test(start_paused = true)]
async fn escape_during_debounce_cancels_the_search() {
    let provider = ScriptedProvider::new().answer("ap", 100, vec![fruit("1", "Apple")]);
    let calls = provider.calls();
    let mut s = session(provider);

    s.controller_mut().on_query_change("ap");
    advance(Duration::from_millis(100)).await;
    s.controller_mut().on_key_down(Key::Escape);

    assert!(!s.is_busy());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(s.controller().query_text(), "ap");
    assert_eq!(s.controller().phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn selection_while_loading_drops_the_late_response() {
    let provider = ScriptedProvider::new()
        .answer("ap", 100, vec![fruit("1", "Apple"), fruit("2", "Apricot")])
        .answer("apr", 800, vec![fruit("2", "Apricot")]);
    let mut s = session(provider);

    s.controller_mut().on_query_change("ap");
    s.settle().await;

    s.controller_mut().on_query_change("apr");
    assert!(matches!(s.step().await, SessionStep::Issued(_)));
    // Old results stay visible while the refined query loads.
    assert!(s.controller_mut().on_item_select("2"));

    let steps = s.settle().await;
    assert!(matches!(steps.as_slice(), [SessionStep::Discarded { .. }]));
    assert!(!s.controller().expanded());
    assert_eq!(s.controller().query_text(), "Apricot");
}

// ---------------------------------------------------------------------------
// Focus, clear, and filters
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn focus_in_reopens_results_for_typed_query() {
    let provider = ScriptedProvider::new().answer("ap", 100, vec![fruit("1", "Apple")]);
    let calls = provider.calls();
    let mut s = session(provider);

    s.controller_mut().on_query_change("ap");
    s.settle().await;
    s.controller_mut().on_key_down(Key::Tab);
    assert!(!s.controller().expanded());

    s.controller_mut().on_focus_in();
    s.settle().await;
    assert!(s.controller().expanded());
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn editing_clears_previous_selection() {
    let provider = ScriptedProvider::new().answer("ap", 100, vec![fruit("1", "Apple")]);
    let mut s = session(provider);

    s.controller_mut().on_query_change("ap");
    s.settle().await;
    s.controller_mut().on_item_select("1");
    assert!(s.controller().selected_item().is_some());

    s.controller_mut().on_query_change("Appl");
    assert!(s.controller().selected_item().is_none());
}

#[tokio::test(start_paused = true)]
async fn clear_resets_query_and_closes() {
    let provider = ScriptedProvider::new().answer("ap", 100, vec![fruit("1", "Apple")]);
    let mut s = session(provider);

    s.controller_mut().on_query_change("ap");
    s.settle().await;
    s.controller_mut().on_key_down(Key::ArrowDown);
    s.controller_mut().on_clear();

    let c = s.controller_mut();
    assert_eq!(c.query_text(), "");
    assert!(!c.expanded());
    assert_eq!(c.focused_item_id(), None);
    assert_eq!(c.take_events(), vec![SearchEvent::Cleared]);
}

#[tokio::test(start_paused = true)]
async fn filters_apply_to_fetched_results() {
    let provider = ScriptedProvider::new().answer(
        "an",
        100,
        vec![fruit("1", "Banana"), fruit("2", "Mango"), fruit("3", "Ananas")],
    );
    let initial = FilterConfig::dropdown(
        "initial",
        "Initial",
        vec![FilterOption::new("Any", ""), FilterOption::new("M", "M")],
        retain_where(|item: &SearchResultItem<Fruit>, v| item.primary_text.starts_with(v.as_text())),
    );
    let mut s = session(provider).with_filters(vec![initial]).unwrap();

    s.controller_mut().on_query_change("an");
    s.settle().await;
    assert_eq!(s.controller().visible_items().len(), 3);

    s.controller_mut().on_filter_change("initial", FilterValue::from("M"));
    let ids: Vec<_> = s.controller().visible_items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["2"]);

    s.controller_mut().on_filter_change("initial", FilterValue::from("Q"));
    assert!(s.controller().show_no_results());

    // A fresh fetch goes through the filters too.
    s.controller_mut().on_filter_change("initial", FilterValue::from("A"));
    s.controller_mut().on_query_change("an");
    s.settle().await;
    let ids: Vec<_> = s.controller().visible_items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["3"]);
}
