//! SmartSearch CLI: drive the search widget headlessly against the mock datasets.
//!
//! Uses `smartsearch-core` directly; the same controller and session the
//! desktop demo renders.

mod replay;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use smartsearch_core::{
    load_smartsearch_config, DisplayState, RenderSnapshot, SearchConfig, SearchController,
    SearchEvent, SearchSession,
};
use smartsearch_mock::{filters_for, map_record, Dataset, DemoRecord, MockProvider};

use replay::Step;

/// SmartSearch CLI: type-ahead search from the terminal.
#[derive(Parser)]
#[command(name = "smartsearch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding `.smartsearch.toml` (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print what the dropdown would show
    Search {
        /// Dataset to search (accounts, customers, transactions)
        dataset: String,

        /// Search query
        query: String,

        /// Set a filter before searching, e.g. `--filter has-email=true`
        #[arg(long = "filter", value_name = "ID=VALUE")]
        filters: Vec<String>,

        /// Simulated backend latency
        #[arg(long, default_value = "500")]
        latency_ms: u64,

        /// Make the backend fail for queries containing this text
        #[arg(long)]
        fail_on: Option<String>,
    },
    /// Replay a sequence of widget interactions and print each resulting state
    Replay {
        /// Dataset to search (accounts, customers, transactions)
        dataset: String,

        /// Steps: type:<text> key:<Key> hover:<id> select:<id> filter:<id>=<value> focus clear outside wait
        #[arg(required = true)]
        steps: Vec<String>,

        /// Simulated backend latency
        #[arg(long, default_value = "500")]
        latency_ms: u64,

        /// Make the backend fail for queries containing this text
        #[arg(long)]
        fail_on: Option<String>,
    },
    /// List datasets and their filters
    Datasets,
}

fn build_session(
    dataset: &str,
    latency_ms: u64,
    fail_on: Option<String>,
    config: &SearchConfig,
) -> Result<SearchSession<MockProvider, DemoRecord>, String> {
    let dataset = Dataset::from_name(dataset).ok_or_else(|| {
        let names: Vec<_> = Dataset::ALL.iter().map(|d| d.name()).collect();
        format!("Unknown dataset '{dataset}' (expected one of: {})", names.join(", "))
    })?;

    let mut provider = MockProvider::new(dataset).with_latency(Duration::from_millis(latency_ms));
    if let Some(trigger) = fail_on {
        provider = provider.failing_on(trigger);
    }

    let (controller, triggers) = SearchController::new(map_record);
    let controller = controller
        .with_config(config)
        .with_filters(filters_for(dataset))
        .map_err(|e| e.to_string())?;
    Ok(SearchSession::from_parts(provider, controller, triggers))
}

fn print_snapshot(snapshot: &RenderSnapshot<DemoRecord>, config: &SearchConfig) {
    println!("query: {:?}", snapshot.query_text);
    match &snapshot.display {
        DisplayState::Hidden => println!("  (dropdown closed)"),
        DisplayState::Loading => println!("  Loading..."),
        DisplayState::Error(message) => println!("  {message}"),
        DisplayState::NoResults => println!("  {}", config.no_results_message),
        DisplayState::Results => {
            for item in &snapshot.visible_items {
                let marker = if snapshot.focused_item_id.as_deref() == Some(item.id.as_str()) {
                    ">"
                } else {
                    " "
                };
                println!(
                    "{marker} {:<10} {:<22} {}",
                    item.id,
                    item.primary_text,
                    item.secondary_text.as_deref().unwrap_or("")
                );
            }
        }
    }
}

fn print_events(events: &[SearchEvent<DemoRecord>]) {
    for event in events {
        match event {
            SearchEvent::ItemSelected(item) => {
                println!("event: search-item-selected {} ({})", item.id, item.primary_text)
            }
            SearchEvent::Cleared => println!("event: cleared"),
        }
    }
}

fn event_json(event: &SearchEvent<DemoRecord>) -> serde_json::Value {
    match event {
        SearchEvent::ItemSelected(item) => serde_json::json!({
            "type": "search-item-selected",
            "item": item,
        }),
        SearchEvent::Cleared => serde_json::json!({ "type": "cleared" }),
    }
}

fn to_pretty(value: &serde_json::Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

async fn run(cli: Cli) -> Result<(), String> {
    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
    let config = load_smartsearch_config(&root);

    match cli.command {
        Commands::Search { dataset, query, filters, latency_ms, fail_on } => {
            let mut session = build_session(&dataset, latency_ms, fail_on, &config)?;
            for assignment in &filters {
                let (id, raw) = replay::parse_assignment(assignment)?;
                replay::apply_filter(&mut session, &id, &raw)?;
            }

            session.controller_mut().on_query_change(config.sanitize(&query));
            session.settle().await;
            let snapshot = session.controller().snapshot();

            if cli.json {
                let value = serde_json::to_value(&snapshot).map_err(|e| e.to_string())?;
                println!("{}", to_pretty(&value)?);
                return Ok(());
            }

            match &snapshot.display {
                DisplayState::Error(message) => return Err(message.clone()),
                DisplayState::Hidden => {
                    return Err(format!(
                        "Query '{}' is too short (minimum {} characters)",
                        snapshot.query_text,
                        smartsearch_core::MIN_QUERY_LEN
                    ))
                }
                DisplayState::NoResults => {
                    eprintln!("No results for '{}'", snapshot.query_text);
                    std::process::exit(1);
                }
                _ => {}
            }
            print_snapshot(&snapshot, &config);
            eprintln!("\n{} results", snapshot.visible_items.len());
        }
        Commands::Replay { dataset, steps, latency_ms, fail_on } => {
            let steps = steps.iter().map(|s| s.parse::<Step>()).collect::<Result<Vec<_>, _>>()?;
            let mut session = build_session(&dataset, latency_ms, fail_on, &config)?;
            let mut trace = Vec::new();

            for step in &steps {
                replay::apply(&mut session, step, &config).await?;
                let controller = session.controller_mut();
                let events = controller.take_events();
                let snapshot = controller.snapshot();
                let phase = controller.phase();

                if cli.json {
                    trace.push(serde_json::json!({
                        "step": step.to_string(),
                        "phase": phase,
                        "snapshot": snapshot,
                        "events": events.iter().map(event_json).collect::<Vec<_>>(),
                    }));
                } else {
                    println!("-- {step} [{phase:?}]");
                    print_snapshot(&snapshot, &config);
                    print_events(&events);
                }
            }

            if cli.json {
                println!("{}", to_pretty(&serde_json::Value::Array(trace))?);
            }
        }
        Commands::Datasets => {
            if cli.json {
                let items: Vec<serde_json::Value> = Dataset::ALL
                    .iter()
                    .map(|d| {
                        let filters: Vec<_> = filters_for(*d)
                            .iter()
                            .map(|f| {
                                serde_json::json!({
                                    "filterId": f.filter_id,
                                    "label": f.label,
                                    "componentType": f.component_type,
                                    "options": f.options,
                                })
                            })
                            .collect();
                        serde_json::json!({ "name": d.name(), "label": d.label(), "filters": filters })
                    })
                    .collect();
                println!("{}", to_pretty(&serde_json::Value::Array(items))?);
            } else {
                for d in Dataset::ALL {
                    println!("{:<14} {}", d.name(), d.label());
                    for f in filters_for(d) {
                        let options: Vec<_> = f.options.iter().map(|o| o.value.as_str()).collect();
                        if options.is_empty() {
                            println!("    {:<16} {}", f.filter_id, f.component_type);
                        } else {
                            println!(
                                "    {:<16} {} [{}]",
                                f.filter_id,
                                f.component_type,
                                options.join("|")
                            );
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartsearch=warn".parse().unwrap()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
