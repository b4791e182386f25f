//! Mock banking data for SmartSearch demos: three datasets, providers that
//! simulate network latency, result mappers, and per-dataset filter bars.

pub mod data;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use smartsearch_core::filter::retain_where;
use smartsearch_core::{FilterConfig, FilterOption, ProviderError, SearchProvider, SearchResultItem};
use tracing::debug;

use data::{Account, Customer, Transaction, ACCOUNTS, CUSTOMERS, TRANSACTIONS};

/// Simulated round-trip time of the mock backend.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Datasets and records
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Accounts,
    Customers,
    Transactions,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Accounts, Dataset::Customers, Dataset::Transactions];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::Accounts => "accounts",
            Dataset::Customers => "customers",
            Dataset::Transactions => "transactions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dataset::Accounts => "Accounts",
            Dataset::Customers => "Customers",
            Dataset::Transactions => "Transactions",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Any record the mock backend returns.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DemoRecord {
    Account(Account),
    Customer(Customer),
    Transaction(Transaction),
}

/// Case-insensitive substring match over the dataset's searchable fields.
/// An empty query matches nothing.
pub fn search(dataset: Dataset, query: &str) -> Vec<DemoRecord> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    let hit = |field: &str| field.to_lowercase().contains(&q);

    match dataset {
        Dataset::Accounts => ACCOUNTS
            .iter()
            .filter(|a| hit(a.nickname) || hit(a.account_id))
            .cloned()
            .map(DemoRecord::Account)
            .collect(),
        Dataset::Customers => CUSTOMERS
            .iter()
            .filter(|c| hit(c.name) || c.email.is_some_and(|e| hit(e)))
            .cloned()
            .map(DemoRecord::Customer)
            .collect(),
        Dataset::Transactions => TRANSACTIONS
            .iter()
            .filter(|t| hit(t.merchant) || hit(t.trx_id))
            .cloned()
            .map(DemoRecord::Transaction)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Latency-simulating provider over one dataset.
#[derive(Clone, Debug)]
pub struct MockProvider {
    dataset: Dataset,
    latency: Duration,
    failure_trigger: Option<String>,
}

impl MockProvider {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset, latency: DEFAULT_LATENCY, failure_trigger: None }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Reject every query containing `trigger`, to demo the error state.
    pub fn failing_on(mut self, trigger: impl Into<String>) -> Self {
        self.failure_trigger = Some(trigger.into().to_lowercase());
        self
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }
}

impl SearchProvider for MockProvider {
    type Record = DemoRecord;

    fn query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<DemoRecord>, ProviderError>> + Send {
        let fails = self
            .failure_trigger
            .as_deref()
            .is_some_and(|t| text.to_lowercase().contains(t));
        let result = if fails {
            Err(ProviderError::Failed(format!("mock backend rejected '{text}'")))
        } else {
            Ok(search(self.dataset, text))
        };
        debug!(dataset = self.dataset.name(), query = text, failed = fails, "Mock query");
        let latency = self.latency;
        async move {
            tokio::time::sleep(latency).await;
            result
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Normalize a mock record for the dropdown.
pub fn map_record(record: DemoRecord) -> SearchResultItem<DemoRecord> {
    match &record {
        DemoRecord::Account(a) => SearchResultItem::new(a.account_id, a.nickname, record.clone())
            .with_secondary(format!("{} · {:.2}", a.account_type.as_str(), a.balance))
            .with_icon("account")
            .with_value(a.account_id),
        DemoRecord::Customer(c) => SearchResultItem::new(c.customer_id, c.name, record.clone())
            .with_secondary(c.email.unwrap_or("No email on file"))
            .with_icon("customer")
            .with_value(c.customer_id),
        DemoRecord::Transaction(t) => SearchResultItem::new(t.trx_id, t.merchant, record.clone())
            .with_secondary(format!("{} · {:.2}", t.posted, t.amount))
            .with_icon("transaction")
            .with_value(t.trx_id),
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// The filter bar shown for a dataset.
pub fn filters_for(dataset: Dataset) -> Vec<FilterConfig<DemoRecord>> {
    match dataset {
        Dataset::Customers => vec![
            FilterConfig::checkbox(
                "has-email",
                "Has Email",
                retain_where(|item: &SearchResultItem<DemoRecord>, v| match &item.original {
                    DemoRecord::Customer(c) => !v.as_flag() || c.email.is_some(),
                    _ => true,
                }),
            ),
            FilterConfig::date_picker(
                "joined-before",
                "Joined Before",
                retain_where(|item: &SearchResultItem<DemoRecord>, v| match &item.original {
                    DemoRecord::Customer(c) => v.as_text().is_empty() || c.member_since < v.as_text(),
                    _ => true,
                }),
            ),
        ],
        Dataset::Accounts => vec![FilterConfig::dropdown(
            "account-type",
            "Account Type",
            vec![
                FilterOption::new("All", ""),
                FilterOption::new("Checking", "checking"),
                FilterOption::new("Savings", "savings"),
            ],
            retain_where(|item: &SearchResultItem<DemoRecord>, v| match &item.original {
                DemoRecord::Account(a) => v.as_text().is_empty() || a.account_type.as_str() == v.as_text(),
                _ => true,
            }),
        )],
        Dataset::Transactions => vec![FilterConfig::dropdown(
            "direction",
            "Direction",
            vec![
                FilterOption::new("All", ""),
                FilterOption::new("Debits", "debit"),
                FilterOption::new("Credits", "credit"),
            ],
            retain_where(|item: &SearchResultItem<DemoRecord>, v| match &item.original {
                DemoRecord::Transaction(t) => match v.as_text() {
                    "debit" => t.amount < 0.0,
                    "credit" => t.amount >= 0.0,
                    _ => true,
                },
                _ => true,
            }),
        )],
    }
}
