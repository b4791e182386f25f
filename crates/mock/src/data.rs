//! Static demo records.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: &'static str,
    pub nickname: &'static str,
    pub balance: f64,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: &'static str,
    pub name: &'static str,
    pub email: Option<&'static str>,
    /// ISO date (`YYYY-MM-DD`).
    pub member_since: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub trx_id: &'static str,
    pub merchant: &'static str,
    /// Negative for debits.
    pub amount: f64,
    /// ISO date (`YYYY-MM-DD`).
    pub posted: &'static str,
    pub account_id: &'static str,
}

pub const ACCOUNTS: &[Account] = &[
    Account {
        account_id: "acc-101",
        nickname: "Primary Checking",
        balance: 15432.10,
        account_type: AccountType::Checking,
    },
    Account {
        account_id: "acc-102",
        nickname: "Vacation Savings",
        balance: 8765.43,
        account_type: AccountType::Savings,
    },
    Account {
        account_id: "acc-103",
        nickname: "Emergency Fund",
        balance: 25000.00,
        account_type: AccountType::Savings,
    },
    Account {
        account_id: "acc-104",
        nickname: "Business Platinum",
        balance: 123456.78,
        account_type: AccountType::Checking,
    },
];

pub const CUSTOMERS: &[Customer] = &[
    Customer {
        customer_id: "cust-301",
        name: "John Doe",
        email: Some("john.doe@example.com"),
        member_since: "2018-05-15",
    },
    Customer {
        customer_id: "cust-302",
        name: "Jane Smith",
        email: Some("jane.smith@example.com"),
        member_since: "2020-01-20",
    },
    Customer {
        customer_id: "cust-303",
        name: "Peter Jones",
        email: Some("peter.jones@example.com"),
        member_since: "2015-11-30",
    },
    Customer {
        customer_id: "cust-304",
        name: "Samantha Bee",
        email: Some("samantha.bee@example.com"),
        member_since: "2022-02-10",
    },
    Customer {
        customer_id: "cust-305",
        name: "Joan Baptiste",
        email: None,
        member_since: "2019-07-04",
    },
];

pub const TRANSACTIONS: &[Transaction] = &[
    Transaction {
        trx_id: "trx-201",
        merchant: "Amazon",
        amount: -78.54,
        posted: "2025-10-24",
        account_id: "acc-101",
    },
    Transaction {
        trx_id: "trx-202",
        merchant: "Whole Foods",
        amount: -123.45,
        posted: "2025-10-23",
        account_id: "acc-101",
    },
    Transaction {
        trx_id: "trx-203",
        merchant: "Paycheck Deposit",
        amount: 2500.00,
        posted: "2025-10-22",
        account_id: "acc-101",
    },
    Transaction {
        trx_id: "trx-204",
        merchant: "Shell Gas",
        amount: -55.00,
        posted: "2025-10-21",
        account_id: "acc-104",
    },
];
