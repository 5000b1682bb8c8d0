//! Domain records exchanged with the expense store

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DATE_FORMAT;

/// Store-assigned expense identifier
pub type ExpenseId = i64;

/// Fixed set of expense categories shared with the store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Housing,
    Utilities,
    Entertainment,
    Shopping,
    #[serde(rename = "Health Care")]
    HealthCare,
    Travel,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Housing,
        Category::Utilities,
        Category::Entertainment,
        Category::Shopping,
        Category::HealthCare,
        Category::Travel,
        Category::Other,
    ];

    /// Wire literal, also used for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::HealthCare => "Health Care",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }

    pub fn next(&self) -> Category {
        let idx = self.index();
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }

    pub fn prev(&self) -> Category {
        let idx = self.index();
        Category::ALL[(idx + Category::ALL.len() - 1) % Category::ALL.len()]
    }

    fn index(&self) -> usize {
        Category::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense as persisted by the store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    #[serde(deserialize_with = "deserialize_store_date")]
    pub date: NaiveDate,
}

/// Fields a client supplies to create an expense; the store assigns id and date
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
}

/// Full-record replacement payload for an existing expense
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
}

impl From<ExpenseCreate> for ExpenseUpdate {
    fn from(create: ExpenseCreate) -> Self {
        ExpenseUpdate {
            amount: create.amount,
            description: create.description,
            category: create.category,
        }
    }
}

impl From<&Expense> for ExpenseUpdate {
    fn from(expense: &Expense) -> Self {
        ExpenseUpdate {
            amount: expense.amount,
            description: expense.description.clone(),
            category: expense.category,
        }
    }
}

/// Aggregate totals as computed by the store
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsResponse {
    pub total: f64,
    /// Category literal -> summed amount. Empty categories may be absent.
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
}

impl TotalsResponse {
    /// Summed amount for one category, zero when the store omitted it
    pub fn amount_for(&self, category: Category) -> f64 {
        self.breakdown.get(category.as_str()).copied().unwrap_or(0.0)
    }

    /// Share of the total for one breakdown amount, in percent
    pub fn share_of_total(&self, amount: f64) -> f64 {
        if self.total == 0.0 {
            0.0
        } else {
            amount / self.total * 100.0
        }
    }

    /// Whether the breakdown sums to the total within one cent
    pub fn is_consistent(&self) -> bool {
        let sum: f64 = self.breakdown.values().sum();
        (sum - self.total).abs() <= 0.01
    }
}

/// Format an amount as US dollars, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// The store stamps `date` with a naive datetime; accept a plain date too
fn deserialize_store_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_store_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

pub fn parse_store_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}
