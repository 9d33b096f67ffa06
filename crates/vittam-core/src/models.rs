//! Domain models for Vittam

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Expense category
///
/// Closed label set shared by storage, the UI and the AI categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 7] = [
        Self::Food,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::Bills,
        Self::Healthcare,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Healthcare => "Healthcare",
            Self::Other => "Other",
        }
    }

    /// Emoji shown next to the category in listings
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Transportation => "🚗",
            Self::Entertainment => "🎬",
            Self::Shopping => "🛒",
            Self::Bills => "💡",
            Self::Healthcare => "🏥",
            Self::Other => "📦",
        }
    }

    /// Comma-separated label list, as embedded in prompts
    pub fn label_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Exact, case-sensitive match against the label set
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending level of a single record, bucketed by amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseLevel {
    Low,
    Medium,
    High,
}

impl ExpenseLevel {
    /// Upper bound (inclusive) of the low bucket
    pub const LOW_MAX: f64 = 100.0;
    /// Upper bound (inclusive) of the medium bucket
    pub const MEDIUM_MAX: f64 = 1000.0;

    pub fn from_amount(amount: f64) -> Self {
        if amount <= Self::LOW_MAX {
            Self::Low
        } else if amount <= Self::MEDIUM_MAX {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for ExpenseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    /// Identity of the owning user (as asserted by the identity provider)
    pub owner_id: String,
    /// Signed amount in rupees; zero and negative values are allowed
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn level(&self) -> ExpenseLevel {
        ExpenseLevel::from_amount(self.amount)
    }
}

/// A new expense record (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewExpenseRecord {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

/// Aggregate over a user's records
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Sum of all amounts, including zero and negative values
    pub total: f64,
    /// Number of records with a strictly positive amount.
    /// Counts records, not distinct calendar days.
    pub active_days: i64,
}

/// Semantic type of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Warning,
    #[default]
    Info,
    Success,
    Tip,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
            Self::Tip => "tip",
        }
    }
}

impl std::str::FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "tip" => Ok(Self::Tip),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An AI-generated observation about spending
///
/// Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIInsight {
    /// Unique within a single response only
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Confidence in [0, 1]
    pub confidence: f64,
}
