//! Vittam Core Library
//!
//! Shared functionality for the Vittam expense tracker:
//! - Database access and migrations for expense records
//! - Record aggregation (totals and active-day counts)
//! - Pluggable chat-completion backends (OpenAI-compatible, mock)
//! - Prompt builders and model-output parsing
//! - The expense advisor: insights, categorization and Q&A

pub mod advisor;
pub mod ai;
pub mod db;
pub mod error;
pub mod models;
pub mod prompts;
pub mod summary;

/// Test utilities including a mock chat-completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{fallback_insights, ExpenseAdvisor, ANSWER_FALLBACK};
pub use ai::{AIBackend, AIClient, CompletionRequest, MockBackend, OpenAICompatibleBackend};
pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use models::{
    AIInsight, Category, ExpenseLevel, ExpenseRecord, InsightType, NewExpenseRecord,
    RecordSummary,
};
pub use summary::{aggregate, user_summary, UserSummary};
