//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, audit) and shared utilities (open_db, require_user)
//! - `records` - Expense record commands (add, list, delete, summary)
//! - `ai` - Advisor commands (insights, categorize, ask)
//! - `serve` - Web server command

pub mod ai;
pub mod core;
pub mod records;
pub mod serve;

// Re-export command functions for main.rs
pub use ai::*;
pub use core::*;
pub use records::*;
pub use serve::*;

/// Format an amount in rupees
pub fn format_rupees(amount: f64) -> String {
    if amount < 0.0 {
        format!("-₹{:.2}", amount.abs())
    } else {
        format!("₹{:.2}", amount)
    }
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
