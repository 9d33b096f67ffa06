//! Expense record command implementations

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use vittam_core::summary::{user_summary, UserSummary};
use vittam_core::{Category, Database, ExpenseAdvisor, ExpenseLevel, NewExpenseRecord};

use super::{format_rupees, require_user, truncate};

/// Add a record, asking the advisor for a category when none is given
///
/// Returns the new record ID.
pub async fn cmd_add(
    db: &Database,
    advisor: &ExpenseAdvisor,
    user: Option<&str>,
    description: &str,
    amount: f64,
    category: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<i64> {
    let user = require_user(user)?;

    let description = description.trim();
    if description.is_empty() {
        anyhow::bail!("Description cannot be empty");
    }
    if !amount.is_finite() {
        anyhow::bail!("Amount must be a number");
    }

    let category = match category {
        Some(label) => label.trim().parse::<Category>().map_err(|_| {
            anyhow::anyhow!(
                "Unknown category '{}'. Choose one of: {}",
                label,
                Category::label_list()
            )
        })?,
        None => {
            let suggested = advisor.categorize(description).await;
            println!("   🤖 Suggested category: {} {}", suggested.emoji(), suggested);
            suggested
        }
    };

    let record = NewExpenseRecord {
        amount,
        category,
        description: description.to_string(),
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
    };
    let id = db
        .insert_record(user, &record)
        .context("Failed to save record")?;

    println!(
        "✅ Recorded [{}] {} {} │ {} │ {}",
        id,
        category.emoji(),
        category,
        format_rupees(amount),
        record.date
    );

    Ok(id)
}

pub fn cmd_list(db: &Database, user: Option<&str>) -> Result<()> {
    let user = require_user(user)?;
    let records = db.list_records(user)?;

    if records.is_empty() {
        println!("No expenses recorded yet. Add one with:");
        println!("  vittam --user {} add \"Lunch\" 250", user);
        return Ok(());
    }

    println!();
    println!("📝 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for record in records {
        let amount_str = match record.level() {
            ExpenseLevel::High => format!("\x1b[31m{:>12}\x1b[0m", format_rupees(record.amount)),
            ExpenseLevel::Medium => format!("\x1b[33m{:>12}\x1b[0m", format_rupees(record.amount)),
            ExpenseLevel::Low => format!("\x1b[32m{:>12}\x1b[0m", format_rupees(record.amount)),
        };

        println!(
            "   [{}] {} │ {} │ {} {:<14} │ {}",
            record.id,
            record.date,
            amount_str,
            record.category.emoji(),
            record.category,
            truncate(&record.description, 40)
        );
    }

    Ok(())
}

/// Ask for y/N confirmation on stdin
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Delete a record after confirmation
///
/// Returns whether a record was deleted.
pub fn cmd_delete(db: &Database, user: Option<&str>, id: i64, yes: bool) -> Result<bool> {
    let user = require_user(user)?;

    let record = db
        .get_record(id)?
        .filter(|r| r.owner_id == user)
        .ok_or_else(|| anyhow::anyhow!("Record {} not found", id))?;

    if !yes {
        println!(
            "   [{}] {} │ {} │ {}",
            record.id,
            record.date,
            format_rupees(record.amount),
            record.description
        );
        if !confirm("Delete this expense?")? {
            println!("Cancelled.");
            return Ok(false);
        }
    }

    if !db.delete_record(user, id)? {
        anyhow::bail!("Record {} not found", id);
    }

    println!("🗑  Deleted record {}", id);
    Ok(true)
}

pub fn cmd_summary(db: &Database, user: Option<&str>) -> Result<()> {
    match user_summary(db, user) {
        UserSummary::Summary(summary) => {
            println!();
            println!("📊 Summary");
            println!("   ─────────────────────────────");
            println!("   Total spent:  {}", format_rupees(summary.total));
            println!("   Active days:  {}", summary.active_days);
            Ok(())
        }
        UserSummary::Error { error } => anyhow::bail!(error),
    }
}
