//! Advisor command implementations

use anyhow::Result;
use vittam_core::{Category, Database, ExpenseAdvisor, InsightType};

use super::require_user;

fn insight_icon(insight_type: InsightType) -> &'static str {
    match insight_type {
        InsightType::Warning => "⚠️ ",
        InsightType::Info => "ℹ️ ",
        InsightType::Success => "✅",
        InsightType::Tip => "💡",
    }
}

fn print_ai_hint(advisor: &ExpenseAdvisor) {
    if !advisor.is_configured() {
        println!("   💡 Tip: Set OPENROUTER_API_KEY to enable AI features");
    }
}

pub async fn cmd_insights(db: &Database, advisor: &ExpenseAdvisor, user: Option<&str>) -> Result<()> {
    let user = require_user(user)?;
    print_ai_hint(advisor);

    let records = db.list_records(user)?;
    println!("🔍 Analyzing {} expense(s)...", records.len());

    let insights = advisor.generate_insights(&records).await;

    println!();
    println!("🤖 AI Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    for insight in insights {
        println!(
            "   {} {} ({:.0}% confidence)",
            insight_icon(insight.insight_type),
            insight.title,
            insight.confidence * 100.0
        );
        println!("      {}", insight.message);
        if let Some(action) = insight.action {
            println!("      → {}", action);
        }
        println!();
    }

    Ok(())
}

/// Print and return the suggested category
pub async fn cmd_categorize(advisor: &ExpenseAdvisor, description: &str) -> Result<Category> {
    print_ai_hint(advisor);

    let category = advisor.categorize(description.trim()).await;
    println!("{} {}", category.emoji(), category);

    Ok(category)
}

/// Print and return the advisor's answer
pub async fn cmd_ask(
    db: &Database,
    advisor: &ExpenseAdvisor,
    user: Option<&str>,
    question: &str,
) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question cannot be empty");
    }
    let user = require_user(user)?;
    print_ai_hint(advisor);

    let records = db.list_records(user)?;
    let answer = advisor.answer(question, &records).await;

    println!();
    println!("💬 {}", answer);

    Ok(answer)
}
