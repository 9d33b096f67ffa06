//! Prompt builders for the advisor
//!
//! Every advisor call sends one system message and one user message. The
//! builders here produce both halves plus the sampling parameters, so the
//! advisor never handles raw prompt text.

use chrono::NaiveDate;
use serde::Serialize;

use crate::ai::CompletionRequest;
use crate::models::{Category, ExpenseRecord};

/// Sampling for insight generation
pub const INSIGHTS_TEMPERATURE: f32 = 0.7;
pub const INSIGHTS_MAX_TOKENS: u32 = 1000;

/// Sampling for categorization
pub const CATEGORIZE_TEMPERATURE: f32 = 0.1;
pub const CATEGORIZE_MAX_TOKENS: u32 = 20;

/// Sampling for question answering
pub const ANSWER_TEMPERATURE: f32 = 0.7;
pub const ANSWER_MAX_TOKENS: u32 = 200;

pub const INSIGHTS_SYSTEM: &str = "You are an assistant for Vittam Manager, an expense-tracking website. \
Provide concise, practical, non-judgmental financial insights in Indian Rupees (₹) based on the user’s expense data. \
Use ₹ for amounts. Avoid generalizations like “average spending”. Respond with valid JSON only.";

/// Closing line of the insights user prompt
pub const INSIGHTS_USER_MARKER: &str = "Return only the JSON array.";

pub const CATEGORIZE_SYSTEM: &str = "You are an assistant that suggests the most appropriate expense category. \
Based on the description, choose one of: Food, Transportation, Entertainment, Shopping, Bills, Healthcare, Other. \
Respond only with the category name.";

pub const ANSWER_SYSTEM: &str = "You are a friendly assistant. Offer concise, practical answers in Indian Rupees (₹) \
based on the question and expense data. Focus on helpful advice without judgement.";

/// Fields of a record shown to the model
#[derive(Debug, Serialize)]
struct RecordDigest<'a> {
    amount: f64,
    category: Category,
    description: &'a str,
    date: NaiveDate,
}

/// Pretty-printed JSON array of record digests
pub fn record_summary_json(records: &[ExpenseRecord]) -> String {
    let digests: Vec<RecordDigest<'_>> = records
        .iter()
        .map(|r| RecordDigest {
            amount: r.amount,
            category: r.category,
            description: &r.description,
            date: r.date,
        })
        .collect();

    // Serializing plain structs of numbers and strings cannot fail
    serde_json::to_string_pretty(&digests).unwrap_or_else(|_| "[]".to_string())
}

pub fn insights_request(records: &[ExpenseRecord]) -> CompletionRequest {
    let user = format!(
        r#"Analyze the following expense data and provide 3-4 concise, actionable, non-judgmental insights.
All amounts are in ₹. Respond with a JSON array formatted as:
[
  {{
    "type": "warning|info|success|tip",
    "title": "Brief title",
    "message": "Insight message with amounts in ₹",
    "action": "Practical suggestion",
    "confidence": 0.8
  }}
]
Expense Data:
{}
{}"#,
        record_summary_json(records),
        INSIGHTS_USER_MARKER
    );

    CompletionRequest::new(INSIGHTS_SYSTEM, user)
        .temperature(INSIGHTS_TEMPERATURE)
        .max_tokens(INSIGHTS_MAX_TOKENS)
}

pub fn categorize_request(description: &str) -> CompletionRequest {
    CompletionRequest::new(
        CATEGORIZE_SYSTEM,
        format!("Categorize this expense: \"{}\"", description),
    )
    .temperature(CATEGORIZE_TEMPERATURE)
    .max_tokens(CATEGORIZE_MAX_TOKENS)
}

pub fn answer_request(question: &str, records: &[ExpenseRecord]) -> CompletionRequest {
    let user = format!(
        r#"Based on the following expense data for an Indian user, provide a detailed and actionable answer to this question: "{}"

All amounts are in Indian Rupees (₹). Consider Indian financial context, cost of living, and spending patterns.

Expense Data (amounts in ₹):
{}

Provide a comprehensive answer that:
1. Addresses the specific question directly
2. Uses concrete data from the expenses with amounts in ₹ when possible
3. Offers actionable advice relevant to Indian financial context
4. Keeps the response concise but informative (2-3 sentences)

Always use ₹ symbol for amounts. Consider Indian lifestyle and financial norms.
Return only the answer text, no additional formatting."#,
        question,
        record_summary_json(records)
    );

    CompletionRequest::new(ANSWER_SYSTEM, user)
        .temperature(ANSWER_TEMPERATURE)
        .max_tokens(ANSWER_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(amount: f64, category: Category, description: &str) -> ExpenseRecord {
        ExpenseRecord {
            id: 7,
            owner_id: "user_a".to_string(),
            amount,
            category,
            description: description.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_summary_json_shape() {
        let json = record_summary_json(&[record(250.0, Category::Food, "Dosa")]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let first = &parsed[0];
        assert_eq!(first["amount"], 250.0);
        assert_eq!(first["category"], "Food");
        assert_eq!(first["description"], "Dosa");
        assert_eq!(first["date"], "2024-03-15");
        // Internal fields stay out of the prompt
        assert!(first.get("id").is_none());
        assert!(first.get("owner_id").is_none());
        // Pretty-printed
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_record_summary_json_empty() {
        assert_eq!(record_summary_json(&[]), "[]");
    }

    #[test]
    fn test_insights_request() {
        let req = insights_request(&[record(1200.0, Category::Bills, "Electricity")]);
        assert_eq!(req.system, INSIGHTS_SYSTEM);
        assert!(req.system.contains("based on the user’s expense data"));
        assert!(req.system.contains("Avoid generalizations like “average spending”."));
        assert!(req.user.contains("Electricity"));
        assert!(req.user.ends_with(INSIGHTS_USER_MARKER));
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 1000);
    }

    #[test]
    fn test_categorize_request() {
        let req = categorize_request("Ola to office");
        assert_eq!(req.system, CATEGORIZE_SYSTEM);
        assert_eq!(req.user, "Categorize this expense: \"Ola to office\"");
        assert!((req.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 20);
    }

    #[test]
    fn test_categorize_system_lists_every_category() {
        assert!(CATEGORIZE_SYSTEM.contains(&Category::label_list()));
    }

    #[test]
    fn test_answer_request_embeds_question_verbatim() {
        let question = "Where can I \"cut\" costs?";
        let req = answer_request(question, &[record(90.0, Category::Food, "Chai")]);
        assert_eq!(req.system, ANSWER_SYSTEM);
        assert!(req.user.contains(question));
        assert!(req.user.contains("Chai"));
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 200);
    }
}
