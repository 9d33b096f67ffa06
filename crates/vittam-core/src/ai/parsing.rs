//! Parsing helpers for AI backend responses
//!
//! Models often wrap JSON in markdown fences and fill fields loosely. These
//! functions strip the fencing and normalize every element to a fixed shape.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{AIInsight, Category, InsightType};

pub const DEFAULT_INSIGHT_TITLE: &str = "AI Insight";
pub const DEFAULT_INSIGHT_MESSAGE: &str = "Analysis complete";
pub const DEFAULT_INSIGHT_CONFIDENCE: f64 = 0.8;

/// Remove an optional surrounding ```json or ``` fence
pub fn strip_code_fence(response: &str) -> &str {
    let text = response.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text)
        .trim_start();
    text.strip_suffix("```").unwrap_or(text).trim_end()
}

/// Truncate long responses for error messages
fn preview(text: &str) -> String {
    if text.chars().count() > 200 {
        format!("{}...", text.chars().take(200).collect::<String>())
    } else {
        text.to_string()
    }
}

fn non_empty_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Normalize one element of the model's array
fn normalize_insight(item: &Value, id: String) -> AIInsight {
    let insight_type = non_empty_str(item, "type")
        .and_then(|t| t.parse::<InsightType>().ok())
        .unwrap_or_default();

    // Zero counts as missing
    let confidence = item
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| *c != 0.0 && c.is_finite())
        .unwrap_or(DEFAULT_INSIGHT_CONFIDENCE)
        .clamp(0.0, 1.0);

    AIInsight {
        id,
        insight_type,
        title: non_empty_str(item, "title")
            .unwrap_or(DEFAULT_INSIGHT_TITLE)
            .to_string(),
        message: non_empty_str(item, "message")
            .unwrap_or(DEFAULT_INSIGHT_MESSAGE)
            .to_string(),
        action: non_empty_str(item, "action").map(str::to_string),
        confidence,
    }
}

/// Parse the insights array from an AI response
///
/// Ids are `ai-{now_millis}-{index}`. Fails when the text is not a JSON array
/// or the array is empty.
pub fn parse_insights(response: &str, now_millis: i64) -> Result<Vec<AIInsight>> {
    let body = strip_code_fence(response);

    let items: Vec<Value> = serde_json::from_str(body).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid insights JSON from AI: {} | Raw: {}",
            e,
            preview(body)
        ))
    })?;

    if items.is_empty() {
        return Err(Error::InvalidData("AI returned no insights".into()));
    }

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_insight(item, format!("ai-{}-{}", now_millis, index)))
        .collect())
}

/// Map a categorizer response onto the closed label set
///
/// The trimmed response must match a label exactly; anything else is `Other`.
pub fn parse_category(response: &str) -> Category {
    response.trim().parse().unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"[{"type":"warning","title":"Dining out","message":"₹3,200 on Swiggy","action":"Cook twice a week","confidence":0.9}]"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence(BARE), BARE);
        assert_eq!(strip_code_fence(&format!("```json\n{}\n```", BARE)), BARE);
        assert_eq!(strip_code_fence(&format!("```\n{}\n```", BARE)), BARE);
        assert_eq!(strip_code_fence(&format!("  ```json{}```  ", BARE)), BARE);
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let bare = parse_insights(BARE, 1).unwrap();
        let json_fenced = parse_insights(&format!("```json\n{}\n```", BARE), 1).unwrap();
        let plain_fenced = parse_insights(&format!("```\n{}\n```", BARE), 1).unwrap();
        assert_eq!(bare, json_fenced);
        assert_eq!(bare, plain_fenced);
    }

    #[test]
    fn test_parse_insights_full_element() {
        let insights = parse_insights(BARE, 1700000000000).unwrap();
        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.id, "ai-1700000000000-0");
        assert_eq!(insight.insight_type, InsightType::Warning);
        assert_eq!(insight.title, "Dining out");
        assert_eq!(insight.message, "₹3,200 on Swiggy");
        assert_eq!(insight.action.as_deref(), Some("Cook twice a week"));
        assert!((insight.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_insights_defaults() {
        let insights = parse_insights(r#"[{}, {"title": "", "confidence": 0}]"#, 5).unwrap();
        assert_eq!(insights.len(), 2);
        for (index, insight) in insights.iter().enumerate() {
            assert_eq!(insight.id, format!("ai-5-{}", index));
            assert_eq!(insight.insight_type, InsightType::Info);
            assert_eq!(insight.title, DEFAULT_INSIGHT_TITLE);
            assert_eq!(insight.message, DEFAULT_INSIGHT_MESSAGE);
            assert!(insight.action.is_none());
            assert!((insight.confidence - DEFAULT_INSIGHT_CONFIDENCE).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parse_insights_coerces_type_and_confidence() {
        let insights = parse_insights(
            r#"[{"type": "ALERT", "confidence": 7}, {"type": "Tip", "confidence": -1}, {"confidence": "high"}]"#,
            1,
        )
        .unwrap();
        assert_eq!(insights[0].insight_type, InsightType::Info);
        assert_eq!(insights[0].confidence, 1.0);
        assert_eq!(insights[1].insight_type, InsightType::Tip);
        assert_eq!(insights[1].confidence, 0.0);
        assert!((insights[2].confidence - DEFAULT_INSIGHT_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_parse_insights_ids_unique_within_response() {
        let insights = parse_insights("[{}, {}, {}]", 42).unwrap();
        let ids: Vec<_> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["ai-42-0", "ai-42-1", "ai-42-2"]);
    }

    #[test]
    fn test_parse_insights_rejects_non_array() {
        assert!(parse_insights("Here are some insights!", 1).is_err());
        assert!(parse_insights(r#"{"type": "info"}"#, 1).is_err());
        assert!(parse_insights("", 1).is_err());
    }

    #[test]
    fn test_parse_insights_rejects_empty_array() {
        assert!(parse_insights("[]", 1).is_err());
        assert!(parse_insights("```json\n[]\n```", 1).is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Food"), Category::Food);
        assert_eq!(parse_category("  Transportation\n"), Category::Transportation);
        assert_eq!(parse_category("food"), Category::Other);
        assert_eq!(parse_category("Food."), Category::Other);
        assert_eq!(parse_category("Groceries"), Category::Other);
        assert_eq!(parse_category(""), Category::Other);
    }
}
