//! Integration tests for vittam-core
//!
//! These tests exercise the full record → aggregate → advise workflow.

use chrono::NaiveDate;
use vittam_core::{
    aggregate, fallback_insights, user_summary, AIClient, Category, Database, ExpenseAdvisor,
    ExpenseLevel, MockBackend, NewExpenseRecord, UserSummary, ANSWER_FALLBACK,
};

fn expense(amount: f64, category: Category, description: &str, day: u32) -> NewExpenseRecord {
    NewExpenseRecord {
        amount,
        category,
        description: description.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
    }
}

/// A month of typical spending for one user
fn seed(db: &Database, owner: &str) {
    let rows = [
        expense(85.0, Category::Food, "Chai and samosa", 1),
        expense(640.0, Category::Transportation, "Uber to airport", 3),
        expense(2499.0, Category::Shopping, "Flipkart headphones", 8),
        expense(1320.0, Category::Bills, "Electricity bill", 10),
        expense(0.0, Category::Other, "Cancelled order", 12),
        expense(-200.0, Category::Shopping, "Refund", 14),
    ];
    for row in &rows {
        db.insert_record(owner, row).expect("Failed to insert record");
    }
}

// =============================================================================
// Record Store + Aggregation
// =============================================================================

#[test]
fn test_record_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    seed(&db, "asha@example.com");
    seed(&db, "ravi@example.com");

    let records = db.list_records("asha@example.com").unwrap();
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|r| r.owner_id == "asha@example.com"));

    // Newest first
    assert_eq!(records[0].description, "Refund");

    let summary = aggregate(&records);
    assert!((summary.total - 4344.0).abs() < 1e-9);
    assert_eq!(summary.active_days, 4);

    let levels: Vec<_> = records.iter().map(|r| r.level()).collect();
    assert!(levels.contains(&ExpenseLevel::High));
    assert!(levels.contains(&ExpenseLevel::Medium));
    assert!(levels.contains(&ExpenseLevel::Low));
}

#[test]
fn test_delete_then_resummarize() {
    let db = Database::in_memory().unwrap();
    seed(&db, "asha@example.com");

    let records = db.list_records("asha@example.com").unwrap();
    let bill = records
        .iter()
        .find(|r| r.category == Category::Bills)
        .unwrap();

    // Another user cannot delete it
    assert!(!db.delete_record("ravi@example.com", bill.id).unwrap());
    assert!(db.delete_record("asha@example.com", bill.id).unwrap());
    assert!(db.get_record(bill.id).unwrap().is_none());

    match user_summary(&db, Some("asha@example.com")) {
        UserSummary::Summary(s) => {
            assert!((s.total - 3024.0).abs() < 1e-9);
            assert_eq!(s.active_days, 3);
        }
        other => panic!("Expected summary, got {:?}", other),
    }
}

#[test]
fn test_summary_for_unknown_user_is_zero() {
    let db = Database::in_memory().unwrap();
    seed(&db, "asha@example.com");

    match user_summary(&db, Some("nobody@example.com")) {
        UserSummary::Summary(s) => {
            assert_eq!(s.total, 0.0);
            assert_eq!(s.active_days, 0);
        }
        other => panic!("Expected summary, got {:?}", other),
    }
}

// =============================================================================
// Advisor
// =============================================================================

#[tokio::test]
async fn test_advisor_over_stored_records() {
    let db = Database::in_memory().unwrap();
    seed(&db, "asha@example.com");
    let records = db.list_records("asha@example.com").unwrap();

    let mock = MockBackend::new();
    let advisor = ExpenseAdvisor::new(Some(AIClient::Mock(mock.clone())));

    let insights = advisor.generate_insights(&records).await;
    assert!(!insights.is_empty());
    assert_ne!(insights, fallback_insights());

    let category = advisor.categorize("Swiggy lunch order").await;
    assert_eq!(category, Category::Food);

    let answer = advisor
        .answer("What is my biggest expense?", &records)
        .await;
    assert!(!answer.is_empty());
    assert_ne!(answer, ANSWER_FALLBACK);

    // Every stored description reached the insights prompt
    let prompts = mock.requests();
    assert_eq!(prompts.len(), 3);
    for record in &records {
        assert!(prompts[0].user.contains(&record.description));
    }
}

#[tokio::test]
async fn test_advisor_degrades_when_service_down() {
    let advisor = ExpenseAdvisor::new(Some(AIClient::Mock(MockBackend::failing())));

    assert_eq!(advisor.generate_insights(&[]).await, fallback_insights());
    assert_eq!(advisor.categorize("anything").await, Category::Other);
    assert_eq!(advisor.answer("anything?", &[]).await, ANSWER_FALLBACK);
}

#[test]
fn test_audit_log_round_trip() {
    let db = Database::in_memory().unwrap();
    db.log_audit("asha@example.com", "create", Some("record"), Some(1), None)
        .unwrap();
    db.log_audit("asha@example.com", "delete", Some("record"), Some(1), Some("by id"))
        .unwrap();

    let entries = db.list_audit_log(10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].details.as_deref(), Some("by id"));
}
