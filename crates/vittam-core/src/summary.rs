//! Record aggregation
//!
//! `aggregate` is a plain reduction over a record slice. `user_summary` wraps it
//! with the store lookup and converts every failure into a reported error
//! string instead of propagating it.

use serde::Serialize;
use tracing::error;

use crate::db::Database;
use crate::models::{ExpenseRecord, RecordSummary};

/// Error reported when no user identity is available
pub const USER_NOT_FOUND: &str = "User not found";

/// Error reported when the record store fails
pub const DATABASE_ERROR: &str = "Database error";

/// Sum all amounts and count strictly positive ones
pub fn aggregate(records: &[ExpenseRecord]) -> RecordSummary {
    records.iter().fold(RecordSummary::default(), |acc, r| RecordSummary {
        total: acc.total + r.amount,
        active_days: acc.active_days + i64::from(r.amount > 0.0),
    })
}

/// Outcome of summarizing a user's records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserSummary {
    Summary(RecordSummary),
    Error { error: String },
}

impl UserSummary {
    fn error(message: &str) -> Self {
        Self::Error {
            error: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Summarize the records of the given user
pub fn user_summary(db: &Database, user_id: Option<&str>) -> UserSummary {
    let Some(user_id) = user_id.filter(|u| !u.trim().is_empty()) else {
        return UserSummary::error(USER_NOT_FOUND);
    };

    match db.list_records(user_id) {
        Ok(records) => UserSummary::Summary(aggregate(&records)),
        Err(e) => {
            error!(user = %user_id, error = %e, "Error fetching user records");
            UserSummary::error(DATABASE_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewExpenseRecord};
    use chrono::{NaiveDate, Utc};

    fn record(amount: f64) -> ExpenseRecord {
        ExpenseRecord {
            id: 0,
            owner_id: "user_a".to_string(),
            amount,
            category: Category::Other,
            description: "test".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.active_days, 0);
    }

    #[test]
    fn test_aggregate_includes_non_positive_in_total() {
        let records = vec![record(100.0), record(-30.0), record(0.0), record(45.5)];
        let summary = aggregate(&records);
        assert!((summary.total - 115.5).abs() < 1e-9);
        assert_eq!(summary.active_days, 2);
    }

    #[test]
    fn test_aggregate_counts_records_not_distinct_days() {
        // Three records on the same date count three times
        let records = vec![record(10.0), record(20.0), record(30.0)];
        assert_eq!(aggregate(&records).active_days, 3);
    }

    #[test]
    fn test_user_summary_without_user() {
        let db = Database::in_memory().unwrap();
        assert_eq!(
            user_summary(&db, None),
            UserSummary::Error {
                error: USER_NOT_FOUND.to_string()
            }
        );
        assert!(user_summary(&db, Some("  ")).is_error());
    }

    #[test]
    fn test_user_summary_for_user() {
        let db = Database::in_memory().unwrap();
        for amount in [500.0, -100.0, 250.0] {
            db.insert_record(
                "user_a",
                &NewExpenseRecord {
                    amount,
                    category: Category::Food,
                    description: "meal".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                },
            )
            .unwrap();
        }

        match user_summary(&db, Some("user_a")) {
            UserSummary::Summary(s) => {
                assert_eq!(s.total, 650.0);
                assert_eq!(s.active_days, 2);
            }
            other => panic!("Expected summary, got {:?}", other),
        }
    }

    #[test]
    fn test_user_summary_store_failure() {
        let db = Database::in_memory().unwrap();
        db.conn().unwrap().execute("DROP TABLE records", []).unwrap();

        assert_eq!(
            user_summary(&db, Some("user_a")),
            UserSummary::Error {
                error: DATABASE_ERROR.to_string()
            }
        );
    }

    #[test]
    fn test_user_summary_serialization() {
        let ok = UserSummary::Summary(RecordSummary {
            total: 12.5,
            active_days: 1,
        });
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["total"], 12.5);
        assert_eq!(json["active_days"], 1);

        let err = UserSummary::error(USER_NOT_FOUND);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "User not found");
    }
}
