//! Expense record operations

use rusqlite::{params, OptionalExtension};
use tracing::warn;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, ExpenseRecord, NewExpenseRecord};

const RECORD_COLUMNS: &str = "id, owner_id, amount, category, description, date, created_at";

impl Database {
    /// Insert a record owned by `owner_id`, returning the new record ID
    pub fn insert_record(&self, owner_id: &str, record: &NewExpenseRecord) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO records (owner_id, amount, category, description, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                owner_id,
                record.amount,
                record.category.as_str(),
                record.description,
                record.date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all records owned by a user, newest date first
    pub fn list_records(&self, owner_id: &str) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM records WHERE owner_id = ? ORDER BY date DESC, id DESC",
            RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let records = stmt
            .query_map(params![owner_id], |row| Self::row_to_record(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get a single record by ID
    pub fn get_record(&self, id: i64) -> Result<Option<ExpenseRecord>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM records WHERE id = ?", RECORD_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let record = stmt
            .query_row(params![id], |row| Self::row_to_record(row))
            .optional()?;

        Ok(record)
    }

    /// Delete a record owned by `owner_id`
    ///
    /// Returns false when no such record exists for that owner.
    pub fn delete_record(&self, owner_id: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM records WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;
        Ok(deleted > 0)
    }

    /// Count all records across users
    pub fn count_records(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to ExpenseRecord
    /// Column order: id, owner_id, amount, category, description, date, created_at
    pub(crate) fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ExpenseRecord> {
        let id: i64 = row.get(0)?;
        let category_str: String = row.get(3)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        let category = category_str.parse().unwrap_or_else(|_| {
            warn!(id, category = %category_str, "Unknown stored category, treating as Other");
            Category::Other
        });

        Ok(ExpenseRecord {
            id,
            owner_id: row.get(1)?,
            amount: row.get(2)?,
            category,
            description: row.get(4)?,
            date: chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
