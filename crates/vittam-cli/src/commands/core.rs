//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `require_user` - Resolve the --user flag
//! - `cmd_init` - Initialize the database
//! - `cmd_audit` - Show the audit log

use std::path::Path;

use anyhow::{Context, Result};
use vittam_core::Database;

use super::truncate;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// The user named with --user
pub fn require_user(user: Option<&str>) -> Result<&str> {
    user.map(str::trim)
        .filter(|u| !u.is_empty())
        .context("No user given. Pass --user <ID> (e.g. --user me@example.com)")
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let count = db.count_records()?;
    println!("   Records: {}", count);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: vittam --user you@example.com add \"Lunch\" 250");
    println!("  2. Start web UI: vittam serve");

    Ok(())
}

pub fn cmd_audit(db: &Database, limit: i64) -> Result<()> {
    let entries = db.list_audit_log(limit.max(1))?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    println!();
    println!("🗒  Audit Log");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries {
        let entity = match (&entry.entity_type, entry.entity_id) {
            (Some(kind), Some(id)) => format!("{} #{}", kind, id),
            (Some(kind), None) => kind.clone(),
            _ => String::new(),
        };
        println!(
            "   {} │ {:<24} │ {:<10} │ {:<14} │ {}",
            entry.timestamp,
            truncate(&entry.user_id, 24),
            entry.action,
            entity,
            entry.details.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
