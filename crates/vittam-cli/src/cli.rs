//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Vittam - Track expenses and get AI spending insights
#[derive(Parser)]
#[command(name = "vittam")]
#[command(about = "Self-hosted expense tracker with AI insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "vittam.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set VITTAM_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// User whose records to work with (e.g. your email)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record an expense
    Add {
        /// What the money was spent on
        description: String,

        /// Amount in rupees
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Category (suggested by the AI categorizer if omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Date of the expense, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List recorded expenses, newest first
    List,

    /// Delete an expense
    Delete {
        /// Record ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show total spent and active days
    Summary,

    /// Generate AI insights about your spending
    Insights,

    /// Suggest a category for a description
    Categorize {
        /// Expense description
        description: String,
    },

    /// Ask a question about your spending
    Ask {
        /// The question
        question: String,
    },

    /// Show the audit log
    Audit {
        /// Maximum entries to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
