//! Vittam CLI - Expense tracker with AI insights
//!
//! Usage:
//!   vittam init                          Initialize database
//!   vittam -u me@example.com add "Lunch" 250
//!   vittam -u me@example.com insights    AI insights over your records
//!   vittam serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use vittam_core::ExpenseAdvisor;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let advisor = ExpenseAdvisor::from_env();
            commands::cmd_add(
                &db,
                &advisor,
                user,
                &description,
                amount,
                category.as_deref(),
                date,
            )
            .await?;
            Ok(())
        }
        Commands::List => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_list(&db, user)
        }
        Commands::Delete { id, yes } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_delete(&db, user, id, yes)?;
            Ok(())
        }
        Commands::Summary => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_summary(&db, user)
        }
        Commands::Insights => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insights(&db, &ExpenseAdvisor::from_env(), user).await
        }
        Commands::Categorize { description } => {
            commands::cmd_categorize(&ExpenseAdvisor::from_env(), &description).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_ask(&db, &ExpenseAdvisor::from_env(), user, &question).await?;
            Ok(())
        }
        Commands::Audit { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_audit(&db, limit)
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
    }
}
