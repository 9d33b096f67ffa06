//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

/// Parse a comma-separated list, dropping empty entries
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build the server configuration from flags and environment
pub fn server_config(
    no_auth: bool,
    api_keys: &str,
    dev_user: Option<String>,
) -> vittam_server::ServerConfig {
    vittam_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys: parse_list(api_keys),
        // Only meaningful without auth
        dev_user: dev_user
            .filter(|u| !u.trim().is_empty())
            .filter(|_| no_auth),
    }
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    let config = server_config(
        no_auth,
        &std::env::var("VITTAM_API_KEYS").unwrap_or_default(),
        std::env::var("VITTAM_DEV_USER").ok(),
    );

    println!("🚀 Starting Vittam web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        match &config.dev_user {
            Some(user) => println!("   👤 Dev user: {} (VITTAM_DEV_USER)", user),
            None => println!("   👤 No dev user; send X-Vittam-User to act as a user"),
        }
    } else {
        println!("   🔒 Authentication: Cloudflare Access (header only)");
        if !config.api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (VITTAM_API_KEYS)",
                config.api_keys.len()
            );
        }
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    vittam_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
