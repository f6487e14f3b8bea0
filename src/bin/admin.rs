//! CLI administration tool for tinylink.
//!
//! Inspects and maintains the PostgreSQL mapping store without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all mappings
//! cargo run --bin admin -- list
//!
//! # Show one mapping with its click count
//! cargo run --bin admin -- show Ab3dE9z
//!
//! # Delete a mapping (asks for confirmation)
//! cargo run --bin admin -- delete Ab3dE9z
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL`
//! is used to evict deleted codes from the redirect cache.

use tinylink::config::{self, Config};
use tinylink::domain::repositories::MappingRepository;
use tinylink::infrastructure::cache::{CacheService, NullCache, RedisCache};
use tinylink::infrastructure::persistence::{self, PgMappingRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List all mappings
    List,

    /// Show one mapping
    Show {
        /// Short code to look up
        short_code: String,
    },

    /// Delete a mapping
    Delete {
        /// Short code to delete
        short_code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = persistence::connect(&config).await?;
    let repo = PgMappingRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::List => list_mappings(&repo).await?,
        Commands::Show { short_code } => show_mapping(&repo, &short_code).await?,
        Commands::Delete { short_code, yes } => {
            delete_mapping(&repo, &config, &short_code, yes).await?
        }
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Lists all mappings, oldest first.
///
/// # Output Format
///
/// ```text
/// Mappings
///
///   ID  Code       Clicks   Created           URL
///   ---------------------------------------------------------------------------
///   1   Ab3dE9z    12       2025-01-15 10:30  https://example.com/a
/// ```
async fn list_mappings(repo: &PgMappingRepository) -> Result<()> {
    println!("{}", "Mappings".bright_blue().bold());
    println!();

    let mappings = repo
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list mappings: {}", e))?;

    if mappings.is_empty() {
        println!("{}", "  No mappings found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<17} {:<8} {:<17} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "-".repeat(75).bright_black());

    for mapping in &mappings {
        println!(
            "  {:<5} {:<17} {:<8} {:<17} {}",
            mapping.id.to_string().bright_black(),
            mapping.short_code.cyan(),
            mapping.click_count.to_string().green(),
            mapping
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            mapping.long_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        mappings.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_mapping(repo: &PgMappingRepository, short_code: &str) -> Result<()> {
    let mapping = repo
        .find_by_code(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Short URL '{}' not found", short_code))?;

    println!("  Code:    {}", mapping.short_code.cyan());
    println!("  URL:     {}", mapping.long_url);
    println!(
        "  Created: {}",
        mapping.created_at.to_rfc3339().bright_black()
    );
    println!(
        "  Clicks:  {}",
        mapping.click_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Deletes a mapping after confirmation and evicts it from the redirect cache.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
/// - Deletion is permanent; the code becomes free for reallocation
async fn delete_mapping(
    repo: &PgMappingRepository,
    config: &Config,
    short_code: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Delete Short URL".bright_blue().bold());
    println!();

    let mapping = repo
        .find_by_code(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Short URL '{}' not found", short_code))?;

    println!("  Code:   {}", mapping.short_code.cyan());
    println!("  URL:    {}", mapping.long_url);
    println!("  Clicks: {}", mapping.click_count.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this mapping?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let cache = open_cache(config).await?;
    cache
        .invalidate(short_code)
        .await
        .context("Failed to evict cached redirect; mapping left in place")?;

    let deleted = repo
        .delete(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete mapping: {}", e))?;

    if !deleted {
        println!("{}", "Mapping was already deleted".yellow());
        return Ok(());
    }

    cache
        .invalidate(short_code)
        .await
        .context("Mapping deleted but its cached redirect could not be evicted")?;

    println!();
    println!(
        "{}",
        format!("Short URL '{}' deleted successfully", short_code)
            .green()
            .bold()
    );
    println!();

    Ok(())
}

/// Opens the redirect cache the server uses.
///
/// # Errors
///
/// Fails when Redis is configured but unreachable: deleting the row alone
/// would leave its redirect cached until the TTL expires.
async fn open_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    let Some(url) = &config.redis_url else {
        return Ok(Arc::new(NullCache::new()));
    };

    match RedisCache::connect(url, config.cache_ttl_seconds).await {
        Ok(redis) => Ok(Arc::new(redis)),
        Err(e) => {
            println!(
                "{} {}",
                "Warning: Redis is configured but unreachable:".yellow(),
                e.to_string().bright_black()
            );
            Err(e).context("Cannot evict cached redirects")
        }
    }
}

/// Displays store totals.
///
/// Shows:
/// - Total number of mappings
/// - Total number of recorded clicks
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let mappings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM short_urls")
            .fetch_one(pool)
            .await?;

    println!(
        "  Mappings: {}",
        mappings_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:   {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database maintenance commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            persistence::run_migrations(pool).await?;

            println!("{}", "Migrations applied".green().bold());
        }
    }

    Ok(())
}
