//! CLI command definitions and dispatch.

pub mod account;
pub mod emit;
pub mod feed;
pub mod prefs;
pub mod sweep;
pub mod translate;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_core::types::UserKey;
use campus_service::AppContext;

/// Campus Notify: notifications, preferences and retention
#[derive(Debug, Parser)]
#[command(name = "campus", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Emit a notification
    Emit(emit::EmitArgs),
    /// Notification preferences
    Prefs(prefs::PrefsArgs),
    /// Notification feed
    Feed(feed::FeedArgs),
    /// Retention sweep
    Sweep(sweep::SweepArgs),
    /// Translation
    Translate(translate::TranslateArgs),
    /// Backend account and reference data
    Account(account::AccountArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let ctx = load_context(&self.config).await?;
        match &self.command {
            Commands::Emit(args) => emit::execute(args, &ctx, self.format).await,
            Commands::Prefs(args) => prefs::execute(args, &ctx, self.format).await,
            Commands::Feed(args) => feed::execute(args, &ctx, self.format).await,
            Commands::Sweep(args) => sweep::execute(args, &ctx, self.format).await,
            Commands::Translate(args) => translate::execute(args, &ctx).await,
            Commands::Account(args) => account::execute(args, &ctx, self.format).await,
        }
    }
}

/// Helper: load configuration and build the application context
pub async fn load_context(config_path: &str) -> Result<AppContext, AppError> {
    let config = AppConfig::load(config_path)?;
    AppContext::from_config(config).await
}

/// Helper: the explicit `--user`, or whoever the local session identifies
pub async fn resolve_user(ctx: &AppContext, explicit: Option<&str>) -> Result<UserKey, AppError> {
    if let Some(raw) = explicit {
        return raw.parse();
    }
    ctx.identity().resolve().await.ok_or_else(|| {
        AppError::authentication("No user identity: pass --user or log in with 'account login'")
    })
}
