//! Notification preference commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use campus_core::error::AppError;
use campus_entity::notification::{NotificationPreferences, NotificationType};
use campus_service::AppContext;

/// Arguments for preference commands
#[derive(Debug, Args)]
pub struct PrefsArgs {
    /// User id (defaults to the signed-in user)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Preference subcommand
    #[command(subcommand)]
    pub command: PrefsCommand,
}

/// Preference subcommands
#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Show every category toggle
    Get {
        /// Only this category
        category: Option<String>,
    },
    /// Enable or disable a category
    Set {
        /// Category (e.g. CHAT_MESSAGE)
        category: String,
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Create or reconcile the preference document
    Init {
        /// Email used to find documents stored under another key
        #[arg(long)]
        email: Option<String>,
    },
}

/// Preference display row
#[derive(Debug, Serialize, Tabled)]
struct PrefRow {
    /// Category
    category: String,
    /// Enabled
    enabled: bool,
}

fn rows(prefs: &NotificationPreferences) -> Vec<PrefRow> {
    NotificationType::TOGGLEABLE
        .iter()
        .map(|kind| PrefRow {
            category: kind.to_string(),
            enabled: prefs.is_enabled(*kind),
        })
        .collect()
}

/// Execute preference commands
pub async fn execute(
    args: &PrefsArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let user = super::resolve_user(ctx, args.user.as_deref()).await?;
    let prefs = ctx.preferences();

    match &args.command {
        PrefsCommand::Get { category: Some(category) } => {
            let kind: NotificationType = category.parse()?;
            let row = PrefRow {
                category: kind.to_string(),
                enabled: prefs.get(&user, kind).await,
            };
            output::print_list(&[row], format);
        }
        PrefsCommand::Get { category: None } => match prefs.load(&user).await? {
            Some(stored) => output::print_list(&rows(&stored), format),
            None => output::print_warning(&format!(
                "No preferences stored for {}; every category is enabled",
                user
            )),
        },
        PrefsCommand::Set { category, enabled } => {
            let kind: NotificationType = category.parse()?;
            prefs.set(Some(&user), kind, *enabled).await?;
            output::print_success(&format!(
                "{} {} for {}",
                kind,
                if *enabled { "enabled" } else { "disabled" },
                user
            ));
        }
        PrefsCommand::Init { email } => {
            let email = match email {
                Some(email) => Some(email.clone()),
                None => ctx.identity().email().await,
            };
            let stored = prefs.initialize(&user, email.as_deref()).await?;
            output::print_list(&rows(&stored), format);
        }
    }
    Ok(())
}
