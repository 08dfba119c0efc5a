//! Notification feed commands.

use chrono::SecondsFormat;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use campus_core::error::AppError;
use campus_realtime::{FeedItem, FeedSubscriber};
use campus_service::AppContext;

/// Arguments for feed commands
#[derive(Debug, Args)]
pub struct FeedArgs {
    /// User id (defaults to the signed-in user)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Feed subcommand
    #[command(subcommand)]
    pub command: FeedCommand,
}

/// Feed subcommands
#[derive(Debug, Subcommand)]
pub enum FeedCommand {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Follow the feed and print every update until interrupted
    Watch,
    /// Mark one notification read
    MarkRead {
        /// Notification id
        id: String,
    },
    /// Mark every notification read
    MarkAllRead,
}

/// Feed display row
#[derive(Debug, Serialize, Tabled)]
struct FeedRow {
    /// Notification ID
    id: String,
    /// Type
    #[serde(rename = "type")]
    kind: String,
    /// Title
    title: String,
    /// Message
    message: String,
    /// Created
    timestamp: String,
    /// State
    state: String,
}

impl From<&FeedItem> for FeedRow {
    fn from(item: &FeedItem) -> Self {
        let n = &item.notification;
        Self {
            id: n.id.clone(),
            kind: n.kind.to_string(),
            title: n.title.clone(),
            message: n.message.clone(),
            timestamp: n.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            state: format!("{:?}", item.state),
        }
    }
}

/// Execute feed commands
pub async fn execute(
    args: &FeedArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let user = super::resolve_user(ctx, args.user.as_deref()).await?;

    match &args.command {
        FeedCommand::List { unread } => {
            let snapshot = FeedSubscriber::snapshot(ctx, &user).await?;
            let rows: Vec<FeedRow> = snapshot
                .items
                .iter()
                .filter(|item| !*unread || !item.is_read())
                .map(FeedRow::from)
                .collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_kv("Unread", &snapshot.unread_count.to_string());
            }
        }
        FeedCommand::Watch => {
            let mut handle = FeedSubscriber::open(ctx, user.clone());
            loop {
                tokio::select! {
                    update = handle.changed() => {
                        let Some(snapshot) = update else { break };
                        let rows: Vec<FeedRow> = snapshot.items.iter().map(FeedRow::from).collect();
                        output::print_list(&rows, format);
                        output::print_kv("Unread", &snapshot.unread_count.to_string());
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
        FeedCommand::MarkRead { id } => {
            let state = ctx.inbox().mark_read(&user, id).await?;
            output::print_success(&format!("{} is now {:?}", id, state));
        }
        FeedCommand::MarkAllRead => {
            let flipped = ctx.inbox().mark_all_read(&user).await?;
            output::print_success(&format!("Marked {} notifications read", flipped));
        }
    }
    Ok(())
}
