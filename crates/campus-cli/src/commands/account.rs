//! Backend account and reference data commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use campus_client::ApiClient;
use campus_client::api::NamedEntity;
use campus_core::error::AppError;
use campus_service::AppContext;

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account subcommand
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Log in and store the token
    Login {
        /// Account email
        username: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the authenticated profile
    Me,
    /// List calendar events of the signed-in user
    Events {
        /// User id (defaults to the signed-in user)
        #[arg(long)]
        user: Option<String>,
    },
    /// List formations
    Formations,
    /// List specializations
    Specializations,
}

/// Reference entity display row
#[derive(Debug, Serialize, Tabled)]
struct EntityRow {
    /// ID
    id: String,
    /// Name
    name: String,
}

impl From<&NamedEntity> for EntityRow {
    fn from(e: &NamedEntity) -> Self {
        Self {
            id: e.id.to_string().trim_matches('"').to_string(),
            name: e.name.clone(),
        }
    }
}

/// Event display row
#[derive(Debug, Serialize, Tabled)]
struct EventRow {
    /// Title
    title: String,
    /// Start
    start: String,
    /// End
    end: String,
}

/// Execute account commands
pub async fn execute(
    args: &AccountArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = ApiClient::new(ctx.clone())?;

    match &args.command {
        AccountCommand::Login { username, password } => {
            client.login(username, password).await?;
            let user = client.me().await?;
            output::print_success(&format!("Logged in as {}", user.id));
        }
        AccountCommand::Logout => {
            client.clear_token().await;
            ctx.sign_out();
            output::print_success("Logged out");
        }
        AccountCommand::Me => {
            let user = client.me().await?;
            output::print_item(&user, format);
        }
        AccountCommand::Events { user } => {
            let user = match user {
                Some(raw) => raw.parse()?,
                None => {
                    client.me().await?;
                    super::resolve_user(ctx, None).await?
                }
            };
            let rows: Vec<EventRow> = client
                .user_events(&user)
                .await?
                .into_iter()
                .map(|e| EventRow {
                    title: e.title,
                    start: e.start.unwrap_or_default(),
                    end: e.end.unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        AccountCommand::Formations => {
            let rows: Vec<EntityRow> = client.formations().await.iter().map(EntityRow::from).collect();
            output::print_list(&rows, format);
        }
        AccountCommand::Specializations => {
            let rows: Vec<EntityRow> = client
                .specializations()
                .await
                .iter()
                .map(EntityRow::from)
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
