//! Notification emission command.

use clap::Args;

use crate::output::{self, OutputFormat};
use campus_core::error::AppError;
use campus_core::types::UserKey;
use campus_entity::notification::NotificationType;
use campus_service::{AppContext, EmitOutcome};

/// Arguments for the emit command
#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Recipient user id
    #[arg(long)]
    pub to: String,
    /// Title
    #[arg(long)]
    pub title: String,
    /// Message body
    #[arg(long)]
    pub message: String,
    /// Notification type (e.g. DOCUMENT_UPLOADED, CHAT_MESSAGE, SYSTEM)
    #[arg(long = "type", default_value = "INFO")]
    pub kind: String,
}

/// Execute the emit command
pub async fn execute(
    args: &EmitArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let to: UserKey = args.to.parse()?;
    let kind: NotificationType = args.kind.parse()?;

    let outcome = ctx
        .emitter()
        .emit(&to, &args.title, &args.message, kind)
        .await?;

    if format == OutputFormat::Json {
        let (status, id) = match &outcome {
            EmitOutcome::Created(id) => ("created", Some(id.as_str())),
            EmitOutcome::Duplicate(id) => ("duplicate", Some(id.as_str())),
            EmitOutcome::DisabledByPreference => ("disabled", None),
        };
        output::print_item(&serde_json::json!({"status": status, "id": id}), format);
        return Ok(());
    }

    match outcome {
        EmitOutcome::Created(id) => output::print_success(&format!("Notification created: {}", id)),
        EmitOutcome::Duplicate(id) => {
            output::print_warning(&format!("Duplicate of {} within the dedup window", id))
        }
        EmitOutcome::DisabledByPreference => {
            output::print_warning(&format!("{} disabled {} notifications", to, kind))
        }
    }
    Ok(())
}
