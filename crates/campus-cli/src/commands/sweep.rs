//! Retention sweep command.

use clap::Args;

use crate::output::{self, OutputFormat};
use campus_core::error::AppError;
use campus_core::types::UserKey;
use campus_service::AppContext;
use campus_worker::{RetentionSweeper, SweepStatus};

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Limit the sweep to one recipient
    #[arg(long)]
    pub user: Option<String>,
    /// Ignore the once-per-interval throttle
    #[arg(long)]
    pub force: bool,
}

/// Execute the sweep command
pub async fn execute(
    args: &SweepArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let scope: Option<UserKey> = args.user.as_deref().map(str::parse).transpose()?;
    let sweeper = RetentionSweeper::new(ctx.clone());

    let report = if args.force {
        sweeper.sweep(scope.as_ref()).await?
    } else {
        sweeper.run_if_due(scope.as_ref()).await?
    };

    if format == OutputFormat::Json {
        output::print_item(&report, format);
        return Ok(());
    }

    match report.status {
        SweepStatus::Completed => output::print_success(&format!(
            "Deleted {} of {} eligible notifications",
            report.deleted.len(),
            report.eligible
        )),
        SweepStatus::Aborted => output::print_warning(&format!(
            "Sweep stopped after {} deletions; the rest stays eligible",
            report.deleted.len()
        )),
        SweepStatus::Throttled => output::print_warning("Sweep not due yet (use --force to override)"),
        SweepStatus::Disabled => output::print_warning("Retention is disabled"),
    }
    if let Some(last) = report.last_run {
        output::print_kv("Previous run", &last.to_rfc3339());
    }
    Ok(())
}
