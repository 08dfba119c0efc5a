//! Cron scheduler for periodic maintenance tasks.

use std::time::Duration;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use campus_core::error::AppError;
use campus_service::AppContext;

use crate::jobs::retention::RetentionSweeper;

/// Cron-based scheduler for server-side maintenance.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Application context shared with every job
    ctx: AppContext,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(ctx: AppContext) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, ctx })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        if !self.ctx.config().retention.enabled {
            tracing::info!("Retention disabled, no sweep scheduled");
            return Ok(());
        }
        self.register_startup_sweep().await?;
        self.register_retention_sweep().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Retention sweep: on the configured schedule, throttled by the ledger
    async fn register_retention_sweep(&self) -> Result<(), AppError> {
        let ctx = self.ctx.clone();
        let schedule = ctx.config().retention.schedule.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let sweeper = RetentionSweeper::new(ctx.clone());
            Box::pin(async move {
                tracing::debug!("Running scheduled retention sweep");
                if let Err(e) = sweeper.run_if_due(None).await {
                    tracing::error!("Retention sweep failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create retention_sweep schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add retention_sweep schedule: {}", e))
        })?;

        tracing::info!("Registered: retention_sweep ({})", schedule);
        Ok(())
    }

    /// Startup sweep: once, after the configured initial delay
    async fn register_startup_sweep(&self) -> Result<(), AppError> {
        let ctx = self.ctx.clone();
        let delay = Duration::from_secs(ctx.config().retention.initial_delay_seconds);
        let job = CronJob::new_one_shot_async(delay, move |_uuid, _lock| {
            let sweeper = RetentionSweeper::new(ctx.clone());
            Box::pin(async move {
                tracing::debug!("Running startup retention sweep");
                if let Err(e) = sweeper.run_if_due(None).await {
                    tracing::error!("Startup retention sweep failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create startup_sweep schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add startup_sweep schedule: {}", e))
        })?;

        tracing::info!("Registered: startup_sweep (after {:?})", delay);
        Ok(())
    }
}
