//! Scheduled maintenance for Campus Notify.
//!
//! This crate provides:
//! - The retention sweeper that deletes old read notifications in small batches
//! - A cron scheduler that runs the sweep server-side, throttled through a
//!   ledger kept in the document store

pub mod jobs;
pub mod scheduler;

pub use jobs::retention::{RetentionSweeper, SweepReport, SweepStatus};
pub use scheduler::CronScheduler;
