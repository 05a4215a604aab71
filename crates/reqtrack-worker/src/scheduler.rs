//! Cron scheduler for the periodic flush and retention tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use reqtrack_core::config::worker::WorkerConfig;
use reqtrack_core::error::AppError;
use reqtrack_core::result::AppResult;

use crate::flusher::BufferFlusher;
use crate::retention::RetentionTask;

/// Cron-based scheduler for the background tasks.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(config: WorkerConfig) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, config })
    }

    /// Register the periodic buffer flush.
    pub async fn register_flush(&self, flusher: Arc<BufferFlusher>) -> AppResult<()> {
        let schedule = self.config.flush_schedule.clone();
        let max_items = self.config.flush_max_items;
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let flusher = Arc::clone(&flusher);
            Box::pin(async move {
                tracing::debug!("Running scheduled buffer flush");
                if let Err(e) = flusher.flush(max_items).await {
                    tracing::error!("Scheduled flush failed: {}", e);
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create flush schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add flush schedule: {}", e)))?;

        tracing::info!(schedule = %schedule, "Registered: buffer flush");
        Ok(())
    }

    /// Register the retention pass, when enabled.
    pub async fn register_retention(&self, task: Arc<RetentionTask>) -> AppResult<()> {
        if !self.config.retention.enabled {
            tracing::info!("Retention schedule disabled");
            return Ok(());
        }

        let schedule = self.config.retention.schedule.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let task = Arc::clone(&task);
            Box::pin(async move {
                tracing::debug!("Running scheduled retention pass");
                if let Err(e) = task.run().await {
                    tracing::error!("Scheduled retention pass failed: {}", e);
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create retention schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add retention schedule: {}", e)))?;

        tracing::info!(schedule = %schedule, "Registered: log retention");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
