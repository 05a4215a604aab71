//! Application builder — wires the pipeline, worker, and router together.

use std::net::SocketAddr;
use std::sync::Arc;

use reqtrack_buffer::{RedisClient, RedisLogBuffer};
use reqtrack_core::config::AppConfig;
use reqtrack_core::error::AppError;
use reqtrack_core::traits::{LogBuffer, LogStore};
use reqtrack_database::repositories::RequestLogRepository;
use reqtrack_database::{DatabasePool, PgLogStore};
use reqtrack_track::{LogSink, RequestRecorder};
use reqtrack_worker::{BufferFlusher, CronScheduler, RetentionTask};

use crate::router::build_router;
use crate::state::AppState;

/// Runs the reqtrack server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    tracing::info!("Starting reqtrack server...");

    let pool = db.pool().clone();
    let store: Arc<dyn LogStore> = Arc::new(PgLogStore::new(pool.clone()));
    let log_repo = Arc::new(RequestLogRepository::new(pool.clone()));

    // Buffered delivery is opt-in; an unreachable Redis endpoint at this
    // point is a hard startup failure.
    let buffer: Option<Arc<dyn LogBuffer>> = if config.buffer.enabled {
        let client = RedisClient::connect(&config.buffer).await?;
        let key = config.buffer.redis_key.as_deref().ok_or_else(|| {
            AppError::configuration("buffer.redis_key is required when buffering is enabled")
        })?;
        Some(Arc::new(RedisLogBuffer::new(client, key)))
    } else {
        None
    };

    let sink = match &buffer {
        Some(buffer) => LogSink::Buffered(Arc::clone(buffer)),
        None => LogSink::Direct(Arc::clone(&store)),
    };
    let recorder = Arc::new(RequestRecorder::new(config.tracking.clone(), sink));

    let flusher = buffer
        .as_ref()
        .map(|buffer| Arc::new(BufferFlusher::new(Arc::clone(buffer), Arc::clone(&store))));

    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(config.worker.clone()).await?;
        if let Some(flusher) = &flusher {
            scheduler.register_flush(Arc::clone(flusher)).await?;
        }
        let retention = Arc::new(RetentionTask::new(
            RequestLogRepository::new(pool.clone()),
            config.worker.retention.clone(),
        ));
        scheduler.register_retention(retention).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        db,
        recorder,
        buffer,
        flusher,
        log_repo,
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("reqtrack server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
}
