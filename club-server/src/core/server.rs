//! Server Implementation
//!
//! HTTP 服务器启动和管理

use serde_json::json;

use crate::audit::AuditAction;
use crate::core::{BackgroundTasks, Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Start background tasks
        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);

        // Startup goes into the audit chain before the first request
        if let Err(e) = state
            .audit
            .log_sync(
                AuditAction::SystemStartup,
                "system",
                "server",
                json!({ "version": env!("CARGO_PKG_VERSION") }),
            )
            .await
        {
            tracing::warn!("Failed to record startup audit entry: {:?}", e);
        }

        let addr = format!("{}:{}", self.config.host, self.config.http_port);
        tracing::info!("🏋️ Hierro Club Server starting on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        crate::services::http::serve(state.clone(), &addr, shutdown)
            .await
            .map_err(|e| crate::core::ServerError::Internal(e.into()))?;

        if let Err(e) = state
            .audit
            .log_sync(AuditAction::SystemShutdown, "system", "server", json!({}))
            .await
        {
            tracing::warn!("Failed to record shutdown audit entry: {:?}", e);
        }

        tasks.shutdown().await;

        Ok(())
    }
}
