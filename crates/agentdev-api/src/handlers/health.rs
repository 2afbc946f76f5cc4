//! Service banner and health check handlers.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::warn;

use crate::config::SERVICE_NAME;
use crate::state::AppState;
use crate::types::{HealthResponse, HealthServices, ServiceInfo};

/// GET / - Service name, version and environment.
pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: state.config.version().to_string(),
        environment: state.config.environment.clone(),
        status: "healthy".to_string(),
    })
}

/// GET /health - Probes storage; 503 when the data directory is unusable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, storage) = match state.storage.health_check() {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            warn!(error = %e, "Storage health probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let body = HealthResponse {
        status: if status.is_success() { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.config.uptime_seconds(),
        services: HealthServices {
            storage: storage.to_string(),
            api: "healthy".to_string(),
        },
    };
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::make_test_state;

    #[tokio::test]
    async fn test_root_handler() {
        let state = make_test_state();
        let Json(info) = root(State(state)).await;

        assert_eq!(info.name, "AgentDev Platform API");
        assert_eq!(info.status, "healthy");
        assert!(!info.version.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = make_test_state();
        let (status, Json(response)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "healthy");
        assert_eq!(response.services.storage, "healthy");
    }

    #[tokio::test]
    async fn test_health_reports_unusable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut state = make_test_state();
        state.storage = std::sync::Arc::new(agentdev_persistence::Storage::new(&blocker));

        let (status, Json(response)) = health(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status, "unhealthy");
        assert_eq!(response.services.api, "healthy");
    }
}
