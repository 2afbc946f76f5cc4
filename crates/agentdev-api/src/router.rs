//! Router configuration and server setup.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::rate_limit;
use crate::state::AppState;

/// Room for JSON escaping and the other fields of an artifact upload.
const ARTIFACT_BODY_OVERHEAD: usize = 64 * 1024;

/// Builds the CORS layer from the configured origins.
///
/// `*` allows any origin but then credentials are not allowed. Request
/// headers are mirrored, so any header the browser asks for is accepted.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

/// Request body limit for artifact uploads.
///
/// Escaped JSON content can take up to twice the raw size.
fn artifact_body_limit(config: &ApiConfig) -> usize {
    usize::try_from(config.max_artifact_bytes)
        .unwrap_or(usize::MAX)
        .saturating_mul(2)
        .saturating_add(ARTIFACT_BODY_OVERHEAD)
}

/// Routes mounted under `/api/v1`. List/create endpoints answer with and without a trailing slash.
fn api_routes(config: &ApiConfig) -> Router<AppState> {
    let artifact_limit = artifact_body_limit(config);

    Router::new()
        // Auth
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/projects/stats/summary", get(handlers::project_stats))
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/:id/start", post(handlers::start_project))
        .route("/projects/:id/complete", post(handlers::complete_project))
        // Agents
        .route(
            "/agents",
            get(handlers::list_agents).post(handlers::create_agent),
        )
        .route(
            "/agents/",
            get(handlers::list_agents).post(handlers::create_agent),
        )
        .route("/agents/:id", get(handlers::get_agent))
        // Messages
        .route(
            "/messages/channels",
            get(handlers::list_channels).post(handlers::create_channel),
        )
        .route("/messages", post(handlers::send_message))
        .route("/messages/", post(handlers::send_message))
        .route("/messages/:channel_id", get(handlers::list_messages))
        // Artifacts
        .route(
            "/artifacts",
            get(handlers::list_artifacts)
                .post(handlers::create_artifact)
                .layer(DefaultBodyLimit::max(artifact_limit)),
        )
        .route(
            "/artifacts/",
            get(handlers::list_artifacts)
                .post(handlers::create_artifact)
                .layer(DefaultBodyLimit::max(artifact_limit)),
        )
        .route("/artifacts/:id", get(handlers::get_artifact))
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    // Trace stays outermost: CORS needs a response body with a default value.
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes(&state.config))
        .layer(layers)
        .with_state(state)
}

/// Starts the API server and runs until the process is stopped.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    serve_with_shutdown(config, state, std::future::pending()).await
}

/// Starts the API server and stops accepting connections once `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    config: ApiConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_address()).await?;
    serve_listener(listener, state, shutdown).await
}

/// Serves on an already bound listener.
pub async fn serve_listener<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "API server listening");

    let app = create_router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("API server stopped");
    Ok(())
}
