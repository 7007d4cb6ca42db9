/// Application state and router builder
///
/// This module defines the shared application state, builds the Axum router
/// with its middleware stack, and carries each HTTP request into a GraphQL
/// execution with per-request data attached.
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health      # Health check (public)
/// └── /graphql
///     ├── GET           # Playground (hidden in production)
///     └── POST          # GraphQL endpoint
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS with credentials for the configured origins
/// 3. Cookie sessions (tower-sessions)

use crate::config::Config;
use crate::schema::auth::SESSION_USER_KEY;
use crate::schema::{build_schema, AppSchema};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskgraph_shared::auth::identity::{Identity, SessionUser};
use taskgraph_shared::store::loader::RelationLoaders;
use taskgraph_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Executable GraphQL schema
    pub schema: AppSchema,

    /// Storage handle
    pub store: Store,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state and builds the schema over the store
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            schema: build_schema(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Origins must be explicit: the browser sends the session cookie, and
    // credentials cannot be combined with a wildcard origin.
    let origins: Vec<HeaderValue> = state
        .config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600));

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(state.config.session.cookie_name.clone())
        .with_secure(state.config.api.production);

    Router::new()
        .route("/health", get(health_check))
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(session_layer)
        .with_state(state)
}

/// GraphQL endpoint handler
///
/// Reads the session into an [`Identity`], builds a fresh relation loader
/// set, and attaches identity, loaders, and the session itself as
/// request-scoped data before executing. The loaders are dropped with the
/// request, so nothing batched or memoized survives it.
async fn graphql_handler(
    State(state): State<AppState>,
    session: Session,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let session_user = match session.get::<SessionUser>(SESSION_USER_KEY).await {
        Ok(user) => user,
        Err(e) => {
            // An unreadable session record downgrades to anonymous rather
            // than failing the whole request
            tracing::warn!(error = %e, "session read failed");
            None
        }
    };

    let identity = Identity::from_session(session_user);
    let loaders = RelationLoaders::for_request(&state.store);

    let request = req.into_inner().data(identity).data(loaders).data(session);

    state.schema.execute(request).await.into()
}

/// Serves the GraphQL playground in non-production environments
async fn graphql_playground(State(state): State<AppState>) -> Response {
    if state.config.api.production {
        return StatusCode::NOT_FOUND.into_response();
    }

    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql"))).into_response()
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Health check handler
///
/// Returns service health status including database connectivity.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_status = match state.store.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(HealthResponse {
        status: if database_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
    })
}
