// SPDX-License-Identifier: MIT
//! Tessera REST API
//!
//! HTTP server over the entity layer. Decodes inbound JSON into entity
//! structs, drives the mutation and lookup engines, re-encodes results,
//! and maps error kinds to transport status codes. Persisted state is
//! entirely the quad schema of the entity layer - there is no separate
//! file format here.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use tessera_entity::{codec, EntityError, EntityService, LookupService, Metadata, Node, Relation};
use tessera_quad::Iri;
use tessera_store::QuadStore;

/// API errors, mapped exhaustively onto status codes.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body or parameters are invalid.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An internal failure in the entity layer or the store.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::PropertyEncoding(_) => Self::BadRequest(err.to_string()),
            EntityError::InconsistentSubject { .. }
            | EntityError::MalformedRelationSubject(_)
            | EntityError::Store { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// HTTP status code, repeated in the body.
    pub code: u16,
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// API version prefix under which entity routes are nested.
    pub version_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            version_prefix: "/v1".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from the environment, falling back to
    /// defaults: `TESSERA_HOST`, `TESSERA_PORT`, `TESSERA_API_PREFIX`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("TESSERA_HOST").unwrap_or(defaults.host),
            port: std::env::var("TESSERA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            version_prefix: std::env::var("TESSERA_API_PREFIX")
                .unwrap_or(defaults.version_prefix),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Application state: the injected engines over one shared store.
#[derive(Clone)]
pub struct AppState {
    /// Write-side engine.
    pub entities: EntityService,
    /// Read-side engine.
    pub lookup: LookupService,
    /// Process start, for the health probe.
    pub start_time: Instant,
}

impl AppState {
    /// Build the engines over an explicitly constructed store handle.
    pub fn new(store: Arc<dyn QuadStore>) -> Self {
        Self {
            entities: EntityService::new(store.clone()),
            lookup: LookupService::new(store),
            start_time: Instant::now(),
        }
    }
}

/// Build the full router: health probes at the root, entity routes
/// nested under the version prefix.
pub fn build_router(state: AppState, version_prefix: &str) -> Router {
    let api = Router::new()
        .route("/nodes", post(create_node_handler))
        .route("/nodes/{id}", get(get_node_handler))
        .route("/nodes/{id}", put(update_node_handler))
        .route("/nodes/{id}", delete(delete_node_handler))
        .route("/nodes/{id}/relationships", get(node_relationships_handler))
        .route("/relations", post(create_relation_handler))
        .route("/relations/{id}", get(get_relation_handler))
        .route("/relations/{id}", delete(delete_relation_handler))
        .route("/relations/{id}/metadata", post(create_relation_metadata_handler))
        .route("/metadata", post(create_metadata_handler))
        .route("/metadata/{id}", get(get_metadata_handler))
        .route("/metadata/{id}", put(update_metadata_handler))
        .route("/metadata/{id}", delete(delete_metadata_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .nest(version_prefix, api)
        .with_state(state)
}

#[instrument(skip(state))]
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[instrument]
async fn ready_handler() -> StatusCode {
    StatusCode::OK
}

/// Decode a request body, mapping coercion and shape failures to 400
/// rather than the generic extractor rejection.
fn decode_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[instrument(skip(state, body))]
async fn create_node_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let node: Node = decode_body(body)?;
    let quads = state.entities.create_node(&node).await?;
    let created = codec::node_from_quads(&quads).map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn get_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, ApiError> {
    let quads = state.lookup.quads_by_subject(&Iri::new(&id)).await?;
    if quads.is_empty() {
        return Err(ApiError::NotFound(format!("node {id} not found")));
    }
    let node = codec::node_from_quads(&quads).map_err(ApiError::from)?;
    Ok(Json(node))
}

#[instrument(skip(state, body))]
async fn update_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Node>, ApiError> {
    let mut node: Node = decode_body(body)?;
    if !node.id.is_empty() && node.id.as_str() != id {
        return Err(ApiError::BadRequest("received ids do not match".to_string()));
    }
    node.id = Iri::new(&id);
    state.entities.update_node(&node).await?;

    // re-read for the authoritative post-update state
    let quads = state.lookup.quads_by_subject(&node.id).await?;
    let updated = codec::node_from_quads(&quads).map_err(ApiError::from)?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
async fn delete_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.entities.delete_by_id(&Iri::new(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn node_relationships_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let quads = state.lookup.quads_touching(&Iri::new(&id)).await?;
    if quads.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(quads).into_response())
}

#[instrument(skip(state, relation))]
async fn create_relation_handler(
    State(state): State<AppState>,
    Json(relation): Json<Relation>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.entities.create_relation(&relation).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn get_relation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Relation>, ApiError> {
    match state.lookup.relation_by_id(&Iri::new(&id)).await? {
        Some(relation) => Ok(Json(relation)),
        None => Err(ApiError::NotFound(format!("relation {id} not found"))),
    }
}

#[instrument(skip(state))]
async fn delete_relation_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.entities.delete_relation(&Iri::new(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, body))]
async fn create_metadata_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let metadata: Metadata = decode_body(body)?;
    let created = state.entities.create_metadata(&metadata).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Alias for the metadata endpoint: the owning relation comes from
/// the path when the body leaves it empty.
#[instrument(skip(state, body))]
async fn create_relation_metadata_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let mut metadata: Metadata = decode_body(body)?;
    if metadata.relation_id.is_empty() {
        metadata.relation_id = Iri::new(&id);
    } else if metadata.relation_id.as_str() != id {
        return Err(ApiError::BadRequest("received ids do not match".to_string()));
    }
    let created = state.entities.create_metadata(&metadata).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn get_metadata_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Metadata>, ApiError> {
    let quads = state.lookup.metadata_quads_by_id(&Iri::new(&id)).await?;
    if quads.is_empty() {
        return Err(ApiError::NotFound(format!("metadata {id} not found")));
    }
    let metadata = codec::metadata_from_quads(&quads).map_err(ApiError::from)?;
    Ok(Json(metadata))
}

#[instrument(skip(state, body))]
async fn update_metadata_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Metadata>, ApiError> {
    let mut metadata: Metadata = decode_body(body)?;
    if !metadata.id.is_empty() && metadata.id.as_str() != id {
        return Err(ApiError::BadRequest("received ids do not match".to_string()));
    }
    metadata.id = Iri::new(&id);
    state.entities.update_metadata(&metadata).await?;

    let quads = state.lookup.metadata_quads_by_id(&metadata.id).await?;
    let updated = codec::metadata_from_quads(&quads).map_err(ApiError::from)?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
async fn delete_metadata_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.entities.delete_metadata(&Iri::new(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Start the API server over the given store handle.
pub async fn serve(config: ApiConfig, store: Arc<dyn QuadStore>) -> Result<(), std::io::Error> {
    let state = AppState::new(store);
    let app = build_router(state, &config.version_prefix);

    let addr = format!("{}:{}", config.host, config.port);
    info!(%addr, prefix = %config.version_prefix, "starting tessera api server");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
