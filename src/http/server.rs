//! HTTP API Server for heritage search
//!
//! Exposes the dataset, heritage object and person fetchers as JSON endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Services;
use crate::search::SearchOptions;
use crate::Error;

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query of the lookup endpoints
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub id: String,
}

/// Custom error type for API errors
pub enum ApiError {
    /// The search index failed or answered with something unexpected
    Upstream(Error),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Upstream(error) => {
                tracing::error!(%error, "Search request failed");
                (StatusCode::BAD_GATEWAY, error.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Upstream(err)
    }
}

/// Create the HTTP server with all routes
pub fn create_server(services: Arc<Services>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/datasets", get(search_datasets))
        .route("/api/datasets/lookup", get(lookup_dataset))
        .route("/api/objects", get(search_objects))
        .route("/api/objects/lookup", get(lookup_object))
        .route("/api/persons", get(search_persons))
        .route("/api/persons/lookup", get(lookup_person))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(services)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(SuccessResponse { message: "Heritage search API is running".to_string() })
}

fn not_found(kind: &str, id: &str) -> ApiError {
    ApiError::NotFound(format!("{} '{}' not found", kind, id))
}

/// GET /api/datasets - Search datasets
async fn search_datasets(
    State(services): State<Arc<Services>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let result = services
        .datasets
        .search(&SearchOptions::from_pairs(pairs))
        .await?;
    Ok(Json(result).into_response())
}

/// GET /api/datasets/lookup?id= - Get one dataset
async fn lookup_dataset(
    State(services): State<Arc<Services>>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, ApiError> {
    let dataset = services
        .datasets
        .get_by_id(&query.id)
        .await?
        .ok_or_else(|| not_found("Dataset", &query.id))?;
    Ok(Json(dataset).into_response())
}

/// GET /api/objects - Search heritage objects
async fn search_objects(
    State(services): State<Arc<Services>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let result = services
        .heritage_objects
        .search(&SearchOptions::from_pairs(pairs))
        .await?;
    Ok(Json(result).into_response())
}

/// GET /api/objects/lookup?id= - Get one heritage object
async fn lookup_object(
    State(services): State<Arc<Services>>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, ApiError> {
    let object = services
        .heritage_objects
        .get_by_id(&query.id)
        .await?
        .ok_or_else(|| not_found("Heritage object", &query.id))?;
    Ok(Json(object).into_response())
}

/// GET /api/persons - Search persons
async fn search_persons(
    State(services): State<Arc<Services>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let result = services
        .persons
        .search(&SearchOptions::from_pairs(pairs))
        .await?;
    Ok(Json(result).into_response())
}

/// GET /api/persons/lookup?id= - Get one person
async fn lookup_person(
    State(services): State<Arc<Services>>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, ApiError> {
    let person = services
        .persons
        .get_by_id(&query.id)
        .await?
        .ok_or_else(|| not_found("Person", &query.id))?;
    Ok(Json(person).into_response())
}

/// Start the HTTP server
pub async fn start_server(
    addr: &str,
    services: Arc<Services>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(services);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Heritage search API listening");
    tracing::info!("Endpoints: GET /api/{{datasets,objects,persons}}[/lookup?id=], GET /health");

    axum::serve(listener, app).await?;

    Ok(())
}
