//! REST API for order quoting.
//!
//! Provides endpoints for:
//! - Quoting an order (`POST /calculate-cost`)
//! - Inspecting the served network and the demo topologies
//! - Swagger UI at /q/swagger-ui

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, warn};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::demo_data::{available_datasets, generate_by_name};
use crate::dto::{CostEntryDto, MissingEdgeDto, NetworkDto, OrderDto, QuoteDto};
use crate::error::QuoteError;
use crate::solver::Optimizer;

/// Application state shared across handlers.
pub struct AppState {
    pub optimizer: Optimizer,
}

impl AppState {
    pub fn new(optimizer: Optimizer) -> Self {
        Self { optimizer }
    }
}

/// Creates the API router with CORS and Swagger UI enabled.
pub fn create_router(optimizer: Optimizer) -> Router {
    let state = Arc::new(AppState::new(optimizer));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Quoting
        .route("/calculate-cost", post(calculate_cost))
        .route("/network", get(get_network))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{name}", get(get_demo_data))
        // Swagger UI at /q/swagger-ui (Quarkus-style path)
        .merge(SwaggerUi::new("/q/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

/// Error body returned with every non-2xx status this API produces itself.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a request handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("quote worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidOrder(_) | ApiError::Quote(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

// ============================================================================
// Health & Info
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status indicator ("UP" when healthy).
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// Application info response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Application name.
    pub name: &'static str,
    /// Application version.
    pub version: &'static str,
    /// Configured search strategy.
    pub solver_engine: &'static str,
}

/// GET /info - Application info endpoint.
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Application info", body = InfoResponse))
)]
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Warehouse Routing",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: state.optimizer.config().strategy.as_str(),
    })
}

// ============================================================================
// Quoting
// ============================================================================

/// POST /calculate-cost - Cheapest pickup route for an order.
///
/// The search itself runs on the blocking pool.
#[utoipa::path(
    post,
    path = "/calculate-cost",
    request_body = OrderDto,
    responses(
        (status = 200, description = "Cheapest route and its cost", body = QuoteDto),
        (status = 422, description = "Invalid order or search too large", body = ErrorResponse)
    )
)]
async fn calculate_cost(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<OrderDto>,
) -> Result<Json<QuoteDto>, ApiError> {
    let order = dto.to_domain().map_err(ApiError::InvalidOrder)?;
    debug!(products = order.len(), "Quote requested");

    let optimizer = state.optimizer.clone();
    let quote = tokio::task::spawn_blocking(move || {
        optimizer
            .quote(&order)
            .map(|quote| QuoteDto::from_quote(&optimizer, &quote))
    })
    .await??;

    Ok(Json(quote))
}

/// GET /network - The network quotes are computed against.
#[utoipa::path(
    get,
    path = "/network",
    responses((status = 200, description = "Served network", body = NetworkDto))
)]
async fn get_network(State(state): State<Arc<AppState>>) -> Json<NetworkDto> {
    Json(NetworkDto::from_network(state.optimizer.network()))
}

// ============================================================================
// Demo Data
// ============================================================================

/// GET /demo-data - List available demo datasets.
#[utoipa::path(
    get,
    path = "/demo-data",
    responses((status = 200, description = "List of demo dataset names", body = Vec<String>))
)]
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(available_datasets().to_vec())
}

/// GET /demo-data/{name} - Get a specific demo network.
#[utoipa::path(
    get,
    path = "/demo-data/{name}",
    params(("name" = String, Path, description = "Demo dataset name")),
    responses(
        (status = 200, description = "Demo network retrieved", body = NetworkDto),
        (status = 404, description = "Dataset not found")
    )
)]
async fn get_demo_data(Path(name): Path<String>) -> Result<Json<NetworkDto>, StatusCode> {
    match generate_by_name(&name) {
        Some(network) => Ok(Json(NetworkDto::from_network(&network))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        info,
        calculate_cost,
        get_network,
        list_demo_data,
        get_demo_data,
    ),
    components(schemas(
        HealthResponse,
        InfoResponse,
        ErrorResponse,
        OrderDto,
        QuoteDto,
        NetworkDto,
        CostEntryDto,
        MissingEdgeDto,
    ))
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::demo_data::{generate_default, generate_random};
    use crate::domain::{MissingEdge, Network};
    use crate::solver::SolverConfig;

    fn app() -> Router {
        app_with(generate_default(), SolverConfig::default())
    }

    fn app_with(network: Network, config: SolverConfig) -> Router {
        create_router(Optimizer::new(Arc::new(network), config))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn quote(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::post("/calculate-cost")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let (status, body) = get(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "UP"}));

        let (status, body) = get(app(), "/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Warehouse Routing");
        assert_eq!(body["solverEngine"], "auto");
    }

    #[tokio::test]
    async fn test_single_product_quote() {
        let (status, body) = quote(app(), r#"{"A": 2}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"minimum_cost": 20.0, "best_path": [["C1", "L1"]]}));
    }

    #[tokio::test]
    async fn test_two_warehouse_quote() {
        let (status, body) = quote(app(), r#"{"A": 1, "C": 1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"minimum_cost": 35.0, "best_path": [["C2", "C1"], ["C1", "L1"]]})
        );
    }

    #[tokio::test]
    async fn test_empty_and_unknown_orders() {
        let (status, body) = quote(app(), "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"minimum_cost": 0.0, "best_path": [["C1", "L1"]]}));

        let (status, body) = quote(app(), r#"{"Z": 5}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"minimum_cost": 50.0, "best_path": [["C1", "L1"]]}));
    }

    #[tokio::test]
    async fn test_invalid_orders_are_unprocessable() {
        let (status, body) = quote(app(), r#"{"A": 0}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("must be positive"));

        let (status, _) = quote(app(), r#"{"A": -1}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = quote(app(), r#"["A", "C"]"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_rejected_edges_give_null_route() {
        let network = Network::builder(["C1", "C2"], "L1")
            .with_stock("C1", ["A"])
            .with_stock("C2", ["C"])
            .with_cost("C1", "L1", 20.0)
            .with_missing_edge(MissingEdge::Reject)
            .build()
            .unwrap();
        let (status, body) = quote(app_with(network, SolverConfig::default()), r#"{"A": 1, "C": 1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"minimum_cost": null, "best_path": null}));
    }

    #[tokio::test]
    async fn test_oversized_search_is_unprocessable() {
        let network = generate_random(3, 12, 12).unwrap();
        let config = SolverConfig {
            max_dp_warehouses: 10,
            ..SolverConfig::default()
        };
        let order: serde_json::Map<String, Value> = (0..12).map(|p| (format!("P{p}"), json!(1))).collect();
        let (status, body) = quote(app_with(network, config), &Value::Object(order).to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("search limit"));
    }

    #[tokio::test]
    async fn test_network_endpoint() {
        let (status, body) = get(app(), "/network").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warehouses"], json!(["C1", "C2", "C3"]));
        assert_eq!(body["delivery_location"], "L1");
        assert_eq!(body["stock"]["C3"], json!(["H", "I"]));
        assert_eq!(body["weight_per_unit"], 0.5);
    }

    #[tokio::test]
    async fn test_demo_data_endpoints() {
        let (status, body) = get(app(), "/demo-data").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["default", "regional"]));

        let (status, body) = get(app(), "/demo-data/regional").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["delivery_location"], "STORE");
        assert_eq!(body["missing_edge"], json!({"policy": "penalty", "cost": 250.0}));

        let (status, _) = get(app(), "/demo-data/atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_lists_quote_path() {
        let (status, body) = get(app(), "/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/calculate-cost"]["post"].is_object());
    }
}
