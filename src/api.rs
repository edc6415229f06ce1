// 🌐 HTTP API - JSON reports over a live snapshot
//
// The snapshot lives behind a lock at this layer only. Each request takes a
// read guard and runs the pure calculators; collection updates replace one
// collection at a time through the typed router.

use crate::cache::MetricsCache;
use crate::config::EngineConfig;
use crate::data_quality::DataQualityEngine;
use crate::error::SnapshotError;
use crate::inventory::calculate_inventory_status;
use crate::ledger::calculate_gl_balances;
use crate::models::flexible_date;
use crate::payroll::calculate_payroll_metrics;
use crate::sales::calculate_sales_metrics;
use crate::snapshot::Snapshot;
use crate::statements::{generate_balance_sheet, generate_income_statement};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Snapshot>>,
    config: Arc<EngineConfig>,
    cache: Arc<Mutex<MetricsCache>>,
}

impl AppState {
    pub fn new(snapshot: Snapshot, config: EngineConfig) -> Self {
        AppState {
            snapshot: Arc::new(RwLock::new(snapshot)),
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(MetricsCache::new())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, Response> {
        self.snapshot
            .read()
            .map_err(|_| failure(StatusCode::INTERNAL_SERVER_ERROR, "snapshot lock poisoned"))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(data))).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(message.into()),
    };
    (status, Json(body)).into_response()
}

#[derive(Deserialize)]
pub struct PeriodQuery {
    start: String,
    end: String,
}

#[derive(Serialize)]
struct CollectionUpdated {
    collection: String,
    records: usize,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    success("OK")
}

/// GET /api/dashboard - All KPIs (cached per snapshot content)
async fn get_dashboard(State(state): State<AppState>) -> Response {
    let snapshot = match state.read() {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    let Ok(mut cache) = state.cache.lock() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "cache lock poisoned");
    };

    match cache.get_or_compute(&snapshot, &state.config) {
        Ok(metrics) => success(metrics),
        Err(e) => {
            error!("Error computing dashboard: {:#}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/sales
async fn get_sales(State(state): State<AppState>) -> Response {
    match state.read() {
        Ok(s) => success(calculate_sales_metrics(&s.products, &s.inventory_log, &s.sales_log)),
        Err(resp) => resp,
    }
}

/// GET /api/payroll
async fn get_payroll(State(state): State<AppState>) -> Response {
    match state.read() {
        Ok(s) => success(calculate_payroll_metrics(
            &s.employees,
            &s.payroll_log,
            &s.leave_requests,
            &state.config,
        )),
        Err(resp) => resp,
    }
}

/// GET /api/inventory
async fn get_inventory(State(state): State<AppState>) -> Response {
    match state.read() {
        Ok(s) => success(calculate_inventory_status(
            &s.products,
            &s.inventory_log,
            &s.sales_log,
            &state.config,
        )),
        Err(resp) => resp,
    }
}

/// GET /api/ledger - Signed balance per account
async fn get_ledger(State(state): State<AppState>) -> Response {
    match state.read() {
        Ok(s) => success(calculate_gl_balances(&s.general_ledger)),
        Err(resp) => resp,
    }
}

/// GET /api/income-statement?start=YYYY-MM-DD&end=YYYY-MM-DD
async fn get_income_statement(
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Response {
    let (Some(start), Some(end)) = (
        flexible_date::parse(&period.start),
        flexible_date::parse(&period.end),
    ) else {
        return failure(StatusCode::BAD_REQUEST, "start and end must be valid dates");
    };

    match state.read() {
        Ok(s) => success(generate_income_statement(&s, start, end, &state.config)),
        Err(resp) => resp,
    }
}

/// GET /api/balance-sheet
async fn get_balance_sheet(State(state): State<AppState>) -> Response {
    match state.read() {
        Ok(s) => success(generate_balance_sheet(&s, &state.config)),
        Err(resp) => resp,
    }
}

/// GET /api/quality - Data-quality report
async fn get_quality(State(state): State<AppState>) -> Response {
    match state.read() {
        Ok(s) => success(DataQualityEngine::new().validate(&s)),
        Err(resp) => resp,
    }
}

/// PUT /api/collections/:name - Replace one collection
async fn put_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(records): Json<Vec<Value>>,
) -> Response {
    let count = records.len();
    let Ok(mut snapshot) = state.snapshot.write() else {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "snapshot lock poisoned");
    };

    match snapshot.route(&name, records) {
        Ok(Some(collection)) => {
            info!(collection = %collection, records = count, "collection replaced");
            success(CollectionUpdated {
                collection: collection.name().to_string(),
                records: count,
            })
        }
        Ok(None) => success(CollectionUpdated {
            collection: name,
            records: 0,
        }),
        Err(e @ SnapshotError::UnknownCollection(_)) => {
            failure(StatusCode::NOT_FOUND, e.to_string())
        }
        Err(e) => failure(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/sales", get(get_sales))
        .route("/payroll", get(get_payroll))
        .route("/inventory", get(get_inventory))
        .route("/ledger", get(get_ledger))
        .route("/income-statement", get(get_income_statement))
        .route("/balance-sheet", get(get_balance_sheet))
        .route("/quality", get(get_quality))
        .route("/collections/:name", put(put_collection))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> Router {
        let snapshot = Snapshot::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        router(AppState::new(snapshot, EngineConfig::default()))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_put_collection_then_report() {
        let app = app();
        let products = json!([
            {"id": "P1", "name": "Burger", "category": "Food", "price": 5.0, "reorder": 10}
        ]);

        let response = app
            .clone()
            .oneshot(
                Request::put("/api/collections/products")
                    .header("content-type", "application/json")
                    .body(Body::from(products.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/inventory").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["low_stock_alerts"][0]["id"], "P1");
    }

    #[tokio::test]
    async fn test_malformed_record_rejected() {
        let response = app()
            .oneshot(
                Request::put("/api/collections/employees")
                    .header("content-type", "application/json")
                    .body(Body::from(json!([{"id": "E1", "name": "Ana"}]).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("id=E1"));
    }

    #[tokio::test]
    async fn test_unknown_collection() {
        let response = app()
            .oneshot(
                Request::put("/api/collections/widgets")
                    .header("content-type", "application/json")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_income_statement_bad_dates() {
        let response = app()
            .oneshot(
                Request::get("/api/income-statement?start=soon&end=2025-01-31")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
