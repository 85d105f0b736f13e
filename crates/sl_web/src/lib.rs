//! `sl_web` - HTTP API for snowlens
//!
//! This crate provides:
//! - axum-based HTTP server
//! - JSON API endpoints over the in-memory store
//! - Static file serving for a pre-built dashboard

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use sl_config::WebConfig;
use sl_query::{DashboardSummary, OverProvisioningAdvice, QueryBuilder, UnusedWarehouse};
use sl_store::{
    ActivityFilter, ExpensiveQuery, GroupingType, LineageDependency, ObjectUsage, OperationType,
    OrphanedRole, RolePrivilege, SessionType, SnowStore, SnowflakeUser, StoreStats,
    UserActivity, UserAnalytics, UserObjectAccess, WarehouseActivity,
};
use std::any::Any;
use std::path::{Path as FsPath, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Web server errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            WebError::ServerError(_) => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

/// Shared application state
pub struct AppState {
    /// Seeded record store
    pub store: SnowStore,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create new app state with the given store
    pub fn new(store: SnowStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }

    /// App state over the built-in sample data
    pub fn new_builtin() -> Self {
        Self::new(SnowStore::open_builtin())
    }
}

pub struct WebServer {
    state: Arc<AppState>,
    config: WebConfig,
}

impl WebServer {
    pub fn new(store: SnowStore, config: WebConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(store)),
            config,
        }
    }

    pub fn router(&self) -> Router {
        let mut router = create_router(self.state.clone());
        if let Some(dir) = resolve_static_dir(&self.config) {
            debug!(dir = %dir.display(), "Serving static files");
            router =
                router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
        }
        if let Some(cors) = build_cors_layer(&self.config) {
            router = router.layer(cors);
        }
        router
    }

    pub async fn run(&self) -> Result<(), WebError> {
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|err| WebError::ServerError(err.to_string()))?;
        tracing::info!(%addr, "Starting snowlens server");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| WebError::ServerError(err.to_string()))?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub records: StoreStats,
}

/// Raw query-string pairs. Repeated keys are allowed; lookups take the first
/// non-empty value.
type QueryPairs = Vec<(String, String)>;

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, value)| name == key && !value.is_empty())
        .map(|(_, value)| value.clone())
}

/// Empty strings count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse an optional filter value, dropping anything unrecognized.
fn parse_filter<T: FromStr>(param: &'static str, value: Option<String>) -> Option<T> {
    let raw = non_empty(value)?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(param, value = %raw, "Ignoring unrecognized filter value");
            None
        }
    }
}

fn build_cors_layer(config: &WebConfig) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
        .expose_headers(cors::Any);

    if config
        .cors_origins
        .iter()
        .any(|origin| origin.trim() == "*")
    {
        return Some(layer.allow_origin(cors::Any));
    }

    let mut origins = Vec::new();
    for origin in &config.cors_origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => origins.push(value),
            Err(_) => warn!(origin = %origin, "Invalid CORS origin; skipping"),
        }
    }

    if origins.is_empty() {
        Some(layer.allow_origin(cors::Any))
    } else {
        Some(layer.allow_origin(AllowOrigin::list(origins)))
    }
}

/// Configured static dir if it exists, else the first of the usual build
/// output locations.
fn resolve_static_dir(config: &WebConfig) -> Option<PathBuf> {
    if let Some(dir) = &config.static_dir {
        if dir.is_dir() {
            return Some(dir.clone());
        }
        warn!(dir = %dir.display(), "static_dir does not exist; skipping static files");
    }

    ["web/dist", "web", "public"]
        .into_iter()
        .map(FsPath::new)
        .find(|candidate| candidate.is_dir())
        .map(FsPath::to_path_buf)
}

/// Render a handler panic as the generic 500 body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(%detail, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "message": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

/// Create the router with all API routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/dashboard-summary", get(dashboard_summary_handler))
        // Users
        .route("/api/snowflake-users", get(snowflake_users_handler))
        .route(
            "/api/snowflake-users/by-name/{user_name}",
            get(snowflake_user_by_name_handler),
        )
        .route("/api/snowflake-users/{id}", get(snowflake_user_handler))
        .route("/api/user-analytics", get(user_analytics_list_handler))
        .route("/api/user-analytics/{user_id}", get(user_analytics_handler))
        .route("/api/user-activities", get(user_activities_handler))
        // Cost, usage, lineage
        .route("/api/expensive-queries", get(expensive_queries_handler))
        .route("/api/object-usage", get(object_usage_handler))
        .route(
            "/api/lineage-dependencies/{source_object}",
            get(lineage_handler),
        )
        .route(
            "/api/user-object-access/{object_name}",
            get(user_object_access_handler),
        )
        // Warehouse efficiency
        .route(
            "/api/warehouse-efficiency/idle",
            get(idle_warehouses_handler),
        )
        .route(
            "/api/warehouse-efficiency/over-provisioning",
            get(over_provisioning_handler),
        )
        .route(
            "/api/warehouse-efficiency/unused",
            get(unused_warehouses_handler),
        )
        // RBAC
        .route("/api/rbac/orphaned-roles", get(orphaned_roles_handler))
        .route("/api/rbac/high-risk-roles", get(high_risk_roles_handler))
        .route(
            "/api/rbac/high-risk-roles/{role}",
            get(high_risk_role_handler),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

// =============================================================================
// Health & Summary Endpoints
// =============================================================================

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        records: state.store.stats(),
    })
}

async fn dashboard_summary_handler(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    Json(QueryBuilder::new(&state.store).dashboard_summary())
}

// =============================================================================
// User Endpoints
// =============================================================================

async fn snowflake_users_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SnowflakeUser>> {
    Json(state.store.snowflake_users().to_vec())
}

async fn snowflake_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SnowflakeUser>, WebError> {
    state
        .store
        .snowflake_user(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| WebError::NotFound("User not found".to_string()))
}

async fn snowflake_user_by_name_handler(
    State(state): State<Arc<AppState>>,
    Path(user_name): Path<String>,
) -> Result<Json<SnowflakeUser>, WebError> {
    state
        .store
        .snowflake_user_by_name(&user_name)
        .cloned()
        .map(Json)
        .ok_or_else(|| WebError::NotFound("User not found".to_string()))
}

async fn user_analytics_list_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<UserAnalytics>> {
    Json(state.store.all_user_analytics().to_vec())
}

async fn user_analytics_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAnalytics>, WebError> {
    state
        .store
        .user_analytics(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| WebError::NotFound("User analytics not found".to_string()))
}

async fn user_activities_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Json<Vec<UserActivity>> {
    let filter = ActivityFilter {
        user_id: first_value(&params, "userId"),
        session_type: parse_filter::<SessionType>(
            "sessionType",
            first_value(&params, "sessionType"),
        ),
    };
    Json(
        state
            .store
            .user_activities(&filter)
            .into_iter()
            .cloned()
            .collect(),
    )
}

// =============================================================================
// Cost, Usage & Lineage Endpoints
// =============================================================================

async fn expensive_queries_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Json<Vec<ExpensiveQuery>> {
    let grouping =
        parse_filter::<GroupingType>("groupingType", first_value(&params, "groupingType"));
    Json(
        state
            .store
            .expensive_queries(grouping)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn object_usage_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Json<Vec<ObjectUsage>> {
    let operation =
        parse_filter::<OperationType>("operationType", first_value(&params, "operationType"));
    Json(
        state
            .store
            .object_usage(operation)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn lineage_handler(
    State(state): State<Arc<AppState>>,
    Path(source_object): Path<String>,
) -> Json<Vec<LineageDependency>> {
    Json(
        state
            .store
            .lineage_dependencies(&source_object)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn user_object_access_handler(
    State(state): State<Arc<AppState>>,
    Path(object_name): Path<String>,
) -> Json<Vec<UserObjectAccess>> {
    Json(
        state
            .store
            .user_object_access(&object_name)
            .into_iter()
            .cloned()
            .collect(),
    )
}

// =============================================================================
// Warehouse Efficiency Endpoints
// =============================================================================

async fn idle_warehouses_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<WarehouseActivity>> {
    Json(QueryBuilder::new(&state.store).idle_warehouses().to_vec())
}

async fn over_provisioning_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<OverProvisioningAdvice>> {
    Json(QueryBuilder::new(&state.store).over_provisioning())
}

async fn unused_warehouses_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<UnusedWarehouse>> {
    Json(QueryBuilder::new(&state.store).unused_warehouses())
}

// =============================================================================
// RBAC Endpoints
// =============================================================================

async fn orphaned_roles_handler(State(state): State<Arc<AppState>>) -> Json<Vec<OrphanedRole>> {
    Json(state.store.orphaned_roles().to_vec())
}

async fn high_risk_roles_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(
        state
            .store
            .high_risk_roles()
            .iter()
            .map(|role| role.role_name.clone())
            .collect(),
    )
}

async fn high_risk_role_handler(
    State(state): State<Arc<AppState>>,
    Path(role): Path<String>,
) -> Result<Json<Vec<RolePrivilege>>, WebError> {
    state
        .store
        .high_risk_role(&role)
        .map(|found| Json(found.privileges.clone()))
        .ok_or_else(|| WebError::NotFound(format!("Role not found: {role}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use proptest::prelude::*;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new_builtin())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = create_router(test_state());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn ids_of(json: &serde_json::Value) -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_str().unwrap().to_string())
            .collect()
    }

    // ==========================================================================
    // WebError tests
    // ==========================================================================

    #[test]
    fn test_web_error_not_found() {
        let err = WebError::NotFound("User not found".to_string());
        assert!(err.to_string().contains("Not found"));
    }

    #[tokio::test]
    async fn test_web_error_into_response_not_found() {
        let response = WebError::NotFound("User not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "User not found" }));
    }

    #[tokio::test]
    async fn test_web_error_hides_internal_detail() {
        let response = WebError::ServerError("socket exploded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Internal server error");
    }

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_generic_500() {
        let app: Router = Router::new()
            .route(
                "/boom",
                get(boom),
            )
            .layer(CatchPanicLayer::custom(panic_response));
        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Internal server error");
    }

    // ==========================================================================
    // Parameter parsing tests
    // ==========================================================================

    #[test]
    fn test_parse_filter_known_value() {
        let parsed = parse_filter::<GroupingType>("groupingType", Some("query_hash".to_string()));
        assert_eq!(parsed, Some(GroupingType::QueryHash));
    }

    #[test]
    fn test_parse_filter_empty_is_absent() {
        assert_eq!(
            parse_filter::<SessionType>("sessionType", Some(String::new())),
            None
        );
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }

    proptest! {
        #[test]
        fn test_parse_filter_drops_unknown_operations(raw in "[a-z]{1,12}") {
            // Operation names are uppercase on the wire.
            prop_assert_eq!(parse_filter::<OperationType>("operationType", Some(raw)), None);
        }
    }

    // ==========================================================================
    // CORS / static tests
    // ==========================================================================

    #[test]
    fn test_cors_disabled_by_default() {
        assert!(build_cors_layer(&WebConfig::default()).is_none());
    }

    #[test]
    fn test_cors_enabled_with_origins() {
        let config = WebConfig {
            cors_enabled: true,
            cors_origins: vec!["http://localhost:5173".to_string(), "bad\norigin".to_string()],
            ..WebConfig::default()
        };
        assert!(build_cors_layer(&config).is_some());
    }

    #[test]
    fn test_static_dir_missing_is_skipped() {
        let config = WebConfig {
            static_dir: Some(PathBuf::from("/nonexistent/snowlens/dist")),
            ..WebConfig::default()
        };
        assert_ne!(
            resolve_static_dir(&config),
            Some(PathBuf::from("/nonexistent/snowlens/dist"))
        );
    }

    #[test]
    fn test_static_dir_configured() {
        let dir = std::env::temp_dir();
        let config = WebConfig {
            static_dir: Some(dir.clone()),
            ..WebConfig::default()
        };
        assert_eq!(resolve_static_dir(&config), Some(dir));
    }

    // ==========================================================================
    // Endpoint tests
    // ==========================================================================

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, json) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_value(json).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.records.snowflake_users, 7);
    }

    #[tokio::test]
    async fn test_snowflake_users_endpoint() {
        let (status, json) = get_json("/api/snowflake-users").await;
        assert_eq!(status, StatusCode::OK);
        let users = json.as_array().unwrap();
        assert_eq!(users.len(), 7);
        let nhi = users.iter().filter(|u| u["isNHI"] == true).count();
        assert_eq!(nhi, 3);
    }

    #[tokio::test]
    async fn test_snowflake_user_by_id() {
        let (status, json) = get_json("/api/snowflake-users/sfu-amitp").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["userName"], "AMITP");
    }

    #[tokio::test]
    async fn test_snowflake_user_not_found() {
        let (status, json) = get_json("/api/snowflake-users/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({ "message": "User not found" }));
    }

    #[tokio::test]
    async fn test_snowflake_user_by_name() {
        let (status, json) = get_json("/api/snowflake-users/by-name/VMAMIDI").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "sfu-vmamidi");

        let (status, _) = get_json("/api/snowflake-users/by-name/NOBODY").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_analytics_endpoints() {
        let (status, json) = get_json("/api/user-analytics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);

        let (status, json) = get_json("/api/user-analytics/sfu-amitp").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalQueries"], 3247);

        let (status, json) = get_json("/api/user-analytics/sfu-dev-user").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "User analytics not found");
    }

    #[tokio::test]
    async fn test_user_activities_filters() {
        let (_, all) = get_json("/api/user-activities").await;
        assert_eq!(all.as_array().unwrap().len(), 4);

        let (_, json) = get_json("/api/user-activities?userId=sfu-amitp&sessionType=session").await;
        assert_eq!(ids_of(&json), vec!["act-0001"]);

        let (_, json) = get_json("/api/user-activities?userId=nobody").await;
        assert!(json.as_array().unwrap().is_empty());

        let (_, json) = get_json("/api/user-activities?sessionType=daily").await;
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_activities_ignores_empty_and_unknown_params() {
        let (_, json) = get_json("/api/user-activities?userId=&sessionType=bogus&extra=1").await;
        assert_eq!(json.as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_first_value_skips_empty_and_takes_first() {
        let pairs = vec![
            ("userId".to_string(), String::new()),
            ("userId".to_string(), "a".to_string()),
            ("userId".to_string(), "b".to_string()),
        ];
        assert_eq!(first_value(&pairs, "userId"), Some("a".to_string()));
        assert_eq!(first_value(&pairs, "sessionType"), None);
    }

    #[tokio::test]
    async fn test_repeated_params_use_first_value() {
        let (status, json) =
            get_json("/api/user-activities?userId=sfu-amitp&userId=sfu-api-user").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids_of(&json), vec!["act-0001"]);

        let (status, json) =
            get_json("/api/expensive-queries?groupingType=query_hash&groupingType=user_role")
                .await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["groupingType"] == "query_hash"));

        let (status, json) =
            get_json("/api/object-usage?operationType=bogus&operationType=DELETE").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_odd_query_strings_are_not_rejected() {
        for uri in [
            "/api/user-activities?userId",
            "/api/user-activities?&&=&userId=",
            "/api/expensive-queries?groupingType&groupingType=",
        ] {
            let (status, json) = get_json(uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(json.is_array(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_expensive_queries_grouping_filter() {
        let (_, all) = get_json("/api/expensive-queries").await;
        assert_eq!(all.as_array().unwrap().len(), 6);

        let (status, json) = get_json("/api/expensive-queries?groupingType=query_hash").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["groupingType"] == "query_hash"));

        let (_, json) = get_json("/api/expensive-queries?groupingType=nonsense").await;
        assert_eq!(json.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_object_usage_operation_filter() {
        let (_, json) = get_json("/api/object-usage?operationType=READ").await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r["operationType"] == "READ"));

        let (_, json) = get_json("/api/object-usage?operationType=read").await;
        assert_eq!(json.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_lineage_and_access() {
        let (_, json) = get_json("/api/lineage-dependencies/USERS_FACT_TABLE").await;
        assert_eq!(json.as_array().unwrap().len(), 3);

        let (status, json) = get_json("/api/lineage-dependencies/NOPE").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());

        let (_, json) = get_json("/api/user-object-access/USERS_FACT_TABLE").await;
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_summary_endpoint() {
        let (status, json) = get_json("/api/dashboard-summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalUsers"], 7);
        assert_eq!(json["activeUsers"], 6);
        assert_eq!(json["totalCredits"], "792.4");
        assert_eq!(json["totalQueries"], 4811);
        assert_eq!(json["totalDataScanned"], "154.0");
    }

    #[tokio::test]
    async fn test_warehouse_efficiency_endpoints() {
        let (_, idle) = get_json("/api/warehouse-efficiency/idle").await;
        assert_eq!(idle.as_array().unwrap().len(), 5);

        let (_, advice) = get_json("/api/warehouse-efficiency/over-provisioning").await;
        let adhoc = advice
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["name"] == "WH_ADHOC")
            .unwrap();
        assert_eq!(adhoc["recommendation"], "investigate_queuing");

        let (_, unused) = get_json("/api/warehouse-efficiency/unused").await;
        let flagged: Vec<_> = unused
            .as_array()
            .unwrap()
            .iter()
            .filter(|w| w["unused"] == true)
            .map(|w| w["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(flagged, vec!["WH_UNUSED"]);
    }

    #[tokio::test]
    async fn test_rbac_endpoints() {
        let (_, orphaned) = get_json("/api/rbac/orphaned-roles").await;
        assert_eq!(orphaned.as_array().unwrap().len(), 8);

        let (_, roles) = get_json("/api/rbac/high-risk-roles").await;
        assert_eq!(roles.as_array().unwrap().len(), 5);
        assert!(roles.as_array().unwrap().contains(&serde_json::json!("ORGADMIN")));

        let (_, privileges) = get_json("/api/rbac/high-risk-roles/ORGADMIN").await;
        assert_eq!(privileges.as_array().unwrap().len(), 6);

        let (status, privileges) = get_json("/api/rbac/high-risk-roles/SYSADMIN").await;
        assert_eq!(status, StatusCode::OK);
        assert!(privileges.as_array().unwrap().is_empty());

        let (status, _) = get_json("/api/rbac/high-risk-roles/PUBLIC").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_api_route_is_404() {
        let (status, _) = get_json("/api/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_web_server_router_with_cors() {
        let config = WebConfig {
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            ..WebConfig::default()
        };
        let server = WebServer::new(SnowStore::open_builtin(), config);
        let request = Request::builder()
            .uri("/api/health")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
