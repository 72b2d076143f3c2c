//! # Dashboard API — the Alerty HTTP surface
//!
//! Serves the alert feed, dashboard summaries and resource lists as JSON.
//! The backend stays authoritative for everything; this layer fetches,
//! caches briefly, derives summary state and applies the shift matcher.

use alerty_core::shift_match;
use alerty_core::summary::{monthly_series, AlertCounts};
use alerty_core::types::{Alert, Shift};
use alerty_core::{AlertyError, AlertyResult};
use alerty_client::cache::FreshCache;
use alerty_client::BackendClient;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Months shown on the dashboard chart.
const CHART_MONTHS: usize = 12;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<BackendClient>,
    pub alerts_cache: Arc<FreshCache<Vec<Alert>>>,
    pub shifts_cache: Arc<FreshCache<Vec<Shift>>>,
    pub start_time: i64,
}

impl AppState {
    pub fn new(client: Arc<BackendClient>, cache_ttl: std::time::Duration) -> Self {
        Self {
            client,
            alerts_cache: Arc::new(FreshCache::new(cache_ttl)),
            shifts_cache: Arc::new(FreshCache::new(cache_ttl)),
            start_time: chrono::Utc::now().timestamp(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/status", get(api_status))
        .route("/api/login", post(api_login))
        .route("/api/logout", post(api_logout))
        .route("/api/alerts", get(api_alerts))
        .route("/api/alerts/{id}/ack", post(api_acknowledge))
        .route("/api/alerts/{id}/review", post(api_review))
        .route("/api/summary", get(api_summary))
        .route("/api/summary/monthly", get(api_summary_monthly))
        .route("/api/shifts", get(api_shifts))
        .route("/api/shifts/{id}/alerts", get(api_shift_alerts))
        .route("/api/companies", get(api_companies))
        .route("/api/fleets", get(api_fleets))
        .route("/api/users", get(api_users))
        .route("/api/notification-groups", get(api_notification_groups))
        .with_state(state)
}

/// Start the HTTP service.
pub async fn start_server(state: AppState, bind_addr: &str) -> AlertyResult<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "Alerty service started");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Map client errors onto HTTP responses for the UI.
fn error_status(err: &AlertyError) -> StatusCode {
    match err {
        AlertyError::NoSession | AlertyError::SessionExpired => StatusCode::UNAUTHORIZED,
        AlertyError::Backend { .. } | AlertyError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: AlertyError) -> (StatusCode, Json<serde_json::Value>) {
    (
        error_status(&err),
        Json(serde_json::json!({"error": err.to_string()})),
    )
}

type ApiResult = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

/// Alerts for the session's company, served from cache while fresh.
async fn fetch_alerts(state: &AppState) -> AlertyResult<Vec<Alert>> {
    if let Some(alerts) = state.alerts_cache.get() {
        return Ok(alerts);
    }
    let alerts = state.client.list_alerts(None).await?;
    state.alerts_cache.put(alerts.clone());
    Ok(alerts)
}

async fn fetch_shifts(state: &AppState) -> AlertyResult<Vec<Shift>> {
    if let Some(shifts) = state.shifts_cache.get() {
        return Ok(shifts);
    }
    let shifts = state.client.list_shifts().await?;
    state.shifts_cache.put(shifts.clone());
    Ok(shifts)
}

/// The shift view of the feed: only this shift's vehicles, inside its
/// time window (fail-open per the matcher's rules).
pub fn filter_alerts_for_shift(alerts: &[Alert], shift: &Shift) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|a| shift_match::alert_matches_shift(a, shift))
        .cloned()
        .collect()
}

// ── API Handlers ─────────────────────────────────────────────────────────

async fn api_health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"healthy": true})))
}

async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = chrono::Utc::now().timestamp() - state.start_time;
    Json(serde_json::json!({
        "status": "running",
        "uptime_secs": uptime,
        "logged_in": state.client.sessions().is_logged_in(),
        "backend_requests": state.client.total_requests(),
        "backend_errors": state.client.total_errors(),
        "cache_hits": state.alerts_cache.hits() + state.shifts_cache.hits(),
        "cache_misses": state.alerts_cache.misses() + state.shifts_cache.misses(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    dni: String,
    password: String,
}

async fn api_login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult {
    let session = state
        .client
        .login(&req.dni, &req.password)
        .await
        .map_err(error_response)?;
    Ok(Json(serde_json::json!({
        "username": session.username,
        "role": format!("{:?}", session.role),
        "companyId": session.company_id,
    })))
}

async fn api_logout(State(state): State<AppState>) -> impl IntoResponse {
    state.client.logout();
    state.alerts_cache.invalidate();
    state.shifts_cache.invalidate();
    Json(serde_json::json!({"loggedOut": true}))
}

async fn api_alerts(State(state): State<AppState>) -> ApiResult {
    let alerts = fetch_alerts(&state).await.map_err(error_response)?;
    Ok(Json(serde_json::json!({"data": alerts})))
}

async fn api_acknowledge(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state
        .client
        .acknowledge_alert(&id)
        .await
        .map_err(error_response)?;
    state.alerts_cache.invalidate();
    Ok(Json(serde_json::json!({"acknowledged": id})))
}

async fn api_review(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state.client.review_alert(&id).await.map_err(error_response)?;
    state.alerts_cache.invalidate();
    Ok(Json(serde_json::json!({"reviewed": id})))
}

async fn api_summary(State(state): State<AppState>) -> ApiResult {
    let alerts = fetch_alerts(&state).await.map_err(error_response)?;
    let counts = AlertCounts::compute(&alerts);
    Ok(Json(serde_json::to_value(counts).map_err(|e| error_response(e.into()))?))
}

async fn api_summary_monthly(State(state): State<AppState>) -> ApiResult {
    let alerts = fetch_alerts(&state).await.map_err(error_response)?;
    let series = monthly_series(&alerts, CHART_MONTHS, chrono::Utc::now());
    Ok(Json(serde_json::json!({"months": series})))
}

async fn api_shifts(State(state): State<AppState>) -> ApiResult {
    let shifts = fetch_shifts(&state).await.map_err(error_response)?;
    Ok(Json(serde_json::json!({"data": shifts})))
}

async fn api_shift_alerts(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let shifts = fetch_shifts(&state).await.map_err(error_response)?;
    let shift = shifts.iter().find(|s| s.id == id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("Shift '{id}' not found")})),
        )
    })?;
    let alerts = fetch_alerts(&state).await.map_err(error_response)?;
    let matched = filter_alerts_for_shift(&alerts, shift);
    info!(shift = %shift.name, matched = matched.len(), total = alerts.len(), "Shift filter applied");
    Ok(Json(serde_json::json!({"shift": shift, "data": matched})))
}

async fn api_companies(State(state): State<AppState>) -> ApiResult {
    let companies = state.client.list_companies().await.map_err(error_response)?;
    Ok(Json(serde_json::json!({"data": companies})))
}

async fn api_fleets(State(state): State<AppState>) -> ApiResult {
    let fleets = state.client.list_fleets().await.map_err(error_response)?;
    Ok(Json(serde_json::json!({"data": fleets})))
}

async fn api_users(State(state): State<AppState>) -> ApiResult {
    let users = state.client.list_users().await.map_err(error_response)?;
    Ok(Json(serde_json::json!({"data": users})))
}

async fn api_notification_groups(State(state): State<AppState>) -> ApiResult {
    let groups = state
        .client
        .list_notification_groups()
        .await
        .map_err(error_response)?;
    Ok(Json(serde_json::json!({"data": groups})))
}
