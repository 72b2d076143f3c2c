//! # BackendClient — typed REST operations against the Alerty backend
//!
//! One reqwest client for the whole service. Every protected request is
//! signed with the session's bearer token; stale sessions are cleared before
//! signing so an expired login surfaces as `NoSession` instead of a 401
//! round-trip. Request/error counters and per-call tracing mirror how the
//! rest of the service reports itself.

use crate::ingest;
use crate::session::{Session, SessionStore};
use alerty_core::config::BackendConfig;
use alerty_core::types::{Alert, Company, Fleet, NotificationGroup, Shift, UserAccount};
use alerty_core::{AlertyError, AlertyResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session_ttl_secs: i64,
    sessions: Arc<SessionStore>,
    total_requests: AtomicU64,
    total_errors: AtomicU64,
}

impl BackendClient {
    pub fn new(cfg: &BackendConfig, sessions: Arc<SessionStore>) -> AlertyResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent("Alerty/0.1")
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            session_ttl_secs: cfg.session_ttl_secs,
            sessions,
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Token for the next request, clearing the session first if stale.
    fn signing_token(&self) -> AlertyResult<String> {
        let now = chrono::Utc::now().timestamp();
        if self.sessions.expire_if_stale(self.session_ttl_secs, now) {
            warn!("Session expired, cleared");
            return Err(AlertyError::SessionExpired);
        }
        self.sessions.bearer_token().ok_or(AlertyError::NoSession)
    }

    fn fail(&self, err: AlertyError) -> AlertyError {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
        err
    }

    async fn read_checked(&self, resp: reqwest::Response, endpoint: &str) -> AlertyResult<Value> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.fail(AlertyError::Backend {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            }));
        }
        resp.json::<Value>().await.map_err(|e| self.fail(e.into()))
    }

    async fn get_value(&self, path: &str) -> AlertyResult<Value> {
        let token = self.signing_token()?;
        let url = self.endpoint(path);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.fail(e.into()))?;
        self.read_checked(resp, path).await
    }

    async fn send_value(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> AlertyResult<Value> {
        let token = self.signing_token()?;
        let url = self.endpoint(path);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let mut req = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| self.fail(e.into()))?;
        self.read_checked(resp, path).await
    }

    // ── Authentication ───────────────────────────────────────────────────

    /// Log in with a DNI + password, establishing the session on success.
    pub async fn login(&self, dni: &str, password: &str) -> AlertyResult<Session> {
        let url = self.endpoint("auth/login");
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({"dni": dni, "password": password}))
            .send()
            .await
            .map_err(|e| self.fail(e.into()))?;
        let body = self.read_checked(resp, "auth/login").await?;

        let rec = ingest::login_from_value(&body)
            .ok_or_else(|| self.fail(AlertyError::Other("Login response had no token".into())))?;
        let session = Session {
            token: rec.token,
            username: rec.username,
            dni: rec.dni,
            role: rec.role,
            company_id: rec.company_id,
            user_id: rec.user_id,
            issued_at: chrono::Utc::now().timestamp(),
        };
        self.sessions.establish(session.clone());
        info!(username = %session.username, "Logged in");
        Ok(session)
    }

    pub fn logout(&self) {
        self.sessions.clear();
        info!("Logged out");
    }

    // ── Alerts ───────────────────────────────────────────────────────────

    /// Alerts for a company, or the session's own company when `None`.
    pub async fn list_alerts(&self, company_id: Option<&str>) -> AlertyResult<Vec<Alert>> {
        let path = match company_id.map(str::to_string).or_else(|| self.sessions.company_id()) {
            Some(id) => format!("companies/{id}/alerts"),
            None => "alerts".to_string(),
        };
        let body = self.get_value(&path).await?;
        let alerts = ingest::alerts_from_value(&body);
        info!(count = alerts.len(), "Fetched alerts");
        Ok(alerts)
    }

    pub async fn acknowledge_alert(&self, alert_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::POST, &format!("alerts/{alert_id}/acknowledge"), None)
            .await?;
        info!(alert = %alert_id, "Alert acknowledged");
        Ok(())
    }

    pub async fn review_alert(&self, alert_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::POST, &format!("alerts/{alert_id}/review"), None)
            .await?;
        info!(alert = %alert_id, "Alert marked reviewed");
        Ok(())
    }

    // ── Shifts ───────────────────────────────────────────────────────────

    pub async fn list_shifts(&self) -> AlertyResult<Vec<Shift>> {
        let body = self.get_value("shifts").await?;
        Ok(ingest::shifts_from_value(&body))
    }

    pub async fn create_shift(&self, shift: &Shift) -> AlertyResult<()> {
        let body = serde_json::to_value(shift)?;
        self.send_value(reqwest::Method::POST, "shifts", Some(&body)).await?;
        Ok(())
    }

    pub async fn update_shift(&self, shift: &Shift) -> AlertyResult<()> {
        let body = serde_json::to_value(shift)?;
        self.send_value(reqwest::Method::PUT, &format!("shifts/{}", shift.id), Some(&body))
            .await?;
        Ok(())
    }

    pub async fn delete_shift(&self, shift_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::DELETE, &format!("shifts/{shift_id}"), None)
            .await?;
        Ok(())
    }

    // ── Companies ────────────────────────────────────────────────────────

    pub async fn list_companies(&self) -> AlertyResult<Vec<Company>> {
        let body = self.get_value("companies").await?;
        Ok(ingest::companies_from_value(&body))
    }

    pub async fn create_company(&self, company: &Company) -> AlertyResult<()> {
        let body = serde_json::to_value(company)?;
        self.send_value(reqwest::Method::POST, "companies", Some(&body)).await?;
        Ok(())
    }

    pub async fn update_company(&self, company: &Company) -> AlertyResult<()> {
        let body = serde_json::to_value(company)?;
        self.send_value(reqwest::Method::PUT, &format!("companies/{}", company.id), Some(&body))
            .await?;
        Ok(())
    }

    pub async fn delete_company(&self, company_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::DELETE, &format!("companies/{company_id}"), None)
            .await?;
        Ok(())
    }

    // ── Fleets ───────────────────────────────────────────────────────────

    pub async fn list_fleets(&self) -> AlertyResult<Vec<Fleet>> {
        let body = self.get_value("fleets").await?;
        Ok(ingest::fleets_from_value(&body))
    }

    pub async fn create_fleet(&self, fleet: &Fleet) -> AlertyResult<()> {
        let body = serde_json::to_value(fleet)?;
        self.send_value(reqwest::Method::POST, "fleets", Some(&body)).await?;
        Ok(())
    }

    pub async fn update_fleet(&self, fleet: &Fleet) -> AlertyResult<()> {
        let body = serde_json::to_value(fleet)?;
        self.send_value(reqwest::Method::PUT, &format!("fleets/{}", fleet.id), Some(&body))
            .await?;
        Ok(())
    }

    pub async fn delete_fleet(&self, fleet_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::DELETE, &format!("fleets/{fleet_id}"), None)
            .await?;
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────────────

    pub async fn list_users(&self) -> AlertyResult<Vec<UserAccount>> {
        let body = self.get_value("users").await?;
        Ok(ingest::users_from_value(&body))
    }

    pub async fn create_user(&self, user: &UserAccount) -> AlertyResult<()> {
        let body = serde_json::to_value(user)?;
        self.send_value(reqwest::Method::POST, "users", Some(&body)).await?;
        Ok(())
    }

    pub async fn update_user(&self, user: &UserAccount) -> AlertyResult<()> {
        let body = serde_json::to_value(user)?;
        self.send_value(reqwest::Method::PUT, &format!("users/{}", user.id), Some(&body))
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::DELETE, &format!("users/{user_id}"), None)
            .await?;
        Ok(())
    }

    // ── Notification groups ──────────────────────────────────────────────

    pub async fn list_notification_groups(&self) -> AlertyResult<Vec<NotificationGroup>> {
        let body = self.get_value("notification-groups").await?;
        Ok(ingest::groups_from_value(&body))
    }

    pub async fn create_notification_group(&self, group: &NotificationGroup) -> AlertyResult<()> {
        let body = serde_json::to_value(group)?;
        self.send_value(reqwest::Method::POST, "notification-groups", Some(&body))
            .await?;
        Ok(())
    }

    pub async fn update_notification_group(&self, group: &NotificationGroup) -> AlertyResult<()> {
        let body = serde_json::to_value(group)?;
        self.send_value(
            reqwest::Method::PUT,
            &format!("notification-groups/{}", group.id),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_notification_group(&self, group_id: &str) -> AlertyResult<()> {
        self.send_value(reqwest::Method::DELETE, &format!("notification-groups/{group_id}"), None)
            .await?;
        Ok(())
    }

    // ── Stats ────────────────────────────────────────────────────────────

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        let cfg = BackendConfig {
            base_url: "http://backend.test/".into(),
            timeout_secs: 5,
            session_ttl_secs: 3600,
        };
        BackendClient::new(&cfg, Arc::new(SessionStore::new())).unwrap()
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let c = client();
        assert_eq!(c.endpoint("alerts"), "http://backend.test/alerts");
        assert_eq!(c.endpoint("/alerts"), "http://backend.test/alerts");
    }

    #[test]
    fn test_signing_requires_session() {
        let c = client();
        assert!(matches!(c.signing_token(), Err(AlertyError::NoSession)));
    }

    #[test]
    fn test_signing_clears_expired_session() {
        let c = client();
        c.sessions().establish(Session {
            token: "tok".into(),
            username: "maria".into(),
            dni: None,
            role: alerty_core::types::Role::Operator,
            company_id: None,
            user_id: None,
            issued_at: 0, // long past the ttl
        });
        assert!(matches!(c.signing_token(), Err(AlertyError::SessionExpired)));
        assert!(!c.sessions().is_logged_in());
    }
}
