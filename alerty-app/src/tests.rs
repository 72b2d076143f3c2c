use crate::dashboard::*;
use alerty_client::{BackendClient, SessionStore};
use alerty_core::config::BackendConfig;
use alerty_core::types::{Alert, Severity, Shift};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::sync::Arc;

fn test_state() -> AppState {
    let cfg = BackendConfig {
        base_url: "http://backend.test".into(),
        timeout_secs: 5,
        session_ttl_secs: 3600,
    };
    let client = BackendClient::new(&cfg, Arc::new(SessionStore::new())).unwrap();
    AppState::new(Arc::new(client), std::time::Duration::from_secs(60))
}

fn lima_time(hh: u32, mm: u32) -> DateTime<Utc> {
    let lima = FixedOffset::east_opt(alerty_core::LIMA_UTC_OFFSET_SECS).unwrap();
    lima.with_ymd_and_hms(2024, 3, 15, hh, mm, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn alert(id: &str, plate: &str, time: Option<DateTime<Utc>>) -> Alert {
    Alert {
        id: id.into(),
        company_id: None,
        plate: Some(plate.into()),
        vehicle_code: None,
        severity: Severity::Medium,
        event_time: time,
        raw_event_time: None,
        acknowledged: false,
        reviewed: false,
        message: String::new(),
    }
}

#[test]
fn test_router_builds() {
    let _router = build_router(test_state());
}

#[test]
fn test_shift_filter_glue() {
    let shift = Shift {
        id: "s1".into(),
        name: "Turno Mañana".into(),
        roster_date: None,
        responsible_ids: vec![],
        plates: vec!["ABC-123".into(), "DEF-456".into()],
        fleet_id: None,
    };
    let alerts = vec![
        alert("in", "abc 123", Some(lima_time(8, 0))),
        alert("late", "abc 123", Some(lima_time(16, 0))),
        alert("other-vehicle", "ZZZ-999", Some(lima_time(8, 0))),
        // No timestamp: included for an assigned vehicle (fail-open).
        alert("no-time", "DEF456", None),
    ];
    let matched = filter_alerts_for_shift(&alerts, &shift);
    let ids: Vec<&str> = matched.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["in", "no-time"]);
}

#[test]
fn test_fresh_state_counters() {
    let state = test_state();
    assert_eq!(state.client.total_requests(), 0);
    assert!(state.alerts_cache.get().is_none());
    assert_eq!(state.alerts_cache.misses(), 1);
}
