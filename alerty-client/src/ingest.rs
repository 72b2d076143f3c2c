//! # Ingestion boundary — loose backend JSON to typed records
//!
//! The backend has accumulated alternate key spellings over time (English
//! and Spanish names, camelCase and snake_case, string and numeric ids).
//! Every fallback lookup lives in this module and nowhere else; the rest of
//! the codebase only sees the typed records from `alerty_core::types`.
//! Missing or malformed fields degrade to `None`/defaults, never to an
//! error — these records feed a display layer.

use alerty_core::types::{
    Alert, Company, Fleet, NotificationGroup, Role, Severity, Shift, UserAccount,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// First present key, accepting strings and bare numbers (ids arrive both
/// ways depending on backend version).
fn str_at(v: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match v.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn bool_at(v: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .find_map(|k| v.get(k).and_then(Value::as_bool))
        .unwrap_or(false)
}

/// String list under the first present key; tolerates scalar entries.
fn list_at(v: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        if let Some(arr) = v.get(key).and_then(Value::as_array) {
            return arr
                .iter()
                .filter_map(|e| match e {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
        }
    }
    Vec::new()
}

/// Parse the backend's event timestamps: RFC 3339 first, then the bare
/// `YYYY-MM-DDTHH:MM:SS` form older firmware sends (taken as UTC).
pub fn parse_event_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Records arrive either as a bare array or wrapped in `{"data": [...]}`.
fn records(v: &Value) -> &[Value] {
    v.as_array()
        .or_else(|| v.get("data").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn alert_from_value(v: &Value) -> Option<Alert> {
    let id = str_at(v, &["id", "_id", "alertId"])?;
    let raw_event_time = str_at(v, &["eventTime", "timestamp", "fecha", "date", "createdAt"]);
    let event_time = raw_event_time.as_deref().and_then(parse_event_time);
    Some(Alert {
        id,
        company_id: str_at(v, &["companyId", "company", "empresaId"]),
        plate: str_at(v, &["plate", "placa", "vehiclePlate"]),
        vehicle_code: str_at(v, &["vehicleCode", "codigo", "code"]),
        severity: str_at(v, &["severity", "severidad", "level"])
            .map(|s| Severity::from_label(&s))
            .unwrap_or(Severity::Info),
        event_time,
        raw_event_time,
        acknowledged: bool_at(v, &["acknowledged", "ack", "atendida"]),
        reviewed: bool_at(v, &["reviewed", "revisada"]),
        message: str_at(v, &["message", "mensaje", "description", "html"]).unwrap_or_default(),
    })
}

pub fn shift_from_value(v: &Value) -> Option<Shift> {
    Some(Shift {
        id: str_at(v, &["id", "_id", "shiftId"])?,
        name: str_at(v, &["name", "nombre"]).unwrap_or_default(),
        roster_date: str_at(v, &["rosterDate", "fecha", "date"])
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        responsible_ids: list_at(v, &["responsibleIds", "responsables", "responsible"]),
        plates: list_at(v, &["plates", "placas", "vehicles"]),
        fleet_id: str_at(v, &["fleetId", "flota"]),
    })
}

pub fn company_from_value(v: &Value) -> Option<Company> {
    Some(Company {
        id: str_at(v, &["id", "_id"])?,
        name: str_at(v, &["name", "nombre", "razonSocial"]).unwrap_or_default(),
        ruc: str_at(v, &["ruc"]),
        address: str_at(v, &["address", "direccion"]),
    })
}

pub fn fleet_from_value(v: &Value) -> Option<Fleet> {
    Some(Fleet {
        id: str_at(v, &["id", "_id"])?,
        name: str_at(v, &["name", "nombre"]).unwrap_or_default(),
        company_id: str_at(v, &["companyId", "empresaId"]),
        plates: list_at(v, &["plates", "placas", "vehicles"]),
    })
}

pub fn user_from_value(v: &Value) -> Option<UserAccount> {
    Some(UserAccount {
        id: str_at(v, &["id", "_id", "userId"])?,
        username: str_at(v, &["username", "usuario", "name"]).unwrap_or_default(),
        dni: str_at(v, &["dni", "documento"]),
        role: str_at(v, &["role", "rol"])
            .map(|s| Role::from_label(&s))
            .unwrap_or(Role::Operator),
        company_id: str_at(v, &["companyId", "empresaId"]),
        email: str_at(v, &["email", "correo"]),
    })
}

pub fn group_from_value(v: &Value) -> Option<NotificationGroup> {
    Some(NotificationGroup {
        id: str_at(v, &["id", "_id", "groupId"])?,
        name: str_at(v, &["name", "nombre"]).unwrap_or_default(),
        company_id: str_at(v, &["companyId", "empresaId"]),
        member_ids: list_at(v, &["memberIds", "members", "usuarios"]),
        emails: list_at(v, &["emails", "correos"]),
    })
}

/// The login response: token plus profile fields, keys varying by backend
/// version. Returns the pieces the session object needs.
pub struct LoginRecord {
    pub token: String,
    pub username: String,
    pub dni: Option<String>,
    pub role: Role,
    pub company_id: Option<String>,
    pub user_id: Option<String>,
}

pub fn login_from_value(v: &Value) -> Option<LoginRecord> {
    Some(LoginRecord {
        token: str_at(v, &["token", "accessToken", "jwt"])?,
        username: str_at(v, &["username", "usuario", "name"]).unwrap_or_default(),
        dni: str_at(v, &["dni", "documento"]),
        role: str_at(v, &["role", "rol"])
            .map(|s| Role::from_label(&s))
            .unwrap_or(Role::Operator),
        company_id: str_at(v, &["companyId", "empresaId"]),
        user_id: str_at(v, &["userId", "id", "_id"]),
    })
}

pub fn alerts_from_value(v: &Value) -> Vec<Alert> {
    records(v).iter().filter_map(alert_from_value).collect()
}

pub fn shifts_from_value(v: &Value) -> Vec<Shift> {
    records(v).iter().filter_map(shift_from_value).collect()
}

pub fn companies_from_value(v: &Value) -> Vec<Company> {
    records(v).iter().filter_map(company_from_value).collect()
}

pub fn fleets_from_value(v: &Value) -> Vec<Fleet> {
    records(v).iter().filter_map(fleet_from_value).collect()
}

pub fn users_from_value(v: &Value) -> Vec<UserAccount> {
    records(v).iter().filter_map(user_from_value).collect()
}

pub fn groups_from_value(v: &Value) -> Vec<NotificationGroup> {
    records(v).iter().filter_map(group_from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_spanish_keys_and_numeric_id() {
        let v = json!({
            "_id": 42,
            "placa": "ABC-123",
            "severidad": "alta",
            "fecha": "2024-03-15T13:00:00Z",
            "atendida": true,
            "mensaje": "<b>impacto</b>"
        });
        let alert = alert_from_value(&v).unwrap();
        assert_eq!(alert.id, "42");
        assert_eq!(alert.plate.as_deref(), Some("ABC-123"));
        assert_eq!(alert.severity, Severity::High);
        assert!(alert.acknowledged);
        assert!(!alert.reviewed);
        assert!(alert.event_time.is_some());
        assert_eq!(alert.message, "<b>impacto</b>");
    }

    #[test]
    fn test_alert_bad_timestamp_keeps_raw() {
        let v = json!({"id": "a1", "eventTime": "ayer por la tarde"});
        let alert = alert_from_value(&v).unwrap();
        assert!(alert.event_time.is_none());
        assert_eq!(alert.raw_event_time.as_deref(), Some("ayer por la tarde"));
    }

    #[test]
    fn test_alert_without_id_is_dropped() {
        assert!(alert_from_value(&json!({"placa": "ABC-123"})).is_none());
    }

    #[test]
    fn test_parse_event_time_forms() {
        assert!(parse_event_time("2024-03-15T13:00:00Z").is_some());
        assert!(parse_event_time("2024-03-15T13:00:00-05:00").is_some());
        assert!(parse_event_time("2024-03-15T13:00:00").is_some());
        assert!(parse_event_time("2024-03-15 13:00:00").is_some());
        assert!(parse_event_time("not a date").is_none());
    }

    #[test]
    fn test_shift_with_numeric_plates() {
        let v = json!({
            "id": "s1",
            "nombre": "Turno Mañana",
            "placas": ["ABC-123", 77],
            "rosterDate": "2024-03-15"
        });
        let shift = shift_from_value(&v).unwrap();
        assert_eq!(shift.name, "Turno Mañana");
        assert_eq!(shift.plates, vec!["ABC-123".to_string(), "77".to_string()]);
        assert!(shift.roster_date.is_some());
    }

    #[test]
    fn test_wrapped_and_bare_lists() {
        let bare = json!([{"id": "a1"}, {"id": "a2"}]);
        let wrapped = json!({"data": [{"id": "a1"}]});
        assert_eq!(alerts_from_value(&bare).len(), 2);
        assert_eq!(alerts_from_value(&wrapped).len(), 1);
        assert!(alerts_from_value(&json!("nope")).is_empty());
    }

    #[test]
    fn test_login_record() {
        let v = json!({
            "accessToken": "tok",
            "usuario": "maria",
            "rol": "supervisor",
            "empresaId": 9
        });
        let rec = login_from_value(&v).unwrap();
        assert_eq!(rec.token, "tok");
        assert_eq!(rec.role, Role::Supervisor);
        assert_eq!(rec.company_id.as_deref(), Some("9"));
        assert!(login_from_value(&json!({"usuario": "maria"})).is_none());
    }
}
