//! Shared record types for the Alerty monitoring layer.
//!
//! The backend owns every record here; these structs are transient copies
//! fetched per view. Fields the backend may omit or leave null are `Option`
//! — all leniency toward the backend's loose JSON lives in the ingestion
//! boundary (`alerty-client::ingest`), not in field lookups scattered
//! through display code.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Alert severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a backend severity label to a level. Unknown labels rank lowest
    /// rather than erroring; the backend vocabulary has drifted over time.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" | "critico" | "crítico" => Severity::Critical,
            "high" | "alto" | "alta" => Severity::High,
            "medium" | "medio" | "media" => Severity::Medium,
            "low" | "bajo" | "baja" => Severity::Low,
            _ => Severity::Info,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A safety event reported by a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub company_id: Option<String>,
    /// Vehicle plate as reported by the device.
    pub plate: Option<String>,
    /// Secondary vehicle identifier some devices report instead of a plate.
    pub vehicle_code: Option<String>,
    pub severity: Severity,
    /// Parsed event time; `None` when the backend timestamp was absent or
    /// unparseable (the raw string is kept for display).
    pub event_time: Option<DateTime<Utc>>,
    pub raw_event_time: Option<String>,
    pub acknowledged: bool,
    pub reviewed: bool,
    /// Free-text/HTML payload from the device.
    pub message: String,
}

impl Alert {
    /// The alert's plate/code fields, in the order the matcher tries them.
    pub fn plate_candidates(&self) -> Vec<&str> {
        self.plate
            .iter()
            .chain(self.vehicle_code.iter())
            .map(|s| s.as_str())
            .collect()
    }
}

/// A named work period with assigned vehicles and responsible staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    /// Free text; a time window is inferred from keywords in the name.
    pub name: String,
    pub roster_date: Option<NaiveDate>,
    pub responsible_ids: Vec<String>,
    pub plates: Vec<String>,
    pub fleet_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub ruc: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub id: String,
    pub name: String,
    pub company_id: Option<String>,
    pub plates: Vec<String>,
}

/// Account role as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Supervisor,
    Operator,
}

impl Role {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "admin" | "administrator" | "administrador" => Role::Admin,
            "supervisor" => Role::Supervisor,
            _ => Role::Operator,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    /// National identity document number, the backend's login key.
    pub dni: Option<String>,
    pub role: Role,
    pub company_id: Option<String>,
    pub email: Option<String>,
}

/// A distribution list for alert notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationGroup {
    pub id: String,
    pub name: String,
    pub company_id: Option<String>,
    pub member_ids: Vec<String>,
    pub emails: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label("Alta"), Severity::High);
        assert_eq!(Severity::from_label("medio"), Severity::Medium);
        assert_eq!(Severity::from_label("something-new"), Severity::Info);
        assert!(Severity::Critical > Severity::Low);
    }

    #[test]
    fn test_plate_candidates_order() {
        let alert = Alert {
            id: "a1".into(),
            company_id: None,
            plate: Some("ABC-123".into()),
            vehicle_code: Some("FORK-07".into()),
            severity: Severity::Low,
            event_time: None,
            raw_event_time: None,
            acknowledged: false,
            reviewed: false,
            message: String::new(),
        };
        assert_eq!(alert.plate_candidates(), vec!["ABC-123", "FORK-07"]);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::from_label("Administrador"), Role::Admin);
        assert_eq!(Role::from_label("driver"), Role::Operator);
    }
}
