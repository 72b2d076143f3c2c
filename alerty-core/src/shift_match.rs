//! # Shift matcher — Does an alert belong to an operational shift?
//!
//! Shifts are free-text records ("Turno Mañana", "Turno Madrugada Especial")
//! with an assigned set of vehicle plates. An alert belongs to a shift when
//! its vehicle is one of the shift's plates AND its event time falls inside
//! the window implied by the shift name.
//!
//! The matcher is deliberately fail-open: a shift name with no recognizable
//! keyword, or an alert with no parseable timestamp, never hides the alert.
//! Filtering is a display aid; silently dropping data on unconventional
//! naming would be worse than showing an out-of-window alert.
//!
//! Everything here is pure and side-effect-free; it is re-evaluated on every
//! filter change.

use crate::types::{Alert, Shift};
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use std::collections::HashSet;

/// Minutes in a day.
const DAY_MINUTES: u16 = 24 * 60;

/// The three recognized shift kinds and their local operating windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    /// 07:00–15:00 local.
    Morning,
    /// 15:00–23:00 local.
    Afternoon,
    /// 23:00–07:00 local, crosses midnight.
    Graveyard,
}

impl ShiftKind {
    /// Operating window as half-open `[start, end)` minutes-of-day.
    pub fn window(&self) -> (u16, u16) {
        match self {
            ShiftKind::Morning => (7 * 60, 15 * 60),
            ShiftKind::Afternoon => (15 * 60, 23 * 60),
            ShiftKind::Graveyard => (23 * 60, 7 * 60),
        }
    }
}

/// Uppercase a free-text label and fold Spanish diacritics to plain ASCII,
/// so "mañana" and "MAÑANA" and "Manana" all classify alike.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .flat_map(char::to_uppercase)
        .map(|c| match c {
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' => 'O',
            'Ú' | 'Ü' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Classify a shift name by keyword containment. Substring-based on purpose:
/// "Turno Mañana Especial" is still a morning shift.
pub fn classify_shift(name: &str) -> Option<ShiftKind> {
    let normalized = normalize_label(name);
    if normalized.contains("MANANA") {
        Some(ShiftKind::Morning)
    } else if normalized.contains("TARDE") {
        Some(ShiftKind::Afternoon)
    } else if normalized.contains("MADRUGADA") {
        Some(ShiftKind::Graveyard)
    } else {
        None
    }
}

/// Minutes-of-day for a timestamp at the fixed America/Lima offset.
pub fn local_minutes(at: &DateTime<Utc>) -> u16 {
    // east_opt only fails for offsets beyond ±24h.
    let lima = FixedOffset::east_opt(crate::LIMA_UTC_OFFSET_SECS).expect("fixed offset in range");
    let local = at.with_timezone(&lima);
    (local.hour() * 60 + local.minute()) as u16 % DAY_MINUTES
}

/// Half-open window membership. A window with equal endpoints covers the
/// whole day; one with `start > end` wraps past midnight.
pub fn window_contains(start: u16, end: u16, t: u16) -> bool {
    if start == end {
        true
    } else if start < end {
        start <= t && t < end
    } else {
        t >= start || t < end
    }
}

/// Time-window half of the match. Fail-open: an unclassifiable shift name or
/// a missing event time includes the alert.
pub fn shift_includes_time(shift_name: &str, event_time: Option<&DateTime<Utc>>) -> bool {
    let kind = match classify_shift(shift_name) {
        Some(k) => k,
        None => return true,
    };
    let at = match event_time {
        Some(t) => t,
        None => return true,
    };
    let (start, end) = kind.window();
    window_contains(start, end, local_minutes(at))
}

/// Canonical plate form: uppercase, alphanumerics only. "ABC-123",
/// "abc 123" and "ABC123" are the same vehicle.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Normalized plate set for a shift's assigned vehicles.
pub fn plate_set(plates: &[String]) -> HashSet<String> {
    plates
        .iter()
        .map(|p| normalize_plate(p))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Plate half of the match: at least one of the alert's plate/code fields
/// must be among the shift's assigned vehicles.
pub fn plate_matches(candidates: &[&str], shift_plates: &HashSet<String>) -> bool {
    candidates
        .iter()
        .map(|c| normalize_plate(c))
        .filter(|c| !c.is_empty())
        .any(|c| shift_plates.contains(&c))
}

/// Full match: vehicle belongs to the shift AND the event time falls inside
/// the shift's window (subject to the fail-open rules above).
pub fn alert_matches_shift(alert: &Alert, shift: &Shift) -> bool {
    let plates = plate_set(&shift.plates);
    plate_matches(&alert.plate_candidates(), &plates)
        && shift_includes_time(&shift.name, alert.event_time.as_ref())
}
