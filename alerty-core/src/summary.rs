//! # Dashboard summaries — counts and monthly series
//!
//! Pure derived-state computation over a fetched alert list: headline counts
//! for the dashboard cards and a zero-filled monthly series for the charts.
//! Buckets use the same fixed Lima offset as the shift matcher so a 23:30
//! local alert lands in its local month, not the UTC one.

use crate::types::Alert;
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Headline dashboard counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertCounts {
    pub total: u64,
    pub unacknowledged: u64,
    pub unreviewed: u64,
    pub by_severity: HashMap<String, u64>,
}

impl AlertCounts {
    pub fn compute(alerts: &[Alert]) -> Self {
        let mut counts = AlertCounts::default();
        for alert in alerts {
            counts.total += 1;
            if !alert.acknowledged {
                counts.unacknowledged += 1;
            }
            if !alert.reviewed {
                counts.unreviewed += 1;
            }
            *counts
                .by_severity
                .entry(alert.severity.label().to_string())
                .or_insert(0) += 1;
        }
        counts
    }
}

/// One month of the chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    pub count: u64,
}

/// Step a (year, month) pair back by one calendar month.
fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Group alerts into the last `months` calendar months (Lima local),
/// zero-filled, oldest first, ending at `now`'s month. Alerts without a
/// parseable timestamp are skipped here; they still appear in the counts.
pub fn monthly_series(alerts: &[Alert], months: usize, now: DateTime<Utc>) -> Vec<MonthBucket> {
    if months == 0 {
        return Vec::new();
    }
    let lima = FixedOffset::east_opt(crate::LIMA_UTC_OFFSET_SECS).expect("fixed offset in range");
    let local_now = now.with_timezone(&lima);

    let mut buckets = Vec::with_capacity(months);
    let (mut y, mut m) = (local_now.year(), local_now.month());
    for _ in 0..months {
        buckets.push(MonthBucket {
            year: y,
            month: m,
            count: 0,
        });
        (y, m) = prev_month(y, m);
    }
    buckets.reverse();

    let mut index: HashMap<(i32, u32), usize> = HashMap::with_capacity(months);
    for (i, b) in buckets.iter().enumerate() {
        index.insert((b.year, b.month), i);
    }

    for alert in alerts {
        let Some(at) = alert.event_time else { continue };
        let local = at.with_timezone(&lima);
        if let Some(&i) = index.get(&(local.year(), local.month())) {
            buckets[i].count += 1;
        }
    }
    buckets
}
