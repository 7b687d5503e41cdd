//! Pure reshaping of raw vendor records into the tool-facing form.
//!
//! Each collection has its own rules: the sleep collection is fully remapped
//! with durations and bedtimes rendered human-readable, the daily summaries
//! are passed through with internal fields stripped.

use crate::Endpoint;
use serde_json::{Map, Value};

/// Duration fields on a sleep record, all in seconds.
const SLEEP_DURATION_FIELDS: [&str; 6] = [
    "awake_time",
    "deep_sleep_duration",
    "light_sleep_duration",
    "rem_sleep_duration",
    "total_sleep_duration",
    "time_in_bed",
];

/// Fields copied from a sleep record as-is.
const SLEEP_PASSTHROUGH_FIELDS: [&str; 7] = [
    "efficiency",
    "latency",
    "restless_periods",
    "average_breath",
    "average_heart_rate",
    "average_hrv",
    "lowest_heart_rate",
];

/// Format a duration in seconds to a human-readable string, e.g.
/// "7 hours, 30 minutes, 15 seconds". Zero components are omitted; an
/// all-zero duration renders as "0 seconds".
pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(pluralize(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(pluralize(minutes, "minute"));
    }
    if secs > 0 {
        parts.push(pluralize(secs, "second"));
    }

    if parts.is_empty() {
        return "0 seconds".to_string();
    }
    parts.join(", ")
}

fn pluralize(n: i64, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format an ISO-8601 timestamp as a zero-padded 12-hour clock time, e.g.
/// "10:30 PM". A trailing `Z` is treated as UTC. Unparseable input is
/// returned unchanged; empty input stays empty.
pub fn format_time(timestamp: &str) -> String {
    if timestamp.is_empty() {
        return String::new();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%I:%M %p").to_string();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return ndt.format("%I:%M %p").to_string();
    }
    timestamp.to_string()
}

/// Apply the per-collection reshaping rules to a raw record array.
pub fn reshape(endpoint: Endpoint, records: &[Value]) -> Vec<Value> {
    records
        .iter()
        .map(|record| reshape_record(endpoint, record))
        .collect()
}

fn reshape_record(endpoint: Endpoint, record: &Value) -> Value {
    let Some(obj) = record.as_object() else {
        return record.clone();
    };
    match endpoint {
        Endpoint::Sleep => remap_sleep(obj),
        Endpoint::DailySleep => {
            let mut out = strip_keys(obj, |k| k == "id");
            if let Some(seconds) = out.get("total_sleep_duration").and_then(Value::as_i64) {
                out.insert(
                    "total_sleep_duration".to_string(),
                    Value::String(format_duration(seconds)),
                );
            }
            Value::Object(out)
        }
        Endpoint::DailyReadiness => Value::Object(strip_keys(obj, |k| {
            k == "id" || k == "timestamp" || k.ends_with("_timestamp")
        })),
        Endpoint::DailyResilience => Value::Object(strip_keys(obj, |k| k == "id")),
    }
}

fn strip_keys(obj: &Map<String, Value>, drop: impl Fn(&str) -> bool) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !drop(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Full remap of a sleep record. Every mapped key is emitted; fields the
/// vendor omitted come through as null, durations as 0 and bedtimes as "".
fn remap_sleep(obj: &Map<String, Value>) -> Value {
    let mut out = Map::new();

    out.insert(
        "day".to_string(),
        obj.get("day").cloned().unwrap_or(Value::Null),
    );
    for field in ["bedtime_start", "bedtime_end"] {
        let raw = obj.get(field).and_then(Value::as_str).unwrap_or("");
        out.insert(field.to_string(), Value::String(format_time(raw)));
    }
    for field in SLEEP_DURATION_FIELDS {
        let seconds = obj.get(field).and_then(Value::as_i64).unwrap_or(0);
        out.insert(field.to_string(), Value::String(format_duration(seconds)));
    }
    for field in SLEEP_PASSTHROUGH_FIELDS {
        out.insert(
            field.to_string(),
            obj.get(field).cloned().unwrap_or(Value::Null),
        );
    }

    // Hoist the nested readiness summary when one is present with a score.
    if let Some(readiness) = obj.get("readiness").and_then(Value::as_object) {
        if let Some(score) = readiness.get("score").filter(|v| !v.is_null()) {
            out.insert("readiness_score".to_string(), score.clone());
            out.insert(
                "readiness_contributors".to_string(),
                readiness
                    .get("contributors")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            );
        }
    }

    Value::Object(out)
}
