//! Scalar cell values
//!
//! Rows are plain JSON objects; `CellValue` is the typed scalar the condition
//! logic and the sorting comparators operate on. Date, date-time and time
//! values are native `chrono` values after rehydration, never raw strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// A single typed cell or search value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent or null field
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Calendar date, no time component
    Date(NaiveDate),
    /// Date with time, second precision is significant
    DateTime(NaiveDateTime),
    /// Time of day, no date component
    Time(NaiveTime),
    /// Set of values, used by the membership conditions
    List(Vec<CellValue>),
}

fn iso_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$")
            .unwrap()
    })
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").unwrap())
}

/// Returns true if the string has an ISO-8601 date or date-time shape.
pub fn looks_like_iso_date(s: &str) -> bool {
    iso_date_regex().is_match(s)
}

/// Returns true if the string has a plain HH:MM[:SS] shape.
pub fn looks_like_time(s: &str) -> bool {
    time_regex().is_match(s)
}

/// Parses an ISO-8601 string into a calendar date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    parse_iso_datetime(s)
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Parses an ISO-8601 string into a naive date-time.
///
/// Zone-annotated strings are normalized to UTC before the zone is dropped.
pub fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses a time-of-day string, accepting HH:MM[:SS] and full ISO stamps.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .or_else(|| parse_iso_datetime(s).map(|dt| dt.time()))
}

impl CellValue {
    /// Converts a plain JSON value.
    ///
    /// Strings stay strings here; date coercion is a rehydration decision,
    /// not a parsing one.
    pub fn from_json(value: &Value) -> CellValue {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => CellValue::String(s.clone()),
            Value::Array(items) => {
                CellValue::List(items.iter().map(CellValue::from_json).collect())
            }
            // Nested objects are not scalar; treated as absent.
            Value::Object(_) => CellValue::Null,
        }
    }

    /// Converts back to plain JSON. Dates serialize as ISO-8601 strings.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::String(s) => Value::String(s.clone()),
            CellValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            CellValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            CellValue::Time(t) => Value::String(t.format("%H:%M:%S").to_string()),
            CellValue::List(items) => Value::Array(items.iter().map(CellValue::to_json).collect()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Calendar date view: accepts Date, DateTime, and ISO strings.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::String(s) => parse_iso_date(s),
            _ => None,
        }
    }

    /// Date-time view: accepts DateTime, Date (midnight), and ISO strings.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Date(d) => d.and_hms_opt(0, 0, 0),
            CellValue::String(s) => parse_iso_datetime(s),
            _ => None,
        }
    }

    /// Time-of-day view: accepts Time, DateTime, and time strings.
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            CellValue::Time(t) => Some(*t),
            CellValue::DateTime(dt) => Some(dt.time()),
            CellValue::String(s) => parse_time(s),
            _ => None,
        }
    }

    /// Lower-cases textual values, passes everything else through.
    pub fn to_lowercase_if_text(self) -> CellValue {
        match self {
            CellValue::String(s) => CellValue::String(s.to_lowercase()),
            other => other,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Number(_) => 2,
            CellValue::String(_) => 3,
            CellValue::Date(_) => 4,
            CellValue::DateTime(_) => 5,
            CellValue::Time(_) => 6,
            CellValue::List(_) => 7,
        }
    }

    /// Total ordering across cell values.
    ///
    /// Same-type values compare naturally; mixed types compare by a fixed
    /// type rank so sorting stays deterministic on heterogeneous columns.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        let (ra, rb) = (self.type_rank(), other.type_rank());
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            (CellValue::Time(a), CellValue::Time(b)) => a.cmp(b),
            (CellValue::List(a), CellValue::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.compare(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => Ordering::Equal,
        }
    }

    /// Canonical string form used as a grouping bucket key.
    pub fn bucket_key(&self) -> String {
        self.to_json().to_string()
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::Time(t)
    }
}

/// Resolves a field from a row record.
///
/// A missing field resolves to null, never an error. When `is_date` or
/// `is_time` is set, ISO string cells are parsed into native values so date
/// columns persisted as strings still compare chronologically.
pub fn resolve_field_value(row: &Value, field: &str, is_date: bool, is_time: bool) -> CellValue {
    let raw = match row.get(field) {
        Some(v) => CellValue::from_json(v),
        None => return CellValue::Null,
    };
    if is_date {
        if let CellValue::String(ref s) = raw {
            if let Some(dt) = parse_iso_datetime(s) {
                return CellValue::DateTime(dt);
            }
        }
    }
    if is_time {
        if let CellValue::String(ref s) = raw {
            if let Some(t) = parse_time(s) {
                return CellValue::Time(t);
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iso_shapes() {
        assert!(looks_like_iso_date("2024-03-01"));
        assert!(looks_like_iso_date("2024-03-01T10:30:00"));
        assert!(looks_like_iso_date("2024-03-01T10:30:00.123Z"));
        assert!(!looks_like_iso_date("not a date"));
        assert!(!looks_like_iso_date("123"));
        assert!(looks_like_time("18:30:00"));
        assert!(looks_like_time("8:05"));
        assert!(!looks_like_time("2024-03-01"));
    }

    #[test]
    fn test_parse_datetime_normalizes_zone() {
        let dt = parse_iso_datetime("2024-03-01T10:30:00Z").unwrap();
        assert_eq!(dt, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(
            parse_iso_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_time_variants() {
        let t = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        assert_eq!(parse_time("18:30:00"), Some(t));
        assert_eq!(parse_time("18:30"), Some(t));
        assert_eq!(parse_time("2024-03-01T18:30:00"), Some(t));
    }

    #[test]
    fn test_json_round_trip() {
        let date = CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(date.to_json(), json!("2024-03-01"));
        assert_eq!(CellValue::from_json(&json!(2.5)), CellValue::Number(2.5));
        assert_eq!(CellValue::from_json(&json!(null)), CellValue::Null);
        assert_eq!(
            CellValue::from_json(&json!([1, 2])),
            CellValue::List(vec![CellValue::Number(1.0), CellValue::Number(2.0)])
        );
    }

    #[test]
    fn test_compare_same_type() {
        assert_eq!(
            CellValue::Number(1.0).compare(&CellValue::Number(2.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::String("b".into()).compare(&CellValue::String("a".into())),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_mixed_types_by_rank() {
        assert_eq!(
            CellValue::Bool(true).compare(&CellValue::Number(0.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Null.compare(&CellValue::Bool(false)),
            Ordering::Less
        );
    }

    #[test]
    fn test_resolve_field_missing_is_null() {
        let row = json!({"name": "Alice"});
        assert_eq!(resolve_field_value(&row, "age", false, false), CellValue::Null);
    }

    #[test]
    fn test_resolve_field_date_coercion() {
        let row = json!({"created": "2024-03-01T10:30:00"});
        let v = resolve_field_value(&row, "created", true, false);
        assert!(matches!(v, CellValue::DateTime(_)));
    }

    #[test]
    fn test_resolve_field_time_coercion() {
        let row = json!({"at": "18:30:00"});
        let v = resolve_field_value(&row, "at", false, true);
        assert_eq!(v, CellValue::Time(NaiveTime::from_hms_opt(18, 30, 0).unwrap()));
    }
}
