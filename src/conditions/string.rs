//! String condition table
//!
//! Null targets and search values compare as the empty string, so persisted
//! filters never fail on sparse columns.

use super::FilteringOperation;
use crate::value::CellValue;

fn text(v: &CellValue, ignore_case: bool) -> String {
    let s = match v {
        CellValue::Null => String::new(),
        CellValue::String(s) => s.clone(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Number(n) => n.to_string(),
        other => match other.to_json() {
            serde_json::Value::String(s) => s,
            v => v.to_string(),
        },
    };
    if ignore_case {
        s.to_lowercase()
    } else {
        s
    }
}

pub(super) fn operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("contains", false, |target, search, ic| {
            text(target, ic).contains(&text(search, ic))
        }),
        FilteringOperation::new("doesNotContain", false, |target, search, ic| {
            !text(target, ic).contains(&text(search, ic))
        }),
        FilteringOperation::new("startsWith", false, |target, search, ic| {
            text(target, ic).starts_with(&text(search, ic))
        }),
        FilteringOperation::new("endsWith", false, |target, search, ic| {
            text(target, ic).ends_with(&text(search, ic))
        }),
        FilteringOperation::new("equals", false, |target, search, ic| {
            text(target, ic) == text(search, ic)
        }),
        FilteringOperation::new("doesNotEqual", false, |target, search, ic| {
            text(target, ic) != text(search, ic)
        }),
        FilteringOperation::new("empty", true, |target, _, _| match target {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }),
        FilteringOperation::new("notEmpty", true, |target, _, _| match target {
            CellValue::Null => false,
            CellValue::String(s) => !s.is_empty(),
            _ => true,
        }),
    ]
}
