//! Numeric condition table

use super::FilteringOperation;
use crate::value::CellValue;

fn both(target: &CellValue, search: &CellValue) -> Option<(f64, f64)> {
    Some((target.as_f64()?, search.as_f64()?))
}

pub(super) fn operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("equals", false, |target, search, _| {
            both(target, search).is_some_and(|(a, b)| a == b)
        }),
        FilteringOperation::new("doesNotEqual", false, |target, search, _| {
            !both(target, search).is_some_and(|(a, b)| a == b)
        }),
        FilteringOperation::new("greaterThan", false, |target, search, _| {
            both(target, search).is_some_and(|(a, b)| a > b)
        }),
        FilteringOperation::new("lessThan", false, |target, search, _| {
            both(target, search).is_some_and(|(a, b)| a < b)
        }),
        FilteringOperation::new("greaterThanOrEqualTo", false, |target, search, _| {
            both(target, search).is_some_and(|(a, b)| a >= b)
        }),
        FilteringOperation::new("lessThanOrEqualTo", false, |target, search, _| {
            both(target, search).is_some_and(|(a, b)| a <= b)
        }),
        FilteringOperation::new("empty", true, |target, _, _| match target {
            CellValue::Null => true,
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }),
        FilteringOperation::new("notEmpty", true, |target, _, _| match target {
            CellValue::Null => false,
            CellValue::Number(n) => !n.is_nan(),
            _ => true,
        }),
    ]
}
