//! Time-of-day condition table
//!
//! Operates on the time component only; the date part of a date-time target
//! is ignored. Second precision is significant.

use super::FilteringOperation;
use crate::value::CellValue;
use chrono::NaiveTime;
use std::cmp::Ordering;

fn compare(target: &CellValue, search: &CellValue) -> Option<Ordering> {
    let a: NaiveTime = target.as_time()?;
    let b: NaiveTime = search.as_time()?;
    Some(a.cmp(&b))
}

pub(super) fn operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("at", false, |target, search, _| {
            compare(target, search) == Some(Ordering::Equal)
        }),
        FilteringOperation::new("not_at", false, |target, search, _| {
            match compare(target, search) {
                Some(ord) => ord != Ordering::Equal,
                None => true,
            }
        }),
        FilteringOperation::new("before", false, |target, search, _| {
            compare(target, search) == Some(Ordering::Less)
        }),
        FilteringOperation::new("after", false, |target, search, _| {
            compare(target, search) == Some(Ordering::Greater)
        }),
        FilteringOperation::new("at_before", false, |target, search, _| {
            matches!(
                compare(target, search),
                Some(Ordering::Less) | Some(Ordering::Equal)
            )
        }),
        FilteringOperation::new("at_after", false, |target, search, _| {
            matches!(
                compare(target, search),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            )
        }),
        FilteringOperation::new("empty", true, |target, _, _| target.is_null()),
        FilteringOperation::new("notEmpty", true, |target, _, _| !target.is_null()),
    ]
}
