//! Calendar-date condition table
//!
//! Equality compares the calendar date only. Relative conditions (today,
//! thisMonth, ...) are evaluated against the local clock at call time.

use super::FilteringOperation;
use crate::value::CellValue;
use chrono::{Datelike, Duration, Local, NaiveDate};

pub(super) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// (year, month) of the month before the given date
pub(super) fn prev_month(of: NaiveDate) -> (i32, u32) {
    if of.month() == 1 {
        (of.year() - 1, 12)
    } else {
        (of.year(), of.month() - 1)
    }
}

/// (year, month) of the month after the given date
pub(super) fn next_month(of: NaiveDate) -> (i32, u32) {
    if of.month() == 12 {
        (of.year() + 1, 1)
    } else {
        (of.year(), of.month() + 1)
    }
}

pub(super) fn operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("equals", false, |target, search, _| {
            match (target.as_date(), search.as_date()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }),
        FilteringOperation::new("doesNotEqual", false, |target, search, _| {
            match (target.as_date(), search.as_date()) {
                (Some(a), Some(b)) => a != b,
                _ => true,
            }
        }),
        FilteringOperation::new("before", false, |target, search, _| {
            match (target.as_datetime(), search.as_datetime()) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            }
        }),
        FilteringOperation::new("after", false, |target, search, _| {
            match (target.as_datetime(), search.as_datetime()) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            }
        }),
        FilteringOperation::new("today", true, |target, _, _| {
            target.as_date() == Some(today())
        }),
        FilteringOperation::new("yesterday", true, |target, _, _| {
            target.as_date() == Some(today() - Duration::days(1))
        }),
        FilteringOperation::new("thisMonth", true, |target, _, _| {
            target.as_date().is_some_and(|d| {
                let now = today();
                (d.year(), d.month()) == (now.year(), now.month())
            })
        }),
        FilteringOperation::new("lastMonth", true, |target, _, _| {
            target
                .as_date()
                .is_some_and(|d| (d.year(), d.month()) == prev_month(today()))
        }),
        FilteringOperation::new("nextMonth", true, |target, _, _| {
            target
                .as_date()
                .is_some_and(|d| (d.year(), d.month()) == next_month(today()))
        }),
        FilteringOperation::new("thisYear", true, |target, _, _| {
            target.as_date().is_some_and(|d| d.year() == today().year())
        }),
        FilteringOperation::new("lastYear", true, |target, _, _| {
            target.as_date().is_some_and(|d| d.year() == today().year() - 1)
        }),
        FilteringOperation::new("nextYear", true, |target, _, _| {
            target.as_date().is_some_and(|d| d.year() == today().year() + 1)
        }),
        FilteringOperation::new("empty", true, |target, _, _| target.is_null()),
        FilteringOperation::new("notEmpty", true, |target, _, _| !target.is_null()),
    ]
}
