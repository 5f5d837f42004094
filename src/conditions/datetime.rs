//! Date-time condition table
//!
//! Same shape as the calendar-date table, but equality is significant down to
//! the second. Sub-second precision is ignored.

use super::date::{next_month, prev_month, today};
use super::FilteringOperation;
use crate::value::CellValue;
use chrono::{Datelike, Duration, NaiveDateTime, Timelike};

fn trunc_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

pub(super) fn operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("equals", false, |target, search, _| {
            match (target.as_datetime(), search.as_datetime()) {
                (Some(a), Some(b)) => trunc_seconds(a) == trunc_seconds(b),
                _ => false,
            }
        }),
        FilteringOperation::new("doesNotEqual", false, |target, search, _| {
            match (target.as_datetime(), search.as_datetime()) {
                (Some(a), Some(b)) => trunc_seconds(a) != trunc_seconds(b),
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
