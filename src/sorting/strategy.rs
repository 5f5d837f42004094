//! Sorting strategies

use super::{ColumnMeta, SortingDirection};
use crate::value::CellValue;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Resolves one row's sort key. Arguments are (row, field, is_date, is_time).
pub type ValueResolver<'a> = &'a dyn Fn(&Value, &str, bool, bool) -> CellValue;

/// Compares two sort keys.
///
/// Nullish keys compare as less than any defined key and equal to each
/// other; defined keys compare naturally. Callers apply direction by
/// reversing the result, which is what makes nullish values sort first
/// ascending and last descending.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b),
    }
}

fn directed(ordering: Ordering, direction: SortingDirection) -> Ordering {
    match direction {
        SortingDirection::Asc => ordering,
        SortingDirection::Desc => ordering.reverse(),
    }
}

/// Orders a row collection by one field.
#[allow(clippy::too_many_arguments)]
pub trait SortingStrategy {
    fn sort(
        &self,
        rows: &[Value],
        field_name: &str,
        direction: SortingDirection,
        ignore_case: bool,
        resolve: ValueResolver<'_>,
        is_date: bool,
        is_time: bool,
        column: Option<&ColumnMeta>,
    ) -> Vec<Value>;
}

/// Default strategy: a Schwartzian transform.
///
/// Each row's key is resolved exactly once into a parallel array, the array
/// is sorted with a single comparator, and the originals are projected back
/// out. Key resolution may be a formatted-display computation, so paying it
/// once per row instead of once per comparison matters on large datasets.
pub struct DefaultSortingStrategy;

impl DefaultSortingStrategy {
    pub fn instance() -> &'static Self {
        static INSTANCE: DefaultSortingStrategy = DefaultSortingStrategy;
        &INSTANCE
    }
}

impl SortingStrategy for DefaultSortingStrategy {
    fn sort(
        &self,
        rows: &[Value],
        field_name: &str,
        direction: SortingDirection,
        ignore_case: bool,
        resolve: ValueResolver<'_>,
        is_date: bool,
        is_time: bool,
        _column: Option<&ColumnMeta>,
    ) -> Vec<Value> {
        let mut keyed: Vec<(Value, CellValue)> = rows
            .iter()
            .map(|row| {
                let mut key = resolve(row, field_name, is_date, is_time);
                if ignore_case {
                    key = key.to_lowercase_if_text();
                }
                (row.clone(), key)
            })
            .collect();
        keyed.sort_by(|a, b| directed(compare_values(&a.1, &b.1), direction));
        keyed.into_iter().map(|(row, _)| row).collect()
    }
}

/// Sorts by formatted display values.
///
/// Keys are re-resolved for every comparison and run through the column's
/// formatter before comparing. No Schwartzian transform here: the
/// formatter's output is the thing being compared, and formatter calls are
/// assumed cheap relative to the correctness needs of display-order sorting.
pub struct FormattedValuesSortingStrategy;

impl FormattedValuesSortingStrategy {
    pub fn instance() -> &'static Self {
        static INSTANCE: FormattedValuesSortingStrategy = FormattedValuesSortingStrategy;
        &INSTANCE
    }
}

impl SortingStrategy for FormattedValuesSortingStrategy {
    fn sort(
        &self,
        rows: &[Value],
        field_name: &str,
        direction: SortingDirection,
        ignore_case: bool,
        resolve: ValueResolver<'_>,
        is_date: bool,
        is_time: bool,
        column: Option<&ColumnMeta>,
    ) -> Vec<Value> {
        let key = |row: &Value| -> CellValue {
            let mut value = resolve(row, field_name, is_date, is_time);
            if let Some(formatter) = column.and_then(|c| c.formatter.as_ref()) {
                value = formatter(&value);
            }
            if ignore_case {
                value = value.to_lowercase_if_text();
            }
            value
        };
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| directed(compare_values(&key(a), &key(b)), direction));
        sorted
    }
}

/// Orders rows by how many rows share their field value.
///
/// Rows bucket by key; buckets order by size per the direction, with the
/// bucket key as tie-break so equal-size groups keep a deterministic order.
/// Rows inside one bucket keep their original relative order.
pub struct GroupMemberCountSortingStrategy;

impl GroupMemberCountSortingStrategy {
    pub fn instance() -> &'static Self {
        static INSTANCE: GroupMemberCountSortingStrategy = GroupMemberCountSortingStrategy;
        &INSTANCE
    }
}

impl SortingStrategy for GroupMemberCountSortingStrategy {
    fn sort(
        &self,
        rows: &[Value],
        field_name: &str,
        direction: SortingDirection,
        ignore_case: bool,
        resolve: ValueResolver<'_>,
        is_date: bool,
        is_time: bool,
        _column: Option<&ColumnMeta>,
    ) -> Vec<Value> {
        let keyed: Vec<(Value, CellValue, String)> = rows
            .iter()
            .map(|row| {
                let mut key = resolve(row, field_name, is_date, is_time);
                if ignore_case {
                    key = key.to_lowercase_if_text();
                }
                let bucket = key.bucket_key();
                (row.clone(), key, bucket)
            })
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (_, _, bucket) in &keyed {
            *counts.entry(bucket).or_insert(0) += 1;
        }

        let mut keyed_counts: Vec<(Value, CellValue, usize)> = keyed
            .iter()
            .map(|(row, key, bucket)| (row.clone(), key.clone(), counts[bucket.as_str()]))
            .collect();
        keyed_counts.sort_by(|a, b| {
            let ordering = a.2.cmp(&b.2).then_with(|| compare_values(&a.1, &b.1));
            directed(ordering, direction)
        });
        keyed_counts.into_iter().map(|(row, _, _)| row).collect()
    }
}
