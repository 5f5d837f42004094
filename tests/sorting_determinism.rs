//! Sorting Determinism Tests
//!
//! Cross-module tests for the sort engine contract:
//! - Nullish ordering convention (first ascending, last descending)
//! - Single key resolution per row in the default strategy
//! - Formatted-value comparison
//! - Grouped-count ordering with deterministic tie-breaks

use gridops::schema::DataType;
use gridops::sorting::{
    ColumnMeta, DefaultSortingStrategy, FormattedValuesSortingStrategy,
    GroupMemberCountSortingStrategy, SortingDirection, SortingStrategy,
};
use gridops::value::{resolve_field_value, CellValue};
use serde_json::{json, Value};
use std::cell::Cell;

fn sort_default(rows: &[Value], field: &str, direction: SortingDirection) -> Vec<Value> {
    DefaultSortingStrategy::instance().sort(
        rows,
        field,
        direction,
        false,
        &resolve_field_value,
        false,
        false,
        None,
    )
}

// =============================================================================
// Nullish ordering
// =============================================================================

/// Nullish values sort first ascending and last descending; defined values
/// keep natural order either way.
#[test]
fn test_nullish_ordering_convention() {
    let rows = vec![
        json!({"v": null}),
        json!({"v": 3}),
        json!({"v": 1}),
        json!({}),
        json!({"v": 2}),
    ];

    let asc = sort_default(&rows, "v", SortingDirection::Asc);
    let values: Vec<_> = asc.iter().map(|r| r["v"].clone()).collect();
    assert_eq!(
        values,
        vec![Value::Null, Value::Null, json!(1), json!(2), json!(3)]
    );

    let desc = sort_default(&rows, "v", SortingDirection::Desc);
    let values: Vec<_> = desc.iter().map(|r| r["v"].clone()).collect();
    assert_eq!(
        values,
        vec![json!(3), json!(2), json!(1), Value::Null, Value::Null]
    );
}

/// Nullish values compare equal to each other, so their relative order is
/// the input order (the sort is stable).
#[test]
fn test_nullish_values_keep_input_order() {
    let rows = vec![
        json!({"v": null, "id": "x"}),
        json!({"id": "y"}),
        json!({"v": null, "id": "z"}),
    ];
    let sorted = sort_default(&rows, "v", SortingDirection::Asc);
    let ids: Vec<_> = sorted.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["x", "y", "z"]);
}

#[test]
fn test_empty_rows_sort_to_empty() {
    assert!(sort_default(&[], "v", SortingDirection::Asc).is_empty());
}

// =============================================================================
// Default strategy: Schwartzian transform
// =============================================================================

/// The default strategy resolves each row's key exactly once, no matter how
/// many comparisons the underlying sort performs.
#[test]
fn test_resolver_called_once_per_row() {
    let rows: Vec<Value> = (0..200).map(|i| json!({"v": (i * 37) % 200})).collect();
    let calls = Cell::new(0usize);
    let counting = |row: &Value, field: &str, is_date: bool, is_time: bool| {
        calls.set(calls.get() + 1);
        resolve_field_value(row, field, is_date, is_time)
    };
    let sorted = DefaultSortingStrategy::instance().sort(
        &rows,
        "v",
        SortingDirection::Asc,
        false,
        &counting,
        false,
        false,
        None,
    );
    assert_eq!(calls.get(), rows.len());
    assert_eq!(sorted[0]["v"], json!(0));
    assert_eq!(sorted[199]["v"], json!(199));
}

#[test]
fn test_date_keys_compare_chronologically() {
    let rows = vec![
        json!({"at": "2024-02-01T00:00:00"}),
        json!({"at": "2023-12-31T23:59:59"}),
        json!({"at": "2024-01-15T12:00:00"}),
    ];
    let sorted = DefaultSortingStrategy::instance().sort(
        &rows,
        "at",
        SortingDirection::Asc,
        false,
        &resolve_field_value,
        true,
        false,
        None,
    );
    assert_eq!(sorted[0]["at"], "2023-12-31T23:59:59");
    assert_eq!(sorted[2]["at"], "2024-02-01T00:00:00");
}

// =============================================================================
// Formatted-value strategy
// =============================================================================

/// With a formatter declared, the formatted output is what gets compared.
#[test]
fn test_formatter_output_is_compared() {
    let rows = vec![json!({"name": "b"}), json!({"name": "A"})];
    let column = ColumnMeta::new("name", DataType::String).with_formatter(|v| match v.as_str() {
        Some(s) => CellValue::String(s.to_uppercase()),
        None => v.clone(),
    });
    let sorted = FormattedValuesSortingStrategy::instance().sort(
        &rows,
        "name",
        SortingDirection::Asc,
        false,
        &resolve_field_value,
        false,
        false,
        Some(&column),
    );
    // formatted keys are "B" and "A": "A" wins even though 'A' < 'b' would
    // also hold for the raw values; descending proves the formatter matters
    assert_eq!(sorted[0]["name"], "A");

    let rows = vec![json!({"name": "a"}), json!({"name": "B"})];
    let sorted = FormattedValuesSortingStrategy::instance().sort(
        &rows,
        "name",
        SortingDirection::Asc,
        false,
        &resolve_field_value,
        false,
        false,
        Some(&column),
    );
    // raw order would put "B" first ('B' < 'a'); formatted order is A, B
    assert_eq!(sorted[0]["name"], "a");
    assert_eq!(sorted[1]["name"], "B");
}

#[test]
fn test_formatted_nullish_follows_same_convention() {
    let rows = vec![json!({"name": "b"}), json!({}), json!({"name": "a"})];
    let column = ColumnMeta::new("name", DataType::String);
    let sorted = FormattedValuesSortingStrategy::instance().sort(
        &rows,
        "name",
        SortingDirection::Desc,
        false,
        &resolve_field_value,
        false,
        false,
        Some(&column),
    );
    assert_eq!(sorted[0]["name"], "b");
    assert_eq!(sorted[2]["name"], Value::Null);
}

// =============================================================================
// Grouped-count strategy
// =============================================================================

#[test]
fn test_group_count_ascending_and_descending() {
    let rows = vec![
        json!({"tag": "rare"}),
        json!({"tag": "common"}),
        json!({"tag": "common"}),
        json!({"tag": "common"}),
        json!({"tag": "dual"}),
        json!({"tag": "dual"}),
    ];
    let asc = GroupMemberCountSortingStrategy::instance().sort(
        &rows,
        "tag",
        SortingDirection::Asc,
        false,
        &resolve_field_value,
        false,
        false,
        None,
    );
    let tags: Vec<_> = asc.iter().map(|r| r["tag"].as_str().unwrap()).collect();
    assert_eq!(tags, vec!["rare", "dual", "dual", "common", "common", "common"]);

    let desc = GroupMemberCountSortingStrategy::instance().sort(
        &rows,
        "tag",
        SortingDirection::Desc,
        false,
        &resolve_field_value,
        false,
        false,
        None,
    );
    let tags: Vec<_> = desc.iter().map(|r| r["tag"].as_str().unwrap()).collect();
    assert_eq!(tags, vec!["common", "common", "common", "dual", "dual", "rare"]);
}

/// Equal-size buckets order by their key, and rows within one bucket keep
/// their original relative order.
#[test]
fn test_group_count_tiebreak_and_stability() {
    let rows = vec![
        json!({"k": "b", "id": 1}),
        json!({"k": "a", "id": 2}),
        json!({"k": "b", "id": 3}),
        json!({"k": "a", "id": 4}),
    ];
    let sorted = GroupMemberCountSortingStrategy::instance().sort(
        &rows,
        "k",
        SortingDirection::Asc,
        false,
        &resolve_field_value,
        false,
        false,
        None,
    );
    let pairs: Vec<_> = sorted
        .iter()
        .map(|r| (r["k"].as_str().unwrap().to_string(), r["id"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("a".into(), 2),
            ("a".into(), 4),
            ("b".into(), 1),
            ("b".into(), 3)
        ]
    );
}
