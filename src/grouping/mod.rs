//! Hierarchical aggregation
//!
//! Groups a flat row collection into nested dimension buckets, level by
//! level, attaching pre-computed aggregate values to each group. Source rows
//! may be pre-filtered through an expression tree. Every emitted record owns
//! an independent clone of its source data via the supplied clone strategy,
//! so grouping never introduces cross-row aliasing.

use crate::expressions::{filter_rows, ExpressionNode};
use crate::value::{resolve_field_value, CellValue};
use serde_json::Value;
use std::collections::HashMap;

/// Produces independent copies of row data.
///
/// The engine requires only this single operation; how deep structures or
/// cycles are handled is the implementation's business.
pub trait CloneStrategy {
    fn clone_record(&self, data: &Value) -> Value;
}

/// Deep-clones through the JSON value tree.
pub struct DefaultCloneStrategy;

impl CloneStrategy for DefaultCloneStrategy {
    fn clone_record(&self, data: &Value) -> Value {
        data.clone()
    }
}

/// Member resolver for one dimension level.
pub type MemberResolver = Box<dyn Fn(&Value) -> CellValue + Send + Sync>;

/// One grouping level: a member name plus an optional custom resolver.
///
/// Without a resolver the member name is read as a plain row field.
pub struct PivotDimension {
    /// Name of the dimension member, used as the group's dimension label
    pub member_name: String,
    /// Custom member resolution, e.g. a derived or formatted member
    pub resolver: Option<MemberResolver>,
}

impl PivotDimension {
    pub fn new(member_name: impl Into<String>) -> Self {
        Self {
            member_name: member_name.into(),
            resolver: None,
        }
    }

    pub fn with_resolver(
        mut self,
        resolver: impl Fn(&Value) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    fn member_of(&self, row: &Value) -> CellValue {
        match &self.resolver {
            Some(resolver) => resolver(row),
            None => resolve_field_value(row, &self.member_name, false, false),
        }
    }
}

/// Aggregation over the cell values of one group
pub type Aggregator = fn(&[CellValue]) -> CellValue;

/// One aggregate column: which member to aggregate and how.
pub struct PivotValue {
    /// Row field the aggregate reads
    pub member: String,
    /// Display name keyed into [`GroupedRecord::aggregates`]
    pub name: String,
    /// The aggregation itself
    pub aggregate: Aggregator,
}

impl PivotValue {
    pub fn new(member: impl Into<String>, name: impl Into<String>, aggregate: Aggregator) -> Self {
        Self {
            member: member.into(),
            name: name.into(),
            aggregate,
        }
    }
}

/// One group bucket: the dimension member it represents, its (cloned)
/// records, its aggregates, and the next level's buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedRecord {
    /// Dimension this group belongs to
    pub dimension: String,
    /// The member value shared by every record in the group
    pub member: CellValue,
    /// Cloned source records of this group
    pub records: Vec<Value>,
    /// Aggregate name to value
    pub aggregates: HashMap<String, CellValue>,
    /// Buckets of the next dimension level
    pub children: Vec<GroupedRecord>,
}

/// Groups rows into nested dimension buckets.
///
/// Dimensions apply in order: the first produces the top-level buckets, each
/// subsequent one splits every bucket of the previous level. Aggregates are
/// computed at every level. Buckets appear in first-seen order, which keeps
/// the output deterministic for a given row order.
pub fn process(
    rows: &[Value],
    dimensions: &[PivotDimension],
    values: &[PivotValue],
    clone_strategy: &dyn CloneStrategy,
    filter: Option<&ExpressionNode>,
) -> Vec<GroupedRecord> {
    let filtered: Vec<Value> = match filter {
        Some(tree) => filter_rows(rows, tree),
        None => rows.to_vec(),
    };
    group_level(&filtered, dimensions, values, clone_strategy)
}

fn group_level(
    rows: &[Value],
    dimensions: &[PivotDimension],
    values: &[PivotValue],
    clone_strategy: &dyn CloneStrategy,
) -> Vec<GroupedRecord> {
    let Some((dimension, rest)) = dimensions.split_first() else {
        return Vec::new();
    };

    // first-seen bucket order
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, (CellValue, Vec<&Value>)> = HashMap::new();
    for row in rows {
        let member = dimension.member_of(row);
        let key = member.bucket_key();
        match buckets.get_mut(&key) {
            Some((_, members)) => members.push(row),
            None => {
                order.push(key.clone());
                buckets.insert(key, (member, vec![row]));
            }
        }
    }

    order
        .into_iter()
        .map(|key| {
            let (member, group_rows) = buckets.remove(&key).unwrap_or((CellValue::Null, vec![]));
            let owned: Vec<Value> = group_rows
                .iter()
                .map(|row| clone_strategy.clone_record(row))
                .collect();
            let aggregates = values
                .iter()
                .map(|value| {
                    let cells: Vec<CellValue> = owned
                        .iter()
                        .map(|row| resolve_field_value(row, &value.member, false, false))
                        .collect();
                    (value.name.clone(), (value.aggregate)(&cells))
                })
                .collect();
            let children = group_level(&owned, rest, values, clone_strategy);
            GroupedRecord {
                dimension: dimension.member_name.clone(),
                member,
                records: owned,
                aggregates,
                children,
            }
        })
        .collect()
}

/// Count of non-null cells
pub fn count(cells: &[CellValue]) -> CellValue {
    CellValue::Number(cells.iter().filter(|c| !c.is_null()).count() as f64)
}

/// Sum of numeric cells; null cells contribute nothing
pub fn sum(cells: &[CellValue]) -> CellValue {
    CellValue::Number(cells.iter().filter_map(CellValue::as_f64).sum())
}

/// Smallest cell by natural ordering, null if the group is empty
pub fn min(cells: &[CellValue]) -> CellValue {
    cells
        .iter()
        .filter(|c| !c.is_null())
        .min_by(|a, b| a.compare(b))
        .cloned()
        .unwrap_or(CellValue::Null)
}

/// Largest cell by natural ordering, null if the group is empty
pub fn max(cells: &[CellValue]) -> CellValue {
    cells
        .iter()
        .filter(|c| !c.is_null())
        .max_by(|a, b| a.compare(b))
        .cloned()
        .unwrap_or(CellValue::Null)
}

/// Mean of numeric cells, null if none are numeric
pub fn average(cells: &[CellValue]) -> CellValue {
    let numbers: Vec<f64> = cells.iter().filter_map(CellValue::as_f64).collect();
    if numbers.is_empty() {
        CellValue::Null
    } else {
        CellValue::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }
}
