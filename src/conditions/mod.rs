//! Filtering condition registries
//!
//! One immutable table of named comparison operations per data type. Tables
//! are created once behind a `OnceLock` and shared by reference for the life
//! of the process, so a resolved condition can be compared by pointer
//! identity against the registry entry.

mod boolean;
mod date;
mod datetime;
mod number;
mod string;
mod time;

use crate::schema::DataType;
use crate::value::CellValue;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Comparison function bound to a condition name.
///
/// Arguments are (target cell, search value, ignore_case). Unary conditions
/// ignore the search value.
pub type ConditionLogic = fn(&CellValue, &CellValue, bool) -> bool;

/// A single named filtering operation.
#[derive(Debug, Clone)]
pub struct FilteringOperation {
    /// Condition name as persisted in expression trees
    pub name: &'static str,
    /// Unary conditions take no search value
    pub is_unary: bool,
    /// Hidden conditions are not offered in condition lists
    pub hidden: bool,
    /// Data type of the table this operation belongs to, stamped when the
    /// table is built; the evaluator uses it to coerce row values
    pub data_type: DataType,
    /// The boolean comparison itself
    pub logic: ConditionLogic,
}

impl FilteringOperation {
    fn new(name: &'static str, is_unary: bool, logic: ConditionLogic) -> Self {
        Self {
            name,
            is_unary,
            hidden: false,
            data_type: DataType::String,
            logic,
        }
    }

    fn hidden(name: &'static str, is_unary: bool, logic: ConditionLogic) -> Self {
        Self {
            name,
            is_unary,
            hidden: true,
            data_type: DataType::String,
            logic,
        }
    }
}

/// The condition table for one data type.
pub struct FilteringOperand {
    data_type: DataType,
    operations: Vec<FilteringOperation>,
    by_name: HashMap<&'static str, usize>,
}

impl FilteringOperand {
    fn new(data_type: DataType, mut operations: Vec<FilteringOperation>) -> Self {
        operations.extend(base_operations());
        for op in &mut operations {
            op.data_type = data_type;
        }
        let by_name = operations
            .iter()
            .enumerate()
            .map(|(idx, op)| (op.name, idx))
            .collect();
        Self {
            data_type,
            operations,
            by_name,
        }
    }

    /// The canonical data type of this table
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the registered operation with the given name.
    pub fn condition(&'static self, name: &str) -> Option<&'static FilteringOperation> {
        self.by_name.get(name).map(|&idx| &self.operations[idx])
    }

    /// Returns true if a condition with the given name is registered.
    pub fn has_condition(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names of the conditions visible to filter UIs, in table order.
    pub fn condition_list(&self) -> Vec<&'static str> {
        self.operations
            .iter()
            .filter(|op| !op.hidden)
            .map(|op| op.name)
            .collect()
    }
}

/// Conditions shared by every table: null checks and set membership.
fn base_operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("null", true, |target, _, _| target.is_null()),
        FilteringOperation::new("notNull", true, |target, _, _| !target.is_null()),
        FilteringOperation::hidden("in", false, in_set),
        FilteringOperation::hidden("inQuery", false, in_set),
        FilteringOperation::hidden("notInQuery", false, |target, search, ignore_case| {
            !target.is_null() && !in_set(target, search, ignore_case)
        }),
    ]
}

/// Membership against a list search value. The host materializes in-query
/// search trees into the list before evaluation.
fn in_set(target: &CellValue, search: &CellValue, _ignore_case: bool) -> bool {
    if target.is_null() {
        return false;
    }
    match search {
        CellValue::List(items) => items
            .iter()
            .any(|item| item.compare(target) == std::cmp::Ordering::Equal),
        _ => false,
    }
}

fn boolean_table() -> &'static FilteringOperand {
    static TABLE: OnceLock<FilteringOperand> = OnceLock::new();
    TABLE.get_or_init(|| FilteringOperand::new(DataType::Boolean, boolean::operations()))
}

fn number_table() -> &'static FilteringOperand {
    static TABLE: OnceLock<FilteringOperand> = OnceLock::new();
    TABLE.get_or_init(|| FilteringOperand::new(DataType::Number, number::operations()))
}

fn string_table() -> &'static FilteringOperand {
    static TABLE: OnceLock<FilteringOperand> = OnceLock::new();
    TABLE.get_or_init(|| FilteringOperand::new(DataType::String, string::operations()))
}

fn date_table() -> &'static FilteringOperand {
    static TABLE: OnceLock<FilteringOperand> = OnceLock::new();
    TABLE.get_or_init(|| FilteringOperand::new(DataType::Date, date::operations()))
}

fn datetime_table() -> &'static FilteringOperand {
    static TABLE: OnceLock<FilteringOperand> = OnceLock::new();
    TABLE.get_or_init(|| FilteringOperand::new(DataType::DateTime, datetime::operations()))
}

fn time_table() -> &'static FilteringOperand {
    static TABLE: OnceLock<FilteringOperand> = OnceLock::new();
    TABLE.get_or_init(|| FilteringOperand::new(DataType::Time, time::operations()))
}

/// Returns the condition table for a data type.
///
/// Currency and Percent columns filter as numbers; Image columns as strings.
pub fn operand_for(data_type: DataType) -> &'static FilteringOperand {
    match data_type {
        DataType::Boolean => boolean_table(),
        DataType::Number | DataType::Currency | DataType::Percent => number_table(),
        DataType::String | DataType::Image => string_table(),
        DataType::Date => date_table(),
        DataType::DateTime => datetime_table(),
        DataType::Time => time_table(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_interned() {
        let a = operand_for(DataType::Number).condition("equals").unwrap();
        let b = operand_for(DataType::Number).condition("equals").unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_currency_shares_number_table() {
        let num = operand_for(DataType::Number).condition("greaterThan").unwrap();
        let cur = operand_for(DataType::Currency).condition("greaterThan").unwrap();
        assert!(std::ptr::eq(num, cur));
    }

    #[test]
    fn test_unknown_condition_is_none() {
        assert!(operand_for(DataType::String).condition("bogus").is_none());
    }

    #[test]
    fn test_base_conditions_present_everywhere() {
        for dt in [
            DataType::Boolean,
            DataType::Number,
            DataType::String,
            DataType::Date,
            DataType::DateTime,
            DataType::Time,
        ] {
            let table = operand_for(dt);
            for name in ["null", "notNull", "in", "inQuery", "notInQuery"] {
                assert!(table.has_condition(name), "{dt} missing {name}");
            }
        }
    }

    #[test]
    fn test_condition_list_hides_hidden() {
        let names = operand_for(DataType::Boolean).condition_list();
        assert!(names.contains(&"true"));
        assert!(!names.contains(&"in"));
        assert!(!names.contains(&"inQuery"));
    }

    #[test]
    fn test_null_conditions() {
        let table = operand_for(DataType::Number);
        let null = table.condition("null").unwrap();
        assert!((null.logic)(&CellValue::Null, &CellValue::Null, false));
        assert!(!(null.logic)(&CellValue::Number(1.0), &CellValue::Null, false));
    }

    #[test]
    fn test_in_membership() {
        let table = operand_for(DataType::Number);
        let op = table.condition("in").unwrap();
        let set = CellValue::List(vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
        assert!((op.logic)(&CellValue::Number(2.0), &set, false));
        assert!(!(op.logic)(&CellValue::Number(3.0), &set, false));
        assert!(!(op.logic)(&CellValue::Null, &set, false));
    }
}
