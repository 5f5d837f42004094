//! Per-row expression evaluation
//!
//! Stateless and side-effect free; rows are never mutated. Data-shape
//! problems never raise: a missing field resolves to null and simply fails
//! (or passes) the condition it is tested against.

use super::tree::{ExpressionNode, FilteringExpression, FilteringLogic};
use crate::schema::DataType;
use crate::value::resolve_field_value;
use serde_json::Value;

/// Evaluates a node against one row.
///
/// `And` short-circuits on the first false operand, `Or` on the first true
/// one. A tree with no operands evaluates to true: a filter with no
/// predicates filters nothing. An unresolved predicate matches nothing.
pub fn evaluate(node: &ExpressionNode, row: &Value) -> bool {
    match node {
        ExpressionNode::Expression(expr) => evaluate_expression(expr, row),
        ExpressionNode::Tree(tree) => match tree.operator {
            FilteringLogic::And => tree
                .filtering_operands
                .iter()
                .all(|operand| evaluate(operand, row)),
            FilteringLogic::Or => {
                tree.filtering_operands.is_empty()
                    || tree
                        .filtering_operands
                        .iter()
                        .any(|operand| evaluate(operand, row))
            }
        },
    }
}

fn evaluate_expression(expr: &FilteringExpression, row: &Value) -> bool {
    let condition = match expr.condition {
        Some(condition) => condition,
        None => return false,
    };
    let is_date = matches!(condition.data_type, DataType::Date | DataType::DateTime);
    let is_time = condition.data_type == DataType::Time;
    let target = resolve_field_value(row, &expr.field_name, is_date, is_time);
    (condition.logic)(&target, &expr.search_val, expr.ignore_case)
}

/// Returns the rows matching the filter, in their original order.
pub fn filter_rows(rows: &[Value], node: &ExpressionNode) -> Vec<Value> {
    rows.iter()
        .filter(|row| evaluate(node, row))
        .cloned()
        .collect()
}
