//! Tree rehydration
//!
//! Reconstructs an executable expression tree from plain data. A predicate
//! that already carries a resolved condition is copied unchanged, so feeding
//! an executable tree back through rehydration is the identity; everything
//! else is resolved against the condition registries, with search values
//! coerced to their native types.
//!
//! Resolution is entity-aware: each sub-tree's fields are looked up in the
//! entity it names, descending through child entities, so an in-query search
//! tree resolves against its own entity rather than the outer one.

use super::errors::{ExpressionError, ExpressionResult};
use super::tree::{ExpressionNode, FilteringExpression, FilteringExpressionsTree, FilteringLogic};
use crate::conditions::operand_for;
use crate::schema::{find_entity, DataType, EntityDescriptor, FieldDescriptor};
use crate::value::{
    looks_like_iso_date, looks_like_time, parse_iso_date, parse_iso_datetime, parse_time,
    CellValue,
};
use serde_json::Value;

/// Parses a plain JSON value into an (unresolved) expression node.
///
/// Shape detection happens here, once: an object with `filteringOperands`
/// (or its `children` alias) is a sub-tree, an object with `fieldName` and
/// `conditionName` is a predicate, anything else is malformed.
pub fn parse_tree(value: &Value) -> ExpressionResult<ExpressionNode> {
    let obj = value
        .as_object()
        .ok_or_else(|| ExpressionError::MalformedTree("node is not an object".into()))?;

    if let Some(operands) = obj.get("filteringOperands").or_else(|| obj.get("children")) {
        let operands = operands.as_array().ok_or_else(|| {
            ExpressionError::MalformedTree("filteringOperands is not an array".into())
        })?;
        let mut tree = FilteringExpressionsTree::new(parse_operator(obj.get("operator"))?);
        tree.field_name = string_field(obj.get("fieldName"));
        tree.entity_name = string_field(obj.get("entityName").or_else(|| obj.get("entity")));
        tree.return_fields = obj
            .get("returnFields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        for operand in operands {
            tree.filtering_operands.push(parse_tree(operand)?);
        }
        return Ok(ExpressionNode::Tree(tree));
    }

    if obj.contains_key("fieldName") && obj.contains_key("conditionName") {
        let mut expr = FilteringExpression::new(
            obj["fieldName"].as_str().ok_or_else(|| {
                ExpressionError::MalformedTree("fieldName is not a string".into())
            })?,
            obj["conditionName"].as_str().ok_or_else(|| {
                ExpressionError::MalformedTree("conditionName is not a string".into())
            })?,
        );
        if let Some(search_val) = obj.get("searchVal") {
            expr.search_val = CellValue::from_json(search_val);
        }
        expr.ignore_case = obj
            .get("ignoreCase")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if let Some(search_tree) = obj.get("searchTree") {
            match parse_tree(search_tree)? {
                ExpressionNode::Tree(tree) => expr.search_tree = Some(Box::new(tree)),
                ExpressionNode::Expression(_) => {
                    return Err(ExpressionError::MalformedTree(
                        "searchTree is not a sub-tree".into(),
                    ))
                }
            }
        }
        // A serialized `condition` object is non-executable and is rebuilt
        // during rehydration; only its name matters.
        return Ok(ExpressionNode::Expression(expr));
    }

    Err(ExpressionError::MalformedTree(
        "node is neither a sub-tree nor a predicate".into(),
    ))
}

fn parse_operator(value: Option<&Value>) -> ExpressionResult<FilteringLogic> {
    match value {
        // Numeric encoding kept for compatibility with older persisted state
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Ok(FilteringLogic::And),
            Some(1) => Ok(FilteringLogic::Or),
            _ => Err(ExpressionError::MalformedTree(format!(
                "unknown operator {n}"
            ))),
        },
        Some(Value::String(s)) => match s.as_str() {
            "and" => Ok(FilteringLogic::And),
            "or" => Ok(FilteringLogic::Or),
            other => Err(ExpressionError::MalformedTree(format!(
                "unknown operator '{other}'"
            ))),
        },
        None => Err(ExpressionError::MalformedTree(
            "sub-tree has no operator".into(),
        )),
        Some(other) => Err(ExpressionError::MalformedTree(format!(
            "operator has unexpected shape: {other}"
        ))),
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(String::from)
}

/// Rehydrates a node against a set of entities.
///
/// Already-resolved predicates are copied unchanged, preserving referential
/// identity with the registry. The input is not mutated.
pub fn recreate_tree(
    node: &ExpressionNode,
    entities: &[EntityDescriptor],
) -> ExpressionResult<ExpressionNode> {
    rehydrate_node(node, entities, None)
}

/// Rehydrates a node against a flat field list (no entity names involved).
pub fn recreate_tree_from_fields(
    node: &ExpressionNode,
    fields: &[FieldDescriptor],
) -> ExpressionResult<ExpressionNode> {
    let synthetic = EntityDescriptor::new("", fields.to_vec());
    rehydrate_node(node, &[], Some(&synthetic))
}

/// Parses plain JSON and rehydrates it against entities in one step.
pub fn recreate_tree_from_json(
    value: &Value,
    entities: &[EntityDescriptor],
) -> ExpressionResult<ExpressionNode> {
    recreate_tree(&parse_tree(value)?, entities)
}

/// Parses plain JSON and rehydrates it against a flat field list.
pub fn recreate_tree_from_json_fields(
    value: &Value,
    fields: &[FieldDescriptor],
) -> ExpressionResult<ExpressionNode> {
    recreate_tree_from_fields(&parse_tree(value)?, fields)
}

fn rehydrate_node(
    node: &ExpressionNode,
    entities: &[EntityDescriptor],
    current: Option<&EntityDescriptor>,
) -> ExpressionResult<ExpressionNode> {
    match node {
        ExpressionNode::Tree(tree) => {
            let entity = tree
                .entity_name
                .as_deref()
                .and_then(|name| find_entity(entities, name))
                .or(current);
            let mut rebuilt = FilteringExpressionsTree::new(tree.operator);
            rebuilt.field_name = tree.field_name.clone();
            rebuilt.entity_name = tree.entity_name.clone();
            rebuilt.return_fields = tree.return_fields.clone();
            for operand in &tree.filtering_operands {
                rebuilt
                    .filtering_operands
                    .push(rehydrate_node(operand, entities, entity)?);
            }
            Ok(ExpressionNode::Tree(rebuilt))
        }
        ExpressionNode::Expression(expr) => {
            if expr.is_resolved() {
                // Already executable: copy unchanged so externally-cached
                // condition references stay valid.
                return Ok(ExpressionNode::Expression(expr.clone()));
            }
            let data_type = resolve_data_type(expr, current);
            let table = operand_for(data_type);
            let condition = table.condition(&expr.condition_name).ok_or_else(|| {
                ExpressionError::UnknownCondition {
                    name: expr.condition_name.clone(),
                    data_type,
                }
            })?;
            let search_tree = match &expr.search_tree {
                Some(tree) => {
                    let node = ExpressionNode::Tree((**tree).clone());
                    match rehydrate_node(&node, entities, current)? {
                        ExpressionNode::Tree(rebuilt) => Some(Box::new(rebuilt)),
                        ExpressionNode::Expression(_) => unreachable!(),
                    }
                }
                None => None,
            };
            Ok(ExpressionNode::Expression(FilteringExpression {
                field_name: expr.field_name.clone(),
                condition_name: expr.condition_name.clone(),
                condition: Some(condition),
                search_val: coerce_search_val(&expr.search_val, data_type),
                ignore_case: expr.ignore_case,
                search_tree,
            }))
        }
    }
}

/// Resolves a predicate's data type from the schema, degrading to inference
/// from the search value's literal shape. Schema misses are never fatal; a
/// stale persisted filter should degrade, not crash the grid.
fn resolve_data_type(
    expr: &FilteringExpression,
    entity: Option<&EntityDescriptor>,
) -> DataType {
    if let Some(declared) = entity
        .and_then(|e| e.field(&expr.field_name))
        .and_then(|f| f.data_type)
    {
        return declared;
    }
    let inferred = infer_data_type(&expr.search_val, &expr.condition_name);
    log::warn!(
        "no declared data type for field '{}'; inferred '{}' from the search value",
        expr.field_name,
        inferred
    );
    inferred
}

/// Best-effort type inference from the literal shape of the search value.
///
/// ISO-looking strings pick the date-family table that actually registers
/// the condition name; null search values (unary conditions) fall back to
/// scanning the tables for the condition name. String is the final guess.
fn infer_data_type(search_val: &CellValue, condition_name: &str) -> DataType {
    match search_val {
        CellValue::Number(_) => DataType::Number,
        CellValue::Bool(_) => DataType::Boolean,
        CellValue::Date(_) => DataType::Date,
        CellValue::DateTime(_) => DataType::DateTime,
        CellValue::Time(_) => DataType::Time,
        CellValue::String(s) => {
            if looks_like_iso_date(s) {
                let candidate = if s.contains('T') {
                    DataType::DateTime
                } else {
                    DataType::Date
                };
                if operand_for(candidate).has_condition(condition_name) {
                    candidate
                } else if operand_for(DataType::Time).has_condition(condition_name) {
                    DataType::Time
                } else {
                    candidate
                }
            } else if looks_like_time(s)
                && operand_for(DataType::Time).has_condition(condition_name)
            {
                DataType::Time
            } else {
                DataType::String
            }
        }
        CellValue::Null | CellValue::List(_) => {
            for dt in [
                DataType::Boolean,
                DataType::Number,
                DataType::String,
                DataType::Date,
                DataType::DateTime,
                DataType::Time,
            ] {
                if operand_for(dt).has_condition(condition_name) {
                    return dt;
                }
            }
            DataType::String
        }
    }
}

/// Coerces persisted search values to their native form. Only the date
/// family is coerced; unparseable strings pass through unchanged.
fn coerce_search_val(search_val: &CellValue, data_type: DataType) -> CellValue {
    if let CellValue::String(s) = search_val {
        match data_type {
            DataType::Date => {
                if let Some(d) = parse_iso_date(s) {
                    return CellValue::Date(d);
                }
            }
            DataType::DateTime => {
                if let Some(dt) = parse_iso_datetime(s) {
                    return CellValue::DateTime(dt);
                }
            }
            DataType::Time => {
                if let Some(t) = parse_time(s) {
                    return CellValue::Time(t);
                }
            }
            _ => {}
        }
    }
    search_val.clone()
}
