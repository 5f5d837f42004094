//! Expression node model
//!
//! An explicit tagged union: a node is either a leaf predicate or a sub-tree,
//! decided once when the node is built or parsed, never re-inferred.

use crate::conditions::FilteringOperation;
use crate::value::CellValue;
use serde_json::{json, Map, Value};

/// Boolean operator joining a sub-tree's operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilteringLogic {
    #[default]
    And,
    Or,
}

impl FilteringLogic {
    /// Wire name, "and" / "or"
    pub fn as_str(&self) -> &'static str {
        match self {
            FilteringLogic::And => "and",
            FilteringLogic::Or => "or",
        }
    }
}

/// A leaf predicate: one field/condition/value test.
///
/// `condition` is `None` on a plain-data node and is the interned registry
/// operation after rehydration. It is never a copy of the registry entry, so
/// callers may compare it by pointer against `operand_for(..).condition(..)`.
#[derive(Debug, Clone)]
pub struct FilteringExpression {
    /// Row field the predicate tests
    pub field_name: String,
    /// Name of the condition in the data type's table
    pub condition_name: String,
    /// Resolved comparison operation, populated by rehydration
    pub condition: Option<&'static FilteringOperation>,
    /// Comparison operand; ignored by unary conditions
    pub search_val: CellValue,
    /// Case-insensitive comparison for string conditions
    pub ignore_case: bool,
    /// Nested query for the in-query/not-in-query conditions
    pub search_tree: Option<Box<FilteringExpressionsTree>>,
}

impl FilteringExpression {
    /// Creates an unresolved predicate with no search value.
    pub fn new(field_name: impl Into<String>, condition_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            condition_name: condition_name.into(),
            condition: None,
            search_val: CellValue::Null,
            ignore_case: false,
            search_tree: None,
        }
    }

    /// Sets the search value
    pub fn with_search_val(mut self, value: impl Into<CellValue>) -> Self {
        self.search_val = value.into();
        self
    }

    /// Enables case-insensitive comparison
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Attaches a nested search tree
    pub fn with_search_tree(mut self, tree: FilteringExpressionsTree) -> Self {
        self.search_tree = Some(Box::new(tree));
        self
    }

    /// Returns true if the predicate carries an executable condition.
    pub fn is_resolved(&self) -> bool {
        self.condition.is_some()
    }

    /// Serializes to the plain-data wire shape. The resolved condition is
    /// never serialized; only its name survives the round trip.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("fieldName".into(), json!(self.field_name));
        obj.insert("conditionName".into(), json!(self.condition_name));
        if !self.search_val.is_null() {
            obj.insert("searchVal".into(), self.search_val.to_json());
        }
        if self.ignore_case {
            obj.insert("ignoreCase".into(), json!(true));
        }
        if let Some(tree) = &self.search_tree {
            obj.insert("searchTree".into(), tree.to_json());
        }
        Value::Object(obj)
    }
}

impl PartialEq for FilteringExpression {
    fn eq(&self, other: &Self) -> bool {
        let conditions_match = match (self.condition, other.condition) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        conditions_match
            && self.field_name == other.field_name
            && self.condition_name == other.condition_name
            && self.search_val == other.search_val
            && self.ignore_case == other.ignore_case
            && self.search_tree == other.search_tree
    }
}

/// A sub-tree: an operator over child nodes, optionally bound to an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteringExpressionsTree {
    /// Operator folding the operands
    pub operator: FilteringLogic,
    /// Field this tree filters, for single-column filter UIs
    pub field_name: Option<String>,
    /// Entity whose fields the operands reference
    pub entity_name: Option<String>,
    /// Projection for in-query trees; "*" means all fields
    pub return_fields: Vec<String>,
    /// Child nodes, appended in order
    pub filtering_operands: Vec<ExpressionNode>,
}

impl FilteringExpressionsTree {
    /// Creates an empty tree with the given operator.
    pub fn new(operator: FilteringLogic) -> Self {
        Self {
            operator,
            ..Default::default()
        }
    }

    /// Binds the tree to a field name
    pub fn with_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Binds the tree to an entity name
    pub fn with_entity(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_name = Some(entity_name.into());
        self
    }

    /// Sets the projected return fields
    pub fn with_return_fields(mut self, fields: Vec<String>) -> Self {
        self.return_fields = fields;
        self
    }

    /// Appends a child node
    pub fn push(&mut self, node: impl Into<ExpressionNode>) {
        self.filtering_operands.push(node.into());
    }

    /// Builder form of [`push`](Self::push)
    pub fn with_operand(mut self, node: impl Into<ExpressionNode>) -> Self {
        self.push(node);
        self
    }

    /// Serializes to the plain-data wire shape.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("operator".into(), json!(self.operator.as_str()));
        if let Some(field) = &self.field_name {
            obj.insert("fieldName".into(), json!(field));
        }
        if let Some(entity) = &self.entity_name {
            obj.insert("entityName".into(), json!(entity));
        }
        if !self.return_fields.is_empty() {
            obj.insert("returnFields".into(), json!(self.return_fields));
        }
        obj.insert(
            "filteringOperands".into(),
            Value::Array(self.filtering_operands.iter().map(ExpressionNode::to_json).collect()),
        );
        Value::Object(obj)
    }
}

/// One node of a filter: a leaf predicate or a sub-tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Expression(FilteringExpression),
    Tree(FilteringExpressionsTree),
}

impl ExpressionNode {
    /// Serializes to the plain-data wire shape.
    pub fn to_json(&self) -> Value {
        match self {
            ExpressionNode::Expression(expr) => expr.to_json(),
            ExpressionNode::Tree(tree) => tree.to_json(),
        }
    }
}

impl From<FilteringExpression> for ExpressionNode {
    fn from(expr: FilteringExpression) -> Self {
        ExpressionNode::Expression(expr)
    }
}

impl From<FilteringExpressionsTree> for ExpressionNode {
    fn from(tree: FilteringExpressionsTree) -> Self {
        ExpressionNode::Tree(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tree_builder_appends_in_order() {
        let mut tree = FilteringExpressionsTree::new(FilteringLogic::Or)
            .with_entity("orders")
            .with_return_fields(vec!["*".into()]);
        tree.push(FilteringExpression::new("Id", "equals").with_search_val(100i64));
        tree.push(FilteringExpression::new("Name", "contains").with_search_val("a"));

        assert_eq!(tree.filtering_operands.len(), 2);
        match &tree.filtering_operands[0] {
            ExpressionNode::Expression(e) => assert_eq!(e.field_name, "Id"),
            _ => panic!("expected a predicate"),
        }
    }

    #[test]
    fn test_to_json_wire_shape() {
        let tree = FilteringExpressionsTree::new(FilteringLogic::And)
            .with_entity("orders")
            .with_return_fields(vec!["*".into()])
            .with_operand(
                FilteringExpression::new("Id", "equals").with_search_val(100i64),
            );

        let wire = tree.to_json();
        assert_eq!(wire["operator"], json!("and"));
        assert_eq!(wire["entityName"], json!("orders"));
        assert_eq!(wire["filteringOperands"][0]["fieldName"], json!("Id"));
        assert_eq!(wire["filteringOperands"][0]["searchVal"], json!(100.0));
        // the executable condition must not leak into the wire shape
        assert!(wire["filteringOperands"][0].get("condition").is_none());
    }

    #[test]
    fn test_unary_predicate_omits_search_val() {
        let wire = FilteringExpression::new("Validated", "false").to_json();
        assert!(wire.get("searchVal").is_none());
        assert_eq!(wire["conditionName"], json!("false"));
    }

    #[test]
    fn test_search_tree_serializes_nested() {
        let inner = FilteringExpressionsTree::new(FilteringLogic::And)
            .with_entity("items")
            .with_operand(FilteringExpression::new("Sku", "equals").with_search_val("X"));
        let wire = FilteringExpression::new("Id", "inQuery")
            .with_search_tree(inner)
            .to_json();
        assert_eq!(wire["searchTree"]["entityName"], json!("items"));
    }

    #[test]
    fn test_equality_is_referential_on_conditions() {
        let a = FilteringExpression::new("Id", "equals").with_search_val(1i64);
        let b = FilteringExpression::new("Id", "equals").with_search_val(1i64);
        assert_eq!(a, b);

        let resolved = crate::conditions::operand_for(crate::schema::DataType::Number)
            .condition("equals")
            .unwrap();
        let mut c = a.clone();
        c.condition = Some(resolved);
        assert_ne!(a, c);

        let mut d = b.clone();
        d.condition = Some(resolved);
        assert_eq!(c, d);
    }
}
