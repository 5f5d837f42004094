//! Entity and field schema definitions
//!
//! Schemas are supplied by the caller purely to disambiguate a predicate's
//! data type during rehydration. The engine never retains them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data types recognized by the condition registries.
///
/// Currency and Percent share the number condition table; Image shares the
/// string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
    Currency,
    Percent,
    Image,
}

impl DataType {
    /// Returns the wire name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::DateTime => "dateTime",
            DataType::Time => "time",
            DataType::Currency => "currency",
            DataType::Percent => "percent",
            DataType::Image => "image",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A single field declaration: name plus optional data type.
///
/// A `None` data type means the caller does not know the type; rehydration
/// falls back to inferring it from the search value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name as it appears on row records
    pub field: String,
    /// Declared data type, if known
    #[serde(default)]
    pub data_type: Option<DataType>,
}

impl FieldDescriptor {
    /// Create a field with a known data type
    pub fn new(field: impl Into<String>, data_type: DataType) -> Self {
        Self {
            field: field.into(),
            data_type: Some(data_type),
        }
    }

    /// Create a field with an unknown data type
    pub fn untyped(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            data_type: None,
        }
    }
}

/// A named entity: a flat field list plus optionally nested child entities.
///
/// Sub-trees and in-query search trees name the entity their fields belong
/// to; rehydration descends into `child_entities` by that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    /// Entity name
    pub name: String,
    /// Field declarations
    pub fields: Vec<FieldDescriptor>,
    /// Nested entities reachable from this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_entities: Vec<EntityDescriptor>,
}

impl EntityDescriptor {
    /// Create an entity with the given fields and no children
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
            child_entities: Vec::new(),
        }
    }

    /// Adds a child entity
    pub fn with_child(mut self, child: EntityDescriptor) -> Self {
        self.child_entities.push(child);
        self
    }

    /// Looks up a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Searches a forest of entities (including nested children) by name.
pub fn find_entity<'a>(
    entities: &'a [EntityDescriptor],
    name: &str,
) -> Option<&'a EntityDescriptor> {
    for entity in entities {
        if entity.name == name {
            return Some(entity);
        }
        if let Some(found) = find_entity(&entity.child_entities, name) {
            return Some(found);
        }
    }
    None
}
