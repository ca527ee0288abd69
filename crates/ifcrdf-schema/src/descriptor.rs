//! Entity and type descriptor tables.
//!
//! Built once from the EXPRESS schema and read-only afterwards. Lookups
//! are keyed by the upper-cased keyword, which is how records name them.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One attribute of an entity, in declaration order (inherited attributes first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name as declared (e.g. `GlobalId`).
    pub name: String,
    /// Local name of the ontology property (e.g. `globalId_IfcRoot`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl AttributeDescriptor {
    /// Create an attribute with an explicit property name.
    pub fn new(name: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property: Some(property.into()),
        }
    }

    /// Property local name; defaults to the attribute name with a lower-case first letter.
    pub fn property_name(&self) -> String {
        match &self.property {
            Some(p) => p.clone(),
            None => {
                let mut chars = self.name.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// A schema entity: a record kind with an ordered list of named attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity name as used in IRIs (e.g. `IfcWall`).
    pub name: String,
    /// All attributes, inherited ones first.
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
}

impl EntityDescriptor {
    /// Create an entity descriptor.
    pub fn new(name: impl Into<String>, attributes: Vec<AttributeDescriptor>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Attribute at a position.
    pub fn attribute(&self, index: usize) -> Option<&AttributeDescriptor> {
        self.attributes.get(index)
    }
}

/// EXPRESS aggregation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Ordered, duplicates allowed
    List,
    /// Unordered, no duplicates
    Set,
    /// Fixed-size, indexed
    Array,
    /// Unordered, duplicates allowed
    Bag,
}

impl Aggregate {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "LIST" => Some(Self::List),
            "SET" => Some(Self::Set),
            "ARRAY" => Some(Self::Array),
            "BAG" => Some(Self::Bag),
            _ => None,
        }
    }

    /// Suffix used in list wrapper class names.
    pub fn class_suffix(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Set => "Set",
            Self::Array => "Array",
            Self::Bag => "Bag",
        }
    }
}

/// A schema type: a defined type, enumeration, select or aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name as used in IRIs (e.g. `IfcLabel`).
    pub name: String,
    /// Underlying type as written in EXPRESS (e.g. `STRING`, `LIST [2:?] OF IfcPositiveInteger;`).
    pub primary_type: String,
}

impl TypeDescriptor {
    /// Create a type descriptor.
    pub fn new(name: impl Into<String>, primary_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_type: primary_type.into(),
        }
    }

    /// Aggregation kind, if the underlying type is a LIST/SET/ARRAY/BAG.
    pub fn aggregate(&self) -> Option<Aggregate> {
        self.primary_type
            .split_whitespace()
            .next()
            .and_then(Aggregate::parse)
    }

    /// Element or base type: the last word of the underlying type.
    pub fn content_type(&self) -> &str {
        self.primary_type
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .trim_end_matches(';')
    }

    /// Name of the list wrapper class for aggregate types (e.g. `IfcPositiveInteger_List`).
    pub fn list_class_name(&self) -> Option<String> {
        self.aggregate()
            .map(|agg| format!("{}_{}", self.content_type(), agg.class_suffix()))
    }
}

/// Result of looking up a keyword in both tables.
#[derive(Debug, Clone, Copy)]
pub enum DescriptorMatch<'a> {
    /// Keyword names an entity.
    Entity(&'a EntityDescriptor),
    /// Keyword names a type.
    Type(&'a TypeDescriptor),
    /// Keyword names both (inconsistent schema).
    Both(&'a EntityDescriptor, &'a TypeDescriptor),
    /// Keyword is unknown.
    None,
}

#[derive(Deserialize)]
struct DescriptorDocument {
    #[serde(default)]
    entities: Vec<EntityDescriptor>,
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// Entity and type tables keyed by upper-cased name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTables {
    entities: HashMap<String, EntityDescriptor>,
    types: HashMap<String, TypeDescriptor>,
}

impl DescriptorTables {
    /// Build tables from descriptor lists.
    pub fn new(
        entities: impl IntoIterator<Item = EntityDescriptor>,
        types: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|e| (e.name.to_ascii_uppercase(), e))
                .collect(),
            types: types
                .into_iter()
                .map(|t| (t.name.to_ascii_uppercase(), t))
                .collect(),
        }
    }

    /// Parse a `{"entities": [...], "types": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let doc: DescriptorDocument = serde_json::from_str(json)?;
        if let Some(e) = doc.entities.iter().find(|e| e.name.is_empty()) {
            return Err(SchemaError::invalid(format!(
                "entity with empty name ({} attributes)",
                e.attributes.len()
            )));
        }
        Ok(Self::new(doc.entities, doc.types))
    }

    /// Load a JSON descriptor document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Entity descriptor for a keyword.
    pub fn entity(&self, keyword: &str) -> Option<&EntityDescriptor> {
        self.entities.get(&keyword.to_ascii_uppercase())
    }

    /// Type descriptor for a keyword or bare type-name token.
    pub fn type_descriptor(&self, keyword: &str) -> Option<&TypeDescriptor> {
        self.types.get(&keyword.to_ascii_uppercase())
    }

    /// Look a keyword up in both tables.
    pub fn lookup(&self, keyword: &str) -> DescriptorMatch<'_> {
        let key = keyword.to_ascii_uppercase();
        match (self.entities.get(&key), self.types.get(&key)) {
            (Some(e), Some(t)) => DescriptorMatch::Both(e, t),
            (Some(e), None) => DescriptorMatch::Entity(e),
            (None, Some(t)) => DescriptorMatch::Type(t),
            (None, None) => DescriptorMatch::None,
        }
    }

    /// Number of entity descriptors.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of type descriptors.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_name_default() {
        let attr = AttributeDescriptor {
            name: "GlobalId".into(),
            property: None,
        };
        assert_eq!(attr.property_name(), "globalId");
        let attr = AttributeDescriptor::new("Name", "name_IfcRoot");
        assert_eq!(attr.property_name(), "name_IfcRoot");
    }

    #[test]
    fn test_type_descriptor_shapes() {
        let t = TypeDescriptor::new("IfcLineIndex", "LIST [2:?] OF IfcPositiveInteger;");
        assert_eq!(t.aggregate(), Some(Aggregate::List));
        assert_eq!(t.content_type(), "IfcPositiveInteger");
        assert_eq!(t.list_class_name().as_deref(), Some("IfcPositiveInteger_List"));

        let t = TypeDescriptor::new("IfcLabel", "STRING");
        assert_eq!(t.aggregate(), None);
        assert_eq!(t.content_type(), "STRING");
        assert_eq!(t.list_class_name(), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let tables = DescriptorTables::new(
            [EntityDescriptor::new("IfcWall", vec![AttributeDescriptor::new("Name", "name")])],
            [TypeDescriptor::new("IfcLabel", "STRING")],
        );
        assert!(matches!(tables.lookup("IFCWALL"), DescriptorMatch::Entity(e) if e.name == "IfcWall"));
        assert!(matches!(tables.lookup("ifclabel"), DescriptorMatch::Type(_)));
        assert!(matches!(tables.lookup("IFCSLAB"), DescriptorMatch::None));
    }

    #[test]
    fn test_lookup_both() {
        let tables = DescriptorTables::new(
            [EntityDescriptor::new("IfcThing", vec![])],
            [TypeDescriptor::new("IFCTHING", "STRING")],
        );
        assert!(matches!(tables.lookup("IfcThing"), DescriptorMatch::Both(_, _)));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "entities": [
                {"name": "IfcWall", "attributes": [
                    {"name": "GlobalId", "property": "globalId_IfcRoot"},
                    {"name": "Name"}
                ]}
            ],
            "types": [{"name": "IfcLabel", "primary_type": "STRING"}]
        }"#;
        let tables = DescriptorTables::from_json(json).unwrap();
        assert_eq!(tables.entity_count(), 1);
        assert_eq!(tables.type_count(), 1);
        let wall = tables.entity("IFCWALL").unwrap();
        assert_eq!(wall.attribute(1).unwrap().property_name(), "name");
        assert!(DescriptorTables::from_json("{\"entities\": 3}").is_err());
    }
}
