//! Classification of property ranges against the ontology.

use ifcrdf_graph::vocab::{express, list};
use ifcrdf_schema::OntologySchema;
use std::collections::{HashSet, VecDeque};
use tracing::warn;

/// EXPRESS primitive underlying a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Primitive {
    String,
    Real,
    Integer,
    Binary,
    Boolean,
    Logical,
    Number,
}

impl Primitive {
    const ALL: [Primitive; 7] = [
        Self::String,
        Self::Real,
        Self::Integer,
        Self::Binary,
        Self::Boolean,
        Self::Logical,
        Self::Number,
    ];

    fn class(self) -> &'static str {
        match self {
            Self::String => express::STRING,
            Self::Real => express::REAL,
            Self::Integer => express::INTEGER,
            Self::Binary => express::BINARY,
            Self::Boolean => express::BOOLEAN,
            Self::Logical => express::LOGICAL,
            Self::Number => express::NUMBER,
        }
    }

    /// Exact match against the EXPRESS primitive classes.
    fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.class() == class)
    }

    /// Short datatype name used in literal content keys.
    pub(crate) fn datatype_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Real | Self::Number => "double",
            Self::Integer => "integer",
            Self::Binary => "hexBinary",
            Self::Boolean => "boolean",
            Self::Logical => "logical",
        }
    }

    /// `express:has*` property carrying the value.
    pub(crate) fn value_property(self) -> &'static str {
        match self {
            Self::String => express::HAS_STRING,
            Self::Real | Self::Number => express::HAS_DOUBLE,
            Self::Integer => express::HAS_INTEGER,
            Self::Binary => express::HAS_HEX_BINARY,
            Self::Boolean => express::HAS_BOOLEAN,
            Self::Logical => express::HAS_LOGICAL,
        }
    }

    /// `express:X_List` wrapper class.
    fn list_class(self) -> String {
        format!("{}_List", self.class())
    }
}

/// How a value for a property range is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeKind {
    Enumeration,
    Select,
    List,
    Primitive(Primitive),
    /// Entity class (or anything else without a literal encoding).
    Other,
}

pub(crate) fn classify(ontology: &dyn OntologySchema, range: &str) -> RangeKind {
    if ontology.is_subclass_of(range, express::ENUMERATION) {
        RangeKind::Enumeration
    } else if ontology.is_subclass_of(range, express::SELECT) {
        RangeKind::Select
    } else if ontology.is_subclass_of(range, list::OWL_LIST) {
        RangeKind::List
    } else if let Some(primitive) = primitive_of(ontology, range) {
        RangeKind::Primitive(primitive)
    } else {
        RangeKind::Other
    }
}

pub(crate) fn is_list(ontology: &dyn OntologySchema, class: &str) -> bool {
    ontology.is_subclass_of(class, list::OWL_LIST)
}

pub(crate) fn is_enumeration(ontology: &dyn OntologySchema, class: &str) -> bool {
    ontology.is_subclass_of(class, express::ENUMERATION)
}

/// Primitive of a class: direct match first, then breadth-first over superclasses.
pub(crate) fn primitive_of(ontology: &dyn OntologySchema, class: &str) -> Option<Primitive> {
    if let Some(p) = Primitive::from_class(class) {
        return Some(p);
    }
    let mut seen: HashSet<&str> = HashSet::from([class]);
    let mut queue: VecDeque<&str> = VecDeque::from([class]);
    while let Some(current) = queue.pop_front() {
        for sup in ontology.super_classes(current) {
            if let Some(p) = Primitive::from_class(sup) {
                return Some(p);
            }
            if seen.insert(sup.as_str()) {
                queue.push_back(sup.as_str());
            }
        }
    }
    None
}

/// Part of a class IRI after the last `#` or `/`.
pub(crate) fn local_name(class: &str) -> &str {
    class.rsplit(['#', '/']).next().unwrap_or(class)
}

/// Local name of a list wrapper without its `_List` suffix.
pub(crate) fn list_element_name(local: &str) -> Option<&str> {
    local.strip_suffix("_List")
}

/// Element class of a list wrapper class.
///
/// `express:X_List` (or a subclass) holds `express:X`; any other
/// `Foo_List` wrapper in the schema namespace holds `Foo`.
pub(crate) fn list_content_type(ontology: &dyn OntologySchema, class: &str) -> Option<String> {
    for primitive in Primitive::ALL {
        if ontology.is_subclass_of(class, &primitive.list_class()) {
            return Some(primitive.class().to_string());
        }
    }
    if is_list(ontology, class) {
        if let Some(element) = list_element_name(local_name(class)) {
            return Some(ontology.schema_iri(element));
        }
    }
    warn!(class, "cannot determine the element class of list");
    None
}
