//! Ontology schema: class hierarchy, property ranges and enumeration individuals.
//!
//! The mapper only needs a handful of questions answered, so the store is
//! a trait. [`Ontology`] is the in-memory implementation, built by hand or
//! loaded from a JSON document.

use crate::error::SchemaError;
use ifcrdf_graph::vocab::{express, list, owl, rdf, rdfs, xsd};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

/// A named individual of a class, e.g. an enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Individual IRI.
    pub iri: String,
    /// Label used for matching (e.g. `ELEMENT`).
    pub label: String,
}

/// Read-only view of the ontology used during mapping.
pub trait OntologySchema: Send + Sync {
    /// Schema namespace, including the trailing `#`.
    fn namespace(&self) -> &str;

    /// True if the class is declared.
    fn contains_class(&self, class: &str) -> bool;

    /// Declared range of a property.
    fn property_range(&self, property: &str) -> Option<&str>;

    /// Direct named superclasses.
    fn super_classes(&self, class: &str) -> &[String];

    /// Individuals typed with the class.
    fn individuals(&self, class: &str) -> &[Individual];

    /// Reflexive, transitive subclass test.
    fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        if class == ancestor {
            return true;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            for sup in self.super_classes(current) {
                if sup == ancestor {
                    return true;
                }
                if seen.insert(sup.as_str()) {
                    queue.push_back(sup.as_str());
                }
            }
        }
        false
    }

    /// IRI of a term in the schema namespace.
    fn schema_iri(&self, local: &str) -> String {
        format!("{}{}", self.namespace(), local)
    }
}

#[derive(Debug, Clone, Default)]
struct ClassEntry {
    super_classes: Vec<String>,
    individuals: Vec<Individual>,
}

/// In-memory ontology.
#[derive(Debug, Clone)]
pub struct Ontology {
    namespace: String,
    classes: HashMap<String, ClassEntry>,
    properties: HashMap<String, String>,
}

const PRIMITIVES: [&str; 7] = [
    express::STRING,
    express::REAL,
    express::INTEGER,
    express::BINARY,
    express::BOOLEAN,
    express::LOGICAL,
    express::NUMBER,
];

impl Ontology {
    /// Create an empty ontology for a schema namespace.
    ///
    /// A namespace without a trailing `#` or `/` gets a `#` appended.
    pub fn new(namespace: impl Into<String>) -> Self {
        let mut namespace = namespace.into();
        if !namespace.ends_with('#') && !namespace.ends_with('/') {
            namespace.push('#');
        }
        Self {
            namespace,
            classes: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    /// Create an ontology that already declares the EXPRESS and list vocabularies.
    ///
    /// This covers the primitive classes, their `*_List` wrappers,
    /// `ENUMERATION`, `SELECT`, `OWLList` and the logical individuals.
    pub fn with_express_vocabulary(namespace: impl Into<String>) -> Self {
        let mut ont = Self::new(namespace);
        ont.add_root_class(list::OWL_LIST);
        ont.add_root_class(express::ENUMERATION);
        ont.add_root_class(express::SELECT);
        for primitive in PRIMITIVES {
            ont.add_root_class(primitive);
            ont.add_class(format!("{primitive}_List"), [list::OWL_LIST]);
        }
        ont.add_individual(express::LOGICAL, express::TRUE, "TRUE");
        ont.add_individual(express::LOGICAL, express::FALSE, "FALSE");
        ont.add_individual(express::LOGICAL, express::UNKNOWN, "UNKNOWN");
        ont
    }

    /// Declare a class with direct superclasses. Repeated calls merge superclasses.
    pub fn add_class<I, S>(&mut self, class: impl Into<String>, super_classes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.classes.entry(class.into()).or_default();
        for sup in super_classes {
            let sup = sup.into();
            if !entry.super_classes.contains(&sup) {
                entry.super_classes.push(sup);
            }
        }
        self
    }

    fn add_root_class(&mut self, class: &str) {
        self.add_class(class, std::iter::empty::<String>());
    }

    /// Declare an individual of a class (declaring the class if needed).
    pub fn add_individual(
        &mut self,
        class: impl Into<String>,
        iri: impl Into<String>,
        label: impl Into<String>,
    ) -> &mut Self {
        self.classes
            .entry(class.into())
            .or_default()
            .individuals
            .push(Individual {
                iri: iri.into(),
                label: label.into(),
            });
        self
    }

    /// Declare a property with its range.
    pub fn add_property(&mut self, property: impl Into<String>, range: impl Into<String>) -> &mut Self {
        self.properties.insert(property.into(), range.into());
        self
    }

    /// Number of declared classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of declared properties.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Parse a JSON ontology document on top of the EXPRESS vocabulary.
    ///
    /// IRIs may be written as `prefix:local` using the standard prefixes
    /// (`ifc`, `express`, `list`, `rdf`, `rdfs`, `xsd`, `owl`) or any prefix
    /// declared in the document's `prefixes` map.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let doc: OntologyDocument = serde_json::from_str(json)?;
        if doc.namespace.is_empty() {
            return Err(SchemaError::invalid("ontology namespace is empty"));
        }
        let mut ont = Self::with_express_vocabulary(doc.namespace);

        let mut prefixes: HashMap<String, String> = [
            ("ifc", ont.namespace.as_str()),
            ("express", express::NS),
            ("list", list::NS),
            ("rdf", rdf::NS),
            ("rdfs", rdfs::NS),
            ("xsd", xsd::NS),
            ("owl", owl::NS),
        ]
        .into_iter()
        .map(|(p, ns)| (p.to_string(), ns.to_string()))
        .collect();
        prefixes.extend(doc.prefixes);
        let expand = |iri: &str| expand_iri(&prefixes, iri);

        for class in &doc.classes {
            let iri = expand(class.iri.as_str());
            ont.add_class(iri.clone(), class.super_classes.iter().map(|s| expand(s.as_str())));
            for individual in &class.individuals {
                ont.add_individual(iri.clone(), expand(individual.iri.as_str()), individual.label.clone());
            }
        }
        for property in &doc.properties {
            ont.add_property(expand(property.iri.as_str()), expand(property.range.as_str()));
        }
        Ok(ont)
    }

    /// Load a JSON ontology document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl OntologySchema for Ontology {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn contains_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    fn property_range(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    fn super_classes(&self, class: &str) -> &[String] {
        self.classes
            .get(class)
            .map(|c| c.super_classes.as_slice())
            .unwrap_or(&[])
    }

    fn individuals(&self, class: &str) -> &[Individual] {
        self.classes
            .get(class)
            .map(|c| c.individuals.as_slice())
            .unwrap_or(&[])
    }
}

fn expand_iri(prefixes: &HashMap<String, String>, iri: &str) -> String {
    if iri.contains("://") {
        return iri.to_string();
    }
    match iri.split_once(':') {
        Some((prefix, local)) => match prefixes.get(prefix) {
            Some(ns) => format!("{ns}{local}"),
            None => iri.to_string(),
        },
        None => iri.to_string(),
    }
}

#[derive(Deserialize)]
struct OntologyDocument {
    namespace: String,
    #[serde(default)]
    prefixes: HashMap<String, String>,
    #[serde(default)]
    classes: Vec<ClassDocument>,
    #[serde(default)]
    properties: Vec<PropertyDocument>,
}

#[derive(Deserialize)]
struct ClassDocument {
    iri: String,
    #[serde(default)]
    super_classes: Vec<String>,
    #[serde(default)]
    individuals: Vec<Individual>,
}

#[derive(Deserialize)]
struct PropertyDocument {
    iri: String,
    range: String,
}
