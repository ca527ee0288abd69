//! Vocabulary constants.
//!
//! Constants are organized by vocabulary:
//! - `rdf`, `rdfs`, `xsd`, `owl` - W3C vocabularies
//! - `express` - EXPRESS primitive types, logical individuals and value properties
//! - `list` - the `hasContents`/`hasNext` list encoding

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// RDFS namespace
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:hexBinary IRI
    pub const HEX_BINARY: &str = "http://www.w3.org/2001/XMLSchema#hexBinary";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}

/// OWL vocabulary constants
pub mod owl {
    /// OWL namespace
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";

    /// owl:Ontology IRI
    pub const ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";

    /// owl:imports IRI
    pub const IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";

    /// owl:sameAs IRI
    pub const SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
}

/// EXPRESS vocabulary constants
pub mod express {
    /// EXPRESS namespace
    pub const NS: &str = "https://w3id.org/express#";

    /// Superclass of all enumeration types
    pub const ENUMERATION: &str = "https://w3id.org/express#ENUMERATION";

    /// Superclass of all select types
    pub const SELECT: &str = "https://w3id.org/express#SELECT";

    /// express:STRING
    pub const STRING: &str = "https://w3id.org/express#STRING";

    /// express:REAL
    pub const REAL: &str = "https://w3id.org/express#REAL";

    /// express:INTEGER
    pub const INTEGER: &str = "https://w3id.org/express#INTEGER";

    /// express:BINARY
    pub const BINARY: &str = "https://w3id.org/express#BINARY";

    /// express:BOOLEAN
    pub const BOOLEAN: &str = "https://w3id.org/express#BOOLEAN";

    /// express:LOGICAL
    pub const LOGICAL: &str = "https://w3id.org/express#LOGICAL";

    /// express:NUMBER
    pub const NUMBER: &str = "https://w3id.org/express#NUMBER";

    /// Logical TRUE individual
    pub const TRUE: &str = "https://w3id.org/express#TRUE";

    /// Logical FALSE individual
    pub const FALSE: &str = "https://w3id.org/express#FALSE";

    /// Logical UNKNOWN individual
    pub const UNKNOWN: &str = "https://w3id.org/express#UNKNOWN";

    /// Value property for strings
    pub const HAS_STRING: &str = "https://w3id.org/express#hasString";

    /// Value property for reals and numbers
    pub const HAS_DOUBLE: &str = "https://w3id.org/express#hasDouble";

    /// Value property for integers
    pub const HAS_INTEGER: &str = "https://w3id.org/express#hasInteger";

    /// Value property for binaries
    pub const HAS_HEX_BINARY: &str = "https://w3id.org/express#hasHexBinary";

    /// Value property for booleans
    pub const HAS_BOOLEAN: &str = "https://w3id.org/express#hasBoolean";

    /// Value property for logicals
    pub const HAS_LOGICAL: &str = "https://w3id.org/express#hasLogical";
}

/// List encoding vocabulary constants
pub mod list {
    /// List namespace
    pub const NS: &str = "https://w3id.org/list#";

    /// Superclass of all list wrapper classes
    pub const OWL_LIST: &str = "https://w3id.org/list#OWLList";

    /// Links a list node to its element
    pub const HAS_CONTENTS: &str = "https://w3id.org/list#hasContents";

    /// Links a list node to the following node
    pub const HAS_NEXT: &str = "https://w3id.org/list#hasNext";
}
