//! Header section inspection: which IFC schema a file was written against.

use crate::error::StepError;
use std::fmt;
use std::io::BufRead;

/// IFC schema releases with a published OWL ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// IFC2x3 TC1.
    Ifc2x3Tc1,
    /// IFC4 ADD1.
    Ifc4Add1,
    /// IFC4.1.
    Ifc4x1,
    /// IFC4.3 RC1.
    Ifc4x3Rc1,
}

impl SchemaVersion {
    /// All known versions.
    pub const ALL: [SchemaVersion; 4] = [
        SchemaVersion::Ifc2x3Tc1,
        SchemaVersion::Ifc4Add1,
        SchemaVersion::Ifc4x1,
        SchemaVersion::Ifc4x3Rc1,
    ];

    /// Map a `FILE_SCHEMA` identifier (or the whole header line) to a version.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let upper = identifier.to_ascii_uppercase();
        if upper.contains("IFC2X3") {
            Some(Self::Ifc2x3Tc1)
        } else if upper.contains("IFC4X3") {
            Some(Self::Ifc4x3Rc1)
        } else if upper.contains("IFC4X1") {
            Some(Self::Ifc4x1)
        } else if upper.contains("IFC4") {
            Some(Self::Ifc4Add1)
        } else {
            None
        }
    }

    /// Name of the schema bundle (EXPRESS schema name).
    pub fn name(self) -> &'static str {
        match self {
            Self::Ifc2x3Tc1 => "IFC2X3_TC1",
            Self::Ifc4Add1 => "IFC4_ADD1",
            Self::Ifc4x1 => "IFC4x1",
            Self::Ifc4x3Rc1 => "IFC4x3_RC1",
        }
    }

    /// URI of the published ontology (without trailing `#`).
    pub fn ontology_uri(self) -> String {
        let path = match self {
            Self::Ifc2x3Tc1 => "IFC2x3/TC1/",
            Self::Ifc4Add1 => "IFC4/ADD1/",
            Self::Ifc4x1 => "IFC4_1/",
            Self::Ifc4x3Rc1 => "IFC4_3/RC1/",
        };
        format!("http://standards.buildingsmart.org/IFC/DEV/{path}OWL")
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scan the header for a `FILE_SCHEMA` line and detect the schema version.
///
/// Stops at the first `FILE_SCHEMA` line or at the start of the data section.
pub fn detect_schema<R: BufRead>(reader: R) -> Result<Option<SchemaVersion>, StepError> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_start();
        if line.starts_with("FILE_SCHEMA") {
            return Ok(SchemaVersion::from_identifier(line));
        }
        if line.starts_with("DATA;") {
            break;
        }
    }
    Ok(None)
}
