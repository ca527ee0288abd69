//! Conversion options.

use crate::error::{ConvertError, Result};
use ifcrdf_graph::DEFAULT_QUEUE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one conversion run.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// base_uri = "http://example.org/model/"
/// dedup_literal_resources = true
/// threads = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Prefix of every minted resource IRI.
    pub base_uri: String,
    /// Merge records with identical content before resolving references.
    pub remove_duplicates: bool,
    /// Share literal holder resources across records by content.
    pub dedup_literal_resources: bool,
    /// Events buffered in front of the writer before producers block.
    pub queue_capacity: usize,
    /// Size of the mapping thread pool (rayon's global pool if unset).
    pub threads: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            base_uri: "http://linkedbuildingdata.net/ifc/resources/".into(),
            remove_duplicates: true,
            dedup_literal_resources: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            threads: None,
        }
    }
}

impl ConvertOptions {
    /// Create options with a base IRI and defaults for everything else.
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Self::default()
        }
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: Self =
            toml::from_str(text).map_err(|e| ConvertError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate options.
    pub fn validate(&self) -> Result<()> {
        if self.base_uri.trim().is_empty() {
            return Err(ConvertError::Config("base_uri must not be empty".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ConvertError::Config(
                "queue_capacity must be positive".into(),
            ));
        }
        if self.threads == Some(0) {
            return Err(ConvertError::Config("threads must be positive".into()));
        }
        Ok(())
    }
}
