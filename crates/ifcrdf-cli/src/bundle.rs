//! Schema bundles on disk: one directory per IFC release holding the
//! descriptor tables and the ontology as JSON.

use anyhow::{Context, Result};
use ifcrdf_schema::{DescriptorTables, Ontology};
use ifcrdf_step::SchemaVersion;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const DESCRIPTORS_FILE: &str = "descriptors.json";
pub const ONTOLOGY_FILE: &str = "ontology.json";

/// Descriptor tables and ontology for one schema version.
pub struct SchemaBundle {
    pub version: SchemaVersion,
    pub tables: DescriptorTables,
    pub ontology: Ontology,
}

impl SchemaBundle {
    /// Load `<dir>/<version name>/{descriptors,ontology}.json`.
    pub fn load(dir: &Path, version: SchemaVersion) -> Result<Self> {
        let root = dir.join(version.name());
        let descriptors = root.join(DESCRIPTORS_FILE);
        let tables = DescriptorTables::load(&descriptors)
            .with_context(|| format!("Failed to load descriptors from {}", descriptors.display()))?;
        let ontology_path = root.join(ONTOLOGY_FILE);
        let ontology = Ontology::load(&ontology_path)
            .with_context(|| format!("Failed to load ontology from {}", ontology_path.display()))?;

        info!(
            schema = %version,
            entities = tables.entity_count(),
            types = tables.type_count(),
            classes = ontology.class_count(),
            properties = ontology.property_count(),
            "loaded schema bundle"
        );
        Ok(Self {
            version,
            tables,
            ontology,
        })
    }
}

/// Bundles loaded on first use, so a directory run pays for each release once.
pub struct BundleCache {
    dir: PathBuf,
    loaded: HashMap<SchemaVersion, Arc<SchemaBundle>>,
}

impl BundleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loaded: HashMap::new(),
        }
    }

    pub fn get(&mut self, version: SchemaVersion) -> Result<Arc<SchemaBundle>> {
        if let Some(bundle) = self.loaded.get(&version) {
            return Ok(Arc::clone(bundle));
        }
        let bundle = Arc::new(SchemaBundle::load(&self.dir, version)?);
        self.loaded.insert(version, Arc::clone(&bundle));
        Ok(bundle)
    }
}
