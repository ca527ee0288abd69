//! Resource IRI minting.
//!
//! Entity-backed resources are named `base + TypeName + "_" + id`. Helper
//! resources (literal holders, list nodes) are named from a digest of a
//! content key, so the same content always yields the same IRI no matter
//! which thread mints it or in which order.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ifcrdf_graph::Iri;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Write};

/// Content key for a helper resource.
///
/// Each part is appended length-prefixed as `{len}:{part}`, so two keys
/// are equal only if their parts are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelperKey {
    text: String,
}

impl HelperKey {
    /// Empty key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part.
    pub fn part(mut self, part: impl Display) -> Self {
        let part = part.to_string();
        write!(self.text, "{}:{part}", part.len()).ok();
        self
    }

    /// Key text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for HelperKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Mints resource IRIs under a base IRI.
#[derive(Debug, Clone)]
pub struct ResourceMinter {
    base: String,
}

impl ResourceMinter {
    /// Create a minter for a base IRI (used as given).
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Base IRI.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// IRI of an entity-backed resource.
    pub fn entity(&self, type_name: &str, id: u64) -> Iri {
        Iri::new(format!("{}{}_{}", self.base, type_name, id))
    }

    /// IRI of a helper resource identified by content.
    pub fn helper(&self, type_name: &str, key: &HelperKey) -> Iri {
        let digest = Sha256::digest(key.as_str().as_bytes());
        Iri::new(format!(
            "{}{}_{}",
            self.base,
            type_name,
            URL_SAFE_NO_PAD.encode(digest)
        ))
    }
}
