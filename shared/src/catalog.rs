use crate::{SpeciesDescriptor, CATALOG_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A species offered to the player under a trigger key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Key that adds one animal of this species, e.g. 'L'
    pub trigger: char,

    pub species: SpeciesDescriptor,
}

/// File format for species supplied from outside the engine.
///
/// The front-end registers every entry next to the built-in species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCatalog {
    /// Format version; must equal [`CATALOG_VERSION`]
    pub version: u32,

    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("trigger '{0}' is used by more than one species")]
    DuplicateTrigger(char),

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl SpeciesCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            version: CATALOG_VERSION,
            entries,
        }
    }

    /// Catalog of the built-in species, each triggered by its own glyph
    pub fn built_in() -> Self {
        let entries = SpeciesDescriptor::built_in()
            .into_iter()
            .map(|species| CatalogEntry {
                trigger: species.glyph,
                species,
            })
            .collect();
        Self::new(entries)
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: SpeciesCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the version and that no trigger is claimed twice
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version != CATALOG_VERSION {
            return Err(CatalogError::VersionMismatch {
                expected: CATALOG_VERSION,
                found: self.version,
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.trigger.to_ascii_uppercase()) {
                return Err(CatalogError::DuplicateTrigger(entry.trigger));
            }
        }

        Ok(())
    }
}
