//! Species and assembly reference data.
//!
//! The archive identifies a searchable species by a key of the form
//! `"{taxonomy_code}_{assembly_code}"` (e.g. `hsapiens_grch37`). The static
//! table behind that key translates the taxonomy/assembly pair reported by
//! the accessioning service into the display key, and carries the INSDC
//! assembly accession shown in summaries. The table is an explicit immutable
//! value handed to the [`Reconciler`](crate::reconcile::Reconciler) at
//! construction; it is loaded once per process and never mutated.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// One row of the species reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDescriptor {
    /// Short taxonomy code (e.g. "hsapiens").
    pub taxonomy_code: String,
    /// NCBI taxonomy id (e.g. 9606).
    pub taxonomy_id: u32,
    /// Short assembly code (e.g. "grch37").
    pub assembly_code: String,
    /// INSDC assembly accession (e.g. "GCA_000001405.1").
    pub assembly_accession: String,
    /// Human-readable species name (e.g. "human").
    pub taxonomy_eva_name: String,
}

impl SpeciesDescriptor {
    /// The species key used throughout the archive UI and query parameters.
    pub fn key(&self) -> String {
        format!("{}_{}", self.taxonomy_code, self.assembly_code)
    }
}

/// Immutable species reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesList(Vec<SpeciesDescriptor>);

impl SpeciesList {
    /// Create a species list from descriptors.
    pub fn new(descriptors: Vec<SpeciesDescriptor>) -> Self {
        Self(descriptors)
    }

    /// Load a species list from a JSON array file.
    pub fn from_json(path: &Path) -> Result<Self, ReconcileError> {
        let content = std::fs::read_to_string(path)?;
        let descriptors: Vec<SpeciesDescriptor> = serde_json::from_str(&content)?;
        Ok(Self(descriptors))
    }

    /// Iterate over the descriptors in table order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesDescriptor> {
        self.0.iter()
    }

    /// Number of species rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the descriptor matching a record's taxonomy id and assembly.
    ///
    /// Assemblies are compared with [`assemblies_equivalent`], so a record
    /// reported against a RefSeq (`GCF_`) assembly still resolves to the
    /// table's GenBank (`GCA_`) row.
    pub fn find_for_record(&self, taxonomy_id: u32, assembly: &str) -> Option<&SpeciesDescriptor> {
        self.0.iter().find(|descriptor| {
            descriptor.taxonomy_id == taxonomy_id
                && assemblies_equivalent(&descriptor.assembly_accession, assembly)
        })
    }

    /// Find the descriptor for a species key.
    pub fn find_by_key(&self, species_key: &str) -> Option<&SpeciesDescriptor> {
        self.0.iter().find(|descriptor| descriptor.key() == species_key)
    }

    /// The INSDC assembly accession for a species key.
    pub fn assembly_of(&self, species_key: &str) -> Option<&str> {
        self.find_by_key(species_key)
            .map(|descriptor| descriptor.assembly_accession.as_str())
    }

    /// Capitalized organism name for a species key.
    ///
    /// Matches on the taxonomy-code half of the key, as the archive UI does.
    pub fn organism_name(&self, species_key: &str) -> Option<String> {
        let taxonomy_code = species_key.split('_').next().unwrap_or(species_key);
        let descriptor = self
            .0
            .iter()
            .find(|descriptor| descriptor.taxonomy_code == taxonomy_code)?;
        let name = &descriptor.taxonomy_eva_name;
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        Some(capitalized)
    }

    /// A small table for tests and doc examples.
    pub fn with_test_data() -> Self {
        Self::new(vec![
            SpeciesDescriptor {
                taxonomy_code: "hsapiens".to_string(),
                taxonomy_id: 9606,
                assembly_code: "grch37".to_string(),
                assembly_accession: "GCA_000001405.1".to_string(),
                taxonomy_eva_name: "human".to_string(),
            },
            SpeciesDescriptor {
                taxonomy_code: "hsapiens".to_string(),
                taxonomy_id: 9606,
                assembly_code: "grch38".to_string(),
                assembly_accession: "GCA_000001405.15".to_string(),
                taxonomy_eva_name: "human".to_string(),
            },
            SpeciesDescriptor {
                taxonomy_code: "mmusculus".to_string(),
                taxonomy_id: 10090,
                assembly_code: "grcm38".to_string(),
                assembly_accession: "GCA_000001635.2".to_string(),
                taxonomy_eva_name: "mouse".to_string(),
            },
        ])
    }
}

/// Check whether two assembly accessions name the same assembly.
///
/// Both sides are trimmed and lowercased, and a leading `GCF_` (RefSeq)
/// accession is treated as interchangeable with its `GCA_` (GenBank)
/// counterpart. Empty input never matches anything.
pub fn assemblies_equivalent(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.replacen("gcf", "gca", 1) == b.replacen("gcf", "gca", 1)
}
