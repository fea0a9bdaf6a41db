//! Variant warehouse records and query trait.
//!
//! The warehouse is position-oriented: a query key is either a genomic
//! position string (`"2:48000000"`) or a known accession id, and every hit
//! comes back with chromosome coordinates, the ids it is known under, the
//! per-study source entries, and (when computed) consequence-type
//! annotation.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// One variant as the warehouse reports it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionRecord {
    /// Chromosome name (warehouse naming, e.g. "2").
    pub chromosome: String,
    /// 1-based start position.
    pub start: u64,
    /// 1-based inclusive end position.
    pub end: Option<u64>,
    /// Reference allele.
    pub reference: String,
    /// Primary alternate allele.
    pub alternate: Option<String>,
    /// Known ids, mixed `rs` and `ss` prefixes.
    pub ids: Vec<String>,
    /// Variant type (e.g. "SNV").
    #[serde(rename = "type")]
    pub variant_type: Option<String>,
    /// Per-study entries, keyed by study/file identifier.
    pub source_entries: HashMap<String, SourceEntry>,
    /// Consequence-type annotation, when the warehouse has it.
    pub annotation: Option<Annotation>,
}

impl PositionRecord {
    /// The position key this record answers to.
    pub fn position_key(&self) -> String {
        format!("{}:{}", self.chromosome, self.start)
    }

    /// All distinct alternates: the primary one plus every secondary
    /// alternate across source entries, first occurrence order.
    pub fn all_alternates(&self) -> Vec<String> {
        let mut alternates: Vec<String> = Vec::new();
        if let Some(alternate) = &self.alternate {
            alternates.push(alternate.clone());
        }
        for entry in self.source_entries.values() {
            for secondary in &entry.secondary_alternates {
                if !alternates.contains(secondary) {
                    alternates.push(secondary.clone());
                }
            }
        }
        alternates
    }
}

/// Study-level detail attached to a warehouse record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceEntry {
    /// Alternates observed in this study beyond the primary one.
    pub secondary_alternates: Vec<String>,
}

/// Consequence-type annotation block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Annotation {
    /// Consequence types, one per overlapped transcript.
    pub consequence_types: Vec<ConsequenceType>,
}

/// One consequence-type entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsequenceType {
    /// Ensembl gene id.
    pub ensembl_gene_id: Option<String>,
    /// Ensembl transcript id.
    pub ensembl_transcript_id: Option<String>,
    /// Sequence Ontology terms for this transcript.
    pub so_terms: Vec<SoTerm>,
}

/// A Sequence Ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoTerm {
    /// Term name (e.g. "missense_variant").
    pub so_name: String,
    /// Term accession (e.g. "SO:0001583").
    pub so_accession: String,
}

/// Parameters accompanying every warehouse query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Species key the caller is browsing (e.g. "hsapiens_grch37").
    pub species: String,
}

impl QueryParams {
    /// Build params for a species key.
    pub fn for_species(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
        }
    }
}

/// Trait for querying the variant warehouse.
pub trait WarehouseSource {
    /// Fetch the records matching a position string or accession id.
    fn query(&self, key: &str, params: &QueryParams)
        -> Result<Vec<PositionRecord>, ReconcileError>;
}

/// Blanket implementation for boxed trait objects.
impl WarehouseSource for Box<dyn WarehouseSource> {
    fn query(
        &self,
        key: &str,
        params: &QueryParams,
    ) -> Result<Vec<PositionRecord>, ReconcileError> {
        (**self).query(key, params)
    }
}

/// In-memory warehouse source for tests, fixtures and the CLI.
///
/// A record answers to its `"{chromosome}:{start}"` position key and to any
/// of its known ids.
#[derive(Debug, Clone, Default)]
pub struct MockWarehouseSource {
    records: Vec<PositionRecord>,
}

impl MockWarehouseSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a JSON array file.
    pub fn from_json(path: &Path) -> Result<Self, ReconcileError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<PositionRecord> = serde_json::from_str(&content)?;
        Ok(Self { records })
    }

    /// Register a record.
    pub fn add_record(&mut self, record: PositionRecord) {
        self.records.push(record);
    }

    /// A populated source for tests and doc examples.
    ///
    /// Mirrors the `rs123`/`ss5000` human SNV from
    /// [`MockAccessionSource::with_test_data`](super::MockAccessionSource::with_test_data),
    /// reported under the warehouse's chromosome naming.
    pub fn with_test_data() -> Self {
        let mut source = Self::new();
        let mut source_entries = HashMap::new();
        source_entries.insert(
            "PRJEB0001_ERZ000001".to_string(),
            SourceEntry {
                secondary_alternates: vec![],
            },
        );
        source.add_record(PositionRecord {
            chromosome: "2".to_string(),
            start: 1000,
            end: Some(1000),
            reference: "A".to_string(),
            alternate: Some("T".to_string()),
            ids: vec!["rs123".to_string(), "ss5000".to_string()],
            variant_type: Some("SNV".to_string()),
            source_entries,
            annotation: Some(Annotation {
                consequence_types: vec![ConsequenceType {
                    ensembl_gene_id: Some("ENSG00000115904".to_string()),
                    ensembl_transcript_id: Some("ENST00000402219".to_string()),
                    so_terms: vec![SoTerm {
                        so_name: "missense_variant".to_string(),
                        so_accession: "SO:0001583".to_string(),
                    }],
                }],
            }),
        });
        source
    }
}

impl WarehouseSource for MockWarehouseSource {
    fn query(
        &self,
        key: &str,
        _params: &QueryParams,
    ) -> Result<Vec<PositionRecord>, ReconcileError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.position_key() == key || record.ids.iter().any(|id| id == key))
            .cloned()
            .collect())
    }
}
