//! Accessioning service records and query trait.
//!
//! The accessioning service answers by accession number within a category
//! (`clustered-variants` or `submitted-variants`) and wraps each hit in an
//! envelope of `{accession, data}`. Payload fields differ slightly between
//! the categories: clustered records carry `assemblyAccession` and a variant
//! type, submitted records carry `referenceSequenceAccession` and a link to
//! their clustered accession. One lenient struct covers both.

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::accession::AccessionCategory;
use crate::error::ReconcileError;

/// One hit from the accessioning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessionRecord {
    /// Bare accession number (prefix is implied by the query category).
    pub accession: u64,
    /// Record payload.
    pub data: AccessionData,
}

/// Payload of an accessioning service record.
///
/// Every field is optional or defaultable: partially-populated upstream
/// records deserialize rather than fail, and absent fields stay absent on
/// the canonical record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessionData {
    /// NCBI taxonomy id.
    pub taxonomy_accession: Option<u32>,
    /// Contig name as the accessioning service knows it.
    pub contig: String,
    /// 1-based start position.
    pub start: u64,
    /// Reference allele.
    pub reference_allele: String,
    /// Alternate allele; absent on some clustered records.
    pub alternate_allele: Option<String>,
    /// Assembly accession (clustered records).
    pub assembly_accession: Option<String>,
    /// Assembly accession (submitted records).
    pub reference_sequence_accession: Option<String>,
    /// Clustered accession this submission belongs to (submitted records).
    pub clustered_variant_accession: Option<u64>,
    /// Variant has supporting evidence.
    pub supported_by_evidence: Option<bool>,
    /// Alleles match the reference assembly.
    pub assembly_match: Option<bool>,
    /// Variant passed allele checks.
    pub alleles_match: Option<bool>,
    /// Variant was validated.
    pub validated: Option<bool>,
    /// Creation timestamp, ISO-8601 without offset.
    pub created_date: Option<String>,
    /// Variant type (e.g. "SNV").
    #[serde(rename = "type")]
    pub variant_type: Option<String>,
}

impl AccessionData {
    /// The assembly this record was reported against, per category.
    pub fn assembly(&self, category: AccessionCategory) -> Option<&str> {
        match category {
            AccessionCategory::SubmittedVariants => self.reference_sequence_accession.as_deref(),
            AccessionCategory::ClusteredVariants => self.assembly_accession.as_deref(),
        }
    }

    /// Parse `created_date` leniently.
    ///
    /// Accepts datetimes with or without fractional seconds, or a bare date.
    pub fn parsed_created_date(&self) -> Option<NaiveDateTime> {
        let raw = self.created_date.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

/// Trait for querying the accessioning service.
pub trait AccessionSource {
    /// Fetch the records registered under an accession number.
    fn query(
        &self,
        category: AccessionCategory,
        accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError>;

    /// Fetch the submitted records clustered under an `rs` accession.
    fn submitted_for_clustered(&self, accession: u64)
        -> Result<Vec<AccessionRecord>, ReconcileError>;
}

/// Blanket implementation for boxed trait objects.
impl AccessionSource for Box<dyn AccessionSource> {
    fn query(
        &self,
        category: AccessionCategory,
        accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError> {
        (**self).query(category, accession)
    }

    fn submitted_for_clustered(
        &self,
        accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError> {
        (**self).submitted_for_clustered(accession)
    }
}

/// In-memory accessioning source for tests, fixtures and the CLI.
///
/// The clustered-to-submitted association is derived from each submitted
/// record's `clusteredVariantAccession` field, the way the service itself
/// resolves the `/submitted` resource.
#[derive(Debug, Clone, Default)]
pub struct MockAccessionSource {
    clustered: HashMap<u64, Vec<AccessionRecord>>,
    submitted: HashMap<u64, Vec<AccessionRecord>>,
}

/// Fixture file layout for [`MockAccessionSource::from_json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct AccessionFixture {
    clustered: Vec<AccessionRecord>,
    submitted: Vec<AccessionRecord>,
}

impl MockAccessionSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a JSON file of `{"clustered": [...], "submitted": [...]}`.
    pub fn from_json(path: &Path) -> Result<Self, ReconcileError> {
        let content = std::fs::read_to_string(path)?;
        let fixture: AccessionFixture = serde_json::from_str(&content)?;
        let mut source = Self::new();
        for record in fixture.clustered {
            source.add_clustered(record);
        }
        for record in fixture.submitted {
            source.add_submitted(record);
        }
        Ok(source)
    }

    /// Register a clustered (`rs`) record.
    pub fn add_clustered(&mut self, record: AccessionRecord) {
        self.clustered.entry(record.accession).or_default().push(record);
    }

    /// Register a submitted (`ss`) record.
    pub fn add_submitted(&mut self, record: AccessionRecord) {
        self.submitted.entry(record.accession).or_default().push(record);
    }

    /// A populated source for tests and doc examples.
    ///
    /// Carries one human SNV known to both services (rs123 clustering
    /// ss5000) and one mouse record for species-mismatch coverage.
    pub fn with_test_data() -> Self {
        let mut source = Self::new();
        source.add_clustered(AccessionRecord {
            accession: 123,
            data: AccessionData {
                taxonomy_accession: Some(9606),
                contig: "CM000664.1".to_string(),
                start: 1000,
                reference_allele: "A".to_string(),
                alternate_allele: Some("T".to_string()),
                assembly_accession: Some("GCA_000001405.1".to_string()),
                created_date: Some("2017-04-24T06:36:48.649".to_string()),
                variant_type: Some("SNV".to_string()),
                ..Default::default()
            },
        });
        source.add_submitted(AccessionRecord {
            accession: 5000,
            data: AccessionData {
                taxonomy_accession: Some(9606),
                contig: "CM000664.1".to_string(),
                start: 1000,
                reference_allele: "A".to_string(),
                alternate_allele: Some("T".to_string()),
                reference_sequence_accession: Some("GCF_000001405.1".to_string()),
                clustered_variant_accession: Some(123),
                supported_by_evidence: Some(true),
                assembly_match: Some(true),
                alleles_match: Some(true),
                validated: Some(false),
                created_date: Some("2015-04-06T18:05:28".to_string()),
                ..Default::default()
            },
        });
        source.add_clustered(AccessionRecord {
            accession: 777,
            data: AccessionData {
                taxonomy_accession: Some(10090),
                contig: "CM000994.2".to_string(),
                start: 52000,
                reference_allele: "G".to_string(),
                alternate_allele: Some("C".to_string()),
                assembly_accession: Some("GCA_000001635.2".to_string()),
                variant_type: Some("SNV".to_string()),
                ..Default::default()
            },
        });
        source
    }
}

impl AccessionSource for MockAccessionSource {
    fn query(
        &self,
        category: AccessionCategory,
        accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError> {
        let table = match category {
            AccessionCategory::ClusteredVariants => &self.clustered,
            AccessionCategory::SubmittedVariants => &self.submitted,
        };
        Ok(table.get(&accession).cloned().unwrap_or_default())
    }

    fn submitted_for_clustered(
        &self,
        accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError> {
        let mut records: Vec<AccessionRecord> = self
            .submitted
            .values()
            .flatten()
            .filter(|record| record.data.clustered_variant_accession == Some(accession))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.accession);
        Ok(records)
    }
}
