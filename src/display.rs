//! Display shaping for canonical variant records.
//!
//! Everything here is a pure transform from records to label/value data;
//! rendering (HTML, terminal tables) is left to the caller. The lookup
//! tables that drive it (summary field labels and the consequence-type
//! color/impact palette) are owned configuration values, not globals.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::reconcile::{SubmittedVariant, VariantRecord};

/// Tooltip explaining the allele-check flag.
pub const ALLELES_MATCH_TOOLTIP: &str = "1) Reference allele appears in the list of alleles \
     that were submitted and 2) Locus orientation was determined definitively";

/// Column headers for the submitted-variants table.
pub const SUBMITTED_HEADERS: [&str; 7] = [
    "ID",
    "Contig",
    "Start",
    "End",
    "Reference",
    "Alternate",
    "Created Date",
];

/// Display form of an allele; an empty allele renders as `-`.
pub fn allele_repr(allele: &str) -> String {
    if allele.is_empty() {
        "-".to_string()
    } else {
        allele.to_string()
    }
}

/// Display form of a variant's alleles, e.g. `A/T` or `-/TG`.
pub fn variant_repr(reference: &str, alternate: &str) -> String {
    format!("{}/{}", allele_repr(reference), allele_repr(alternate))
}

/// Render a tri-state flag as `Yes`, `No` or the empty string.
pub fn yes_no_empty(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "",
    }
}

/// Render a creation timestamp as e.g. `April 24, 2017`.
pub fn format_created_date(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Fields of the variant summary table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Organism,
    Assembly,
    Contig,
    Start,
    End,
    Reference,
    Alternate,
    Id,
    Orientation,
    Type,
    Evidence,
    AssemblyMatch,
    AllelesMatch,
    Validated,
    CreatedDate,
}

impl SummaryField {
    const ALL: [SummaryField; 15] = [
        SummaryField::Organism,
        SummaryField::Assembly,
        SummaryField::Contig,
        SummaryField::Start,
        SummaryField::End,
        SummaryField::Reference,
        SummaryField::Alternate,
        SummaryField::Id,
        SummaryField::Orientation,
        SummaryField::Type,
        SummaryField::Evidence,
        SummaryField::AssemblyMatch,
        SummaryField::AllelesMatch,
        SummaryField::Validated,
        SummaryField::CreatedDate,
    ];

    /// The column label shown for this field.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryField::Organism => "Organism",
            SummaryField::Assembly => "Assembly",
            SummaryField::Contig => "Contig",
            SummaryField::Start => "Start",
            SummaryField::End => "End",
            SummaryField::Reference => "Reference",
            SummaryField::Alternate => "Alternate",
            SummaryField::Id => "ID",
            SummaryField::Orientation => "Orientation",
            SummaryField::Type => "Type",
            SummaryField::Evidence => "Evidence?",
            SummaryField::AssemblyMatch => "Alleles match reference assembly?",
            SummaryField::AllelesMatch => "Passed allele checks?",
            SummaryField::Validated => "Validated?",
            SummaryField::CreatedDate => "Created Date",
        }
    }
}

/// The summary fields shown for a record.
///
/// A clustered-accession view is a cluster summary, so the per-allele and
/// per-submission columns are left to the submitted-variants table.
pub fn summary_fields(clustered: bool) -> Vec<SummaryField> {
    SummaryField::ALL
        .into_iter()
        .filter(|field| {
            !clustered
                || !matches!(
                    field,
                    SummaryField::End
                        | SummaryField::Reference
                        | SummaryField::Alternate
                        | SummaryField::Evidence
                        | SummaryField::AssemblyMatch
                        | SummaryField::AllelesMatch
                        | SummaryField::Validated
                )
        })
        .collect()
}

/// The display value of one summary field.
///
/// `organism` and `assembly` describe the caller's species selection; all
/// archived variants are forward-strand, so orientation is fixed.
pub fn summary_value(
    field: SummaryField,
    record: &VariantRecord,
    organism: &str,
    assembly: &str,
) -> String {
    match field {
        SummaryField::Organism => organism.to_string(),
        SummaryField::Assembly => assembly.to_string(),
        SummaryField::Contig => record.chromosome.clone(),
        SummaryField::Start => record.start.to_string(),
        SummaryField::End => record.end.map(|end| end.to_string()).unwrap_or_default(),
        SummaryField::Reference => record.reference_repr(),
        SummaryField::Alternate => record.alternate_repr(),
        SummaryField::Id => record.id.clone(),
        SummaryField::Orientation => "Fwd".to_string(),
        SummaryField::Type => record.variant_type.clone().unwrap_or_default(),
        SummaryField::Evidence => yes_no_empty(record.evidence).to_string(),
        SummaryField::AssemblyMatch => yes_no_empty(record.assembly_match).to_string(),
        SummaryField::AllelesMatch => yes_no_empty(record.alleles_match).to_string(),
        SummaryField::Validated => yes_no_empty(record.validated).to_string(),
        SummaryField::CreatedDate => record
            .created_date
            .as_ref()
            .map(format_created_date)
            .unwrap_or_default(),
    }
}

/// Rows for the submitted-variants table, one per submission.
pub fn submitted_rows(submitted: &[SubmittedVariant]) -> Vec<Vec<String>> {
    submitted
        .iter()
        .map(|variant| {
            vec![
                variant.id.clone(),
                variant.contig.clone(),
                variant.start.to_string(),
                variant.end.map(|end| end.to_string()).unwrap_or_default(),
                variant.reference.clone(),
                variant.alternate.clone().unwrap_or_default(),
                variant
                    .created_date
                    .as_ref()
                    .map(format_created_date)
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

/// Predicted impact class of a consequence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    High,
    Moderate,
    Low,
    Modifier,
}

impl Impact {
    /// Impact label as the annotation pipeline reports it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

/// Swatch color and impact class for one Sequence Ontology term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsequenceDetail {
    /// Hex color used for the term's swatch.
    pub color: &'static str,
    /// Predicted impact class.
    pub impact: Impact,
}

/// Display configuration: the SO-term palette.
///
/// Built once and passed where needed; the default palette follows the
/// Ensembl consequence-type table.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    consequence_details: HashMap<&'static str, ConsequenceDetail>,
}

impl DisplayConfig {
    /// Look up the swatch detail for an SO term name.
    pub fn consequence_detail(&self, so_name: &str) -> Option<&ConsequenceDetail> {
        self.consequence_details.get(so_name)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let entries: [(&'static str, &'static str, Impact); 29] = [
            ("transcript_ablation", "#ff0000", Impact::High),
            ("splice_acceptor_variant", "#FF581A", Impact::High),
            ("splice_donor_variant", "#FF581A", Impact::High),
            ("stop_gained", "#ff0000", Impact::High),
            ("frameshift_variant", "#9400D3", Impact::High),
            ("stop_lost", "#ff0000", Impact::High),
            ("start_lost", "#ffd700", Impact::High),
            ("inframe_insertion", "#ff69b4", Impact::Moderate),
            ("inframe_deletion", "#ff69b4", Impact::Moderate),
            ("missense_variant", "#ffd700", Impact::Moderate),
            ("protein_altering_variant", "#FF0080", Impact::Moderate),
            ("splice_region_variant", "#ff7f50", Impact::Low),
            ("incomplete_terminal_codon_variant", "#ff00ff", Impact::Low),
            ("stop_retained_variant", "#76ee00", Impact::Low),
            ("synonymous_variant", "#76ee00", Impact::Low),
            ("coding_sequence_variant", "#458b00", Impact::Modifier),
            ("mature_miRNA_variant", "#458b00", Impact::Modifier),
            ("5_prime_UTR_variant", "#7ac5cd", Impact::Modifier),
            ("3_prime_UTR_variant", "#7ac5cd", Impact::Modifier),
            ("non_coding_transcript_exon_variant", "#32cd32", Impact::Modifier),
            ("intron_variant", "#02599c", Impact::Modifier),
            ("NMD_transcript_variant", "#ff4500", Impact::Modifier),
            ("non_coding_transcript_variant", "#32cd32", Impact::Modifier),
            ("upstream_gene_variant", "#a2b5cd", Impact::Modifier),
            ("downstream_gene_variant", "#a2b5cd", Impact::Modifier),
            ("TF_binding_site_variant", "#a52a2a", Impact::Modifier),
            ("regulatory_region_variant", "#a52a2a", Impact::Modifier),
            ("feature_truncation", "#7f7f7f", Impact::Modifier),
            ("intergenic_variant", "#636363", Impact::Modifier),
        ];
        let consequence_details = entries
            .into_iter()
            .map(|(name, color, impact)| (name, ConsequenceDetail { color, impact }))
            .collect();
        Self {
            consequence_details,
        }
    }
}

/// One row of the consequence-types table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsequenceRow {
    /// Ensembl gene id, `-` when unknown.
    pub gene_id: String,
    /// Ensembl transcript id, `-` when unknown.
    pub transcript_id: String,
    /// SO term accession (e.g. "SO:0001583").
    pub accession: String,
    /// SO term name (e.g. "missense_variant").
    pub name: String,
    /// Swatch detail, when the palette knows the term.
    pub detail: Option<ConsequenceDetail>,
}

/// Consequence-type rows for a record, ordered by gene then transcript.
///
/// Returns an empty list when the record carries no annotation.
pub fn consequence_rows(record: &VariantRecord, config: &DisplayConfig) -> Vec<ConsequenceRow> {
    let annotation = match &record.annotation {
        Some(annotation) => annotation,
        None => return Vec::new(),
    };
    let mut consequence_types = annotation.consequence_types.clone();
    consequence_types.sort_by(|a, b| {
        (a.ensembl_gene_id.as_deref(), a.ensembl_transcript_id.as_deref())
            .cmp(&(b.ensembl_gene_id.as_deref(), b.ensembl_transcript_id.as_deref()))
    });

    let mut rows = Vec::new();
    for consequence in &consequence_types {
        let gene_id = consequence
            .ensembl_gene_id
            .clone()
            .unwrap_or_else(|| "-".to_string());
        let transcript_id = consequence
            .ensembl_transcript_id
            .clone()
            .unwrap_or_else(|| "-".to_string());
        for term in &consequence.so_terms {
            rows.push(ConsequenceRow {
                gene_id: gene_id.clone(),
                transcript_id: transcript_id.clone(),
                accession: term.so_accession.clone(),
                name: term.so_name.clone(),
                detail: config.consequence_detail(&term.so_name).copied(),
            });
        }
    }
    rows
}
