//! Declarative field-merge policy.
//!
//! When a record from one source has a comparable counterpart in the other,
//! the two are folded into one canonical record. Which side supplies each
//! field is declared here, per field, instead of being scattered through the
//! reconciliation flow:
//!
//! - the accessioning service is authoritative for the identity and the
//!   precise alleles of a variant (`id`, `start`, `end`, `reference`,
//!   `alternate`), since it stays exact even for multi-allelic sites;
//! - the warehouse is authoritative for `chromosome`: its chromosome naming
//!   is the one users recognize, while the accessioning service reports raw
//!   contig accessions;
//! - every other field belongs to whichever record already has a value,
//!   with the counterpart filling gaps.
//!
//! `species`, `assembly` and `repr` are not merged: the first two are fixed
//! by the caller's species selection before any merge happens, and `repr` is
//! recomputed from the merged alleles afterwards.

use crate::reconcile::VariantRecord;

/// The two upstream sources a record can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// The accession-keyed service (`rs`/`ss` ids).
    Accessioning,
    /// The position-keyed variant warehouse.
    Warehouse,
}

impl SourceKind {
    /// The opposite source.
    pub fn other(self) -> Self {
        match self {
            Self::Accessioning => Self::Warehouse,
            Self::Warehouse => Self::Accessioning,
        }
    }
}

/// Canonical-record fields subject to merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Chromosome,
    Start,
    End,
    Reference,
    Alternate,
    VariantType,
    Evidence,
    AssemblyMatch,
    AllelesMatch,
    Validated,
    CreatedDate,
    AssociatedRsid,
    AssociatedSsids,
    Annotation,
}

impl Field {
    /// Every mergeable field.
    pub const ALL: [Field; 15] = [
        Field::Id,
        Field::Chromosome,
        Field::Start,
        Field::End,
        Field::Reference,
        Field::Alternate,
        Field::VariantType,
        Field::Evidence,
        Field::AssemblyMatch,
        Field::AllelesMatch,
        Field::Validated,
        Field::CreatedDate,
        Field::AssociatedRsid,
        Field::AssociatedSsids,
        Field::Annotation,
    ];

    /// The source whose non-empty value wins this field outright.
    ///
    /// `None` means neither side wins: the owning record keeps its value and
    /// the counterpart only fills in when the owner's value is missing or
    /// empty.
    pub fn winner(self) -> Option<SourceKind> {
        match self {
            Field::Chromosome => Some(SourceKind::Warehouse),
            Field::Id | Field::Start | Field::End | Field::Reference | Field::Alternate => {
                Some(SourceKind::Accessioning)
            }
            _ => None,
        }
    }
}

/// Merge `other` (from the opposite source) into `own`.
///
/// `own_source` names the source `own` came from; `other` is assumed to come
/// from the other one. For each field, `other`'s value is taken when its
/// source wins the field outright and the value is non-empty, or when `own`
/// has no value of its own.
pub fn merge_from(own: &mut VariantRecord, own_source: SourceKind, other: &VariantRecord) {
    let other_source = own_source.other();
    for field in Field::ALL {
        let outright = field.winner() == Some(other_source);
        apply(field, own, other, outright);
    }
}

fn apply(field: Field, own: &mut VariantRecord, other: &VariantRecord, outright: bool) {
    match field {
        Field::Id => merge_string(&mut own.id, &other.id, outright),
        Field::Chromosome => merge_string(&mut own.chromosome, &other.chromosome, outright),
        Field::Start => {
            if outright {
                own.start = other.start;
            }
        }
        Field::End => merge_option(&mut own.end, &other.end, outright),
        Field::Reference => merge_string(&mut own.reference, &other.reference, outright),
        Field::Alternate => merge_option(&mut own.alternate, &other.alternate, outright),
        Field::VariantType => merge_option(&mut own.variant_type, &other.variant_type, outright),
        Field::Evidence => merge_option(&mut own.evidence, &other.evidence, outright),
        Field::AssemblyMatch => merge_option(&mut own.assembly_match, &other.assembly_match, outright),
        Field::AllelesMatch => merge_option(&mut own.alleles_match, &other.alleles_match, outright),
        Field::Validated => merge_option(&mut own.validated, &other.validated, outright),
        Field::CreatedDate => merge_option(&mut own.created_date, &other.created_date, outright),
        Field::AssociatedRsid => {
            merge_option(&mut own.associated_rsid, &other.associated_rsid, outright)
        }
        Field::AssociatedSsids => {
            if !other.associated_ssids.is_empty() && (outright || own.associated_ssids.is_empty()) {
                own.associated_ssids = other.associated_ssids.clone();
            }
        }
        Field::Annotation => merge_option(&mut own.annotation, &other.annotation, outright),
    }
}

fn merge_string(own: &mut String, other: &str, outright: bool) {
    if !other.is_empty() && (outright || own.is_empty()) {
        *own = other.to_string();
    }
}

fn merge_option<T: Clone>(own: &mut Option<T>, other: &Option<T>, outright: bool) {
    if other.is_some() && (outright || own.is_none()) {
        *own = other.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accession_side() -> VariantRecord {
        VariantRecord {
            id: "ss5000".to_string(),
            chromosome: "CM000664.1".to_string(),
            start: 1000,
            end: Some(1000),
            reference: "A".to_string(),
            alternate: Some("T".to_string()),
            species: "hsapiens_grch37".to_string(),
            assembly: "GCA_000001405.1".to_string(),
            evidence: Some(true),
            ..Default::default()
        }
    }

    fn warehouse_side() -> VariantRecord {
        VariantRecord {
            id: "rs123,ss5000".to_string(),
            chromosome: "2".to_string(),
            start: 999,
            end: Some(999),
            reference: "A".to_string(),
            alternate: Some("T,G".to_string()),
            species: "hsapiens_grch37".to_string(),
            variant_type: Some("SNV".to_string()),
            evidence: Some(true),
            associated_rsid: Some("rs123".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_winner_table() {
        assert_eq!(Field::Chromosome.winner(), Some(SourceKind::Warehouse));
        for field in [Field::Id, Field::Start, Field::End, Field::Reference, Field::Alternate] {
            assert_eq!(field.winner(), Some(SourceKind::Accessioning));
        }
        for field in [Field::VariantType, Field::Evidence, Field::CreatedDate, Field::Annotation] {
            assert_eq!(field.winner(), None);
        }
    }

    #[test]
    fn test_warehouse_wins_chromosome_against_accession_record() {
        let mut own = accession_side();
        merge_from(&mut own, SourceKind::Accessioning, &warehouse_side());
        assert_eq!(own.chromosome, "2");
        // Identity and alleles stay with the accession side
        assert_eq!(own.id, "ss5000");
        assert_eq!(own.start, 1000);
        assert_eq!(own.alternate.as_deref(), Some("T"));
    }

    #[test]
    fn test_accession_wins_identity_against_warehouse_record() {
        let mut own = warehouse_side();
        merge_from(&mut own, SourceKind::Warehouse, &accession_side());
        assert_eq!(own.id, "ss5000");
        assert_eq!(own.start, 1000);
        assert_eq!(own.end, Some(1000));
        assert_eq!(own.alternate.as_deref(), Some("T"));
        // Chromosome stays positional
        assert_eq!(own.chromosome, "2");
    }

    #[test]
    fn test_fill_when_empty_only() {
        let mut own = accession_side();
        own.variant_type = None;
        merge_from(&mut own, SourceKind::Accessioning, &warehouse_side());
        assert_eq!(own.variant_type.as_deref(), Some("SNV"));

        let mut own = accession_side();
        own.variant_type = Some("INDEL".to_string());
        merge_from(&mut own, SourceKind::Accessioning, &warehouse_side());
        assert_eq!(own.variant_type.as_deref(), Some("INDEL"));
    }

    #[test]
    fn test_empty_other_never_clobbers() {
        let mut own = accession_side();
        let mut other = warehouse_side();
        other.chromosome = String::new();
        other.alternate = None;
        merge_from(&mut own, SourceKind::Accessioning, &other);
        assert_eq!(own.chromosome, "CM000664.1");
        assert_eq!(own.alternate.as_deref(), Some("T"));
    }

    #[test]
    fn test_associated_rsid_fills_in() {
        let mut own = accession_side();
        merge_from(&mut own, SourceKind::Accessioning, &warehouse_side());
        assert_eq!(own.associated_rsid.as_deref(), Some("rs123"));
    }
}
