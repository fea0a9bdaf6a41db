//! Cross-service variant record reconciliation.
//!
//! Two services describe the same variant from different angles: the
//! accessioning service is keyed by `rs`/`ss` accession and knows exact
//! alleles, flags and provenance; the variant warehouse is keyed by genomic
//! position and knows chromosome naming, study entries and consequence
//! annotation. [`Reconciler`] queries both, normalizes each raw record into
//! a [`VariantRecord`], and folds comparable records together under the
//! policy in [`merge`].
//!
//! Every operation is a stateless pass over its inputs: queries are issued
//! sequentially and block until answered, nothing is cached, and no state
//! survives the call. Failures never reach the caller; they are logged and
//! the operation degrades to an empty or partial result.

pub mod merge;

use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::Serialize;

use crate::accession::{has_accession_prefix, Accession, AccessionCategory};
use crate::display;
use crate::sources::accessioning::{AccessionRecord, AccessionSource};
use crate::sources::warehouse::{Annotation, PositionRecord, QueryParams, WarehouseSource};
use crate::species::SpeciesList;

pub use merge::{merge_from, Field, SourceKind};

/// Canonical, display-ready variant record merged from both sources.
///
/// Exactly one canonical record is produced per distinct
/// (start, reference, alternate) combination observed across the sources.
/// Records live for the duration of one query and are dropped after
/// rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    /// Accession id (`rs...`/`ss...`), or the comma-joined `ss` ids for a
    /// position search that cannot pinpoint one.
    pub id: String,
    /// Chromosome under the warehouse's naming.
    pub chromosome: String,
    /// 1-based start position.
    pub start: u64,
    /// 1-based inclusive end position.
    pub end: Option<u64>,
    /// Reference allele.
    pub reference: String,
    /// Alternate allele.
    pub alternate: Option<String>,
    /// Variant type (e.g. "SNV").
    #[serde(rename = "type")]
    pub variant_type: Option<String>,
    /// Species key the record belongs to; always equals the caller's
    /// selected species.
    pub species: String,
    /// INSDC assembly accession the record belongs to.
    pub assembly: String,
    /// Variant has supporting evidence.
    pub evidence: Option<bool>,
    /// Alleles match the reference assembly.
    pub assembly_match: Option<bool>,
    /// Variant passed allele checks.
    pub alleles_match: Option<bool>,
    /// Variant was validated.
    pub validated: Option<bool>,
    /// Creation timestamp from the accessioning service.
    pub created_date: Option<NaiveDateTime>,
    /// Clustered accession this record belongs to, if known.
    #[serde(rename = "associatedRSID")]
    pub associated_rsid: Option<String>,
    /// Submitted variants behind this record, in source order.
    #[serde(rename = "associatedSSIDs")]
    pub associated_ssids: Vec<SubmittedVariant>,
    /// Consequence-type annotation from the warehouse.
    pub annotation: Option<Annotation>,
    /// Display form `"{ref}/{alt}"`, present once an alternate is known.
    pub repr: Option<String>,
}

impl VariantRecord {
    /// Reference allele display form (`-` when empty).
    pub fn reference_repr(&self) -> String {
        display::allele_repr(&self.reference)
    }

    /// Alternate allele display form (`-` when empty or unknown).
    pub fn alternate_repr(&self) -> String {
        display::allele_repr(self.alternate.as_deref().unwrap_or(""))
    }

    fn refresh_repr(&mut self) {
        self.repr = self
            .alternate
            .as_deref()
            .map(|alternate| display::variant_repr(&self.reference, alternate));
    }
}

/// One submitted variant listed under a canonical record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedVariant {
    /// `ss`-prefixed accession id.
    pub id: String,
    /// Contig/chromosome the submission was reported on.
    pub contig: String,
    /// 1-based start position.
    pub start: u64,
    /// 1-based inclusive end position.
    pub end: Option<u64>,
    /// Reference allele.
    pub reference: String,
    /// Alternate allele(s); comma-joined when derived from the warehouse.
    pub alternate: Option<String>,
    /// Creation timestamp, when the accessioning service reported one.
    pub created_date: Option<NaiveDateTime>,
}

/// End coordinate of a variant given its start and alleles.
///
/// `start + max(len(reference), len(alternate)) - 1`, saturating at zero.
pub fn variant_end(start: u64, reference: &str, alternate: &str) -> u64 {
    let span = reference.len().max(alternate.len()) as u64;
    (start + span).saturating_sub(1)
}

/// Whether two records describe the same variant.
///
/// Defined purely as equality of start position and both alleles, with no
/// case folding or trimming; symmetric by construction.
pub fn comparable(a: &VariantRecord, b: &VariantRecord) -> bool {
    a.start == b.start && a.reference == b.reference && a.alternate == b.alternate
}

/// Reconciles records across the accessioning service and the warehouse.
///
/// Both sources and the species table are injected at construction, so the
/// reconciler itself stays pure and testable without a live service behind
/// either trait.
#[derive(Debug, Clone)]
pub struct Reconciler<A, W> {
    accessions: A,
    warehouse: W,
    species_list: SpeciesList,
}

impl<A: AccessionSource, W: WarehouseSource> Reconciler<A, W> {
    /// Create a reconciler over the given sources and species table.
    pub fn new(accessions: A, warehouse: W, species_list: SpeciesList) -> Self {
        Self {
            accessions,
            warehouse,
            species_list,
        }
    }

    /// The species reference table this reconciler was built with.
    pub fn species_list(&self) -> &SpeciesList {
        &self.species_list
    }

    /// Reconcile by accession id (`rs...` or `ss...`).
    ///
    /// Accession-derived records are the backbone: each is enriched from the
    /// one comparable warehouse record, if any, and keeps its own identity
    /// and alleles. Records whose derived species does not equal `species`
    /// are dropped. When the accession source yields nothing usable, the
    /// warehouse is consulted by the same id and its results are returned
    /// enriched but without backfill.
    pub fn by_accession(&self, species: &str, accession_id: &str) -> Vec<VariantRecord> {
        let accession = match accession_id.parse::<Accession>() {
            Ok(accession) => accession,
            Err(err) => {
                warn!("{}", err);
                return Vec::new();
            }
        };

        let mut records = self.accession_variants(species, accession);
        for record in &mut records {
            self.backfill_from_warehouse(species, record);
            record.refresh_repr();
        }

        if records.is_empty() {
            records = self.warehouse_variants(species, accession_id);
            for record in &mut records {
                record.refresh_repr();
            }
        }
        records
    }

    /// Reconcile by genomic position (e.g. `"2:48000000"`).
    ///
    /// Warehouse records are the backbone: each is backfilled from the one
    /// comparable submitted-accession record among its known `ss` ids, with
    /// the accession side supplying precise alleles and identity.
    pub fn by_position(&self, species: &str, position: &str) -> Vec<VariantRecord> {
        let mut records = self.warehouse_variants(species, position);
        for record in &mut records {
            self.backfill_from_accessioning(species, record);
            record.refresh_repr();
        }
        records
    }

    /// Fetch and normalize accession-source records, dropping any whose
    /// species derivation fails or disagrees with the selection.
    fn accession_variants(&self, species: &str, accession: Accession) -> Vec<VariantRecord> {
        let records = match self.accessions.query(accession.category(), accession.number()) {
            Ok(records) => records,
            Err(err) => {
                warn!("accession query for {} failed: {}", accession, err);
                return Vec::new();
            }
        };
        records
            .iter()
            .filter_map(|record| self.variant_from_accession(species, accession.category(), record))
            .collect()
    }

    fn variant_from_accession(
        &self,
        species: &str,
        category: AccessionCategory,
        record: &AccessionRecord,
    ) -> Option<VariantRecord> {
        let data = &record.data;
        let taxonomy = match data.taxonomy_accession {
            Some(taxonomy) => taxonomy,
            None => {
                debug!("accession {} carries no taxonomy, skipped", record.accession);
                return None;
            }
        };
        let assembly = data.assembly(category).unwrap_or_default();
        let descriptor = match self.species_list.find_for_record(taxonomy, assembly) {
            Some(descriptor) => descriptor,
            None => {
                debug!(
                    "no species entry for taxonomy {} on assembly {:?}, accession {} skipped",
                    taxonomy, assembly, record.accession
                );
                return None;
            }
        };
        let derived_species = descriptor.key();
        if derived_species != species {
            return None;
        }

        let mut variant = VariantRecord {
            chromosome: data.contig.clone(),
            start: data.start,
            reference: data.reference_allele.clone(),
            species: derived_species,
            assembly: descriptor.assembly_accession.clone(),
            evidence: data.supported_by_evidence,
            assembly_match: data.assembly_match,
            alleles_match: data.alleles_match,
            validated: data.validated,
            created_date: data.parsed_created_date(),
            ..Default::default()
        };
        if let Some(alternate) = &data.alternate_allele {
            variant.alternate = Some(alternate.clone());
            variant.end = Some(variant_end(data.start, &data.reference_allele, alternate));
            variant.associated_rsid = data
                .clustered_variant_accession
                .map(|number| format!("rs{}", number));
        }
        match category {
            AccessionCategory::ClusteredVariants => {
                variant.id = format!("rs{}", record.accession);
                variant.variant_type = data.variant_type.clone();
                variant.associated_ssids = self.clustered_members(record.accession);
            }
            AccessionCategory::SubmittedVariants => {
                variant.id = format!("ss{}", record.accession);
                variant.variant_type = variant
                    .associated_rsid
                    .as_deref()
                    .and_then(|rsid| self.variant_type_of(rsid));
            }
        }
        Some(variant)
    }

    /// Submitted variants clustered under an `rs` accession.
    fn clustered_members(&self, accession: u64) -> Vec<SubmittedVariant> {
        let records = match self.accessions.submitted_for_clustered(accession) {
            Ok(records) => records,
            Err(err) => {
                warn!("submitted lookup for rs{} failed: {}", accession, err);
                return Vec::new();
            }
        };
        records
            .iter()
            .map(|record| {
                let data = &record.data;
                let end = data
                    .alternate_allele
                    .as_deref()
                    .map(|alternate| variant_end(data.start, &data.reference_allele, alternate));
                SubmittedVariant {
                    id: format!("ss{}", record.accession),
                    contig: data.contig.clone(),
                    start: data.start,
                    end,
                    reference: data.reference_allele.clone(),
                    alternate: data.alternate_allele.clone(),
                    created_date: data.parsed_created_date(),
                }
            })
            .collect()
    }

    /// Variant type of a clustered accession, used to type submitted records.
    fn variant_type_of(&self, rsid: &str) -> Option<String> {
        let accession = rsid.parse::<Accession>().ok()?;
        match self
            .accessions
            .query(AccessionCategory::ClusteredVariants, accession.number())
        {
            Ok(records) => records
                .first()
                .and_then(|record| record.data.variant_type.clone()),
            Err(err) => {
                warn!("variant type lookup for {} failed: {}", rsid, err);
                None
            }
        }
    }

    /// Fetch and enrich warehouse records for a position or accession key.
    fn warehouse_variants(&self, species: &str, key: &str) -> Vec<VariantRecord> {
        let params = QueryParams::for_species(species);
        let results = match self.warehouse.query(key, &params) {
            Ok(results) => results,
            Err(err) => {
                warn!("warehouse query for {} failed: {}", key, err);
                return Vec::new();
            }
        };
        results
            .into_iter()
            .map(|record| self.variant_from_position(species, key, record))
            .collect()
    }

    fn variant_from_position(
        &self,
        species: &str,
        queried_by: &str,
        record: PositionRecord,
    ) -> VariantRecord {
        let associated_rsid = record.ids.iter().find(|id| id.starts_with("rs")).cloned();
        let ss_ids: Vec<String> = record
            .ids
            .iter()
            .filter(|id| id.starts_with("ss"))
            .cloned()
            .collect();

        // The warehouse cannot report which precise alternate(s) each
        // submission carries, so submitted stubs list every alternate.
        let alternates = record.all_alternates();
        let all_alternates = if alternates.is_empty() {
            None
        } else {
            Some(alternates.join(","))
        };
        let associated_ssids: Vec<SubmittedVariant> = ss_ids
            .iter()
            .map(|id| SubmittedVariant {
                id: id.clone(),
                contig: record.chromosome.clone(),
                start: record.start,
                end: record.end,
                reference: record.reference.clone(),
                alternate: all_alternates.clone(),
                created_date: None,
            })
            .collect();

        // A position search cannot pinpoint one accession, so it reports
        // every submitted id it covers.
        let id = if has_accession_prefix(queried_by) {
            queried_by.to_string()
        } else {
            ss_ids.join(",")
        };
        let assembly = self
            .species_list
            .assembly_of(species)
            .unwrap_or_default()
            .to_string();

        VariantRecord {
            id,
            chromosome: record.chromosome,
            start: record.start,
            end: record.end,
            reference: record.reference,
            alternate: record.alternate,
            variant_type: record.variant_type,
            species: species.to_string(),
            assembly,
            evidence: Some(true),
            associated_rsid,
            associated_ssids,
            annotation: record.annotation,
            ..Default::default()
        }
    }

    /// Enrich an accession-derived record from its comparable warehouse
    /// record, when one exists.
    fn backfill_from_warehouse(&self, species: &str, record: &mut VariantRecord) {
        // Contig naming differs between the services, so the warehouse is
        // queried by the record's id rather than by position.
        let candidates = self.warehouse_variants(species, &record.id);
        if let Some(matching) = candidates
            .iter()
            .find(|candidate| comparable(candidate, record))
        {
            merge::merge_from(record, SourceKind::Accessioning, matching);
            for submitted in &mut record.associated_ssids {
                submitted.contig = record.chromosome.clone();
            }
        }
    }

    /// Backfill a warehouse-derived record from the first comparable
    /// submitted-accession record among its known `ss` ids.
    fn backfill_from_accessioning(&self, species: &str, record: &mut VariantRecord) {
        let ss_ids: Vec<String> = record
            .associated_ssids
            .iter()
            .map(|submitted| submitted.id.clone())
            .collect();
        for ss_id in ss_ids {
            let accession = match ss_id.parse::<Accession>() {
                Ok(accession) => accession,
                Err(err) => {
                    debug!("skipping malformed submitted id {}: {}", ss_id, err);
                    continue;
                }
            };
            let candidates = self.accession_variants(species, accession);
            if let Some(matching) = candidates
                .into_iter()
                .find(|candidate| comparable(candidate, record))
            {
                merge::merge_from(record, SourceKind::Warehouse, &matching);
                return;
            }
        }
    }
}
