//! Integration tests for the reconciliation pipeline over the public API.

use ferro_reconcile::{
    AccessionCategory, AccessionData, AccessionRecord, AccessionSource, MockAccessionSource,
    MockWarehouseSource, PositionRecord, QueryParams, ReconcileError, Reconciler,
    SpeciesDescriptor, SpeciesList, WarehouseSource,
};

/// Species table mapping taxonomy 9606 on assembly GCA_1 to hsapiens_grch37.
fn species_list() -> SpeciesList {
    SpeciesList::new(vec![
        SpeciesDescriptor {
            taxonomy_code: "hsapiens".to_string(),
            taxonomy_id: 9606,
            assembly_code: "grch37".to_string(),
            assembly_accession: "GCA_1".to_string(),
            taxonomy_eva_name: "human".to_string(),
        },
        SpeciesDescriptor {
            taxonomy_code: "cfamiliaris".to_string(),
            taxonomy_id: 9615,
            assembly_code: "31".to_string(),
            assembly_accession: "GCA_9".to_string(),
            taxonomy_eva_name: "dog".to_string(),
        },
    ])
}

fn clustered_record(accession: u64, taxonomy: u32, assembly: &str) -> AccessionRecord {
    AccessionRecord {
        accession,
        data: AccessionData {
            taxonomy_accession: Some(taxonomy),
            contig: "CM000664.1".to_string(),
            start: 1000,
            reference_allele: "A".to_string(),
            alternate_allele: Some("T".to_string()),
            assembly_accession: Some(assembly.to_string()),
            variant_type: Some("SNV".to_string()),
            created_date: Some("2017-04-24T06:36:48.649".to_string()),
            ..Default::default()
        },
    }
}

fn submitted_record(accession: u64, clustered: Option<u64>) -> AccessionRecord {
    AccessionRecord {
        accession,
        data: AccessionData {
            taxonomy_accession: Some(9606),
            contig: "CM000664.1".to_string(),
            start: 1000,
            reference_allele: "A".to_string(),
            alternate_allele: Some("T".to_string()),
            reference_sequence_accession: Some("GCA_1".to_string()),
            clustered_variant_accession: clustered,
            supported_by_evidence: Some(true),
            assembly_match: Some(true),
            alleles_match: Some(true),
            validated: Some(false),
            created_date: Some("2015-04-06T18:05:28".to_string()),
            ..Default::default()
        },
    }
}

fn warehouse_record() -> PositionRecord {
    PositionRecord {
        chromosome: "2".to_string(),
        start: 1000,
        end: Some(1000),
        reference: "A".to_string(),
        alternate: Some("T".to_string()),
        ids: vec!["rs123".to_string(), "ss5000".to_string()],
        variant_type: Some("SNV".to_string()),
        ..Default::default()
    }
}

fn reconciler() -> Reconciler<MockAccessionSource, MockWarehouseSource> {
    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(clustered_record(123, 9606, "GCA_1"));
    accessions.add_submitted(submitted_record(5000, Some(123)));

    let mut warehouse = MockWarehouseSource::new();
    warehouse.add_record(warehouse_record());

    Reconciler::new(accessions, warehouse, species_list())
}

#[test]
fn test_end_to_end_clustered_accession() {
    let records = reconciler().by_accession("hsapiens_grch37", "rs123");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.id, "rs123");
    assert_eq!(record.chromosome, "2");
    assert_eq!(record.start, 1000);
    assert_eq!(record.end, Some(1000));
    assert_eq!(record.reference, "A");
    assert_eq!(record.alternate.as_deref(), Some("T"));
    assert_eq!(record.repr.as_deref(), Some("A/T"));
    assert_eq!(record.species, "hsapiens_grch37");
    assert_eq!(record.assembly, "GCA_1");
    assert_eq!(record.variant_type.as_deref(), Some("SNV"));
}

#[test]
fn test_rs_query_yields_only_rs_ids() {
    let records = reconciler().by_accession("hsapiens_grch37", "rs123");
    assert!(!records.is_empty());
    for record in &records {
        assert!(record.id.starts_with("rs"), "unexpected id {}", record.id);
    }
}

#[test]
fn test_clustered_record_lists_its_submissions() {
    let records = reconciler().by_accession("hsapiens_grch37", "rs123");
    let submitted = &records[0].associated_ssids;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, "ss5000");
    // End coordinate derived from start and allele lengths
    assert_eq!(submitted[0].end, Some(1000));
    // Contig rewritten to the warehouse chromosome after the merge
    assert_eq!(submitted[0].contig, "2");
}

#[test]
fn test_submitted_accession_links_to_cluster() {
    let records = reconciler().by_accession("hsapiens_grch37", "ss5000");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "ss5000");
    assert_eq!(records[0].associated_rsid.as_deref(), Some("rs123"));
    // Type comes from the clustered record
    assert_eq!(records[0].variant_type.as_deref(), Some("SNV"));
    assert_eq!(records[0].evidence, Some(true));
    assert_eq!(records[0].validated, Some(false));
}

#[test]
fn test_unknown_taxonomy_assembly_is_dropped() {
    let mut accessions = MockAccessionSource::new();
    // Taxonomy/assembly combination absent from the species table
    accessions.add_clustered(clustered_record(124, 9913, "GCA_404"));
    let reconciler = Reconciler::new(accessions, MockWarehouseSource::new(), species_list());
    assert!(reconciler.by_accession("hsapiens_grch37", "rs124").is_empty());
}

#[test]
fn test_species_mismatch_is_dropped() {
    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(clustered_record(125, 9615, "GCA_9"));
    let reconciler = Reconciler::new(accessions, MockWarehouseSource::new(), species_list());
    // The record derives to cfamiliaris_31, not the selected species
    assert!(reconciler.by_accession("hsapiens_grch37", "rs125").is_empty());
    assert_eq!(reconciler.by_accession("cfamiliaris_31", "rs125").len(), 1);
}

#[test]
fn test_gcf_assembly_resolves_like_gca() {
    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(clustered_record(126, 9606, "GCF_1"));
    let reconciler = Reconciler::new(accessions, MockWarehouseSource::new(), species_list());
    let records = reconciler.by_accession("hsapiens_grch37", "rs126");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].species, "hsapiens_grch37");
}

#[test]
fn test_chromosome_missing_on_accession_side() {
    let mut record = clustered_record(123, 9606, "GCA_1");
    record.data.contig = String::new();

    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(record);
    let mut warehouse = MockWarehouseSource::new();
    warehouse.add_record(warehouse_record());

    let reconciler = Reconciler::new(accessions, warehouse, species_list());
    let records = reconciler.by_accession("hsapiens_grch37", "rs123");
    assert_eq!(records[0].chromosome, "2");
}

#[test]
fn test_no_comparable_warehouse_record_keeps_contig() {
    let mut warehouse_side = warehouse_record();
    warehouse_side.alternate = Some("G".to_string());

    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(clustered_record(123, 9606, "GCA_1"));
    let mut warehouse = MockWarehouseSource::new();
    warehouse.add_record(warehouse_side);

    let reconciler = Reconciler::new(accessions, warehouse, species_list());
    let records = reconciler.by_accession("hsapiens_grch37", "rs123");
    assert_eq!(records.len(), 1);
    // No merge happened, so the accessioning contig survives
    assert_eq!(records[0].chromosome, "CM000664.1");
    assert_eq!(records[0].repr.as_deref(), Some("A/T"));
}

#[test]
fn test_accession_without_alternate_has_no_end_or_repr() {
    let mut record = clustered_record(127, 9606, "GCA_1");
    record.data.alternate_allele = None;

    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(record);
    let reconciler = Reconciler::new(accessions, MockWarehouseSource::new(), species_list());
    let records = reconciler.by_accession("hsapiens_grch37", "rs127");
    assert_eq!(records.len(), 1);
    assert!(records[0].end.is_none());
    assert!(records[0].repr.is_none());
}

#[test]
fn test_by_position_enrichment() {
    let mut warehouse = MockWarehouseSource::new();
    let mut record = warehouse_record();
    record.ids = vec![
        "rs123".to_string(),
        "ss5000".to_string(),
        "ss5001".to_string(),
    ];
    warehouse.add_record(record);
    let reconciler = Reconciler::new(MockAccessionSource::new(), warehouse, species_list());

    let records = reconciler.by_position("hsapiens_grch37", "2:1000");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    // No accession record matched, so the joined ss ids stand in
    assert_eq!(record.id, "ss5000,ss5001");
    assert_eq!(record.associated_rsid.as_deref(), Some("rs123"));
    assert_eq!(record.evidence, Some(true));
    assert_eq!(record.associated_ssids.len(), 2);
    assert_eq!(record.associated_ssids[0].contig, "2");
    assert_eq!(record.repr.as_deref(), Some("A/T"));
}

#[test]
fn test_by_position_backfills_from_submitted_record() {
    let records = reconciler().by_position("hsapiens_grch37", "2:1000");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    // Identity and provenance come from the comparable submitted record
    assert_eq!(record.id, "ss5000");
    assert_eq!(record.validated, Some(false));
    assert!(record.created_date.is_some());
    // Chromosome naming stays with the warehouse
    assert_eq!(record.chromosome, "2");
}

#[test]
fn test_by_position_secondary_alternates_reach_submitted_stubs() {
    use std::collections::HashMap;

    let mut record = warehouse_record();
    let mut source_entries = HashMap::new();
    source_entries.insert(
        "PRJEB0001_ERZ000001".to_string(),
        ferro_reconcile::sources::warehouse::SourceEntry {
            secondary_alternates: vec!["G".to_string()],
        },
    );
    record.source_entries = source_entries;
    record.ids = vec!["ss6000".to_string()];

    let mut warehouse = MockWarehouseSource::new();
    warehouse.add_record(record);
    let reconciler = Reconciler::new(MockAccessionSource::new(), warehouse, species_list());

    let records = reconciler.by_position("hsapiens_grch37", "2:1000");
    assert_eq!(records[0].associated_ssids.len(), 1);
    assert_eq!(records[0].associated_ssids[0].alternate.as_deref(), Some("T,G"));
}

#[test]
fn test_accession_query_falls_back_to_warehouse() {
    let mut warehouse = MockWarehouseSource::new();
    warehouse.add_record(warehouse_record());
    // Accession source knows nothing about rs123
    let reconciler = Reconciler::new(MockAccessionSource::new(), warehouse, species_list());

    let records = reconciler.by_accession("hsapiens_grch37", "rs123");
    assert_eq!(records.len(), 1);
    // Warehouse-only result: queried id, warehouse chromosome, evidence set
    assert_eq!(records[0].id, "rs123");
    assert_eq!(records[0].chromosome, "2");
    assert_eq!(records[0].evidence, Some(true));
    assert_eq!(records[0].repr.as_deref(), Some("A/T"));
}

#[test]
fn test_empty_everything_is_empty() {
    let reconciler = Reconciler::new(
        MockAccessionSource::new(),
        MockWarehouseSource::new(),
        species_list(),
    );
    assert!(reconciler.by_accession("hsapiens_grch37", "rs123").is_empty());
    assert!(reconciler.by_position("hsapiens_grch37", "2:1000").is_empty());
}

/// Source that fails every query, for fail-open coverage.
struct FailingAccessions;

impl AccessionSource for FailingAccessions {
    fn query(
        &self,
        _category: AccessionCategory,
        _accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError> {
        Err(ReconcileError::source("accessioning unavailable"))
    }

    fn submitted_for_clustered(
        &self,
        _accession: u64,
    ) -> Result<Vec<AccessionRecord>, ReconcileError> {
        Err(ReconcileError::source("accessioning unavailable"))
    }
}

/// Warehouse that fails every query, for fail-open coverage.
struct FailingWarehouse;

impl WarehouseSource for FailingWarehouse {
    fn query(
        &self,
        _key: &str,
        _params: &QueryParams,
    ) -> Result<Vec<PositionRecord>, ReconcileError> {
        Err(ReconcileError::source("warehouse unavailable"))
    }
}

#[test]
fn test_failing_accession_source_falls_back_to_warehouse() {
    let mut warehouse = MockWarehouseSource::new();
    warehouse.add_record(warehouse_record());
    let reconciler = Reconciler::new(FailingAccessions, warehouse, species_list());

    let records = reconciler.by_accession("hsapiens_grch37", "rs123");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "rs123");
}

#[test]
fn test_all_sources_failing_never_panics() {
    let reconciler = Reconciler::new(FailingAccessions, FailingWarehouse, species_list());
    assert!(reconciler.by_accession("hsapiens_grch37", "rs123").is_empty());
    assert!(reconciler.by_position("hsapiens_grch37", "2:1000").is_empty());
}

#[test]
fn test_failing_warehouse_keeps_accession_result() {
    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(clustered_record(123, 9606, "GCA_1"));
    let reconciler = Reconciler::new(accessions, FailingWarehouse, species_list());

    let records = reconciler.by_accession("hsapiens_grch37", "rs123");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "rs123");
    assert_eq!(records[0].chromosome, "CM000664.1");
}

#[test]
fn test_insertion_end_coordinate_in_submitted_listing() {
    let mut submitted = submitted_record(7000, Some(128));
    submitted.data.start = 100;
    submitted.data.reference_allele = "A".to_string();
    submitted.data.alternate_allele = Some("ATG".to_string());

    let mut clustered = clustered_record(128, 9606, "GCA_1");
    clustered.data.start = 100;
    clustered.data.alternate_allele = Some("ATG".to_string());

    let mut accessions = MockAccessionSource::new();
    accessions.add_clustered(clustered);
    accessions.add_submitted(submitted);
    let reconciler = Reconciler::new(accessions, MockWarehouseSource::new(), species_list());

    let records = reconciler.by_accession("hsapiens_grch37", "rs128");
    assert_eq!(records[0].end, Some(102));
    assert_eq!(records[0].associated_ssids.len(), 1);
    assert_eq!(records[0].associated_ssids[0].end, Some(102));
}
