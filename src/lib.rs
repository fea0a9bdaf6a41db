// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-reconcile: cross-service variant record reconciliation
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Genetic-variation archives answer the same question from two services
//! with different strengths: an accessioning service that knows `rs`/`ss`
//! identifiers, exact alleles and submission provenance, and a positional
//! variant warehouse that knows chromosome naming, per-study entries and
//! consequence annotation. This crate normalizes records from both into one
//! canonical representation per variant and merges them under an explicit
//! per-field authority policy.
//!
//! # Example
//!
//! ```
//! use ferro_reconcile::{MockAccessionSource, MockWarehouseSource, Reconciler, SpeciesList};
//!
//! // Wire up a reconciler with in-memory sources
//! let reconciler = Reconciler::new(
//!     MockAccessionSource::with_test_data(),
//!     MockWarehouseSource::with_test_data(),
//!     SpeciesList::with_test_data(),
//! );
//!
//! // Look up a clustered accession while browsing human GRCh37
//! let records = reconciler.by_accession("hsapiens_grch37", "rs123");
//! assert_eq!(records.len(), 1);
//!
//! // Identity and alleles come from the accessioning service, the
//! // chromosome name from the warehouse
//! assert_eq!(records[0].id, "rs123");
//! assert_eq!(records[0].chromosome, "2");
//! assert_eq!(records[0].repr.as_deref(), Some("A/T"));
//! ```

pub mod accession;
pub mod config;
pub mod display;
pub mod error;
pub mod reconcile;
pub mod sources;
pub mod species;

// Re-export commonly used types
pub use accession::{Accession, AccessionCategory};
pub use error::ReconcileError;
pub use reconcile::{comparable, variant_end, Reconciler, SubmittedVariant, VariantRecord};
pub use sources::{
    AccessionData, AccessionRecord, AccessionSource, MockAccessionSource, MockWarehouseSource,
    PositionRecord, QueryParams, WarehouseSource,
};
pub use species::{assemblies_equivalent, SpeciesDescriptor, SpeciesList};

/// Result type alias for ferro-reconcile operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
