// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-reconcile CLI
//!
//! Command-line interface for reconciling variant records across an
//! accessioning service and a variant warehouse, both backed by JSON data
//! files.

use clap::{Parser, Subcommand};
use ferro_reconcile::config::ReconcileConfig;
use ferro_reconcile::display::{self, DisplayConfig};
use ferro_reconcile::{
    MockAccessionSource, MockWarehouseSource, Reconciler, SpeciesList, VariantRecord,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ferro-reconcile")]
#[command(author, version, about = "Cross-service variant record reconciliation")]
#[command(
    long_about = "Reconcile variant records across an accessioning service and a variant \
warehouse.

Examples:
  ferro-reconcile accession rs123 --species hsapiens_grch37 \\
      --species-list species.json --accessioning accessions.json --warehouse warehouse.json
  ferro-reconcile position 2:48000000 --species hsapiens_grch37 -f json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Species key to browse (e.g. hsapiens_grch37)
    #[arg(long, global = true)]
    species: Option<String>,

    /// Species reference table (JSON array)
    #[arg(long, global = true)]
    species_list: Option<PathBuf>,

    /// Accessioning source data file (JSON)
    #[arg(long, global = true)]
    accessioning: Option<PathBuf>,

    /// Warehouse source data file (JSON)
    #[arg(long, global = true)]
    warehouse: Option<PathBuf>,

    /// Config file (default: .ferro-reconcile.toml search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile by accession id (rs... or ss...)
    Accession {
        /// Variant accession, e.g. rs123 or ss5000
        id: String,
    },
    /// Reconcile by genomic position
    Position {
        /// Position as CHROM:POS, e.g. 2:48000000
        position: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => Some(ReconcileConfig::load_from_path(path)?),
        None => ReconcileConfig::load(),
    }
    .unwrap_or_default();

    let species = config
        .resolve_species(cli.species.as_deref())
        .ok_or("no species selected; pass --species or set [defaults] species in the config")?;

    let species_list = match ReconcileConfig::resolve_path(
        cli.species_list.as_deref(),
        config.data.species_list.as_deref(),
    ) {
        Some(path) => SpeciesList::from_json(path)?,
        None => {
            return Err("no species table; pass --species-list or set [data] species-list".into())
        }
    };
    let accessions = match ReconcileConfig::resolve_path(
        cli.accessioning.as_deref(),
        config.data.accessioning.as_deref(),
    ) {
        Some(path) => MockAccessionSource::from_json(path)?,
        None => MockAccessionSource::new(),
    };
    let warehouse = match ReconcileConfig::resolve_path(
        cli.warehouse.as_deref(),
        config.data.warehouse.as_deref(),
    ) {
        Some(path) => MockWarehouseSource::from_json(path)?,
        None => MockWarehouseSource::new(),
    };

    let reconciler = Reconciler::new(accessions, warehouse, species_list);
    let (records, clustered_view) = match &cli.command {
        Commands::Accession { id } => {
            info!("querying accession {} for {}", id, species);
            (reconciler.by_accession(&species, id), id.starts_with("rs"))
        }
        Commands::Position { position } => {
            info!("querying position {} for {}", position, species);
            (reconciler.by_position(&species, position), false)
        }
    };

    if cli.format == "json" {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    print_records(reconciler.species_list(), &species, &records, clustered_view);
    Ok(())
}

fn print_records(
    species_list: &SpeciesList,
    species: &str,
    records: &[VariantRecord],
    clustered: bool,
) {
    if records.is_empty() {
        println!("No Data Available");
        return;
    }

    let organism = species_list
        .organism_name(species)
        .unwrap_or_else(|| species.to_string());
    let assembly = species_list.assembly_of(species).unwrap_or_default();
    let fields = display::summary_fields(clustered);

    // A clustered view is one cluster summary; everything else lists each
    // allele combination.
    let shown = if clustered { &records[..1] } else { records };

    println!("Variant Information");
    for record in shown {
        for field in &fields {
            println!(
                "  {:<34} {}",
                field.label(),
                display::summary_value(*field, record, &organism, assembly)
            );
        }
        println!();
    }

    if clustered {
        let submitted = &records[0].associated_ssids;
        if !submitted.is_empty() {
            println!("Submitted Variants");
            println!("  {}", display::SUBMITTED_HEADERS.join("\t"));
            for row in display::submitted_rows(submitted) {
                println!("  {}", row.join("\t"));
            }
        }
        return;
    }

    let display_config = DisplayConfig::default();
    for record in records {
        let rows = display::consequence_rows(record, &display_config);
        if rows.is_empty() {
            continue;
        }
        match &record.repr {
            Some(repr) => println!("Consequence Types for {}", repr),
            None => println!("Consequence Types"),
        }
        for row in rows {
            let impact = row.detail.map(|detail| detail.impact.as_str()).unwrap_or("");
            println!(
                "  {}\t{}\t{}\t{}\t{}",
                row.gene_id, row.transcript_id, row.accession, row.name, impact
            );
        }
    }

    if let Some(rsid) = records.first().and_then(|record| record.associated_rsid.as_deref()) {
        println!("Clustered under {}", rsid);
    }
}
