//! Export legacy PDS3 data-set records as Solr update documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pds3_registry_export::{
    DirectorySink, ExportOptions, ExportSummary, IdentifierTable, JsonlRecords, LegacyRecord,
    Result, read_solr_response, run,
};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "pds3-export",
    about = "Resolve PDS3 catalog references and write Solr docs in batches",
    long_about = "Reads legacy PDS3 records, resolves investigation, instrument host, instrument and target names to PDS4 context identifiers, and writes numbered Solr update files plus a missing-context report."
)]
struct Cli {
    #[arg(
        long = "db-path",
        value_name = "PATH",
        help = "CSV or spreadsheet of known PDS3 names to PDS4 identifiers (pds3_name, identifier, pds4_name)"
    )]
    db_path: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "JSON-lines file of legacy records, one object per line"
    )]
    input: PathBuf,
    #[arg(
        long = "solr-response",
        help = "Treat --input as a saved Solr select response instead of JSON lines"
    )]
    solr_response: bool,
    #[arg(
        long = "output-path",
        default_value = ".",
        help = "Directory for the solr doc files"
    )]
    output_path: PathBuf,
    #[arg(
        long = "report-path",
        value_name = "PATH",
        help = "Missing-context report path (default: <output-path>/missing_context.csv)"
    )]
    report_path: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "JSON file with export options")]
    options: Option<PathBuf>,
    #[arg(long = "batch-size", help = "Documents per output file [default: 1000]")]
    batch_size: Option<usize>,
    #[arg(long = "package-id", help = "Package id stamped on every document")]
    package_id: Option<Uuid>,
    #[arg(
        long = "keep-legacy-refs",
        help = "Also write the raw legacy reference names"
    )]
    keep_legacy_refs: bool,
    #[arg(long = "log-level", default_value = "info", help = "Fallback when RUST_LOG is unset")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match export(&cli) {
        Ok(summary) => {
            println!(
                "package {}: {} documents in {} files, {} missing references ({} distinct)",
                summary.package_id,
                summary.documents,
                summary.batch_files,
                summary.misses,
                summary.distinct_misses
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "export failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn export(cli: &Cli) -> Result<ExportSummary> {
    let mut options = match &cli.options {
        Some(path) => ExportOptions::from_json_path(path)?,
        None => ExportOptions::default(),
    };
    if let Some(batch_size) = cli.batch_size {
        options.batch_size = batch_size;
    }
    if let Some(package_id) = cli.package_id {
        options.package_id = package_id;
    }
    if cli.keep_legacy_refs {
        options.keep_legacy_reference_values = true;
    }
    options.validate()?;

    let table = IdentifierTable::load(&cli.db_path)?;

    let mut sinks = DirectorySink::from_options(&cli.output_path, &options);
    if let Some(report_path) = &cli.report_path {
        sinks = sinks.with_report_path(report_path);
    }

    if cli.solr_response {
        let records: Vec<LegacyRecord> = read_solr_response(&cli.input)?;
        run(records.into_iter().map(Ok), &table, options, &mut sinks)
    } else {
        run(JsonlRecords::open(&cli.input)?, &table, options, &mut sinks)
    }
}
