mod cli;
mod corpus;
mod dates;
mod detectors;
mod error;
mod findings;
mod output;
mod readers;
mod scan;
mod types;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands, ScanArgs};
use corpus::NameCorpus;
use output::{AuditReport, OutputFormat};
use scan::Scanner;
use tracing::{info, warn};
use types::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Scan(args) => run_scan(&args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // RUST_LOG wins over -v
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Run one scan and write its report; `Ok(false)` when the scan stopped early
fn run_scan(args: &ScanArgs) -> Result<bool> {
    let corpus = NameCorpus::load(&args.names)?;
    info!(path = %args.names.display(), names = corpus.len(), "loaded name corpus");

    let mut source = readers::open_source(&args.input, &args.source_options()?)?;
    let scanner = Scanner::new(&corpus, args.scan_options());
    let report = scanner.scan(source.as_mut());
    let mode = args.report_mode();

    match args.format {
        OutputFormat::Text => {
            let text = output::render_text(&report, mode);
            match &args.out {
                Some(out_path) => output::write_text_file(&text, out_path)?,
                None => output::write_stdout(&text)?,
            }
        }
        OutputFormat::Json => {
            let file_hash = if args.no_hash {
                None
            } else {
                Some(scan::file_sha256(&args.input)?)
            };
            let file_name = args
                .input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| args.input.display().to_string());
            let audit = AuditReport::new(file_name, file_hash, mode, &report);
            match &args.out {
                Some(out_path) => output::write_json_file(&audit, out_path)?,
                None => output::write_stdout(&output::to_json_string(&audit)?)?,
            }
        }
    }

    if let Some(out_path) = &args.out {
        eprintln!("Report written to: {}", out_path.display());
    }

    if !report.is_complete() {
        warn!(rows = report.rows_scanned, "scan incomplete, report covers rows read so far");
    }

    Ok(report.is_complete())
}
