use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tally_pdf::{FontConfig, FontSet, ReportConfig};

/// Render a poll-results report (English or Arabic) from a JSON request.
#[derive(Parser)]
#[command(name = "tally-pdf", version)]
struct Cli {
    /// JSON request: { language, answerFilter, searchTerm, records, totalCount, filteredCount }
    input: PathBuf,

    /// Output PDF path. Defaults to the suggested filename in the current directory.
    output: Option<PathBuf>,

    /// Report configuration as JSON; unset fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repeat the table header row on continuation pages
    #[arg(long)]
    repeat_table_header: bool,

    /// Extra font directory, searched before the system ones (repeatable)
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Use the built-in Helvetica faces and skip font discovery (no Arabic glyphs)
    #[arg(long)]
    standard_fonts: bool,
}

fn run(cli: Cli) -> Result<(), tally_pdf::Error> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ReportConfig::default(),
    }
    .with_env_overrides();
    if cli.repeat_table_header {
        config.repeat_table_header = true;
    }

    let fonts = if cli.standard_fonts {
        FontSet::standard()
    } else {
        let mut font_config = FontConfig::from_env();
        let mut dirs = cli.font_dirs;
        dirs.append(&mut font_config.font_dirs);
        font_config.font_dirs = dirs;
        FontSet::load(&font_config)?
    };

    let composer = tally_pdf::ReportComposer::new(&fonts, &config);
    let report = composer.compose_json(&std::fs::read_to_string(&cli.input)?)?;
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(report.suggested_filename()));
    std::fs::write(&output, &report.bytes)?;
    println!(
        "{} ({} pages, {} bytes)",
        output.display(),
        report.page_count,
        report.byte_size
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
