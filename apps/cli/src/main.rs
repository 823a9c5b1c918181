use anyhow::Result;
use clap::Parser;
use codility::{
    ClientConfig, CodilityAPI, CodilityError, ColumnPolicy, ConsoleExportReporter, ExportConfig, ExportOutcome,
    FixedTestName, IntoProgressCallback, NameMatchPolicy, PromptSelector, SessionExporter,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codility-export", about = "Export a Codility test's completed sessions to CSV")]
#[command(version)]
struct Cli {
    /// Name of the test to export (prompts when omitted)
    #[arg(short, long)]
    test: Option<String>,

    /// Directory the CSV is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// API base URL, overrides CODILITY_API_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of sessions fetched at once
    #[arg(short, long, default_value_t = 1)]
    concurrency: usize,

    /// Use the first test when several share the name
    #[arg(long)]
    first_match: bool,

    /// Take columns from the first row only
    #[arg(long)]
    first_row_columns: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(outcome) => {
            println!("{}", outcome.message());
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExportOutcome> {
    let mut client = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        client = client.with_base_url(base_url);
    }
    if let Some(secs) = cli.timeout {
        client = client.with_timeout(Duration::from_secs(secs));
    }
    let api = CodilityAPI::with_config(client)?;

    let mut config = ExportConfig::default()
        .with_output_dir(cli.output_dir)
        .with_max_concurrent_sessions(cli.concurrency);
    if cli.first_match {
        config = config.with_name_match(NameMatchPolicy::First);
    }
    if cli.first_row_columns {
        config = config.with_columns(ColumnPolicy::FirstRow);
    }

    let exporter =
        SessionExporter::new(&api, config).with_progress(ConsoleExportReporter::new(cli.verbose).into_callback());

    let outcome = match cli.test {
        Some(name) => exporter.run(&mut FixedTestName(name)).await?,
        None => exporter.run(&mut PromptSelector::stdio()).await?,
    };
    Ok(outcome)
}

fn report(err: &anyhow::Error) {
    eprintln!("Error: {}", err);
    if let Some(err) = err.downcast_ref::<CodilityError>() {
        if let Some(suggestion) = err.suggestion() {
            eprintln!("Suggestion: {}", suggestion);
        }
        debug!("{}", err.detailed_report());
    }
}
