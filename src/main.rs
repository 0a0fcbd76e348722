use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use holidaykit::configuration::Configuration;

/// Print the holidays of a jurisdiction as JSON.
#[derive(Parser, Debug)]
#[command(name = "holidaykit", version)]
struct Cli {
    /// Jurisdiction id, e.g. CA-NS.
    jurisdiction: String,

    /// Calendar year to compute.
    year: i32,

    /// Locale for holiday names; the catalog's default locale when omitted.
    #[arg(short, long)]
    locale: Option<String>,

    /// Path to the JSON holiday catalog.
    #[arg(short, long, default_value = "catalog/canada.json")]
    catalog: PathBuf,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let configuration = Configuration::from_reader(&cli.catalog)?;
    let holidays = configuration.holidays(&cli.jurisdiction, cli.year, cli.locale.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&holidays)?);
    Ok(())
}
