pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tradequote_core::config::{AppConfig, LogFormat};

use commands::{bulk, catalog, compare, config, price, quote, GlobalOptions};

#[derive(Debug, Parser)]
#[command(
    name = "tradequote",
    about = "Landed-cost pricing CLI",
    long_about = "Price supplier products into landed, customer-facing quotations in the settlement currency.",
    after_help = "Examples:\n  tradequote price --product calendar --quantity 300 --shipping AIR_EXPRESS\n  tradequote compare --product calendar\n  tradequote quote --item calendar:300:AIR_EXPRESS --item tote-bag-1:120:SEA_FREIGHT\n  tradequote config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a tradequote.toml config file")]
    config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Path to a JSON product catalog (defaults to the demo range)"
    )]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Full landed-cost breakdown for one product and shipping method")]
    Price(price::PriceArgs),
    #[command(about = "Validated pricing summary across every shipping method")]
    Compare(compare::CompareArgs),
    #[command(about = "Price line items with grand totals, optionally as a draft proposal")]
    Quote(quote::QuoteArgs),
    #[command(about = "Compare shipping methods for many products; failures are reported inline")]
    Bulk(bulk::BulkArgs),
    #[command(about = "List catalog products with cost-sheet validation status")]
    Catalog,
    #[command(about = "Inspect effective pricing configuration with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = GlobalOptions { config_path: cli.config, catalog_path: cli.catalog };

    if let Ok(config) = AppConfig::load(options.load_options()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging disabled: {error}");
        }
    }

    let result = match &cli.command {
        Command::Price(args) => price::run(&options, args),
        Command::Compare(args) => compare::run(&options, args),
        Command::Quote(args) => quote::run(&options, args),
        Command::Bulk(args) => bulk::run(&options, args),
        Command::Catalog => catalog::run(&options),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: config::run(options.config_path.as_deref()),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

// Logs go to stderr so stdout stays machine-readable.
fn init_logging(config: &AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

#[cfg(test)]
mod tests {
    use tradequote_core::config::AppConfig;

    use super::init_logging;

    #[test]
    fn repeated_logging_init_reports_the_failure() {
        let config = AppConfig::default();
        let _ = init_logging(&config);

        assert!(init_logging(&config).is_err());
    }
}
