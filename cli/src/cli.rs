use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cashflow",
    about = "Record who owes whom, then settle with as few payments as possible",
    version,
)]
pub struct Cli {
    /// Ledger configuration file (TOML); falls back to CASHFLOW_* variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Settlement configuration file (TOML)
    #[arg(long)]
    pub settlement_config: Option<PathBuf>,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Currency label printed before amounts
    #[arg(long, default_value = "Rs.")]
    pub currency: String,

    /// Output format for command results
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print Prometheus metrics on exit
    #[arg(long)]
    pub metrics: bool,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_every_flag_has_help() {
        let command = Cli::command();
        command.clone().debug_assert();

        for arg in command.get_arguments() {
            if arg.get_id() == "help" || arg.get_id() == "version" {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{} has no help text", arg.get_id());
        }
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["cashflow", "--format", "json", "-v"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.currency, "Rs.");
    }
}
