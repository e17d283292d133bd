//! Clap derive structures for the `omada-respondd` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// omada-respondd -- publish Omada access points to Freifunk maps
#[derive(Debug, Parser)]
#[command(
    name = "omada-respondd",
    version,
    about = "Collect Omada access points and print them as a respondd snapshot",
    long_about = "Logs in to an Omada controller, walks every accessible site and\n\
        prints the publishable access points as {\"accesspoints\": [...]} JSON.\n\n\
        Runs one cycle by default; --interval keeps polling."
)]
pub struct Cli {
    /// Config file (default: platform config dir, omada-respondd/config.toml)
    #[arg(long, short = 'c', env = "RESPONDD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log line format (logs go to stderr)
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Print the snapshot on a single line
    #[arg(long)]
    pub compact: bool,

    /// Repeat the cycle every SECS seconds until interrupted
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Print the effective configuration (password masked) and exit
    #[arg(long)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn interval_must_be_positive() {
        assert!(Cli::try_parse_from(["omada-respondd", "--interval", "0"]).is_err());
        let cli = Cli::try_parse_from(["omada-respondd", "--interval", "60", "-vv"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.interval, Some(60));
        assert_eq!(cli.verbose, 2);
    }
}
