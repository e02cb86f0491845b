//! Command-line interface of the `diveclub` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

/// diveclub - records for a diving club
///
/// Serves the member, dive and equipment screens plus the admin API.
#[derive(Debug, Parser)]
#[command(name = "diveclub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a configuration file (default: ./diveclub.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending migrations and start the HTTP server
    Serve {
        /// Listen address, overriding `server.bind`
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Apply pending migrations and exit
    Migrate,

    /// Replace all records with generated sample data
    Seed {
        /// Seed for the random generator, for reproducible data
        #[arg(long, value_name = "N")]
        rng_seed: Option<u64>,
    },
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["diveclub", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Serve { bind: Some(ref addr) } if addr == "0.0.0.0:8080"
        ));
    }

    #[test]
    fn test_parse_seed() {
        let cli = Cli::try_parse_from(["diveclub", "seed", "--rng-seed", "42"]).unwrap();
        assert!(matches!(cli.command, Command::Seed { rng_seed: Some(42) }));

        let cli = Cli::try_parse_from(["diveclub", "seed"]).unwrap();
        assert!(matches!(cli.command, Command::Seed { rng_seed: None }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["diveclub", "migrate", "-vv", "--config", "club.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate));
        assert_eq!(cli.verbosity(), Verbosity::Trace);
        assert_eq!(cli.config, Some(PathBuf::from("club.toml")));
    }

    #[test]
    fn test_quiet_wins() {
        let cli = Cli::try_parse_from(["diveclub", "-q", "-v", "migrate"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["diveclub"]).is_err());
    }
}
