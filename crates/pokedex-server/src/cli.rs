//! Command-line interface argument parsing
//!
//! Defined with clap's derive API. Every flag is optional; with no flags the
//! server starts with configuration from files and environment.

use clap::Parser;
use std::path::PathBuf;

/// Pokedex server - pokemon lookups with optional fun translations
///
/// Serves `GET /pokemon/{name}` and `GET /pokemon/translated/{name}` backed by
/// PokeAPI and FunTranslations.
#[derive(Parser, Debug)]
#[command(name = "pokedex-server", version, author, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file (YAML, JSON or TOML)
    #[arg(short, long, env = "POKEDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration file
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Validate the configuration, print it as JSON and exit
    #[arg(long)]
    pub check_config: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the verbosity level (0 = default, 1 = info, 2 = debug, 3+ = trace)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Whether stderr output should use ANSI colors
    pub fn use_color(&self) -> bool {
        use is_terminal::IsTerminal;

        !self.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["pokedex-server"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.bind.is_none());
        assert!(!cli.check_config);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "pokedex-server",
            "-vv",
            "--bind",
            "127.0.0.1:9000",
            "--config",
            "pokedex.toml",
            "--check-config",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(cli.config, Some(PathBuf::from("pokedex.toml")));
        assert!(cli.check_config);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pokedex-server", "-q", "-v"]).is_err());

        let cli = Cli::parse_from(["pokedex-server", "--quiet"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbosity_level(), 0);
    }
}
