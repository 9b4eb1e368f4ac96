//! CLI argument definitions for almanac.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `events` | Calendar items across categories, soonest first |
//! | `scotus` | Supreme Court activity, most recent first |
//! | `regulations` | Regulatory documents, newest first |
//! | `sources` | List registered sources and their credential status |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `8000` | Per-source time budget in ms |
//!
//! # Examples
//!
//! ```bash
//! almanac events --category economic --limit 5 --pretty
//! almanac scotus --term 2023 --format table
//! almanac sources
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Civic calendar aggregation from Congress.gov, FRED, Treasury,
/// CourtListener and Regulations.gov.
///
/// Credentials are read from the environment (`ALMANAC_*` or the
/// conventional upstream variable names).
#[derive(Debug, Parser)]
#[command(
    name = "almanac",
    author,
    version,
    about = "Multi-source civic calendar aggregation",
    long_about = "almanac fetches congressional meetings, economic releases and auctions, \
Supreme Court dockets and regulatory documents, normalizes them into one record shape \
and prints the feed envelope.\n\
\n\
Exit code 3 means the sources produced nothing and fallback records were printed.\n\
\n\
Use 'almanac <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Time budget per source in milliseconds.
    ///
    /// Overrides `ALMANAC_ADAPTER_TIMEOUT_MS`.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// Aligned columns for terminal display.
    Table,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upcoming calendar items across categories.
    ///
    /// # Examples
    ///
    ///   almanac events
    ///   almanac events --category economic --limit 5
    Events(EventsArgs),

    /// Supreme Court case activity.
    ///
    /// # Examples
    ///
    ///   almanac scotus
    ///   almanac scotus --term 2023 --limit 10
    Scotus(ScotusArgs),

    /// Recently posted regulatory documents.
    Regulations(LimitArgs),

    /// List registered sources and whether their credentials are set.
    Sources,
}

/// Arguments for the `events` command.
#[derive(Debug, Args)]
pub struct EventsArgs {
    /// congressional, economic, judicial, regulatory or all.
    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub limit: LimitArgs,
}

/// Arguments for the `scotus` command.
#[derive(Debug, Args)]
pub struct ScotusArgs {
    /// Term year; the term runs from October of that year to September of the next.
    #[arg(long)]
    pub term: Option<i32>,

    #[command(flatten)]
    pub limit: LimitArgs,
}

#[derive(Debug, Args)]
pub struct LimitArgs {
    /// Maximum number of records (default: 50).
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "almanac",
            "events",
            "--category",
            "economic",
            "--limit",
            "5",
            "--format",
            "table",
        ])
        .expect("valid arguments");

        assert_eq!(cli.format, OutputFormat::Table);
        let Command::Events(args) = cli.command else {
            panic!("expected events");
        };
        assert_eq!(args.category.as_deref(), Some("economic"));
        assert_eq!(args.limit.limit, Some(5));
    }

    #[test]
    fn scotus_accepts_a_term() {
        let cli = Cli::try_parse_from(["almanac", "--timeout-ms", "500", "scotus", "--term", "2023"])
            .expect("valid arguments");

        assert_eq!(cli.timeout_ms, Some(500));
        assert!(matches!(
            cli.command,
            Command::Scotus(ScotusArgs { term: Some(2023), .. })
        ));
    }

    #[test]
    fn non_numeric_term_is_rejected() {
        assert!(Cli::try_parse_from(["almanac", "scotus", "--term", "last"]).is_err());
    }
}
