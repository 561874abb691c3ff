use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_DB};

#[derive(Parser, Debug)]
#[command(name = "fbref-to-sqlite")]
#[command(version, about = "Scrape FBref football statistics into a SQLite database")]
pub struct Cli {
    /// SQLite database path
    #[arg(long, global = true, default_value = DEFAULT_DB)]
    pub db: PathBuf,

    /// Custom cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Pause after each network request, in milliseconds
    #[arg(long, global = true, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Site root used to resolve relative links
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the domestic, club and national competition listings
    Competition,

    /// Scrape the season history of stored competitions
    Season(CompetitionFilter),

    /// Scrape final tables of domestic leagues
    ScoreTable(CompetitionFilter),

    /// Scrape final tables of international club tournaments
    TournamentClub(CompetitionFilter),

    /// Scrape final tables of national team tournaments
    TournamentNation(CompetitionFilter),

    /// Scrape schedules and results of recent seasons
    Fixture {
        #[command(flatten)]
        filter: CompetitionFilter,

        /// Include seasons starting up to this many years ago
        #[arg(long, default_value_t = 1)]
        years_back: u32,

        /// Re-fetch the season in progress instead of using the cache
        #[arg(long)]
        refresh_current: bool,

        /// Keep games that have not been played yet
        #[arg(long)]
        future_games: bool,
    },

    /// Scrape match reports of stored fixtures
    Match {
        #[command(flatten)]
        filter: CompetitionFilter,

        /// Include seasons starting up to this many years ago
        #[arg(long, default_value_t = 10)]
        years_back: u32,
    },

    /// Inspect or clear the HTML cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompetitionFilter {
    /// Only this competition
    #[arg(long)]
    pub competition_id: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Entry counts and sizes per pipeline cache
    Stats {
        /// Only this pipeline cache
        #[arg(long)]
        pipeline: Option<String>,
    },

    /// Cached URLs, newest first
    List {
        /// Pipeline cache to list
        #[arg(long, default_value = "match")]
        pipeline: String,
    },

    /// Delete cached pages
    Clear {
        /// Only entries cached more than this many days ago
        #[arg(long)]
        older_than_days: Option<u32>,

        /// Only this pipeline cache
        #[arg(long)]
        pipeline: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_defaults() {
        let cli = Cli::try_parse_from(["fbref-to-sqlite", "fixture"]).unwrap();
        assert_eq!(cli.db, PathBuf::from(DEFAULT_DB));
        assert_eq!(cli.delay_ms, 1000);
        match cli.command {
            Commands::Fixture {
                filter,
                years_back,
                refresh_current,
                future_games,
            } => {
                assert_eq!(filter.competition_id, None);
                assert_eq!(years_back, 1);
                assert!(!refresh_current);
                assert!(!future_games);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fbref-to-sqlite",
            "match",
            "--competition-id",
            "9",
            "--db",
            "out.db",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.db, PathBuf::from("out.db"));
        match cli.command {
            Commands::Match { filter, years_back } => {
                assert_eq!(filter.competition_id, Some(9));
                assert_eq!(years_back, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cache_clear() {
        let cli = Cli::try_parse_from([
            "fbref-to-sqlite",
            "cache",
            "clear",
            "--older-than-days",
            "30",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheAction::Clear {
                    older_than_days: Some(30),
                    pipeline: None
                }
            }
        ));
    }
}
