use anyhow::{bail, Result};
use fbref_to_sqlite::{
    cli::{CacheAction, Cli, Commands},
    config::Settings,
    download::{Fetcher, HtmlCache, PIPELINES},
    init_tracing,
    model::CompetitionVariant,
    pipeline::{FixtureOptions, MatchOptions, Pipeline, RunSummary},
    writer::SqliteStore,
};
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(if cli.verbose { "debug" } else { "info" });

    let settings = Settings::new(
        &cli.base_url,
        cli.db.clone(),
        cli.cache_dir.clone(),
        Duration::from_millis(cli.delay_ms),
    )?;

    let start = Instant::now();
    let (name, summary) = match cli.command {
        Commands::Competition => (
            "competition",
            run(&settings, "competition", |p| p.competitions())?,
        ),

        Commands::Season(filter) => (
            "season",
            run(&settings, "season", |p| p.seasons(filter.competition_id))?,
        ),

        Commands::ScoreTable(filter) => (
            "score-table",
            run(&settings, "stats", |p| {
                p.standings(CompetitionVariant::Domestic, filter.competition_id)
            })?,
        ),

        Commands::TournamentClub(filter) => (
            "tournament-club",
            run(&settings, "stats", |p| {
                p.standings(CompetitionVariant::International, filter.competition_id)
            })?,
        ),

        Commands::TournamentNation(filter) => (
            "tournament-nation",
            run(&settings, "stats", |p| {
                p.standings(CompetitionVariant::National, filter.competition_id)
            })?,
        ),

        Commands::Fixture {
            filter,
            years_back,
            refresh_current,
            future_games,
        } => {
            let options = FixtureOptions {
                competition_id: filter.competition_id,
                years_back,
                refresh_current,
                future_games,
            };
            ("fixture", run(&settings, "fixture", |p| p.fixtures(&options))?)
        }

        Commands::Match { filter, years_back } => {
            let options = MatchOptions {
                competition_id: filter.competition_id,
                years_back,
            };
            ("match", run(&settings, "match", |p| p.matches(&options))?)
        }

        Commands::Cache { action } => return cache_command(&settings, action),
    };

    println!(
        "\n{} finished in {:.1}s: {} ({:?})",
        name,
        start.elapsed().as_secs_f64(),
        summary,
        settings.db_path
    );

    Ok(())
}

/// Open the database and the pipeline's cache, then run one pipeline.
fn run<F>(settings: &Settings, cache_pipeline: &str, body: F) -> Result<RunSummary>
where
    F: FnOnce(&mut Pipeline<'_, Fetcher>) -> Result<RunSummary>,
{
    let mut store = SqliteStore::open(&settings.db_path)?;
    let fetcher = Fetcher::new(settings, cache_pipeline)?;
    let mut pipeline = Pipeline::new(&fetcher, &mut store, settings);
    body(&mut pipeline)
}

fn cache_pipelines(pipeline: Option<String>) -> Result<Vec<String>> {
    match pipeline {
        Some(p) if PIPELINES.contains(&p.as_str()) => Ok(vec![p]),
        Some(p) => bail!("Unknown pipeline '{}', expected one of {}", p, PIPELINES.join(", ")),
        None => Ok(PIPELINES.iter().map(|p| p.to_string()).collect()),
    }
}

fn cache_command(settings: &Settings, action: CacheAction) -> Result<()> {
    match action {
        CacheAction::Stats { pipeline } => {
            for name in cache_pipelines(pipeline)? {
                let stats = HtmlCache::new(Some(&settings.cache_dir), &name)?.stats()?;
                println!("{}:", stats.pipeline);
                println!("  file:    {:?}", stats.cache_file);
                println!("  entries: {}", stats.total_entries);
                println!("  size:    {:.2} MB", stats.size_bytes as f64 / (1024.0 * 1024.0));
                if let (Some(oldest), Some(newest)) = (&stats.oldest_entry, &stats.newest_entry) {
                    println!("  oldest:  {}", oldest);
                    println!("  newest:  {}", newest);
                }
            }
        }

        CacheAction::List { pipeline } => {
            for name in cache_pipelines(Some(pipeline))? {
                let cache = HtmlCache::new(Some(&settings.cache_dir), &name)?;
                for entry in cache.list()? {
                    println!("{}  {}", entry.cached_at, entry.url);
                }
            }
        }

        CacheAction::Clear {
            older_than_days,
            pipeline,
        } => {
            for name in cache_pipelines(pipeline)? {
                let cache = HtmlCache::new(Some(&settings.cache_dir), &name)?;
                let removed = cache.clear(older_than_days)?;
                println!("{}: removed {} entries", name, removed);
            }
        }
    }

    Ok(())
}
