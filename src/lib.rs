pub mod cli;
pub mod config;
pub mod documents;
pub mod download;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod writer;

pub use cli::{CacheAction, Cli, Commands};
pub use config::Settings;
pub use error::FatalError;
pub use pipeline::{Pipeline, RunSummary};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
