//! Replays a recorded lifecycle message stream into the result database.
//!
//! Reads newline-delimited JSON messages from stdin and feeds them through a
//! [`VisitorObserver`] to the result accumulator and the run summary.

use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use testrun_visitors::config::Config;
use testrun_visitors::db::DbPool;
use testrun_visitors::error::AppResult;
use testrun_visitors::models::MessageKind;
use testrun_visitors::replay::replay;
use testrun_visitors::visitor::{
    RunSummaryVisitor, TestFinishedVisitor, TestMessageVisitor, VisitorObserver,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    if let Err(e) = run(&config).await {
        error!("Replay failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> AppResult<()> {
    let pool = DbPool::new(config).await?;
    info!("Database connection established");

    if config.run_migrations {
        pool.run_migrations().await?;
    }

    let accumulator: Arc<dyn TestMessageVisitor> =
        Arc::new(TestFinishedVisitor::with_sink(Arc::new(pool)));
    let summary: Arc<dyn TestMessageVisitor> = Arc::new(RunSummaryVisitor::new());
    let observer = VisitorObserver::new(MessageKind::AssemblyFinished, vec![accumulator, summary]);

    let outcome = replay(BufReader::new(tokio::io::stdin()), &observer).await?;

    if !observer.is_finished() {
        warn!(
            "Stream ended after {} message(s) without {}; results were not saved",
            outcome.delivered,
            observer.terminal()
        );
    }

    Ok(())
}
