//! Runs the external task worker over stdin and stdout.
//!
//! Usage:
//!
//! ```text
//! taskbridge-worker [config-path] [submissions-path]
//! ```
//!
//! Each stdin line is one task object, for example
//! `{"id":"t-1","topic":"publish-article","businessKey":"<uuid>"}`. Each
//! stdout line is one signal object (`complete` or `failure`). The optional
//! `submissions-path` points at a JSON array of submissions used to seed the
//! in-memory store. Configuration is read from `config-path` (TOML, JSON, or
//! YAML) and `TASKBRIDGE__*` environment variables. Logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockable::DefaultClock;
use taskbridge::config::{ConfigError, WorkerConfig};
use taskbridge::external_task::{
    adapters::{JsonLinesTaskService, JsonLinesTransport},
    services::{ExternalTaskWorker, RegistryError, TaskHandlerRegistry, WorkerError},
};
use taskbridge::logging::init_logging;
use taskbridge::submission::{
    adapters::memory::{
        InMemoryArticlePublisher, InMemoryChangeNotifier, InMemorySubmissionRepository,
    },
    domain::Submission,
    ports::SubmissionRepositoryError,
    services::PublishArticleAction,
};
use thiserror::Error;
use tokio::io::BufReader;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the worker binary.
#[derive(Debug, Error)]
enum BridgeError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read submissions from {path}: {source}")]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse submissions from {path}: {source}")]
    SeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Seed(#[from] SubmissionRepositoryError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Positional command-line arguments.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config_path: Option<PathBuf>,
    submissions_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    run(std::env::args_os().map(PathBuf::from))
        .await
        .map_err(Into::into)
}

fn log_loaded_config(config: &WorkerConfig) {
    tracing::info!(
        worker_id = %config.worker_id,
        max_concurrent_tasks = config.max_concurrent_tasks,
        topic = %config.publish_article.topic,
        json = config.log.json,
        "configuration loaded"
    );
}

async fn run(args: impl Iterator<Item = PathBuf>) -> Result<(), BridgeError> {
    let args = parse_args(args)?;
    let config = WorkerConfig::load(args.config_path.as_deref())?;
    init_logging(&config.log);
    log_loaded_config(&config);

    let repository = Arc::new(InMemorySubmissionRepository::new());
    if let Some(path) = args.submissions_path.as_deref() {
        let seeded = seed_submissions(&repository, path).await?;
        tracing::info!(count = seeded, path = %path.display(), "seeded submissions");
    }

    let action = PublishArticleAction::new(
        repository,
        Arc::new(InMemoryArticlePublisher::new()),
        Arc::new(InMemoryChangeNotifier::new()),
        Arc::new(DefaultClock),
        config.invoke_timeout(),
    );
    let mut registry = TaskHandlerRegistry::new();
    registry.register(
        config.publish_topic()?,
        action.into_handler(config.handler_settings()),
    )?;

    let worker = ExternalTaskWorker::new(
        config.worker_id.clone(),
        Arc::new(JsonLinesTransport::new(BufReader::new(tokio::io::stdin()))),
        Arc::new(JsonLinesTaskService::new(tokio::io::stdout())),
        Arc::new(registry),
        config.max_concurrent_tasks,
    );
    let summary = worker.run().await?;
    tracing::info!(
        worker_id = %worker.worker_id(),
        processed = summary.total(),
        "input closed, worker stopped"
    );
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = PathBuf>) -> Result<Args, BridgeError> {
    let _program = args.next();
    let parsed = Args {
        config_path: args.next(),
        submissions_path: args.next(),
    };
    if let Some(extra) = args.next() {
        return Err(BridgeError::InvalidArgs(format!(
            "unexpected extra argument: {}",
            extra.display()
        )));
    }
    Ok(parsed)
}

async fn seed_submissions(
    repository: &InMemorySubmissionRepository,
    path: &Path,
) -> Result<usize, BridgeError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| BridgeError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
    let submissions: Vec<Submission> =
        serde_json::from_slice(&bytes).map_err(|source| BridgeError::SeedParse {
            path: path.to_path_buf(),
            source,
        })?;

    let count = submissions.len();
    for submission in submissions {
        repository.insert(submission)?;
    }
    Ok(count)
}
