//! seedbed binary.
//!
//! Reads `seedbed.toml` (or the path given with `--config`) and `SEEDBED_*`
//! environment variables, opens the SQLite database, and runs one pipeline
//! to completion.
//!
//! ```
//! cargo run -p seedbed -- --pipeline measurements --seed 7
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use seedbed::{Pipeline, Settings, pipeline::Report};
use seedbed_store_sqlite::Gateway;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Seed a SQLite database and migrate it")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "seedbed.toml")]
  config: PathBuf,

  /// Override the configured pipeline.
  #[arg(long, value_enum)]
  pipeline: Option<Pipeline>,

  /// Fix the generator seed for a reproducible database.
  #[arg(long)]
  seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let config = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SEEDBED").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let mut settings: Settings = config
    .try_deserialize()
    .context("failed to deserialise Settings")?;

  if let Some(pipeline) = cli.pipeline {
    settings.pipeline = pipeline;
  }
  if cli.seed.is_some() {
    settings.seed = cli.seed;
  }
  settings.database_path = expand_tilde(&settings.database_path);
  settings.validate().context("invalid settings")?;

  let gateway = Gateway::open(&settings.database_path, &settings.gateway_options())
    .await
    .with_context(|| format!("failed to open database at {:?}", settings.database_path))?;

  tracing::info!(
    path = %settings.database_path.display(),
    pipeline = ?settings.pipeline,
    "database open"
  );

  // The database is closed whether or not the run succeeded.
  let outcome = seedbed::pipeline::run(&gateway, &settings).await;
  let closed = gateway.close().await;

  let report = finish(outcome, closed)?;

  tracing::info!(
    rows = report.loaded.rows,
    chunks = report.loaded.chunks,
    steps = report.steps,
    "done"
  );
  Ok(())
}

/// A pipeline error wins over a close error; the close error is still logged.
fn finish(
  outcome: seedbed::Result<Report>,
  closed:  seedbed_store_sqlite::Result<()>,
) -> anyhow::Result<Report> {
  match (outcome, closed) {
    (Ok(report), Ok(())) => Ok(report),
    (Ok(_), Err(close)) => Err(close).context("failed to close database"),
    (Err(e), closed) => {
      if let Err(close) = closed {
        tracing::warn!(error = %close, "failed to close database after pipeline error");
      }
      Err(e).context("pipeline failed")
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::{
    io,
    sync::{Arc, Mutex},
  };

  use seedbed_store_sqlite::Error as StoreError;

  use super::*;

  #[derive(Clone, Default)]
  struct Captured(Arc<Mutex<Vec<u8>>>);

  impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
  }

  fn finish_logged(
    outcome: seedbed::Result<Report>,
    closed:  seedbed_store_sqlite::Result<()>,
  ) -> (anyhow::Result<Report>, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_ansi(false)
      .with_writer(move || writer.clone())
      .finish();
    let result = tracing::subscriber::with_default(subscriber, || finish(outcome, closed));
    let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    (result, logged)
  }

  #[test]
  fn clean_run_returns_the_report() {
    let report = Report { steps: 2, ..Report::default() };
    let (result, logged) = finish_logged(Ok(report), Ok(()));
    assert_eq!(result.unwrap(), report);
    assert!(logged.is_empty());
  }

  #[test]
  fn close_error_after_success_fails_the_run() {
    let (result, _) = finish_logged(Ok(Report::default()), Err(StoreError::NoColumns));
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "failed to close database");
  }

  #[test]
  fn pipeline_error_wins_and_close_error_is_logged() {
    let outcome = Err(seedbed::Error::Config("batch size must be at least 1".to_owned()));
    let (result, logged) = finish_logged(outcome, Err(StoreError::NoColumns));

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "pipeline failed");
    assert!(matches!(
      err.downcast_ref::<seedbed::Error>(),
      Some(seedbed::Error::Config(_))
    ));
    assert!(logged.contains("WARN"), "{logged}");
    assert!(logged.contains("failed to close database after pipeline error"), "{logged}");
  }
}
