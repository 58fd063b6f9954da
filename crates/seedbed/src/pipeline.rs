//! End-to-end runs: migration steps interleaved with seeding.

use std::time::Instant;

use seedbed_core::generate::{FakeGenerator, RecordGenerator};
use seedbed_store_sqlite::{
  Gateway, LoadSummary, Migrator,
  schema::{self, MEASUREMENT_STEPS, SOCIAL_STEPS},
};
use tracing::info;

use crate::{Pipeline, Result, Settings, seed::Seeder};

/// What a finished run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
  /// Records written by the seeder; migration backfills are not counted.
  pub loaded: LoadSummary,
  pub steps:  usize,
}

/// Run the pipeline `settings` selects, with a generator seeded from
/// `settings.seed` when one is set.
pub async fn run(gateway: &Gateway, settings: &Settings) -> Result<Report> {
  settings.validate()?;

  match settings.seed {
    Some(seed) => {
      info!(seed, "using a fixed generator seed");
      dispatch(gateway, settings, FakeGenerator::seeded(seed)).await
    }
    None => dispatch(gateway, settings, FakeGenerator::from_entropy()).await,
  }
}

async fn dispatch<G: RecordGenerator>(
  gateway:   &Gateway,
  settings:  &Settings,
  generator: G,
) -> Result<Report> {
  match settings.pipeline {
    Pipeline::Social => run_social(gateway, settings, generator).await,
    Pipeline::Measurements => run_measurements(gateway, settings, generator).await,
  }
}

/// Base schema, users/posts/likes, likes → reactions, labelled reactions,
/// then the rest of the reaction history.
pub async fn run_social<G: RecordGenerator>(
  gateway:   &Gateway,
  settings:  &Settings,
  generator: G,
) -> Result<Report> {
  let started = Instant::now();
  let mut migrator = Migrator::new(SOCIAL_STEPS);
  let mut seeder = Seeder::new(gateway, generator, settings.batch_size);
  let mut report = Report::default();

  report.steps += migrator.run_through(gateway, schema::RECREATE_BASE_SCHEMA).await?;

  let (users, posts) = (settings.total_users, settings.total_posts);
  report.loaded += seeder.users(users).await?;
  report.loaded += seeder.posts(posts, users).await?;
  report.loaded += seeder.likes(settings.total_likes, posts, users).await?;

  report.steps += migrator.run_through(gateway, schema::LIKES_TO_REACTIONS_V1).await?;

  report.loaded += seeder.reactions_v1(settings.total_reactions, posts, users).await?;

  report.steps += migrator.run_to_end(gateway).await?;

  info!(
    rows = report.loaded.rows,
    steps = report.steps,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "social pipeline finished"
  );
  Ok(report)
}

/// Fresh measurements table, seed it, fold feet and inches into one column.
pub async fn run_measurements<G: RecordGenerator>(
  gateway:   &Gateway,
  settings:  &Settings,
  generator: G,
) -> Result<Report> {
  let started = Instant::now();
  let mut migrator = Migrator::new(MEASUREMENT_STEPS);
  let mut seeder = Seeder::new(gateway, generator, settings.batch_size);
  let mut report = Report::default();

  report.steps += migrator.run_through(gateway, schema::RECREATE_MEASUREMENTS).await?;
  report.loaded += seeder.measurements(settings.total_measurements).await?;
  report.steps += migrator.run_to_end(gateway).await?;

  info!(
    rows = report.loaded.rows,
    steps = report.steps,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "measurements pipeline finished"
  );
  Ok(report)
}
