//! Seeds a SQLite database with synthetic social data and walks it through a
//! fixed history of schema migrations.
//!
//! [`Settings`] says what to generate; [`pipeline::run`] drives the
//! [`Seeder`](seed::Seeder) and the migration catalogs against one
//! [`Gateway`](seedbed_store_sqlite::Gateway).

pub mod error;
pub mod pipeline;
pub mod seed;

pub use error::{Error, Result};

use std::path::PathBuf;

use seedbed_core::record::{NewLike, NewMeasurement, NewReaction, NewUser, OwnedPost};
use seedbed_store_sqlite::{
  GatewayOptions,
  bulk::{DEFAULT_BATCH_SIZE, check_batch_shape},
};
use serde::Deserialize;

// ─── Defaults ────────────────────────────────────────────────────────────────

pub const DEFAULT_DATABASE_PATH: &str = "seedbed.db";
pub const DEFAULT_USERS: usize = 10;
pub const DEFAULT_POSTS: usize = 1_000;
pub const DEFAULT_LIKES: usize = 2;
pub const DEFAULT_REACTIONS: usize = 10_000;
pub const DEFAULT_MEASUREMENTS: usize = 1_000_000;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Which dataset a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
  /// Users, posts, likes and the reaction migrations.
  #[default]
  Social,
  /// The standalone measurements table.
  Measurements,
}

/// Runtime settings, deserialised from `seedbed.toml` and `SEEDBED_*`
/// environment variables. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub database_path:      PathBuf,
  pub pipeline:           Pipeline,
  pub total_users:        usize,
  pub total_posts:        usize,
  pub total_likes:        usize,
  pub total_reactions:    usize,
  pub total_measurements: usize,
  pub batch_size:         usize,
  /// Fixes the generator so two runs produce identical databases.
  pub seed:               Option<u64>,
  pub synchronous_off:    bool,
  pub profile_sql:        bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      database_path:      PathBuf::from(DEFAULT_DATABASE_PATH),
      pipeline:           Pipeline::default(),
      total_users:        DEFAULT_USERS,
      total_posts:        DEFAULT_POSTS,
      total_likes:        DEFAULT_LIKES,
      total_reactions:    DEFAULT_REACTIONS,
      total_measurements: DEFAULT_MEASUREMENTS,
      batch_size:         DEFAULT_BATCH_SIZE,
      seed:               None,
      synchronous_off:    true,
      profile_sql:        false,
    }
  }
}

impl Settings {
  pub fn gateway_options(&self) -> GatewayOptions {
    GatewayOptions {
      synchronous_off: self.synchronous_off,
      profile_sql:     self.profile_sql,
    }
  }

  /// Widest record the selected pipeline loads.
  fn widest_record(&self) -> usize {
    match self.pipeline {
      Pipeline::Social => [
        NewUser::COLUMNS.len(),
        OwnedPost::COLUMNS.len(),
        NewLike::COLUMNS.len(),
        NewReaction::COLUMNS.len(),
      ]
      .into_iter()
      .max()
      .unwrap_or(0),
      Pipeline::Measurements => NewMeasurement::COLUMNS.len(),
    }
  }

  /// Reject settings that would fail part-way through a run.
  pub fn validate(&self) -> Result<()> {
    check_batch_shape(self.batch_size, self.widest_record())
      .map_err(|e| Error::Config(e.to_string()))?;

    if self.pipeline == Pipeline::Social {
      let wants_owned = self.total_posts > 0 || self.total_likes > 0 || self.total_reactions > 0;
      if wants_owned && self.total_users == 0 {
        return Err(Error::Config(
          "posts, likes and reactions need at least one user".to_owned(),
        ));
      }
      let wants_posts = self.total_likes > 0 || self.total_reactions > 0;
      if wants_posts && self.total_posts == 0 {
        return Err(Error::Config(
          "likes and reactions need at least one post".to_owned(),
        ));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> Settings {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_yields_defaults() {
    let settings = from_toml("");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.database_path, PathBuf::from("seedbed.db"));
    assert_eq!(settings.pipeline, Pipeline::Social);
    assert_eq!(settings.total_users, 10);
    assert_eq!(settings.total_posts, 1_000);
    assert_eq!(settings.total_likes, 2);
    assert_eq!(settings.total_reactions, 10_000);
    assert_eq!(settings.total_measurements, 1_000_000);
    assert_eq!(settings.batch_size, 10_000);
    assert_eq!(settings.seed, None);
    assert!(settings.synchronous_off);
    assert!(!settings.profile_sql);
    settings.validate().unwrap();
  }

  #[test]
  fn file_values_override_defaults() {
    let settings = from_toml(
      r#"
      database_path = "/tmp/other.db"
      pipeline      = "measurements"
      batch_size    = 500
      seed          = 42
      "#,
    );
    assert_eq!(settings.database_path, PathBuf::from("/tmp/other.db"));
    assert_eq!(settings.pipeline, Pipeline::Measurements);
    assert_eq!(settings.batch_size, 500);
    assert_eq!(settings.seed, Some(42));
    assert_eq!(settings.total_users, DEFAULT_USERS);
  }

  #[test]
  fn zero_batch_size_is_rejected() {
    let settings = Settings { batch_size: 0, ..Settings::default() };
    assert!(matches!(settings.validate(), Err(Error::Config(_))));
  }

  #[test]
  fn batch_size_is_bounded_by_the_widest_record() {
    // Three columns per reaction: 10,922 * 3 = 32,766.
    let fits = Settings { batch_size: 10_922, ..Settings::default() };
    fits.validate().unwrap();
    let too_wide = Settings { batch_size: 10_923, ..Settings::default() };
    assert!(matches!(too_wide.validate(), Err(Error::Config(_))));
  }

  #[test]
  fn owned_records_need_owners() {
    let no_users = Settings { total_users: 0, ..Settings::default() };
    assert!(matches!(no_users.validate(), Err(Error::Config(_))));

    let no_posts = Settings { total_posts: 0, ..Settings::default() };
    assert!(matches!(no_posts.validate(), Err(Error::Config(_))));

    let nothing_owned = Settings {
      total_users:     0,
      total_posts:     0,
      total_likes:     0,
      total_reactions: 0,
      ..Settings::default()
    };
    nothing_owned.validate().unwrap();
  }

  #[test]
  fn measurements_ignore_social_counts() {
    let settings = Settings {
      pipeline:    Pipeline::Measurements,
      total_users: 0,
      total_posts: 0,
      ..Settings::default()
    };
    settings.validate().unwrap();
  }
}
