//! Synthetic data loading.
//!
//! A [`Seeder`] pairs a [`RecordGenerator`] with the bulk loader. Foreign
//! keys are drawn uniformly from `1..=N`, which holds because every table is
//! freshly recreated and `AUTOINCREMENT` hands out ids from 1.

use seedbed_core::{
  Record,
  generate::RecordGenerator,
  record::{NewLike, NewMeasurement, NewReaction, NewUser, OwnedPost},
};
use seedbed_store_sqlite::{Error as StoreError, Gateway, LoadSummary, insert_batch};

use crate::Result;

pub struct Seeder<'g, G> {
  gateway:    &'g Gateway,
  generator:  G,
  batch_size: usize,
}

impl<'g, G: RecordGenerator> Seeder<'g, G> {
  pub fn new(gateway: &'g Gateway, generator: G, batch_size: usize) -> Self {
    Self { gateway, generator, batch_size }
  }

  pub async fn users(&mut self, n: usize) -> Result<LoadSummary> {
    let users: Vec<NewUser> = (0..n).map(|_| self.generator.next_user()).collect();
    self.load("users", &NewUser::COLUMNS, &users).await
  }

  /// `n` posts, each owned by one of the first `users` users.
  pub async fn posts(&mut self, n: usize, users: usize) -> Result<LoadSummary> {
    let g = &mut self.generator;
    let posts: Vec<OwnedPost> = (0..n)
      .map(|_| {
        let post = g.next_post();
        post.owned_by(g.pick_id(users as i64))
      })
      .collect();
    self.load("posts", &OwnedPost::COLUMNS, &posts).await
  }

  pub async fn likes(&mut self, n: usize, posts: usize, users: usize) -> Result<LoadSummary> {
    let g = &mut self.generator;
    let likes: Vec<NewLike> = (0..n)
      .map(|_| NewLike {
        post_id: g.pick_id(posts as i64),
        user_id: g.pick_id(users as i64),
      })
      .collect();
    self.load("likes", &NewLike::COLUMNS, &likes).await
  }

  /// Labelled reactions against the v1 `reactions` table.
  pub async fn reactions_v1(&mut self, n: usize, posts: usize, users: usize) -> Result<LoadSummary> {
    let g = &mut self.generator;
    let reactions: Vec<NewReaction> = (0..n)
      .map(|_| NewReaction {
        post_id:  g.pick_id(posts as i64),
        user_id:  g.pick_id(users as i64),
        reaction: g.next_label(),
      })
      .collect();
    self.load("reactions", &NewReaction::COLUMNS, &reactions).await
  }

  /// Generated one batch at a time; memory stays bounded by the batch size.
  pub async fn measurements(&mut self, n: usize) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();
    let mut remaining = n;

    while remaining > 0 {
      let take = remaining.min(self.batch_size.max(1));
      let batch: Vec<NewMeasurement> =
        (0..take).map(|_| self.generator.next_measurement()).collect();

      let loaded = insert_batch(
        self.gateway,
        "measurements",
        &NewMeasurement::COLUMNS,
        &batch,
        self.batch_size,
      )
      .await
      .map_err(|e| offset_chunk(e, summary.chunks))?;

      summary += loaded;
      remaining -= take;
    }
    Ok(summary)
  }

  async fn load<R: Record>(
    &self,
    table:   &str,
    columns: &[&str],
    records: &[R],
  ) -> Result<LoadSummary> {
    Ok(insert_batch(self.gateway, table, columns, records, self.batch_size).await?)
  }
}

/// Renumber a load failure so its chunk counts from the start of the run.
fn offset_chunk(e: StoreError, done: usize) -> StoreError {
  match e {
    StoreError::Load { table, chunk, source } => StoreError::Load {
      table,
      chunk: chunk + done,
      source,
    },
    other => other,
  }
}
