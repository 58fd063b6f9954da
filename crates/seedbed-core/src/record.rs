//! Domain records produced by the generator and consumed by the bulk loader.
//!
//! A record is anything that can answer "what is your value for column X?".
//! The loader asks for columns in the order the caller lists them, so the
//! same record type can be loaded into differently ordered column lists.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, IntoStaticStr};

use crate::Scalar;

// ─── Record trait ────────────────────────────────────────────────────────────

/// A mapping from column name to scalar value.
pub trait Record {
  /// The value for `column`, or `None` if this record has no such column.
  fn value(&self, column: &str) -> Option<Scalar>;
}

impl Record for BTreeMap<String, Scalar> {
  fn value(&self, column: &str) -> Option<Scalar> { self.get(column).cloned() }
}

impl<R: Record + ?Sized> Record for &R {
  fn value(&self, column: &str) -> Option<Scalar> { (**self).value(column) }
}

// ─── Reaction labels ─────────────────────────────────────────────────────────

/// The closed set of reaction labels, across every catalog version.
///
/// Declaration order is the final display order once `funny` has been moved
/// to the end.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumIter,
  IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ReactionLabel {
  Like,
  Celebrate,
  Love,
  Insightful,
  Curious,
  Support,
  Funny,
}

impl ReactionLabel {
  /// Labels seeded into `reaction_types` when the lookup table is introduced,
  /// in position order.
  pub const CANONICAL: [Self; 5] = [
    Self::Like,
    Self::Celebrate,
    Self::Love,
    Self::Insightful,
    Self::Curious,
  ];

  /// Labels appended after the canonical five, in position order.
  pub const APPENDED: [Self; 2] = [Self::Support, Self::Funny];

  /// Label given to every reaction backfilled from the legacy `likes` table.
  pub const LEGACY_LIKE: Self = Self::Like;

  /// Label retired by the soft-delete migration.
  pub const RETIRED: Self = Self::Curious;

  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  pub name:  String,
  pub email: String,
}

impl NewUser {
  pub const COLUMNS: [&'static str; 2] = ["name", "email"];
}

impl Record for NewUser {
  fn value(&self, column: &str) -> Option<Scalar> {
    match column {
      "name" => Some(self.name.as_str().into()),
      "email" => Some(self.email.as_str().into()),
      _ => None,
    }
  }
}

/// A post before an owner has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
  pub content: String,
}

impl NewPost {
  pub fn owned_by(self, user_id: i64) -> OwnedPost {
    OwnedPost { content: self.content, user_id }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPost {
  pub content: String,
  pub user_id: i64,
}

impl OwnedPost {
  pub const COLUMNS: [&'static str; 2] = ["content", "user_id"];
}

impl Record for OwnedPost {
  fn value(&self, column: &str) -> Option<Scalar> {
    match column {
      "content" => Some(self.content.as_str().into()),
      "user_id" => Some(self.user_id.into()),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLike {
  pub post_id: i64,
  pub user_id: i64,
}

impl NewLike {
  pub const COLUMNS: [&'static str; 2] = ["post_id", "user_id"];
}

impl Record for NewLike {
  fn value(&self, column: &str) -> Option<Scalar> {
    match column {
      "post_id" => Some(self.post_id.into()),
      "user_id" => Some(self.user_id.into()),
      _ => None,
    }
  }
}

/// A reaction in the v1 shape: the label is stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReaction {
  pub post_id:  i64,
  pub user_id:  i64,
  pub reaction: ReactionLabel,
}

impl NewReaction {
  pub const COLUMNS: [&'static str; 3] = ["post_id", "user_id", "reaction"];
}

impl Record for NewReaction {
  fn value(&self, column: &str) -> Option<Scalar> {
    match column {
      "post_id" => Some(self.post_id.into()),
      "user_id" => Some(self.user_id.into()),
      "reaction" => Some(self.reaction.as_str().into()),
      _ => None,
    }
  }
}

/// A height in the pre-migration split form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeasurement {
  pub name:   String,
  pub feet:   u32,
  pub inches: u32,
}

impl NewMeasurement {
  pub const COLUMNS: [&'static str; 3] = ["name", "feet", "inches"];

  pub fn total_inches(&self) -> i64 { i64::from(self.feet) * 12 + i64::from(self.inches) }
}

impl Record for NewMeasurement {
  fn value(&self, column: &str) -> Option<Scalar> {
    match column {
      "name" => Some(self.name.as_str().into()),
      "feet" => Some(self.feet.into()),
      "inches" => Some(self.inches.into()),
      _ => None,
    }
  }
}
