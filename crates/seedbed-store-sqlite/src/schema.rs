//! The migration history: SQL and step bodies for both pipelines.
//!
//! Every body runs inside the transaction the [`Migrator`](crate::Migrator)
//! opens for it, so a body either fully applies or leaves no trace.
//! Tables are always dropped children-first because connections run with
//! `PRAGMA foreign_keys = ON`.

use seedbed_core::{ReactionLabel, Scalar};

use crate::{Error, Result, Session, migrate::Step};

// ─── Step names ──────────────────────────────────────────────────────────────

pub const RECREATE_BASE_SCHEMA: &str = "recreate_base_schema";
pub const LIKES_TO_REACTIONS_V1: &str = "likes_to_reactions_v1";
pub const REACTION_TYPES_V2: &str = "reaction_types_v2";
pub const SOFT_DELETE_CURIOUS_V3: &str = "soft_delete_curious_v3";
pub const APPEND_SUPPORT_AND_FUNNY_V4: &str = "append_support_and_funny_v4";

pub const RECREATE_MEASUREMENTS: &str = "recreate_measurements";
pub const MEASUREMENTS_TOTAL_INCHES: &str = "measurements_total_inches";

// ─── Catalogs ────────────────────────────────────────────────────────────────

/// Users, posts, likes and the reaction history, in execution order.
pub const SOCIAL_STEPS: &[Step] = &[
  Step { name: RECREATE_BASE_SCHEMA,        body: recreate_base_schema },
  Step { name: LIKES_TO_REACTIONS_V1,       body: likes_to_reactions_v1 },
  Step { name: REACTION_TYPES_V2,           body: reaction_types_v2 },
  Step { name: SOFT_DELETE_CURIOUS_V3,      body: soft_delete_curious_v3 },
  Step { name: APPEND_SUPPORT_AND_FUNNY_V4, body: append_support_and_funny_v4 },
];

/// The standalone measurements dataset.
pub const MEASUREMENT_STEPS: &[Step] = &[
  Step { name: RECREATE_MEASUREMENTS,     body: recreate_measurements },
  Step { name: MEASUREMENTS_TOTAL_INCHES, body: measurements_total_inches },
];

// ─── Base schema ─────────────────────────────────────────────────────────────

const BASE_SCHEMA: &str = "
DROP TABLE IF EXISTS reactions;
DROP TABLE IF EXISTS reactions_v2;
DROP TABLE IF EXISTS reaction_types;
DROP TABLE IF EXISTS likes;
DROP TABLE IF EXISTS posts;
DROP TABLE IF EXISTS users;

CREATE TABLE users (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    email TEXT NOT NULL
);

CREATE TABLE posts (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(id)
);

-- No uniqueness: the same user may like the same post twice.
CREATE TABLE likes (
    post_id INTEGER NOT NULL REFERENCES posts(id),
    user_id INTEGER NOT NULL REFERENCES users(id)
);
";

fn recreate_base_schema(s: &Session<'_>) -> Result<()> {
  s.execute(BASE_SCHEMA, &[])?;
  Ok(())
}

// ─── Reactions v1: likes become reactions ────────────────────────────────────

const REACTIONS_V1: &str = "
DROP TABLE IF EXISTS reactions;

CREATE TABLE reactions (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id  INTEGER NOT NULL REFERENCES posts(id),
    user_id  INTEGER NOT NULL REFERENCES users(id),
    reaction TEXT NOT NULL
);
";

const BACKFILL_REACTIONS_FROM_LIKES: &str = "
INSERT INTO reactions (post_id, user_id, reaction)
SELECT post_id, user_id, ?1 FROM likes ORDER BY rowid
";

fn likes_to_reactions_v1(s: &Session<'_>) -> Result<()> {
  s.execute(REACTIONS_V1, &[])?;
  s.execute(
    BACKFILL_REACTIONS_FROM_LIKES,
    &[ReactionLabel::LEGACY_LIKE.as_str().into()],
  )?;
  Ok(())
}

// ─── Reactions v2: lookup table ──────────────────────────────────────────────

const REACTION_TYPES_TABLES: &str = "
DROP TABLE IF EXISTS reactions_v2;
DROP TABLE IF EXISTS reaction_types;

-- `position` is the display order; ids never change once assigned.
CREATE TABLE reaction_types (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    label    TEXT NOT NULL UNIQUE,
    position INTEGER NOT NULL
);

CREATE TABLE reactions_v2 (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id          INTEGER NOT NULL REFERENCES posts(id),
    user_id          INTEGER NOT NULL REFERENCES users(id),
    reaction_type_id INTEGER NOT NULL REFERENCES reaction_types(id)
);
";

const INSERT_REACTION_TYPE: &str =
  "INSERT INTO reaction_types (label, position) VALUES (?1, ?2)";

const COUNT_UNKNOWN_LABELS: &str = "
SELECT COUNT(*) FROM reactions
WHERE reaction NOT IN (SELECT label FROM reaction_types)
";

// v1 ids are kept so every reaction stays addressable by its surrogate id.
const SWAP_IN_REACTIONS_V2: &str = "
INSERT INTO reactions_v2 (id, post_id, user_id, reaction_type_id)
SELECT r.id, r.post_id, r.user_id, t.id
FROM reactions r
JOIN reaction_types t ON t.label = r.reaction
ORDER BY r.id;

DROP TABLE reactions;
ALTER TABLE reactions_v2 RENAME TO reactions;
";

fn reaction_types_v2(s: &Session<'_>) -> Result<()> {
  s.execute(REACTION_TYPES_TABLES, &[])?;

  for (i, label) in ReactionLabel::CANONICAL.iter().enumerate() {
    s.execute(
      INSERT_REACTION_TYPE,
      &[label.as_str().into(), Scalar::Integer(i as i64 + 1)],
    )?;
  }

  // The join below would silently drop these rows.
  let unknown = s.query_i64(COUNT_UNKNOWN_LABELS, &[])?;
  if unknown > 0 {
    return Err(Error::UnknownReactionLabels(unknown));
  }

  s.execute(SWAP_IN_REACTIONS_V2, &[])?;
  Ok(())
}

// ─── Reactions v3: retire `curious` ──────────────────────────────────────────

const ADD_REACTIONS_DELETED: &str =
  "ALTER TABLE reactions ADD COLUMN deleted INTEGER NOT NULL DEFAULT 0";

const ADD_REACTION_TYPES_DELETED: &str =
  "ALTER TABLE reaction_types ADD COLUMN deleted INTEGER NOT NULL DEFAULT 0";

const SOFT_DELETE_REACTIONS: &str = "
UPDATE reactions SET deleted = 1
WHERE reaction_type_id IN (SELECT id FROM reaction_types WHERE label = ?1)
";

const SOFT_DELETE_REACTION_TYPE: &str =
  "UPDATE reaction_types SET deleted = 1 WHERE label = ?1";

fn soft_delete_curious_v3(s: &Session<'_>) -> Result<()> {
  if !s.has_column("reactions", "deleted")? {
    s.execute(ADD_REACTIONS_DELETED, &[])?;
  }
  if !s.has_column("reaction_types", "deleted")? {
    s.execute(ADD_REACTION_TYPES_DELETED, &[])?;
  }

  // Referencing rows first, then the lookup entry.
  let label = [Scalar::from(ReactionLabel::RETIRED.as_str())];
  s.execute(SOFT_DELETE_REACTIONS, &label)?;
  s.execute(SOFT_DELETE_REACTION_TYPE, &label)?;
  Ok(())
}

// ─── Reactions v4: `support` and `funny` go last ─────────────────────────────

const APPEND_REACTION_TYPE: &str = "
INSERT INTO reaction_types (label, position)
SELECT ?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM reaction_types)
WHERE NOT EXISTS (SELECT 1 FROM reaction_types WHERE label = ?1)
";

const MOVE_TO_END: &str = "
UPDATE reaction_types
SET position = (SELECT MAX(position) FROM reaction_types) + 1
WHERE label = ?1
  AND position < (SELECT MAX(position) FROM reaction_types)
";

const REACTION_TYPES_BY_POSITION: &str =
  "SELECT id FROM reaction_types ORDER BY position, id";

const SET_POSITION: &str = "UPDATE reaction_types SET position = ?1 WHERE id = ?2";

fn append_support_and_funny_v4(s: &Session<'_>) -> Result<()> {
  for label in ReactionLabel::APPENDED {
    s.execute(APPEND_REACTION_TYPE, &[label.as_str().into()])?;
  }

  // A catalog that already carried `funny` somewhere in the middle gets it
  // moved behind everything else.
  s.execute(MOVE_TO_END, &[ReactionLabel::Funny.as_str().into()])?;

  // Compact positions to 1..=n; ids are untouched.
  let ids = s.query(REACTION_TYPES_BY_POSITION, &[])?;
  for (i, row) in ids.iter().enumerate() {
    s.execute(
      SET_POSITION,
      &[Scalar::Integer(i as i64 + 1), Scalar::Integer(row.get_i64("id")?)],
    )?;
  }
  Ok(())
}

// ─── Measurements ────────────────────────────────────────────────────────────

const MEASUREMENTS_TABLE: &str = "
DROP TABLE IF EXISTS measurements;

CREATE TABLE measurements (
    name   TEXT NOT NULL,
    feet   INTEGER NOT NULL,
    inches INTEGER NOT NULL
);
";

fn recreate_measurements(s: &Session<'_>) -> Result<()> {
  s.execute(MEASUREMENTS_TABLE, &[])?;
  Ok(())
}

const ADD_TOTAL_INCHES: &str = "ALTER TABLE measurements ADD COLUMN total_inches INTEGER";

const BACKFILL_TOTAL_INCHES: &str =
  "UPDATE measurements SET total_inches = (feet * 12) + inches WHERE total_inches IS NULL";

/// Safe to re-run: each part only acts on what is still missing.
fn measurements_total_inches(s: &Session<'_>) -> Result<()> {
  let columns = s.table_columns("measurements")?;
  let has = |c: &str| columns.iter().any(|name| name == c);

  if !has("total_inches") {
    s.execute(ADD_TOTAL_INCHES, &[])?;
  }
  if has("feet") && has("inches") {
    s.execute(BACKFILL_TOTAL_INCHES, &[])?;
  }
  for source in ["feet", "inches"] {
    if has(source) {
      s.execute(&format!("ALTER TABLE measurements DROP COLUMN {source}"), &[])?;
    }
  }
  Ok(())
}
