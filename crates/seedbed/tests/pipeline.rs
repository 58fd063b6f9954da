//! Whole runs against on-disk databases.

use std::path::Path;

use seedbed::{Pipeline, Settings, pipeline};
use seedbed_store_sqlite::{Gateway, GatewayOptions};
use tempfile::TempDir;

fn small_social(dir: &TempDir, file: &str) -> Settings {
  Settings {
    database_path:   dir.path().join(file),
    total_users:     4,
    total_posts:     40,
    total_likes:     12,
    total_reactions: 300,
    batch_size:      25,
    seed:            Some(1234),
    ..Settings::default()
  }
}

async fn run_to_close(settings: &Settings) -> pipeline::Report {
  let gw = Gateway::open(&settings.database_path, &settings.gateway_options())
    .await
    .unwrap();
  let report = pipeline::run(&gw, settings).await.unwrap();
  gw.close().await.unwrap();
  report
}

/// Schema text plus every row of every table, in a stable order.
async fn snapshot(path: &Path) -> Vec<String> {
  let gw = Gateway::open(path, &GatewayOptions::default()).await.unwrap();
  let tables = gw
    .query(
      "SELECT name, sql FROM sqlite_master
       WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
      vec![],
    )
    .await
    .unwrap();

  let mut out = Vec::new();
  for table in &tables {
    let name = table.get_str("name").unwrap().to_owned();
    out.push(table.get_str("sql").unwrap().to_owned());
    for row in gw
      .query(format!("SELECT * FROM {name} ORDER BY rowid"), vec![])
      .await
      .unwrap()
    {
      let values: Vec<String> = row.values().iter().map(ToString::to_string).collect();
      out.push(format!("{name}: {}", values.join("|")));
    }
  }
  gw.close().await.unwrap();
  out
}

async fn count(path: &Path, sql: &str) -> i64 {
  let gw = Gateway::open(path, &GatewayOptions::default()).await.unwrap();
  let n = gw.query(sql, vec![]).await.unwrap()[0].get_i64("n").unwrap();
  gw.close().await.unwrap();
  n
}

#[tokio::test]
async fn social_run_ends_with_seven_reaction_types() {
  let dir = TempDir::new().unwrap();
  let settings = small_social(&dir, "social.db");

  let report = run_to_close(&settings).await;
  assert_eq!(report.steps, 5);
  assert_eq!(report.loaded.rows, 4 + 40 + 12 + 300);

  let path = &settings.database_path;
  assert_eq!(count(path, "SELECT COUNT(*) AS n FROM reaction_types").await, 7);
  assert_eq!(count(path, "SELECT COUNT(*) AS n FROM reactions").await, 312);
  assert_eq!(
    count(path, "SELECT MAX(position) AS n FROM reaction_types").await,
    7,
  );
  assert_eq!(
    count(path, "SELECT position AS n FROM reaction_types WHERE label = 'funny'").await,
    7,
  );
  assert_eq!(
    count(
      path,
      "SELECT COUNT(*) AS n FROM reactions r
       JOIN reaction_types t ON t.id = r.reaction_type_id
       WHERE r.deleted = 1 AND t.label <> 'curious'",
    )
    .await,
    0,
  );
}

#[tokio::test]
async fn fixed_seed_runs_are_identical() {
  let dir = TempDir::new().unwrap();
  let a = small_social(&dir, "a.db");
  let b = small_social(&dir, "b.db");

  run_to_close(&a).await;
  run_to_close(&b).await;

  let first = snapshot(&a.database_path).await;
  assert!(!first.is_empty());
  assert_eq!(first, snapshot(&b.database_path).await);
}

#[tokio::test]
async fn rerunning_recreates_the_database() {
  let dir = TempDir::new().unwrap();
  let settings = small_social(&dir, "again.db");

  run_to_close(&settings).await;
  let first = snapshot(&settings.database_path).await;
  run_to_close(&settings).await;

  assert_eq!(snapshot(&settings.database_path).await, first);
}

#[tokio::test]
async fn measurements_run_folds_feet_into_inches() {
  let dir = TempDir::new().unwrap();
  let settings = Settings {
    database_path:      dir.path().join("measurements.db"),
    pipeline:           Pipeline::Measurements,
    total_measurements: 2_500,
    batch_size:         1_000,
    seed:               Some(5),
    ..Settings::default()
  };

  let report = run_to_close(&settings).await;
  assert_eq!(report.steps, 2);
  assert_eq!(report.loaded.rows, 2_500);
  assert_eq!(report.loaded.chunks, 3);

  let path = &settings.database_path;
  assert_eq!(count(path, "SELECT COUNT(*) AS n FROM measurements").await, 2_500);
  assert_eq!(
    count(
      path,
      "SELECT COUNT(*) AS n FROM measurements
       WHERE total_inches IS NULL OR total_inches NOT BETWEEN 12 AND 999 * 12 + 11",
    )
    .await,
    0,
  );
  assert_eq!(
    count(
      path,
      "SELECT COUNT(*) AS n FROM pragma_table_info('measurements')
       WHERE name IN ('feet', 'inches')",
    )
    .await,
    0,
  );
}

#[tokio::test]
async fn invalid_settings_touch_nothing() {
  let dir = TempDir::new().unwrap();
  let settings = Settings {
    batch_size: 0,
    ..small_social(&dir, "invalid.db")
  };

  let gw = Gateway::open(&settings.database_path, &settings.gateway_options())
    .await
    .unwrap();
  let err = pipeline::run(&gw, &settings).await.unwrap_err();
  assert!(matches!(err, seedbed::Error::Config(_)));

  let tables = gw
    .query("SELECT COUNT(*) AS n FROM sqlite_master", vec![])
    .await
    .unwrap();
  assert_eq!(tables[0].get_i64("n").unwrap(), 0);
  gw.close().await.unwrap();
}
