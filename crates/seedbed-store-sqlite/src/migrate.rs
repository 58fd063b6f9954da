//! The migration engine.
//!
//! A [`Migrator`] walks an ordered list of [`Step`]s. Each step runs in its
//! own transaction; the first failure halts the migrator for good, leaving
//! the database as the last committed step left it.

use std::{fmt, time::Instant};

use tracing::{error, info};

use crate::{Error, Gateway, Result, Session};

// ─── Step ────────────────────────────────────────────────────────────────────

/// A named, transactional schema or data change.
#[derive(Clone, Copy)]
pub struct Step {
  pub name: &'static str,
  pub body: fn(&Session<'_>) -> Result<()>,
}

impl fmt::Debug for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Step").field("name", &self.name).finish_non_exhaustive()
  }
}

/// Where a step is in its lifecycle. `Committed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
  Pending,
  Running,
  Committed,
  Failed,
}

// ─── Migrator ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Migrator {
  steps:  Vec<Step>,
  states: Vec<StepState>,
}

impl Migrator {
  pub fn new(steps: &[Step]) -> Self {
    Self {
      steps:  steps.to_vec(),
      states: vec![StepState::Pending; steps.len()],
    }
  }

  /// One state per step, in step order.
  pub fn states(&self) -> &[StepState] { &self.states }

  pub fn state_of(&self, name: &str) -> Option<StepState> {
    self.position(name).map(|i| self.states[i])
  }

  /// Name of the step that failed, if any.
  pub fn failed_step(&self) -> Option<&'static str> {
    self
      .states
      .iter()
      .position(|s| *s == StepState::Failed)
      .map(|i| self.steps[i].name)
  }

  pub fn is_complete(&self) -> bool {
    self.states.iter().all(|s| *s == StepState::Committed)
  }

  fn position(&self, name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == name)
  }

  /// Run every pending step up to and including `name`.
  ///
  /// Returns how many steps ran; zero if `name` has already committed.
  pub async fn run_through(&mut self, gateway: &Gateway, name: &str) -> Result<usize> {
    let last = self
      .position(name)
      .ok_or_else(|| Error::UnknownStep(name.to_owned()))?;
    self.run_until(gateway, last).await
  }

  /// Run every remaining step.
  pub async fn run_to_end(&mut self, gateway: &Gateway) -> Result<usize> {
    match self.steps.len().checked_sub(1) {
      Some(last) => self.run_until(gateway, last).await,
      None => Ok(0),
    }
  }

  async fn run_until(&mut self, gateway: &Gateway, last: usize) -> Result<usize> {
    if let Some(name) = self.failed_step() {
      return Err(Error::Halted { name });
    }

    let mut ran = 0;
    for index in 0..=last {
      if self.states[index] != StepState::Pending {
        continue;
      }
      self.run_step(gateway, index).await?;
      ran += 1;
    }
    Ok(ran)
  }

  async fn run_step(&mut self, gateway: &Gateway, index: usize) -> Result<()> {
    let Step { name, body } = self.steps[index];
    let started = Instant::now();

    self.states[index] = StepState::Running;
    info!(index, step = name, "running migration step");

    match gateway.transaction(move |session| body(session)).await {
      Ok(()) => {
        self.states[index] = StepState::Committed;
        info!(
          index,
          step = name,
          elapsed_ms = started.elapsed().as_millis() as u64,
          "migration step committed"
        );
        Ok(())
      }
      Err(e) => {
        self.states[index] = StepState::Failed;
        error!(index, step = name, error = %e, "migration step failed; rolled back");
        Err(Error::Step { index, name, source: Box::new(e) })
      }
    }
  }
}
