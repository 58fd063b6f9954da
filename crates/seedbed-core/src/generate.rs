//! Synthetic record generation.
//!
//! [`RecordGenerator`] is the capability the orchestrator depends on;
//! [`FakeGenerator`] is the implementation backed by a [`rand`] RNG. Every
//! draw is independent and uniform over its stated range.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::record::{NewMeasurement, NewPost, NewUser, ReactionLabel};

// ─── Trait ───────────────────────────────────────────────────────────────────

pub trait RecordGenerator {
  /// A person with a full name and a matching email address.
  fn next_user(&mut self) -> NewUser;

  /// Post content: one lorem sentence of 3 to 8 words.
  fn next_post(&mut self) -> NewPost;

  /// A person's height with `feet` in `[1, 999]` and `inches` in `[0, 11]`.
  fn next_measurement(&mut self) -> NewMeasurement;

  /// One of [`ReactionLabel::CANONICAL`].
  fn next_label(&mut self) -> ReactionLabel;

  /// A surrogate id in `[1, upper]`. `upper` must be at least 1.
  fn pick_id(&mut self, upper: i64) -> i64;
}

// ─── Word lists ──────────────────────────────────────────────────────────────

const FIRST_NAMES: &[&str] = &[
  "Ada", "Alan", "Amara", "Bea", "Caleb", "Dara", "Elif", "Emeka", "Farah", "Grace",
  "Hiro", "Ines", "Jonas", "Kemal", "Lena", "Malik", "Nadia", "Omar", "Priya", "Quinn",
  "Rosa", "Sven", "Tariq", "Uma", "Vera", "Wen", "Xavier", "Yara", "Zane", "Noor",
];

const LAST_NAMES: &[&str] = &[
  "Abbott", "Bauer", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hughes",
  "Ito", "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov",
  "Quintero", "Rossi", "Schmidt", "Tanaka", "Usman", "Varga", "Walsh", "Yilmaz", "Zhang",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const LOREM: &[&str] = &[
  "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
  "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna",
  "aliqua", "enim", "ad", "minim", "veniam", "quis", "nostrud", "exercitation",
  "ullamco", "laboris", "nisi", "aliquip", "ex", "ea", "commodo", "consequat",
];

// ─── FakeGenerator ───────────────────────────────────────────────────────────

/// Generator backed by any [`Rng`]; deterministic when the RNG is seeded.
pub struct FakeGenerator<R = StdRng> {
  rng: R,
}

impl FakeGenerator<StdRng> {
  /// A reproducible generator: the same seed yields the same record stream.
  pub fn seeded(seed: u64) -> Self { Self::new(StdRng::seed_from_u64(seed)) }

  pub fn from_entropy() -> Self { Self::new(StdRng::from_entropy()) }
}

impl<R: Rng> FakeGenerator<R> {
  pub fn new(rng: R) -> Self { Self { rng } }

  fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
    // Word lists are non-empty constants.
    words.choose(&mut self.rng).copied().unwrap_or_default()
  }

  fn full_name(&mut self) -> (&'static str, &'static str) {
    (self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
  }
}

impl<R: Rng> RecordGenerator for FakeGenerator<R> {
  fn next_user(&mut self) -> NewUser {
    let (first, last) = self.full_name();
    let domain = self.pick(EMAIL_DOMAINS);
    let email = match self.rng.gen_range(0..3) {
      0 => format!("{first}.{last}@{domain}"),
      1 => format!("{first}{}@{domain}", self.rng.gen_range(1..100)),
      _ => format!("{}{last}@{domain}", &first[..1]),
    }
    .to_lowercase();

    NewUser { name: format!("{first} {last}"), email }
  }

  fn next_post(&mut self) -> NewPost {
    let len = self.rng.gen_range(3..=8);
    let words: Vec<&str> = (0..len).map(|_| self.pick(LOREM)).collect();

    let mut content = String::new();
    if let Some(first) = words.first() {
      let mut chars = first.chars();
      if let Some(c) = chars.next() {
        content.extend(c.to_uppercase());
        content.push_str(chars.as_str());
      }
    }
    for word in words.iter().skip(1) {
      content.push(' ');
      content.push_str(word);
    }
    content.push('.');

    NewPost { content }
  }

  fn next_measurement(&mut self) -> NewMeasurement {
    let (first, last) = self.full_name();
    NewMeasurement {
      name:   format!("{first} {last}"),
      feet:   self.rng.gen_range(1..=999),
      inches: self.rng.gen_range(0..=11),
    }
  }

  fn next_label(&mut self) -> ReactionLabel {
    let i = self.rng.gen_range(0..ReactionLabel::CANONICAL.len());
    ReactionLabel::CANONICAL[i]
  }

  fn pick_id(&mut self, upper: i64) -> i64 { self.rng.gen_range(1..=upper.max(1)) }
}
