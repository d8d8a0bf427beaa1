//! Timeline entries — projected facts placed on the payment timeline.
//!
//! A mutation says what *changed*; an entry says what is *true* for a date
//! range. Projection is total: one case per mutation variant, with the
//! change variants placed at their effective period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  merge::TimelineFragment,
  mutation::{MutationKind, PaymentMutation},
  period::Period,
};

// ─── EntryKind ───────────────────────────────────────────────────────────────

/// What is true on the timeline while the entry's period is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EntryKind {
  /// `amount` is disbursed per month.
  Paid { amount: i64 },
  /// Payment is halted; nothing is disbursed.
  Stopped,
  /// A prior stop is reversed and `amount` is disbursed per month.
  Reactivated { amount: i64 },
  /// Payment has permanently ended.
  Terminated,
}

impl EntryKind {
  /// The amount disbursed per month while this entry is in effect.
  pub fn monthly_amount(&self) -> i64 {
    match self {
      Self::Paid { amount } | Self::Reactivated { amount } => *amount,
      Self::Stopped | Self::Terminated => 0,
    }
  }
}

// ─── TimelineEntry ───────────────────────────────────────────────────────────

/// A projected fact: for `period`, `kind` holds. `origin_id` points back at
/// the mutation the entry was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
  pub origin_id:  Uuid,
  pub created_at: DateTime<Utc>,
  pub period:     Period,
  pub kind:       EntryKind,
}

impl TimelineEntry {
  /// Project a mutation onto the timeline. Grants are placed at the line's
  /// own period; change mutations at their effective period.
  pub fn project(mutation: &PaymentMutation) -> Self {
    let kind = match &mutation.kind {
      MutationKind::New { amount } => EntryKind::Paid { amount: *amount },
      MutationKind::Stop { .. } => EntryKind::Stopped,
      MutationKind::Reactivation { amount, .. } => EntryKind::Reactivated {
        amount: *amount,
      },
      MutationKind::Termination { .. } => EntryKind::Terminated,
    };
    Self {
      origin_id: mutation.id,
      created_at: mutation.created_at,
      period: mutation.effective_period(),
      kind,
    }
  }

  /// Structural comparison: same period and payload. Origin and creation
  /// timestamp are deliberately ignored, so re-derived timelines compare
  /// equal when they describe the same payments.
  pub fn same_shape(&self, other: &TimelineEntry) -> bool {
    self.period == other.period && self.kind == other.kind
  }
}

impl TimelineFragment for TimelineEntry {
  fn fragment_id(&self) -> Uuid {
    self.origin_id
  }

  fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  fn period(&self) -> Period {
    self.period
  }

  fn with_period(&self, period: Period) -> Self {
    Self {
      period,
      ..self.clone()
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
  }

  #[test]
  fn grant_projects_at_line_period() {
    let line = Period::new(d(2021, 1, 1), d(2021, 12, 31)).unwrap();
    let grant = PaymentMutation::grant(Uuid::new_v4(), ts(1), line, 2000);

    let entry = TimelineEntry::project(&grant);
    assert_eq!(entry.origin_id, grant.id);
    assert_eq!(entry.period, line);
    assert_eq!(entry.kind, EntryKind::Paid { amount: 2000 });
  }

  #[test]
  fn stop_projects_at_effective_period() {
    let line = Period::new(d(2021, 1, 1), d(2021, 12, 31)).unwrap();
    let window = Period::new(d(2021, 3, 1), d(2021, 4, 30)).unwrap();
    let stop = PaymentMutation::stop(
      Uuid::new_v4(),
      ts(2),
      line,
      window,
      Uuid::new_v4(),
    );

    let entry = TimelineEntry::project(&stop);
    assert_eq!(entry.period, window);
    assert_eq!(entry.kind, EntryKind::Stopped);
    assert_eq!(entry.kind.monthly_amount(), 0);
  }

  #[test]
  fn same_shape_ignores_origin_and_timestamp() {
    let period = Period::new(d(2021, 1, 1), d(2021, 6, 30)).unwrap();
    let a = TimelineEntry {
      origin_id:  Uuid::new_v4(),
      created_at: ts(1),
      period,
      kind:       EntryKind::Paid { amount: 2000 },
    };
    let b = TimelineEntry {
      origin_id: Uuid::new_v4(),
      created_at: ts(99),
      ..a.clone()
    };
    assert!(a.same_shape(&b));

    let c = TimelineEntry {
      kind: EntryKind::Paid { amount: 2500 },
      ..a.clone()
    };
    assert!(!a.same_shape(&c));
  }
}
