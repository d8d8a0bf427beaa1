//! Payment-line mutations — the append-only history of a case's payments.
//!
//! A mutation is an immutable record of one atomic change to a case's
//! disbursement. Mutations are never updated; a change-type mutation refers
//! to the line it supersedes, and the current state of the case is derived
//! at query time by folding the whole history into a
//! [`PaymentTimeline`](crate::timeline::PaymentTimeline).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::period::Period;

// ─── MutationKind ────────────────────────────────────────────────────────────

/// What the mutation does to the payment line. The three change variants
/// carry an *effective period* (virkningsperiode): the dates the change
/// actually applies to, which is distinct from the line's own period and
/// from the date the change was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MutationKind {
  /// A new payment line granting `amount` per month over the line's period.
  New { amount: i64 },

  /// Halts payment for the effective period; the line itself keeps its
  /// period and may later be reactivated.
  Stop { effective: Period, supersedes: Uuid },

  /// Reverses a stop, restoring payment of `amount` for the effective
  /// period.
  Reactivation {
    effective:  Period,
    amount:     i64,
    supersedes: Uuid,
  },

  /// Permanently ends payment from the start of the effective period.
  Termination { effective: Period, supersedes: Uuid },
}

impl MutationKind {
  /// Short tag for log events.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::New { .. } => "new",
      Self::Stop { .. } => "stop",
      Self::Reactivation { .. } => "reactivation",
      Self::Termination { .. } => "termination",
    }
  }
}

// ─── PaymentMutation ─────────────────────────────────────────────────────────

/// One atomic historical change to a case's disbursement. Once recorded, no
/// field is ever updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMutation {
  pub id:         Uuid,
  /// Server-assigned creation timestamp; decides precedence between
  /// overlapping facts on the timeline.
  pub created_at: DateTime<Utc>,
  /// The full period of the payment line this mutation belongs to.
  pub period:     Period,
  pub kind:       MutationKind,
}

impl PaymentMutation {
  pub fn grant(
    id: Uuid,
    created_at: DateTime<Utc>,
    period: Period,
    amount: i64,
  ) -> Self {
    Self {
      id,
      created_at,
      period,
      kind: MutationKind::New { amount },
    }
  }

  pub fn stop(
    id: Uuid,
    created_at: DateTime<Utc>,
    period: Period,
    effective: Period,
    supersedes: Uuid,
  ) -> Self {
    Self {
      id,
      created_at,
      period,
      kind: MutationKind::Stop {
        effective,
        supersedes,
      },
    }
  }

  pub fn reactivation(
    id: Uuid,
    created_at: DateTime<Utc>,
    period: Period,
    effective: Period,
    amount: i64,
    supersedes: Uuid,
  ) -> Self {
    Self {
      id,
      created_at,
      period,
      kind: MutationKind::Reactivation {
        effective,
        amount,
        supersedes,
      },
    }
  }

  pub fn termination(
    id: Uuid,
    created_at: DateTime<Utc>,
    period: Period,
    effective: Period,
    supersedes: Uuid,
  ) -> Self {
    Self {
      id,
      created_at,
      period,
      kind: MutationKind::Termination {
        effective,
        supersedes,
      },
    }
  }

  /// The period at which this mutation takes effect on the timeline. For
  /// the change variants this is the effective period, never the line
  /// period or the recording date.
  pub fn effective_period(&self) -> Period {
    match &self.kind {
      MutationKind::New { .. } => self.period,
      MutationKind::Stop { effective, .. }
      | MutationKind::Reactivation { effective, .. }
      | MutationKind::Termination { effective, .. } => *effective,
    }
  }

  /// The id of the line this mutation supersedes, if it is a change.
  pub fn supersedes(&self) -> Option<Uuid> {
    match &self.kind {
      MutationKind::New { .. } => None,
      MutationKind::Stop { supersedes, .. }
      | MutationKind::Reactivation { supersedes, .. }
      | MutationKind::Termination { supersedes, .. } => Some(*supersedes),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
