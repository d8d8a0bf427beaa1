//! Newest-wins merge of timestamped, period-tagged facts.
//!
//! Given any set of facts that each cover a period and carry a creation
//! timestamp, [`merge`] produces the maximal disjoint sequence covering
//! their union: at every covered date the surviving fact is the most
//! recently created one covering that date. Facts are clipped where they
//! partially overlap a winner and dropped where fully shadowed. The result
//! depends only on timestamps, ids and periods, never on input order.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::period::Period;

// ─── TimelineFragment ────────────────────────────────────────────────────────

/// A fact that can be placed on a timeline and re-cut to a different period.
pub trait TimelineFragment: Clone {
  fn fragment_id(&self) -> Uuid;
  fn created_at(&self) -> DateTime<Utc>;
  fn period(&self) -> Period;
  /// The same fact carrying `period` instead of its own.
  fn with_period(&self, period: Period) -> Self;
}

/// `true` if `a` takes precedence over `b` where both cover the same date.
/// Later creation wins; identical timestamps are broken in favour of the
/// smaller id, so the outcome never depends on processing order.
pub fn outranks<F: TimelineFragment>(a: &F, b: &F) -> bool {
  match a.created_at().cmp(&b.created_at()) {
    Ordering::Greater => true,
    Ordering::Less => false,
    Ordering::Equal => a.fragment_id() < b.fragment_id(),
  }
}

// ─── Merge ───────────────────────────────────────────────────────────────────

/// Merge `facts` into the maximal disjoint sequence, ordered by start date.
/// Gaps between input periods are preserved as gaps.
pub fn merge<F: TimelineFragment>(facts: &[F]) -> Vec<F> {
  // Every period endpoint opens a new elementary segment. Within one
  // segment the set of covering facts is constant, so the winner is too.
  let mut cuts: Vec<NaiveDate> = Vec::with_capacity(facts.len() * 2);
  for fact in facts {
    cuts.push(fact.period().from());
    if let Some(day_after) = fact.period().to().succ_opt() {
      cuts.push(day_after);
    }
  }
  cuts.sort_unstable();
  cuts.dedup();

  let mut result: Vec<F> = Vec::new();
  for pair in cuts.windows(2) {
    let Some(last_day) = pair[1].pred_opt() else {
      continue;
    };
    let Ok(segment) = Period::new(pair[0], last_day) else {
      continue;
    };

    let mut winner: Option<&F> = None;
    for fact in facts {
      if !fact.period().contains_date(segment.from()) {
        continue;
      }
      winner = match winner {
        Some(best) if outranks(best, fact) => Some(best),
        _ => Some(fact),
      };
    }
    let Some(winner) = winner else {
      continue;
    };

    // Re-join segments that were cut out of the same fact and stayed
    // adjacent, so an unchallenged fact passes through in one piece.
    match result.last_mut() {
      Some(prev)
        if prev.fragment_id() == winner.fragment_id()
          && prev.created_at() == winner.created_at()
          && prev.period().abuts(&segment) =>
      {
        *prev = prev.with_period(Period::spanning(prev.period(), segment));
      }
      _ => result.push(winner.with_period(segment)),
    }
  }
  result
}

// ─── Tests ───────────────────────────────────────────────────────────────────
