//! The authoritative payment timeline for one case.
//!
//! Construction folds the case's full mutation history, in whatever order
//! it arrives, into a disjoint sequence of entries describing, for every
//! covered date, the payment in effect. The timeline is immutable after
//! construction; shrinking produces a new instance.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::{
  Error, Result,
  entry::{EntryKind, TimelineEntry},
  merge::merge,
  mutation::PaymentMutation,
  period::Period,
};

// ─── PaymentTimeline ─────────────────────────────────────────────────────────

/// A non-empty, ordered sequence of pairwise-disjoint entries, plus the
/// bounding period over all of them. Dates inside the bounding period need
/// not be covered: gaps are preserved.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTimeline {
  entries: Vec<TimelineEntry>,
  period:  Period,
}

impl PaymentTimeline {
  /// Derive the timeline from a case's full mutation history.
  ///
  /// The input order carries no meaning; precedence is decided by creation
  /// timestamps alone. Fails with [`Error::TemporalInconsistency`] when the
  /// history violates the reactivation modelling assumptions, and with
  /// [`Error::EmptyHistory`] for an empty input.
  pub fn from_history(mutations: &[PaymentMutation]) -> Result<Self> {
    let entries: Vec<TimelineEntry> =
      mutations.iter().map(TimelineEntry::project).collect();

    // Grants are merged among themselves first, so change facts are
    // considered against the already-reconciled paid picture.
    let (paid, changes): (Vec<_>, Vec<_>) = entries
      .into_iter()
      .partition(|e| matches!(e.kind, EntryKind::Paid { .. }));
    let mut candidates = merge(&paid);
    candidates.extend(changes);

    let candidates = regenerate(candidates)?;
    let entries = merge(&candidates);

    let period = Period::bounding(entries.iter().map(|e| e.period))
      .ok_or(Error::EmptyHistory)?;
    tracing::debug!(
      mutations = mutations.len(),
      entries = entries.len(),
      %period,
      "derived payment timeline"
    );
    Ok(Self { entries, period })
  }

  // ── Queries ───────────────────────────────────────────────────────────

  pub fn entries(&self) -> &[TimelineEntry] {
    &self.entries
  }

  /// The bounding period: earliest entry start to latest entry end. May
  /// contain internal gaps.
  pub fn period(&self) -> Period {
    self.period
  }

  /// The entry in effect on `date`, or `None` for a gap or a date outside
  /// the bounding period.
  pub fn lookup(&self, date: NaiveDate) -> Option<&TimelineEntry> {
    self.entries.iter().find(|e| e.period.contains_date(date))
  }

  /// A new timeline restricted to `period`: entries outside it are dropped
  /// and straddling entries are clipped. `None` if nothing remains.
  pub fn shrink_to(&self, period: Period) -> Option<PaymentTimeline> {
    let entries: Vec<TimelineEntry> = self
      .entries
      .iter()
      .filter_map(|e| {
        period.intersect(&e.period).map(|clipped| TimelineEntry {
          period: clipped,
          ..e.clone()
        })
      })
      .collect();
    let period = Period::bounding(entries.iter().map(|e| e.period))?;
    Some(PaymentTimeline { entries, period })
  }

  /// `true` if both timelines describe the same payments: same entry
  /// count, pairwise same period and payload. Origin ids and creation
  /// timestamps are ignored.
  pub fn structurally_equals(&self, other: &PaymentTimeline) -> bool {
    self.entries.len() == other.entries.len()
      && self
        .entries
        .iter()
        .zip(&other.entries)
        .all(|(a, b)| a.same_shape(b))
  }

  /// Shrink both timelines to `period` and compare structurally. `false`
  /// when either side has nothing in `period`.
  pub fn structurally_equals_within(
    &self,
    other: &PaymentTimeline,
    period: Period,
  ) -> bool {
    match (self.shrink_to(period), other.shrink_to(period)) {
      (Some(a), Some(b)) => a.structurally_equals(&b),
      _ => false,
    }
  }
}

// ─── Reactivation regeneration ───────────────────────────────────────────────

/// One tick past the reactivation: just enough to outrank it, and nothing
/// genuinely newer.
fn revival_tick() -> TimeDelta {
  TimeDelta::microseconds(1)
}

/// Walk the candidate entries newest-first. A reactivation only carries its
/// own restored amount, so any older paid fact it overlaps with a different
/// amount would stay hidden behind it; for each such fact a corrected paid
/// entry is synthesized over the overlap window, timestamped one tick after
/// the reactivation.
///
/// A synthesized entry must never shadow a fact recorded after the
/// reactivation itself; such a history contradicts the modelling
/// assumptions and the whole computation is aborted.
fn regenerate(
  mut candidates: Vec<TimelineEntry>,
) -> Result<Vec<TimelineEntry>> {
  candidates.sort_by(|a, b| {
    b.created_at
      .cmp(&a.created_at)
      .then_with(|| a.origin_id.cmp(&b.origin_id))
  });

  let mut synthesized: Vec<TimelineEntry> = Vec::new();
  for (idx, entry) in candidates.iter().enumerate() {
    let EntryKind::Reactivated { amount: restored } = entry.kind else {
      continue;
    };

    for older in &candidates[idx + 1..] {
      let EntryKind::Paid { amount } = older.kind else {
        continue;
      };
      if amount == restored {
        continue;
      }
      let Some(window) = entry.period.intersect(&older.period) else {
        continue;
      };

      let revived_at = entry.created_at + revival_tick();
      let conflict = candidates.iter().chain(&synthesized).find(|f| {
        f.created_at > entry.created_at
          && f.created_at <= revived_at
          && f.period.overlaps(&window)
      });
      if let Some(conflict) = conflict {
        tracing::warn!(
          reactivation = %entry.origin_id,
          conflicting = %conflict.origin_id,
          %window,
          "refusing to regenerate over a newer fact"
        );
        return Err(Error::TemporalInconsistency {
          reactivation_id: entry.origin_id,
          conflicting_id:  conflict.origin_id,
          period:          window,
        });
      }

      tracing::debug!(
        reactivation = %entry.origin_id,
        origin = %older.origin_id,
        %window,
        amount,
        "regenerating paid entry behind reactivation"
      );
      synthesized.push(TimelineEntry {
        origin_id:  older.origin_id,
        created_at: revived_at,
        period:     window,
        kind:       EntryKind::Paid { amount },
      });
    }
  }

  candidates.extend(synthesized);
  Ok(candidates)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
