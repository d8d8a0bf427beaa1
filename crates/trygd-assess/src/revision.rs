//! Revision consistency — protecting months a change must not touch.
//!
//! When a case is revised for a sub-period, the timeline is re-derived from
//! the amended history. Months outside the revised sub-period must come out
//! structurally identical, or the revision has side effects the case worker
//! never asked for.

use thiserror::Error;
use trygd_core::{period::Period, timeline::PaymentTimeline};

#[derive(Debug, Error)]
pub enum RevisionError {
  #[error("the revised timeline alters the protected period {0}")]
  ProtectedPeriodAltered(Period),

  #[error("no timeline entries fall within the protected period {0}")]
  NothingProtected(Period),
}

/// Verify that `revised` leaves `protected` exactly as `current` has it.
///
/// Both timelines are shrunk to the protected period and compared
/// structurally, so re-derivation details (origin ids, creation
/// timestamps) do not trigger false alarms.
pub fn verify_untouched(
  current: &PaymentTimeline,
  revised: &PaymentTimeline,
  protected: Period,
) -> Result<(), RevisionError> {
  match (current.shrink_to(protected), revised.shrink_to(protected)) {
    (None, None) => Err(RevisionError::NothingProtected(protected)),
    (Some(a), Some(b)) if a.structurally_equals(&b) => Ok(()),
    _ => {
      tracing::warn!(%protected, "revision altered a protected period");
      Err(RevisionError::ProtectedPeriodAltered(protected))
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
