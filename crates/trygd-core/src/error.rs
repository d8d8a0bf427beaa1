//! Error types for `trygd-core`.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::period::Period;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid period: {from} is after {to}")]
  InvalidPeriod { from: NaiveDate, to: NaiveDate },

  #[error("cannot derive a timeline from an empty payment history")]
  EmptyHistory,

  /// The mutation history is temporally inconsistent: restoring the paid
  /// amount behind a reactivation would shadow a fact that is genuinely
  /// newer than the reactivation itself. The computation is aborted; no
  /// partial timeline is returned.
  #[error(
    "reactivation {reactivation_id} cannot restore {period}: fact \
     {conflicting_id} was recorded after the reactivation and would be \
     shadowed by the restored entry"
  )]
  TemporalInconsistency {
    reactivation_id: Uuid,
    conflicting_id:  Uuid,
    period:          Period,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
