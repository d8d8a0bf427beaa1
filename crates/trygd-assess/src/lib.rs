//! Assessment logic on top of the payment timeline.
//!
//! Everything here consumes the public surface of `trygd-core` only:
//! per-month comparison of paid amounts against recomputed entitlement
//! (simulation), claw-back planning for incorrectly paid months, and the
//! consistency check protecting untouched months during a revision.

pub mod clawback;
pub mod revision;
pub mod simulation;

pub use simulation::MonthlyAmount;
