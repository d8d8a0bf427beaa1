//! Claw-back (avkorting) planning.
//!
//! A feilutbetaling is a month where the timeline shows more paid out than
//! the recomputed entitlement allows. The plan lists those months and the
//! excess per month; recovering the amounts is the disbursement system's
//! problem, not ours.

use serde::Serialize;
use trygd_core::{period::Period, timeline::PaymentTimeline};

use crate::simulation::{self, MonthlyAmount};

// ─── Plan ────────────────────────────────────────────────────────────────────

/// One incorrectly paid month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feilutbetaling {
  pub month:    Period,
  pub paid:     i64,
  pub entitled: i64,
}

impl Feilutbetaling {
  pub fn excess(&self) -> i64 {
    self.paid - self.entitled
  }
}

/// The months to claw back for a period. An empty plan is the normal
/// outcome for a correctly paid case.
#[derive(Debug, Clone, Serialize)]
pub struct ClawbackPlan {
  pub months: Vec<Feilutbetaling>,
}

impl ClawbackPlan {
  pub fn is_empty(&self) -> bool {
    self.months.is_empty()
  }

  pub fn total(&self) -> i64 {
    self.months.iter().map(Feilutbetaling::excess).sum()
  }
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// Derive the claw-back plan for `period`: every calendar month where
/// `timeline` paid more than `entitlements` allow. A period the timeline
/// does not touch yields an empty plan.
pub fn plan(
  timeline: &PaymentTimeline,
  entitlements: &[MonthlyAmount],
  period: Period,
) -> ClawbackPlan {
  let Some(shrunk) = timeline.shrink_to(period) else {
    return ClawbackPlan { months: Vec::new() };
  };

  let comparison = simulation::compare(&shrunk, entitlements, period);
  let months: Vec<Feilutbetaling> = comparison
    .months
    .into_iter()
    .filter(|m| m.overpaid() > 0)
    .map(|m| Feilutbetaling {
      month:    m.month,
      paid:     m.previously_paid,
      entitled: m.newly_computed,
    })
    .collect();

  let plan = ClawbackPlan { months };
  tracing::debug!(
    %period,
    months = plan.months.len(),
    total = plan.total(),
    "derived claw-back plan"
  );
  plan
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{DateTime, NaiveDate, Utc};
  use trygd_core::mutation::PaymentMutation;
  use uuid::Uuid;

  use super::*;

  fn p(from: (i32, u32, u32), to: (i32, u32, u32)) -> Period {
    let from = NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap();
    let to = NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap();
    Period::new(from, to).unwrap()
  }

  fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
  }

  fn year_grant(amount: i64) -> PaymentTimeline {
    PaymentTimeline::from_history(&[PaymentMutation::grant(
      Uuid::new_v4(),
      ts(1),
      p((2021, 1, 1), (2021, 12, 31)),
      amount,
    )])
    .unwrap()
  }

  fn monthly(year: i32, month: u32, amount: i64) -> MonthlyAmount {
    MonthlyAmount {
      month: Period::month(year, month).unwrap(),
      amount,
    }
  }

  #[test]
  fn correctly_paid_case_yields_an_empty_plan() {
    let timeline = year_grant(2000);
    let entitlements: Vec<MonthlyAmount> =
      (1..=12).map(|m| monthly(2021, m, 2000)).collect();

    let plan = plan(&timeline, &entitlements, p((2021, 1, 1), (2021, 12, 31)));
    assert!(plan.is_empty());
    assert_eq!(plan.total(), 0);
  }

  #[test]
  fn mid_year_reduction_claws_back_exactly_the_reduced_months() {
    let timeline = year_grant(2000);
    // Entitlement drops to 1500 from July.
    let entitlements: Vec<MonthlyAmount> = (1..=12)
      .map(|m| monthly(2021, m, if m < 7 { 2000 } else { 1500 }))
      .collect();

    let plan = plan(&timeline, &entitlements, p((2021, 1, 1), (2021, 12, 31)));
    assert_eq!(plan.months.len(), 6);
    assert_eq!(plan.total(), 6 * 500);
    assert_eq!(plan.months[0].month, Period::month(2021, 7).unwrap());
    assert!(plan.months.iter().all(|f| f.excess() == 500));
  }

  #[test]
  fn planning_is_restricted_to_the_requested_period() {
    let timeline = year_grant(2000);
    let entitlements: Vec<MonthlyAmount> =
      (1..=12).map(|m| monthly(2021, m, 1500)).collect();

    let plan = plan(&timeline, &entitlements, p((2021, 3, 1), (2021, 4, 30)));
    assert_eq!(plan.months.len(), 2);
    assert_eq!(plan.total(), 2 * 500);
  }

  #[test]
  fn period_outside_the_timeline_yields_an_empty_plan() {
    let timeline = year_grant(2000);
    let plan = plan(&timeline, &[], p((2023, 1, 1), (2023, 12, 31)));
    assert!(plan.is_empty());
  }
}
