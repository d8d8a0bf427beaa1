//! Month-by-month comparison of paid amounts against a new computation.
//!
//! The simulation engine recomputes what a case *should* pay per month and
//! asks how that differs from what the timeline says was in effect. Months
//! the timeline pays nothing for (gaps, stops, terminations) count as 0
//! previously paid.

use serde::Serialize;
use trygd_core::{period::Period, timeline::PaymentTimeline};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// A recomputed entitlement for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAmount {
  pub month:  Period,
  pub amount: i64,
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// One month of the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyDifference {
  pub month:           Period,
  pub previously_paid: i64,
  pub newly_computed:  i64,
}

impl MonthlyDifference {
  /// Positive when more was paid out than the new computation allows.
  pub fn overpaid(&self) -> i64 {
    self.previously_paid - self.newly_computed
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
  pub months: Vec<MonthlyDifference>,
}

impl SimulationResult {
  /// Sum of the overpaid part across all months; underpaid months do not
  /// offset it.
  pub fn total_overpaid(&self) -> i64 {
    self.months.iter().map(|m| m.overpaid().max(0)).sum()
  }

  pub fn total_underpaid(&self) -> i64 {
    self.months.iter().map(|m| (-m.overpaid()).max(0)).sum()
  }
}

// ─── Comparison ──────────────────────────────────────────────────────────────

/// Compare what `previous` paid per calendar month of `period` against the
/// recomputed `computed` amounts. Months absent from `computed` count as an
/// entitlement of 0.
pub fn compare(
  previous: &PaymentTimeline,
  computed: &[MonthlyAmount],
  period: Period,
) -> SimulationResult {
  let months = period
    .months()
    .into_iter()
    .map(|month| {
      let previously_paid = previous
        .lookup(month.from())
        .map(|e| e.kind.monthly_amount())
        .unwrap_or(0);
      let newly_computed = computed
        .iter()
        .find(|c| c.month.overlaps(&month))
        .map(|c| c.amount)
        .unwrap_or(0);
      MonthlyDifference {
        month,
        previously_paid,
        newly_computed,
      }
    })
    .collect();
  SimulationResult { months }
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

  fn monthly(year: i32, month: u32, amount: i64) -> MonthlyAmount {
    MonthlyAmount {
      month: Period::month(year, month).unwrap(),
      amount,
    }
  }

  #[test]
  fn unchanged_entitlement_has_no_differences() {
    let timeline = PaymentTimeline::from_history(&[PaymentMutation::grant(
      Uuid::new_v4(),
      ts(1),
      p((2021, 1, 1), (2021, 3, 31)),
      2000,
    )])
    .unwrap();
    let computed: Vec<MonthlyAmount> =
      (1..=3).map(|m| monthly(2021, m, 2000)).collect();

    let result = compare(&timeline, &computed, p((2021, 1, 1), (2021, 3, 31)));
    assert_eq!(result.months.len(), 3);
    assert!(result.months.iter().all(|m| m.overpaid() == 0));
    assert_eq!(result.total_overpaid(), 0);
    assert_eq!(result.total_underpaid(), 0);
  }

  #[test]
  fn reduced_entitlement_shows_up_as_overpayment() {
    let timeline = PaymentTimeline::from_history(&[PaymentMutation::grant(
      Uuid::new_v4(),
      ts(1),
      p((2021, 1, 1), (2021, 4, 30)),
      2000,
    )])
    .unwrap();
    // Entitlement halves from March.
    let computed = vec![
      monthly(2021, 1, 2000),
      monthly(2021, 2, 2000),
      monthly(2021, 3, 1000),
      monthly(2021, 4, 1000),
    ];

    let result = compare(&timeline, &computed, p((2021, 1, 1), (2021, 4, 30)));
    assert_eq!(result.total_overpaid(), 2000);
    assert_eq!(
      result
        .months
        .iter()
        .filter(|m| m.overpaid() > 0)
        .map(|m| m.month)
        .collect::<Vec<_>>(),
      vec![
        Period::month(2021, 3).unwrap(),
        Period::month(2021, 4).unwrap()
      ]
    );
  }

  #[test]
  fn gap_months_count_as_zero_paid() {
    let timeline = PaymentTimeline::from_history(&[
      PaymentMutation::grant(
        Uuid::new_v4(),
        ts(1),
        p((2021, 1, 1), (2021, 1, 31)),
        2000,
      ),
      PaymentMutation::grant(
        Uuid::new_v4(),
        ts(2),
        p((2021, 3, 1), (2021, 3, 31)),
        2000,
      ),
    ])
    .unwrap();
    let computed: Vec<MonthlyAmount> =
      (1..=3).map(|m| monthly(2021, m, 2000)).collect();

    let result = compare(&timeline, &computed, p((2021, 1, 1), (2021, 3, 31)));
    let feb = &result.months[1];
    assert_eq!(feb.previously_paid, 0);
    assert_eq!(result.total_underpaid(), 2000);
  }
}
