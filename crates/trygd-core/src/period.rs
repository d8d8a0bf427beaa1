//! Period — a closed, inclusive range of calendar dates.
//!
//! All timeline arithmetic works on whole days. A period never represents
//! an empty range; `from <= to` is enforced at construction.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Period ──────────────────────────────────────────────────────────────────

/// A closed date range: both endpoints are part of the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
  from: NaiveDate,
  to:   NaiveDate,
}

impl Period {
  /// Build a period from inclusive endpoints. Rejects inverted ranges.
  pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
    if from > to {
      return Err(Error::InvalidPeriod { from, to });
    }
    Ok(Self { from, to })
  }

  /// The full calendar month `year`/`month`, or `None` for an invalid month
  /// or a year outside chrono's range.
  pub fn month(year: i32, month: u32) -> Option<Self> {
    let from = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to = first_of_next_month(from)?.pred_opt()?;
    Some(Self { from, to })
  }

  pub fn from(&self) -> NaiveDate {
    self.from
  }

  pub fn to(&self) -> NaiveDate {
    self.to
  }

  // ── Set operations ────────────────────────────────────────────────────

  /// `true` if the two periods share at least one date.
  pub fn overlaps(&self, other: &Period) -> bool {
    self.from <= other.to && other.from <= self.to
  }

  /// `true` if every date of `inner` is also a date of `self`.
  pub fn contains(&self, inner: &Period) -> bool {
    self.from <= inner.from && inner.to <= self.to
  }

  pub fn contains_date(&self, date: NaiveDate) -> bool {
    self.from <= date && date <= self.to
  }

  /// The dates covered by both periods, or `None` if they are disjoint.
  pub fn intersect(&self, other: &Period) -> Option<Period> {
    let from = self.from.max(other.from);
    let to = self.to.min(other.to);
    (from <= to).then_some(Period { from, to })
  }

  /// The smallest period spanning both inputs. Not a true union: dates
  /// between the two are included even when neither input covers them.
  pub fn spanning(a: Period, b: Period) -> Period {
    Period {
      from: a.from.min(b.from),
      to:   a.to.max(b.to),
    }
  }

  /// The bounding range of all given periods: earliest `from` to latest
  /// `to`. `None` for an empty input.
  pub fn bounding<I>(periods: I) -> Option<Period>
  where
    I: IntoIterator<Item = Period>,
  {
    periods.into_iter().reduce(Period::spanning)
  }

  /// `true` if `other` starts on the day immediately after `self` ends.
  pub fn abuts(&self, other: &Period) -> bool {
    self.to.succ_opt() == Some(other.from)
  }

  // ── Calendar helpers ──────────────────────────────────────────────────

  /// The calendar months intersecting this period, in order, each clipped
  /// to the period's bounds. The first and last month may be partial.
  pub fn months(&self) -> Vec<Period> {
    let mut months = Vec::new();
    let mut cursor = self.from;
    while cursor <= self.to {
      let Some(next) = first_of_next_month(cursor) else {
        break;
      };
      let Some(month_end) = next.pred_opt() else {
        break;
      };
      months.push(Period {
        from: cursor,
        to:   month_end.min(self.to),
      });
      cursor = next;
    }
    months
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.from, self.to)
  }
}

fn first_of_next_month(d: NaiveDate) -> Option<NaiveDate> {
  if d.month() == 12 {
    NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
  } else {
    NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
