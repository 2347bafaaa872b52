use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::occupation::NocCode;

/// Weekly hours at or above which a position counts as full time.
pub const FULL_TIME_HOURS: f32 = 30.0;

const DAYS_PER_YEAR: i64 = 365;

/// A validated employment period with an inclusive, already clipped date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperiencePeriod {
    pub noc: Option<NocCode>,
    pub canadian: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub full_time: bool,
    pub paid: bool,
}

impl ExperiencePeriod {
    /// Full-time paid work; part-time and unpaid periods never accumulate.
    pub const fn qualifies(&self) -> bool {
        self.full_time && self.paid
    }

    pub fn skilled(&self) -> bool {
        self.noc
            .as_ref()
            .map(|noc| noc.tier().is_skilled())
            .unwrap_or(false)
    }
}

/// Total of merged, non-overlapping days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExperienceSpan {
    pub days: i64,
}

impl ExperienceSpan {
    pub const fn whole_years(self) -> u32 {
        (self.days / DAYS_PER_YEAR) as u32
    }

    pub const fn whole_months(self) -> u32 {
        (self.days * 12 / DAYS_PER_YEAR) as u32
    }
}

/// Selects which periods count toward a measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExperienceFilter {
    /// `Some(true)` keeps Canadian periods only, `Some(false)` foreign only.
    pub canadian: Option<bool>,
    /// Keep periods whose occupation parses to TEER 0-3.
    pub skilled_only: bool,
    /// Keep trade occupations only.
    pub trades_only: bool,
    /// Only days inside the last N years before the assessment date count.
    pub lookback_years: Option<u32>,
}

impl ExperienceFilter {
    pub const fn canadian(lookback_years: u32) -> Self {
        Self {
            canadian: Some(true),
            skilled_only: false,
            trades_only: false,
            lookback_years: Some(lookback_years),
        }
    }

    pub const fn foreign(lookback_years: u32) -> Self {
        Self {
            canadian: Some(false),
            skilled_only: false,
            trades_only: false,
            lookback_years: Some(lookback_years),
        }
    }

    /// Canadian and foreign periods alike.
    pub const fn within(lookback_years: u32) -> Self {
        Self {
            canadian: None,
            skilled_only: false,
            trades_only: false,
            lookback_years: Some(lookback_years),
        }
    }

    /// Every qualifying period, however old.
    pub const fn lifetime() -> Self {
        Self {
            canadian: None,
            skilled_only: false,
            trades_only: false,
            lookback_years: None,
        }
    }

    pub const fn skilled(mut self) -> Self {
        self.skilled_only = true;
        self
    }

    pub const fn trades(mut self) -> Self {
        self.trades_only = true;
        self
    }

    fn keeps(&self, period: &ExperiencePeriod) -> bool {
        if !period.qualifies() {
            return false;
        }
        if let Some(canadian) = self.canadian {
            if period.canadian != canadian {
                return false;
            }
        }
        if self.skilled_only && !period.skilled() {
            return false;
        }
        if self.trades_only && !period.noc.as_ref().map(NocCode::is_trade).unwrap_or(false) {
            return false;
        }
        true
    }

    fn window_start(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        self.lookback_years.map(|years| {
            as_of
                .checked_sub_months(Months::new(years.saturating_mul(12)))
                .unwrap_or(NaiveDate::MIN)
        })
    }
}

/// Sum the days covered by matching periods, counting concurrent jobs once.
pub fn measure(periods: &[ExperiencePeriod], as_of: NaiveDate, filter: ExperienceFilter) -> ExperienceSpan {
    merge(periods.iter().filter(|period| filter.keeps(period)), as_of, filter)
}

/// Per-occupation totals; periods without a valid code are skipped.
pub fn measure_by_occupation(
    periods: &[ExperiencePeriod],
    as_of: NaiveDate,
    filter: ExperienceFilter,
) -> BTreeMap<NocCode, ExperienceSpan> {
    let mut grouped: BTreeMap<NocCode, Vec<&ExperiencePeriod>> = BTreeMap::new();
    for period in periods.iter().filter(|period| filter.keeps(period)) {
        if let Some(noc) = &period.noc {
            grouped.entry(noc.clone()).or_default().push(period);
        }
    }

    grouped
        .into_iter()
        .map(|(noc, periods)| (noc, merge(periods.into_iter(), as_of, filter)))
        .collect()
}

fn merge<'a>(
    periods: impl Iterator<Item = &'a ExperiencePeriod>,
    as_of: NaiveDate,
    filter: ExperienceFilter,
) -> ExperienceSpan {
    let window_start = filter.window_start(as_of);
    let mut ranges: Vec<(NaiveDate, NaiveDate)> = periods
        .filter_map(|period| {
            let start = match window_start {
                Some(floor) => period.start.max(floor),
                None => period.start,
            };
            let end = period.end.min(as_of);
            (start <= end).then_some((start, end))
        })
        .collect();
    ranges.sort();

    let mut days = 0;
    let mut current: Option<(NaiveDate, NaiveDate)> = None;
    for (start, end) in ranges {
        current = match current {
            Some((open_start, open_end)) if start <= open_end.succ_opt().unwrap_or(open_end) => {
                Some((open_start, open_end.max(end)))
            }
            Some((open_start, open_end)) => {
                days += inclusive_days(open_start, open_end);
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((start, end)) = current {
        days += inclusive_days(start, end);
    }

    ExperienceSpan { days }
}

fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
