//! Grouping/reduction views over a [`RentalTable`].
//!
//! Every function here is a pure `table -> view` reduction. Grouping is stable: groups are
//! created in first-appearance order over the (date-sorted) input, and any later reordering
//! uses stable sorts, so ties always resolve to the earliest input position.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{CategoryKind, DayFlag, RentalRecord, RentalTable, Weekday};

/// Summed usage for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub cnt_sum: u64,
}

/// Mean usage for one weekday label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayMean {
    pub weekday: Weekday,
    pub cnt_mean: f64,
}

/// Mean usage per weekday, in canonical `Mon..Sun` order.
///
/// Weekdays with no records are omitted rather than zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeekdayProfile {
    rows: Vec<WeekdayMean>,
}

impl WeekdayProfile {
    pub fn rows(&self) -> &[WeekdayMean] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean for `weekday`, if present.
    pub fn mean_for(&self, weekday: Weekday) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.weekday == weekday)
            .map(|r| r.cnt_mean)
    }

    /// Weekday with the highest mean; ties go to the earlier weekday.
    pub fn busiest(&self) -> Option<Weekday> {
        self.rows
            .iter()
            .fold(None::<&WeekdayMean>, |best, r| match best {
                Some(b) if b.cnt_mean >= r.cnt_mean => Some(b),
                _ => Some(r),
            })
            .map(|r| r.weekday)
    }

    /// Weekday with the lowest mean; ties go to the earlier weekday.
    pub fn quietest(&self) -> Option<Weekday> {
        self.rows
            .iter()
            .fold(None::<&WeekdayMean>, |best, r| match best {
                Some(b) if b.cnt_mean <= r.cnt_mean => Some(b),
                _ => Some(r),
            })
            .map(|r| r.weekday)
    }

    /// Unweighted mean of the Sat/Sun row means.
    pub fn weekend_mean(&self) -> Option<f64> {
        mean_of(self.rows.iter().filter(|r| r.weekday.is_weekend()).map(|r| r.cnt_mean))
    }

    /// Unweighted mean of the Mon..Fri row means.
    pub fn weekday_mean(&self) -> Option<f64> {
        mean_of(self.rows.iter().filter(|r| !r.weekday.is_weekend()).map(|r| r.cnt_mean))
    }
}

/// Casual and registered usage for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub casual_sum: u64,
    pub registered_sum: u64,
}

/// Month-level casual/registered split, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthlySplit {
    rows: Vec<MonthlyTotal>,
}

impl MonthlySplit {
    pub fn rows(&self) -> &[MonthlyTotal] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean of the monthly casual sums.
    pub fn mean_casual(&self) -> Option<f64> {
        mean_of(self.rows.iter().map(|r| r.casual_sum as f64))
    }

    /// Mean of the monthly registered sums.
    pub fn mean_registered(&self) -> Option<f64> {
        mean_of(self.rows.iter().map(|r| r.registered_sum as f64))
    }
}

/// Mean usage on working days and on holidays, each over its own subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayTypeSummary {
    pub workingday_mean: f64,
    pub holiday_mean: f64,
}

/// Summed usage for one weather bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub bucket: String,
    pub cnt_sum: u64,
}

/// Usage per bucket of one weather factor, largest contributor first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub kind: CategoryKind,
    pub rows: Vec<CategoryTotal>,
}

impl CategoryBreakdown {
    /// The largest contributor, if any rows exist.
    pub fn top(&self) -> Option<&CategoryTotal> {
        self.rows.first()
    }
}

/// Headline usage figures for a filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageOverview {
    pub total_cnt: u64,
    /// Mean of the daily totals.
    pub mean_daily_cnt: f64,
    /// Date with the highest daily total (earliest on ties).
    pub peak_date: NaiveDate,
    /// Date with the lowest daily total (earliest on ties).
    pub low_date: NaiveDate,
}

/// Usage for one value of a day flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagGroup {
    pub flag: bool,
    pub cnt_sum: u64,
    pub records: usize,
}

/// Sum `cnt` per date, in ascending date order.
pub fn daily_totals(records: &RentalTable) -> Vec<DailyTotal> {
    group_stable(records, |r| r.date, 0u64, |acc, r| *acc += r.cnt)
        .into_iter()
        .map(|(date, cnt_sum)| DailyTotal { date, cnt_sum })
        .collect()
}

/// Mean `cnt` per weekday, in canonical order, absent weekdays omitted.
pub fn weekday_profile(records: &RentalTable) -> WeekdayProfile {
    let mut acc = [(0u64, 0usize); 7];
    for r in records {
        let slot = &mut acc[r.weekday as usize];
        slot.0 += r.cnt;
        slot.1 += 1;
    }

    let rows = Weekday::ALL
        .iter()
        .zip(acc.iter())
        .filter(|(_, (_, n))| *n > 0)
        .map(|(&weekday, &(sum, n))| WeekdayMean {
            weekday,
            cnt_mean: sum as f64 / n as f64,
        })
        .collect();
    WeekdayProfile { rows }
}

/// Sum `casual` and `registered` per calendar month, in chronological order.
pub fn monthly_split(records: &RentalTable) -> MonthlySplit {
    let mut rows: Vec<MonthlyTotal> = group_stable(
        records,
        |r| month_start(r.date),
        (0u64, 0u64),
        |acc, r| {
            acc.0 += r.casual;
            acc.1 += r.registered;
        },
    )
    .into_iter()
    .map(|(month, (casual_sum, registered_sum))| MonthlyTotal {
        month,
        casual_sum,
        registered_sum,
    })
    .collect();
    rows.sort_by_key(|r| r.month);
    MonthlySplit { rows }
}

/// Mean `cnt` over the records where `flag` is set.
///
/// Fails with [`AnalysisError::EmptyDataset`] when no record has the flag.
pub fn mean_cnt_where(records: &RentalTable, flag: DayFlag) -> AnalysisResult<f64> {
    let (sum, n) = records
        .iter()
        .filter(|r| flag.value_of(r))
        .fold((0u64, 0usize), |(s, n), r| (s + r.cnt, n + 1));
    if n == 0 {
        return Err(AnalysisError::EmptyDataset {
            operation: match flag {
                DayFlag::WorkingDay => "workingday mean",
                DayFlag::Holiday => "holiday mean",
            },
        });
    }
    Ok(sum as f64 / n as f64)
}

/// Working-day and holiday mean usage.
///
/// The two subsets are computed independently (a record may count toward both). If either
/// subset is empty the whole summary fails with [`AnalysisError::EmptyDataset`].
pub fn workingday_holiday_summary(records: &RentalTable) -> AnalysisResult<DayTypeSummary> {
    Ok(DayTypeSummary {
        workingday_mean: mean_cnt_where(records, DayFlag::WorkingDay)?,
        holiday_mean: mean_cnt_where(records, DayFlag::Holiday)?,
    })
}

/// Sum `cnt` per bucket of `which`, ordered by descending sum.
///
/// Equal sums keep first-appearance order.
pub fn category_breakdown(records: &RentalTable, which: CategoryKind) -> CategoryBreakdown {
    let mut rows: Vec<CategoryTotal> = group_stable(
        records,
        |r| which.bucket_of(r).to_owned(),
        0u64,
        |acc, r| *acc += r.cnt,
    )
    .into_iter()
    .map(|(bucket, cnt_sum)| CategoryTotal { bucket, cnt_sum })
    .collect();
    rows.sort_by(|a, b| b.cnt_sum.cmp(&a.cnt_sum));
    CategoryBreakdown { kind: which, rows }
}

/// Total, mean daily usage, and peak/low dates.
///
/// Fails with [`AnalysisError::EmptyDataset`] on an empty table.
pub fn usage_overview(records: &RentalTable) -> AnalysisResult<UsageOverview> {
    let daily = daily_totals(records);
    let (first, rest) = daily.split_first().ok_or(AnalysisError::EmptyDataset {
        operation: "usage overview",
    })?;

    let mut peak = first;
    let mut low = first;
    let mut total = first.cnt_sum;
    for d in rest {
        total += d.cnt_sum;
        if d.cnt_sum > peak.cnt_sum {
            peak = d;
        }
        if d.cnt_sum < low.cnt_sum {
            low = d;
        }
    }

    Ok(UsageOverview {
        total_cnt: total,
        mean_daily_cnt: total as f64 / daily.len() as f64,
        peak_date: peak.date,
        low_date: low.date,
    })
}

/// Sum `cnt` and count records per value of `flag`; `false` group first, empty groups omitted.
pub fn flag_breakdown(records: &RentalTable, flag: DayFlag) -> Vec<FlagGroup> {
    let mut groups = [
        FlagGroup {
            flag: false,
            cnt_sum: 0,
            records: 0,
        },
        FlagGroup {
            flag: true,
            cnt_sum: 0,
            records: 0,
        },
    ];
    for r in records {
        let g = &mut groups[usize::from(flag.value_of(r))];
        g.cnt_sum += r.cnt;
        g.records += 1;
    }
    groups.into_iter().filter(|g| g.records > 0).collect()
}

fn group_stable<K, A, KF, F>(records: &RentalTable, mut key: KF, init: A, mut fold: F) -> Vec<(K, A)>
where
    K: Eq + Hash + Clone,
    A: Clone,
    KF: FnMut(&RentalRecord) -> K,
    F: FnMut(&mut A, &RentalRecord),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, A)> = Vec::new();
    for r in records {
        let k = key(r);
        let slot = match index.get(&k) {
            Some(&i) => i,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, init.clone()));
                groups.len() - 1
            }
        };
        fold(&mut groups[slot].1, r);
    }
    groups
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn mean_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
