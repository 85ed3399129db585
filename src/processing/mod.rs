//! The dashboard's fixed set of views over a [`crate::types::RentalTable`].
//!
//! Every operation takes the records it works on as a parameter and returns a freshly built
//! result; nothing is cached or mutated in place.
//!
//! - [`filter()`]: inclusive date-range filter
//! - [`aggregate`]: daily totals, weekday profile, monthly split, day-type means, weather
//!   breakdowns, headline overview
//! - [`rfm()`]: per-`instant` recency/frequency/monetary table
//! - [`describe()`]: descriptive statistics over an RFM table
//!
//! ## Example: filter → aggregate → RFM
//!
//! ```rust
//! use bike_share_analytics::processing::{daily_totals, describe, filter, rfm, weekday_profile};
//! use bike_share_analytics::types::{MonetaryField, RentalRecord, RentalTable, Weekday};
//! use chrono::NaiveDate;
//!
//! let day = |s: &str| s.parse::<NaiveDate>().unwrap();
//! let record = |instant, date, weekday, cnt| RentalRecord {
//!     instant,
//!     date: day(date),
//!     weekday,
//!     holiday: false,
//!     workingday: false,
//!     temp_bucket: "Cold".to_string(),
//!     hum_bucket: "Humid".to_string(),
//!     wind_bucket: "Calm".to_string(),
//!     casual: 0,
//!     registered: cnt,
//!     cnt,
//! };
//! let table = RentalTable::new(vec![
//!     record(1, "2011-01-01", Weekday::Sat, 10),
//!     record(2, "2011-01-02", Weekday::Sun, 20),
//! ]);
//!
//! let profile = weekday_profile(&table);
//! assert_eq!(profile.rows()[0].weekday, Weekday::Sat);
//! assert_eq!(daily_totals(&table)[1].cnt_sum, 20);
//!
//! let second_day = filter(&table, day("2011-01-02"), day("2011-01-02")).unwrap();
//! let table_rfm = rfm(&second_day, day("2011-01-10"), MonetaryField::Registered).unwrap();
//! assert_eq!(table_rfm.rows[0].recency, 8);
//!
//! let nothing = filter(&table, day("2011-01-03"), day("2011-01-03")).unwrap();
//! let empty_rfm = rfm(&nothing, day("2011-01-10"), MonetaryField::Registered).unwrap();
//! assert!(describe(&empty_rfm).is_err());
//! ```

pub mod aggregate;
pub mod describe;
pub mod filter;
pub mod rfm;

pub use aggregate::{
    category_breakdown, daily_totals, flag_breakdown, mean_cnt_where, monthly_split, usage_overview,
    weekday_profile, workingday_holiday_summary, CategoryBreakdown, CategoryTotal, DailyTotal, DayTypeSummary,
    FlagGroup, MonthlySplit, MonthlyTotal, UsageOverview, WeekdayMean, WeekdayProfile,
};
pub use describe::{describe, summarize, ColumnSummary, RfmSummary};
pub use filter::{filter, filter_range};
pub use rfm::{default_reference_date, rfm, RfmRow, RfmTable};
