//! Calendar-day helpers shared by the scheduler and the task API.
//!
//! Days travel as `time::Date` inside the scheduler and as `YYYY-MM-DD`
//! strings on the task model. All day boundaries are local midnight of the
//! invoking environment; nothing is normalized to UTC, so two callers in
//! different zones may disagree on what "today" is.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, UtcOffset, Weekday};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

pub fn format_day(day: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        day.year(),
        u8::from(day.month()),
        day.day()
    )
}

pub fn parse_day(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::invalid_input(format!("'{}' is not a YYYY-MM-DD date", raw.trim())))
}

pub fn is_weekend(day: Date) -> bool {
    matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday)
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn local_today() -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset()).date()
}

/// First day of the week that contains `day`.
pub fn week_start(day: Date, starts_on: WeekStart) -> Date {
    let back = match starts_on {
        WeekStart::Monday => day.weekday().number_days_from_monday(),
        WeekStart::Sunday => day.weekday().number_days_from_sunday(),
    };
    day.checked_sub(Duration::days(i64::from(back)))
        .unwrap_or(day)
}
