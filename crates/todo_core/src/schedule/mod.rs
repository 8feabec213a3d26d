//! Auto-scheduling engine: places open work onto calendar days under a
//! per-day capacity.
//!
//! Everything here is a pure function of its inputs. Each call builds its
//! own day window and load map and returns fresh values; caller data is
//! never modified.

pub mod auto;
pub mod day;
pub mod place;
pub mod score;
pub mod smart;
pub mod validate;
pub mod window;

pub use auto::{Placement, ScheduleResult, auto_schedule, place_all, weeks_needed};
pub use day::{WeekStart, format_day, local_today, parse_day, week_start};
pub use place::{LoadMap, place_one};
pub use score::{Tiebreak, score};
pub use smart::smart_schedule;
pub use validate::validate_config;
pub use window::day_window;

use time::Date;

pub const DEFAULT_DAILY_CAPACITY: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub daily_capacity: i64,
    /// First day of the window; days are never placed before it.
    pub week_anchor: Date,
    pub tiebreak: Tiebreak,
}

impl ScheduleOptions {
    pub fn new(daily_capacity: i64, week_anchor: Date) -> Self {
        Self {
            daily_capacity,
            week_anchor,
            tiebreak: Tiebreak::default(),
        }
    }

    pub fn with_tiebreak(mut self, tiebreak: Tiebreak) -> Self {
        self.tiebreak = tiebreak;
        self
    }
}
