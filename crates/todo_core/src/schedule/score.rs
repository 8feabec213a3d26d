//! Placement cost of a task on a candidate day. Lower is better.
//!
//! The cost is the sum of four terms:
//! - load: `tasks already on the day × 100`, dominating everything else
//! - priority: `weight × 10`
//! - weekend: `+50` for a high-priority task on Saturday or Sunday
//! - tiebreak: a small per-day ordinal that keeps results reproducible
//!
//! The priority term is the same for every day a given task is scored
//! against, so it never changes which day a task picks on its own. Priority
//! shapes a run through ordering instead: higher-priority tasks are placed
//! first and claim the emptiest days.

use crate::model::{Priority, Task};
use crate::schedule::day::is_weekend;
use serde::{Deserialize, Serialize};
use time::Date;

pub const LOAD_PENALTY: i64 = 100;
pub const PRIORITY_FACTOR: i64 = 10;
pub const WEEKEND_PENALTY: i64 = 50;

/// How equally loaded days are told apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreak {
    /// Add the calendar day of month (1-31). Favors the start of any month,
    /// regardless of which week the day is in.
    #[default]
    DayOfMonth,
    /// Add the number of days since the window anchor. Strictly favors
    /// earlier days.
    DaysFromAnchor,
}

impl Tiebreak {
    pub fn term(self, day: Date, anchor: Date) -> i64 {
        match self {
            Self::DayOfMonth => i64::from(day.day()),
            Self::DaysFromAnchor => (day - anchor).whole_days(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DayOfMonth => "day_of_month",
            Self::DaysFromAnchor => "days_from_anchor",
        }
    }
}

pub fn score(task: &Task, day: Date, load: u32, tiebreak: Tiebreak, anchor: Date) -> i64 {
    let weekend = if task.priority == Priority::High && is_weekend(day) {
        WEEKEND_PENALTY
    } else {
        0
    };

    i64::from(load) * LOAD_PENALTY
        + task.priority.weight() * PRIORITY_FACTOR
        + weekend
        + tiebreak.term(day, anchor)
}

#[cfg(test)]
mod tests {
    use super::{Tiebreak, score};
    use crate::model::{Priority, Task};
    use time::macros::date;

    fn task(priority: Priority) -> Task {
        Task::new("t", "t").with_priority(priority)
    }

    const ANCHOR: time::Date = date!(2026 - 01 - 05);

    #[test]
    fn score_sums_all_terms() {
        // Monday the 5th, no load, medium: 20 + 5
        let monday = date!(2026 - 01 - 05);
        assert_eq!(score(&task(Priority::Medium), monday, 0, Tiebreak::DayOfMonth, ANCHOR), 25);
        // two tasks already there
        assert_eq!(score(&task(Priority::Low), monday, 2, Tiebreak::DayOfMonth, ANCHOR), 215);
    }

    #[test]
    fn weekend_penalty_applies_to_high_priority_only() {
        let saturday = date!(2026 - 01 - 10);
        assert_eq!(score(&task(Priority::High), saturday, 0, Tiebreak::DayOfMonth, ANCHOR), 90);
        assert_eq!(score(&task(Priority::Medium), saturday, 0, Tiebreak::DayOfMonth, ANCHOR), 30);
        assert_eq!(score(&task(Priority::Low), saturday, 0, Tiebreak::DayOfMonth, ANCHOR), 20);
    }

    #[test]
    fn one_task_of_load_outweighs_every_other_term() {
        let high = task(Priority::High);
        let empty_weekend_late = date!(2026 - 01 - 31);
        let loaded_weekday_early = date!(2026 - 01 - 05);
        assert!(
            score(&high, empty_weekend_late, 0, Tiebreak::DayOfMonth, ANCHOR)
                < score(&high, loaded_weekday_early, 1, Tiebreak::DayOfMonth, ANCHOR)
        );
    }

    #[test]
    fn day_of_month_tiebreak_prefers_the_first_of_next_month() {
        let low = task(Priority::Low);
        let jan_30 = date!(2026 - 01 - 30);
        let feb_02 = date!(2026 - 02 - 02);
        assert!(
            score(&low, feb_02, 0, Tiebreak::DayOfMonth, ANCHOR)
                < score(&low, jan_30, 0, Tiebreak::DayOfMonth, ANCHOR)
        );
        assert!(
            score(&low, jan_30, 0, Tiebreak::DaysFromAnchor, ANCHOR)
                < score(&low, feb_02, 0, Tiebreak::DaysFromAnchor, ANCHOR)
        );
    }

    #[test]
    fn days_from_anchor_starts_at_zero() {
        assert_eq!(Tiebreak::DaysFromAnchor.term(ANCHOR, ANCHOR), 0);
        assert_eq!(Tiebreak::DaysFromAnchor.term(date!(2026 - 01 - 12), ANCHOR), 7);
    }
}
