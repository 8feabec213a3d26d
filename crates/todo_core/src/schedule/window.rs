use std::iter;
use time::Date;

pub const DAYS_PER_WEEK: u32 = 7;

/// `7 × weeks` consecutive days starting at `start`, in order.
///
/// A request for zero weeks still yields one week.
pub fn day_window(start: Date, weeks: u32) -> Vec<Date> {
    let len = (weeks.max(1) * DAYS_PER_WEEK) as usize;
    iter::successors(Some(start), |day| day.next_day())
        .take(len)
        .collect()
}
