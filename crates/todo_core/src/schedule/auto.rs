use crate::model::{InboxItem, Task};
use crate::schedule::ScheduleOptions;
use crate::schedule::day::format_day;
use crate::schedule::place::{LoadMap, place_one};
use crate::schedule::score::Tiebreak;
use crate::schedule::window::{DAYS_PER_WEEK, day_window};
use serde::Serialize;
use std::cmp::Reverse;
use time::Date;
use tracing::{debug, trace};

/// Outcome of a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleResult {
    /// Copies of every task that got a day, in placement order.
    pub scheduled: Vec<Task>,
    /// Tasks no day had room for, left unscheduled, in placement order.
    pub unplaced: Vec<Task>,
    pub weeks_used: u32,
    pub placed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub scheduled: Vec<Task>,
    pub unplaced: Vec<Task>,
    pub load: LoadMap,
}

/// Weeks of window needed to hold `total_tasks` at `daily_capacity`, never
/// less than one.
pub fn weeks_needed(total_tasks: usize, daily_capacity: i64) -> u32 {
    if daily_capacity <= 0 {
        return 1;
    }
    let per_week = (daily_capacity as u64).saturating_mul(u64::from(DAYS_PER_WEEK));
    let weeks = (total_tasks as u64).div_ceil(per_week).max(1);
    u32::try_from(weeks).unwrap_or(u32::MAX)
}

/// Place `tasks` one by one, in the order given, against a load map that
/// starts empty and grows with every placement.
pub fn place_all(
    tasks: impl IntoIterator<Item = Task>,
    window: &[Date],
    daily_capacity: i64,
    tiebreak: Tiebreak,
) -> Placement {
    let mut load = LoadMap::new();
    let mut scheduled = Vec::new();
    let mut unplaced = Vec::new();

    for mut task in tasks {
        match place_one(&task, window, &load, daily_capacity, tiebreak) {
            Some(day) => {
                *load.entry(day).or_insert(0) += 1;
                task.scheduled_date = Some(format_day(day));
                trace!(task = %task.id, day = %format_day(day), "placed task");
                scheduled.push(task);
            }
            None => {
                trace!(task = %task.id, "no day with spare capacity");
                unplaced.push(task);
            }
        }
    }

    Placement {
        scheduled,
        unplaced,
        load,
    }
}

/// Schedule every open task plus the whole inbox across as many weeks as the
/// backlog needs, starting at the week anchor.
///
/// Archived and done tasks are ignored. Inbox items enter as low-priority
/// todo tasks. Work is placed highest priority first; equal priorities keep
/// their input order, active tasks ahead of inbox items. Inputs are left
/// untouched.
pub fn auto_schedule(
    active: &[Task],
    inbox: &[InboxItem],
    options: &ScheduleOptions,
) -> ScheduleResult {
    let mut queue: Vec<Task> = active
        .iter()
        .filter(|task| task.is_schedulable())
        .cloned()
        .chain(inbox.iter().map(InboxItem::materialize))
        .collect();
    queue.sort_by_key(|task| Reverse(task.priority.weight()));

    let weeks_used = weeks_needed(queue.len(), options.daily_capacity);
    let window = day_window(options.week_anchor, weeks_used);
    let total = queue.len();

    let Placement {
        scheduled,
        unplaced,
        ..
    } = place_all(queue, &window, options.daily_capacity, options.tiebreak);

    debug!(
        total,
        placed = scheduled.len(),
        unplaced = unplaced.len(),
        weeks_used,
        anchor = %format_day(options.week_anchor),
        "auto-schedule run finished"
    );

    ScheduleResult {
        placed: scheduled.len(),
        scheduled,
        unplaced,
        weeks_used,
    }
}
