use crate::model::Task;
use crate::schedule::ScheduleOptions;
use crate::schedule::day::parse_day;
use crate::schedule::place::{LoadMap, place_one};
use crate::schedule::window::day_window;
use time::Date;
use tracing::{debug, warn};

pub const SMART_WINDOW_WEEKS: u32 = 4;

/// Best day for a single task within four weeks of the anchor, given where
/// everything else already sits.
///
/// The load map counts every other non-archived task with a date, whatever
/// its status. Only the chosen day is returned; no task is modified.
pub fn smart_schedule(task: &Task, all_tasks: &[Task], options: &ScheduleOptions) -> Option<Date> {
    let window = day_window(options.week_anchor, SMART_WINDOW_WEEKS);
    let load = existing_load(task, all_tasks);

    let day = place_one(task, &window, &load, options.daily_capacity, options.tiebreak);
    debug!(task = %task.id, found = day.is_some(), "smart placement");
    day
}

fn existing_load(target: &Task, all_tasks: &[Task]) -> LoadMap {
    let mut load = LoadMap::new();

    for other in all_tasks {
        if other.id == target.id || other.archived {
            continue;
        }
        let Some(raw) = other.scheduled_date.as_deref() else {
            continue;
        };
        match parse_day(raw) {
            Ok(day) => *load.entry(day).or_insert(0) += 1,
            Err(_) => warn!(task = %other.id, value = raw, "ignoring unparseable scheduled_date"),
        }
    }

    load
}
