use crate::model::Task;
use crate::schedule::score::{Tiebreak, score};
use std::collections::HashMap;
use time::Date;

/// Tasks already placed per day, owned by a single scheduling call.
pub type LoadMap = HashMap<Date, u32>;

pub fn load_on(load: &LoadMap, day: Date) -> u32 {
    load.get(&day).copied().unwrap_or(0)
}

pub fn has_room(load: &LoadMap, day: Date, daily_capacity: i64) -> bool {
    i64::from(load_on(load, day)) < daily_capacity
}

/// Lowest-cost day in `window` that still has room for `task`.
///
/// Days are scanned in window order and only a strictly lower cost replaces
/// the current best, so the earliest day wins ties. `None` means every day
/// is full.
pub fn place_one(
    task: &Task,
    window: &[Date],
    load: &LoadMap,
    daily_capacity: i64,
    tiebreak: Tiebreak,
) -> Option<Date> {
    let anchor = *window.first()?;
    let mut best: Option<(Date, i64)> = None;

    for &day in window {
        if !has_room(load, day, daily_capacity) {
            continue;
        }

        let cost = score(task, day, load_on(load, day), tiebreak, anchor);
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((day, cost));
        }
    }

    best.map(|(day, _)| day)
}
