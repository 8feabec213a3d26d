/// Capacities above this are accepted by the scheduler but flagged.
pub const MAX_PLAUSIBLE_CAPACITY: i64 = 20;

pub const CAPACITY_NOT_POSITIVE: &str = "daily capacity must be greater than 0";
pub const CAPACITY_IMPLAUSIBLE: &str = "daily capacity above 20 is implausible";
pub const EMPTY_BACKLOG: &str = "nothing to schedule: the backlog is empty";

/// Problems with a planned run. An empty list means the run is sensible;
/// whether any message blocks the run is up to the caller.
pub fn validate_config(daily_capacity: i64, total_tasks: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if daily_capacity <= 0 {
        errors.push(CAPACITY_NOT_POSITIVE.to_string());
    } else if daily_capacity > MAX_PLAUSIBLE_CAPACITY {
        errors.push(CAPACITY_IMPLAUSIBLE.to_string());
    }

    if total_tasks == 0 {
        errors.push(EMPTY_BACKLOG.to_string());
    }

    errors
}
