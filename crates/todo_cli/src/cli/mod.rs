use clap::{Parser, Subcommand};
use time::Date;
use todo_core::config::{ConfigOverrides, parse_tiebreak, parse_week_start};
use todo_core::error::AppError;
use todo_core::model::Priority;
use todo_core::schedule::parse_day;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log scheduler decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: todo add "Write report" --priority high
    Add {
        title: String,
        #[arg(long, short, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
    /// Capture an untriaged item into the inbox
    ///
    /// Example: todo inbox "Renew passport"
    Inbox { title: String },
    /// List tasks and the inbox
    ///
    /// Example: todo list --all
    List {
        /// Include archived tasks
        #[arg(long)]
        all: bool,
    },
    /// Make a task depend on another one
    ///
    /// Example: todo depend task-2 task-1
    Depend { id: String, dependency: String },
    /// Start working on a task once its dependencies are done
    ///
    /// Example: todo start task-1
    Start { id: String },
    /// Mark a task as done
    ///
    /// Example: todo done task-1
    Done { id: String },
    /// Archive a task so it is never scheduled again
    ///
    /// Example: todo archive task-1
    Archive { id: String },
    /// Spread all open tasks and the inbox over the coming weeks
    ///
    /// Example: todo plan --capacity 4 --anchor 2026-03-02 --dry-run
    Plan {
        #[command(flatten)]
        run: RunArgs,
        /// Show the plan without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Pick the best day for a single task
    ///
    /// Example: todo place task-1
    Place {
        id: String,
        #[command(flatten)]
        run: RunArgs,
        /// Show the day without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Check scheduler settings against the current backlog
    ///
    /// Example: todo check --capacity 25
    Check {
        /// Tasks per day (defaults to the configured capacity)
        #[arg(long, allow_negative_numbers = true)]
        capacity: Option<i64>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Tasks per day (defaults to the configured capacity)
    #[arg(long, allow_negative_numbers = true)]
    pub capacity: Option<i64>,
    /// First day of the window, YYYY-MM-DD (defaults to the start of this week)
    #[arg(long, value_parser = parse_anchor)]
    pub anchor: Option<Date>,
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    raw.parse::<Priority>().map_err(|err| err.message().to_string())
}

fn parse_anchor(raw: &str) -> Result<Date, String> {
    parse_day(raw).map_err(|err| err.message().to_string())
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    DailyCapacity,
    Tiebreak,
    WeekStart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field = canonicalize_flag_name(key_raw)
        .ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "daily_capacity" | "capacity" => ConfigOverrideTarget::DailyCapacity,
        "tiebreak" => ConfigOverrideTarget::Tiebreak,
        "week_start" => ConfigOverrideTarget::WeekStart,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Fold every `--config-override` into one set of overrides. Later
/// occurrences of a key win.
pub fn collect_overrides(raws: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for raw in raws {
        let parsed = parse_config_override(raw).map_err(|message| {
            AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {message}"))
        })?;
        match parsed.target {
            ConfigOverrideTarget::DailyCapacity => {
                let capacity = parsed.value.parse::<i64>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "{CONFIG_OVERRIDE_FLAG}: daily_capacity must be an integer, got '{}'",
                        parsed.value
                    ))
                })?;
                overrides.daily_capacity = Some(capacity);
            }
            ConfigOverrideTarget::Tiebreak => {
                overrides.tiebreak = Some(parse_tiebreak(&parsed.value)?);
            }
            ConfigOverrideTarget::WeekStart => {
                overrides.week_start = Some(parse_week_start(&parsed.value)?);
            }
        }
    }

    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, ConfigOverrideTarget, collect_overrides, parse_config_override};
    use clap::Parser;
    use todo_core::model::Priority;
    use todo_core::schedule::{Tiebreak, WeekStart};

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Daily-Capacity = 4 ").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::DailyCapacity);
        assert_eq!(parsed.value, "4");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("theme=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("tiebreak").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn collect_overrides_parses_values() {
        let overrides = collect_overrides(&[
            "capacity=3".to_string(),
            "tiebreak=days-from-anchor".to_string(),
            "week_start=sunday".to_string(),
            "daily_capacity=5".to_string(),
        ])
        .unwrap();

        assert_eq!(overrides.daily_capacity, Some(5));
        assert_eq!(overrides.tiebreak, Some(Tiebreak::DaysFromAnchor));
        assert_eq!(overrides.week_start, Some(WeekStart::Sunday));
    }

    #[test]
    fn collect_overrides_rejects_bad_values() {
        let err = collect_overrides(&["daily_capacity=lots".to_string()]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(collect_overrides(&["tiebreak=random".to_string()]).is_err());
    }

    #[test]
    fn add_parses_priority() {
        let cli =
            Cli::try_parse_from(["todo", "add", "Write report", "--priority", "HIGH"]).unwrap();
        match cli.command {
            Command::Add { title, priority } => {
                assert_eq!(title, "Write report");
                assert_eq!(priority, Priority::High);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_rejects_unknown_priority() {
        assert!(Cli::try_parse_from(["todo", "add", "x", "--priority", "urgent"]).is_err());
    }

    #[test]
    fn plan_accepts_negative_capacity_and_anchor() {
        let cli = Cli::try_parse_from([
            "todo", "plan", "--capacity", "-1", "--anchor", "2026-03-02", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Plan { run, dry_run } => {
                assert_eq!(run.capacity, Some(-1));
                assert_eq!(run.anchor, Some(time::macros::date!(2026 - 03 - 02)));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
