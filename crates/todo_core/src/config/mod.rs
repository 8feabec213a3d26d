use crate::error::AppError;
use crate::schedule::{DEFAULT_DAILY_CAPACITY, Tiebreak, WeekStart};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TODOAPP_CONFIG_PATH";

/// Scheduler settings read from `config.json`. Unset fields fall back to
/// the built-in defaults through the accessor methods.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daily_capacity: Option<i64>,
    #[serde(default)]
    pub tiebreak: Option<Tiebreak>,
    #[serde(default)]
    pub week_start: Option<WeekStart>,
}

impl Config {
    pub fn daily_capacity(&self) -> i64 {
        self.daily_capacity.unwrap_or(DEFAULT_DAILY_CAPACITY)
    }

    pub fn tiebreak(&self) -> Tiebreak {
        self.tiebreak.unwrap_or_default()
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub daily_capacity: Option<i64>,
    pub tiebreak: Option<Tiebreak>,
    pub week_start: Option<WeekStart>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("todoapp")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todoapp")
            .join(CONFIG_FILE_NAME))
    }
}

/// Never fails: an unreadable or invalid file yields the defaults together
/// with the error so the caller can warn and carry on.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(capacity) = overrides.daily_capacity {
        merged.daily_capacity = Some(capacity);
    }
    if let Some(tiebreak) = overrides.tiebreak {
        merged.tiebreak = Some(tiebreak);
    }
    if let Some(week_start) = overrides.week_start {
        merged.week_start = Some(week_start);
    }
    merged
}

fn canonical_value(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

pub fn parse_tiebreak(raw: &str) -> Result<Tiebreak, AppError> {
    match canonical_value(raw).as_str() {
        "day_of_month" => Ok(Tiebreak::DayOfMonth),
        "days_from_anchor" => Ok(Tiebreak::DaysFromAnchor),
        other => Err(AppError::invalid_input(format!(
            "unknown tiebreak '{other}' (expected day_of_month or days_from_anchor)"
        ))),
    }
}

pub fn parse_week_start(raw: &str) -> Result<WeekStart, AppError> {
    match canonical_value(raw).as_str() {
        "monday" | "mon" => Ok(WeekStart::Monday),
        "sunday" | "sun" => Ok(WeekStart::Sunday),
        other => Err(AppError::invalid_input(format!(
            "unknown week start '{other}' (expected monday or sunday)"
        ))),
    }
}
