mod cli;

use clap::Parser;
use cli::{Cli, Command, RunArgs, collect_overrides};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use todo_core::config::{self, Config};
use todo_core::error::AppError;
use todo_core::graph::unfinished_dependencies;
use todo_core::model::{InboxItem, Task, TaskStatus};
use todo_core::schedule::smart::SMART_WINDOW_WEEKS;
use todo_core::schedule::{ScheduleOptions, ScheduleResult, local_today, week_start};
use todo_core::task_api;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "todo_core=debug,todo_cli=debug";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!("using default settings: {err}");
    }
    let overrides = collect_overrides(&cli.config_override)?;
    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn schedule_options(config: &Config, run: &RunArgs) -> ScheduleOptions {
    let capacity = run.capacity.unwrap_or_else(|| config.daily_capacity());
    let anchor = run
        .anchor
        .unwrap_or_else(|| week_start(local_today(), config.week_start()));
    ScheduleOptions::new(capacity, anchor).with_tiebreak(config.tiebreak())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let rendered =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn print_tasks_plain(tasks: &[Task], inbox: &[InboxItem], all: &[Task]) {
    for task in tasks {
        let blocked =
            task.status != TaskStatus::Done && !unfinished_dependencies(task, all).is_empty();
        let prefix = if blocked { "[BLOCKED] " } else { "" };
        let scheduled = task.scheduled_date.as_deref().unwrap_or("-");
        let archived = if task.archived { " (archived)" } else { "" };
        println!(
            "{}{} | {} | {} | {}{} | {}",
            prefix, task.id, task.title, task.priority, task.status, archived, scheduled
        );
    }

    if !inbox.is_empty() {
        println!("Inbox:");
        for item in inbox {
            println!("{} | {}", item.id, item.title);
        }
    }
}

fn print_tasks_json(tasks: &[Task], inbox: &[InboxItem], all: &[Task]) -> Result<(), AppError> {
    let payload: Vec<serde_json::Value> = tasks
        .iter()
        .map(|task| {
            serde_json::json!({
                "id": task.id,
                "title": task.title,
                "priority": task.priority,
                "status": task.status,
                "scheduled_date": task.scheduled_date,
                "dependencies": task.dependencies,
                "blocked_by": unfinished_dependencies(task, all),
                "archived": task.archived,
            })
        })
        .collect();
    print_json(&serde_json::json!({ "tasks": payload, "inbox": inbox }))
}

#[derive(Tabled)]
struct PlanRow {
    day: String,
    id: String,
    title: String,
    priority: String,
}

fn print_plan_plain(result: &ScheduleResult, dry_run: bool) {
    if !result.scheduled.is_empty() {
        let rows = result.scheduled.iter().map(|task| PlanRow {
            day: task.scheduled_date.clone().unwrap_or_default(),
            id: task.id.clone(),
            title: task.title.clone(),
            priority: task.priority.to_string(),
        });
        let mut table = Table::new(rows);
        table.with(Style::psql());
        println!("{table}");
    }

    for task in &result.unplaced {
        println!("Unplaced: {} ({})", task.title, task.id);
    }

    let suffix = if dry_run { " (dry run, nothing saved)" } else { "" };
    println!(
        "Placed {} task(s) across {} week(s){}",
        result.placed, result.weeks_used, suffix
    );
}

/// Runs one command and returns the process exit status.
fn run_command(cli: Cli) -> Result<i32, AppError> {
    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Add { title, priority } => {
            let task = task_api::add_task(&title, priority)?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Added task: {} ({}, {})", task.title, task.id, task.priority);
            }
        }
        Command::Inbox { title } => {
            let item = task_api::capture_inbox(&title)?;
            if cli.json {
                print_json(&item)?;
            } else {
                println!("Captured to inbox: {} ({})", item.title, item.id);
            }
        }
        Command::List { all } => {
            let everything = task_api::list_tasks(true)?;
            let tasks = if all {
                everything.clone()
            } else {
                task_api::list_tasks(false)?
            };
            let inbox = task_api::list_inbox()?;
            if cli.json {
                print_tasks_json(&tasks, &inbox, &everything)?;
            } else {
                print_tasks_plain(&tasks, &inbox, &everything);
            }
        }
        Command::Depend { id, dependency } => {
            let task = task_api::add_dependency(&id, &dependency)?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Task {} now depends on {}", task.id, dependency.trim());
            }
        }
        Command::Start { id } => {
            let task = task_api::start_task(&id)?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Started task: {} ({})", task.title, task.id);
            }
        }
        Command::Done { id } => {
            let task = task_api::complete_task(&id)?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Completed task: {} ({})", task.title, task.id);
            }
        }
        Command::Archive { id } => {
            let task = task_api::archive_task(&id)?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Archived task: {} ({})", task.title, task.id);
            }
        }
        Command::Plan { run, dry_run } => {
            let options = schedule_options(&config, &run);
            for message in task_api::check_config(options.daily_capacity)? {
                eprintln!("WARNING: {message}");
            }
            let result = task_api::plan(&options, dry_run)?;
            if cli.json {
                print_json(&result)?;
            } else {
                print_plan_plain(&result, dry_run);
            }
        }
        Command::Place { id, run, dry_run } => {
            let options = schedule_options(&config, &run);
            let placed = task_api::place_task(&id, &options, dry_run)?;
            if cli.json {
                print_json(&serde_json::json!({
                    "id": id.trim(),
                    "scheduled_date": placed.as_ref().and_then(|task| task.scheduled_date.clone()),
                }))?;
            } else {
                match placed {
                    Some(task) => println!(
                        "Placed task: {} ({}) on {}",
                        task.title,
                        task.id,
                        task.scheduled_date.as_deref().unwrap_or("-")
                    ),
                    None => println!(
                        "No day with spare capacity in the next {SMART_WINDOW_WEEKS} weeks for {}",
                        id.trim()
                    ),
                }
            }
        }
        Command::Check { capacity } => {
            let capacity = capacity.unwrap_or_else(|| config.daily_capacity());
            let messages = task_api::check_config(capacity)?;
            if cli.json {
                print_json(&serde_json::json!({
                    "valid": messages.is_empty(),
                    "errors": messages,
                }))?;
            } else if messages.is_empty() {
                println!("Configuration OK (daily capacity {capacity})");
            } else {
                for message in &messages {
                    println!("{message}");
                }
            }
            if !messages.is_empty() {
                return Ok(1);
            }
        }
    }

    Ok(0)
}

fn normalize_parse_error(err: &clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(&err));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    match run_command(cli) {
        Ok(status) => std::process::exit(status),
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    }
}
