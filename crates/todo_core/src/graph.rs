//! Dependency graph checks. Edges run from a task to the tasks it depends on.

use crate::model::{Task, TaskStatus};
use std::collections::{HashMap, HashSet};

/// Whether making `task_id` depend on `proposed_dependency_id` would close a
/// cycle, self-dependency included.
///
/// Walks depth-first from the proposed dependency along existing edges and
/// reports a cycle if the walk reaches `task_id`. Ids that name no task in
/// `tasks` are treated as leaves.
pub fn would_create_cycle(task_id: &str, proposed_dependency_id: &str, tasks: &[Task]) -> bool {
    if task_id == proposed_dependency_id {
        return true;
    }

    let edges: HashMap<&str, &[String]> = tasks
        .iter()
        .map(|task| (task.id.as_str(), task.dependencies.as_slice()))
        .collect();

    let mut visited = HashSet::new();
    let mut stack = vec![proposed_dependency_id];

    while let Some(current) = stack.pop() {
        if current == task_id {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(dependencies) = edges.get(current) {
            stack.extend(dependencies.iter().map(String::as_str));
        }
    }

    false
}

/// Dependencies of `task` that are not done yet. Unknown ids count as
/// unfinished.
pub fn unfinished_dependencies(task: &Task, tasks: &[Task]) -> Vec<String> {
    task.dependencies
        .iter()
        .filter(|id| {
            !tasks
                .iter()
                .any(|other| &other.id == *id && other.status == TaskStatus::Done)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{unfinished_dependencies, would_create_cycle};
    use crate::model::{Task, TaskStatus};

    /// a -> b -> c
    fn chain() -> Vec<Task> {
        vec![
            Task::new("a", "a").with_dependency("b"),
            Task::new("b", "b").with_dependency("c"),
            Task::new("c", "c"),
            Task::new("d", "d"),
        ]
    }

    #[test]
    fn closing_a_chain_is_a_cycle() {
        assert!(would_create_cycle("c", "a", &chain()));
        assert!(would_create_cycle("b", "a", &chain()));
    }

    #[test]
    fn unrelated_edge_is_not_a_cycle() {
        assert!(!would_create_cycle("d", "a", &chain()));
        assert!(!would_create_cycle("a", "c", &chain()));
    }

    #[test]
    fn self_dependency_is_always_a_cycle() {
        assert!(would_create_cycle("x", "x", &[]));
        assert!(would_create_cycle("d", "d", &chain()));
    }

    #[test]
    fn shared_subdependencies_terminate() {
        // diamond: a -> b, a -> c, b -> d, c -> d
        let tasks = vec![
            Task::new("a", "a").with_dependency("b").with_dependency("c"),
            Task::new("b", "b").with_dependency("d"),
            Task::new("c", "c").with_dependency("d"),
            Task::new("d", "d"),
            Task::new("e", "e"),
        ];
        assert!(!would_create_cycle("e", "a", &tasks));
        assert!(would_create_cycle("d", "a", &tasks));
    }

    #[test]
    fn existing_cycle_elsewhere_does_not_loop_forever() {
        let tasks = vec![
            Task::new("p", "p").with_dependency("q"),
            Task::new("q", "q").with_dependency("p"),
            Task::new("r", "r"),
        ];
        assert!(!would_create_cycle("r", "p", &tasks));
    }

    #[test]
    fn dangling_dependency_ids_are_leaves() {
        let tasks = vec![Task::new("a", "a").with_dependency("ghost")];
        assert!(!would_create_cycle("b", "a", &tasks));
    }

    #[test]
    fn query_does_not_modify_the_graph() {
        let tasks = chain();
        let before = tasks.clone();
        let _ = would_create_cycle("c", "a", &tasks);
        assert_eq!(tasks, before);
    }

    #[test]
    fn unfinished_dependencies_lists_open_and_unknown_ids() {
        let tasks = vec![
            Task::new("a", "a")
                .with_dependency("b")
                .with_dependency("c")
                .with_dependency("ghost"),
            Task::new("b", "b").with_status(TaskStatus::Done),
            Task::new("c", "c").with_status(TaskStatus::InProgress),
        ];
        assert_eq!(unfinished_dependencies(&tasks[0], &tasks), vec!["c", "ghost"]);
        assert!(unfinished_dependencies(&tasks[1], &tasks).is_empty());
    }
}
