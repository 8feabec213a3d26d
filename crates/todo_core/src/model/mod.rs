mod task;

pub use task::{InboxItem, Priority, Task, TaskStatus};
