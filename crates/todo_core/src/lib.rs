pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod schedule;
pub mod storage;
pub mod task_api;
