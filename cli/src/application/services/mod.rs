//! Application services — use-case orchestration.
//!
//! Each service module implements a group of tasks by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod journal;
pub mod operate;
pub mod provision;
pub mod release;
pub mod task_runner;
