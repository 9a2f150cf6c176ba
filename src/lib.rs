//! Переключение ifAdminStatus интерфейсов сетевых устройств через SNMP SET.
//!
//! Задание приходит одной строкой JSON, результат уходит одной строкой JSON.

pub mod config;
pub mod formatter;
pub mod job;
pub mod models;
pub mod range;
pub mod snmp;
pub mod stream;
pub mod validate;

pub use job::{JobError, JobRunner, JobStage};
pub use models::{CompletionRecord, JobParams, JobRequest};
