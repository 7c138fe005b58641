//! Application-wide error types.
//!
//! Submission and classifier failures have their own enums in
//! [`crate::session`] and [`crate::classifier`]; this one covers startup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("task error: {0}")]
    Task(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
