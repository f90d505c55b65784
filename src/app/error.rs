use thiserror::Error;

use crate::adapters::meraki_api::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to build dashboard client: {0}")]
    Client(#[source] ApiError),
    #[error("terminal i/o failed: {0}")]
    Input(#[from] std::io::Error),
    #[error("invalid organization selection: {0}")]
    InvalidSelection(String),
}

impl AppError {
    pub fn logging_init<E: std::fmt::Display>(error: E) -> Self {
        Self::LoggingInit(error.to_string())
    }

    pub fn config<E: std::fmt::Display>(error: E) -> Self {
        Self::Config(error.to_string())
    }

    pub fn invalid_selection<E: std::fmt::Display>(error: E) -> Self {
        Self::InvalidSelection(error.to_string())
    }
}
