use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Plan not found at {}", .0.display())]
    PlanNotFound(PathBuf),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid plan: {0}")]
    Validation(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid size '{0}': expected small, medium, or large")]
    InvalidSize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
