use taskflow_core::ParseError;
use thiserror::Error;

/// Reasons the task form refuses to submit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskFormError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Category is required")]
    CategoryRequired,

    #[error("Invalid due date: {0}")]
    InvalidDueDate(#[from] ParseError),
}
