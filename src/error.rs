use thiserror::Error;

/// Main error type for Mockforge operations
#[derive(Error, Debug)]
pub enum MockforgeError {
    #[error("failed to validate request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("failed to acquire source tree: {0}")]
    Acquisition(String),

    #[error("failed to scan package source: {}", .0.join("; "))]
    Extraction(Vec<String>),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MockforgeError>;
