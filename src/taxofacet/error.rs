use crate::attributes::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacetError {
    #[error("Invalid taxonomy: {0}")]
    Taxonomy(String),

    #[error("Invalid search URL: {0}")]
    Url(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, FacetError>;
