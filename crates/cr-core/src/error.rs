use std::path::PathBuf;
use thiserror::Error;
use crate::template::FieldPath;

/// Caller input that can never produce a job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("positive_text is required")]
    MissingPositiveText,

    #[error("positive_text must be at least {min} characters long, got {len}")]
    PositiveTextTooShort { min: usize, len: usize },

    #[error("{field} must be at most {max}, got {value}")]
    DimensionTooLarge {
        field: &'static str,
        max: u32,
        value: u32,
    },
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read job template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("job template is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("job template must be an object keyed by step id")]
    NotAnObject,

    #[error("job template has no field {0}")]
    MissingField(FieldPath),
}
