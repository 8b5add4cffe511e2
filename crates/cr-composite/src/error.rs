use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("failed to serialize metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("part payload contains the delimiter --{boundary}")]
    BoundaryCollision { boundary: String },

    #[error("invalid part content type {0:?}")]
    InvalidContentType(String),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("content type {0:?} is not multipart")]
    NotMultipart(String),

    #[error("content type has no boundary parameter")]
    MissingBoundary,

    #[error("part {index} has no header terminator")]
    MalformedPart { index: usize },

    #[error("part {index} declares no content type")]
    MissingContentType { index: usize },

    #[error("body has no closing delimiter")]
    Unterminated,

    #[error("no {0} part in body")]
    MissingPart(&'static str),

    #[error("metadata part is not valid JSON: {0}")]
    Metadata(#[from] serde_json::Error),
}
