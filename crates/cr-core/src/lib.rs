pub mod error;
pub mod job;
pub mod request;
pub mod template;
mod token;

pub use error::{TemplateError, ValidationError};
pub use job::{JobDocument, SubmitEnvelope};
pub use request::GenerationRequest;
pub use template::{FieldPath, JobTemplate};
pub use token::CorrelationToken;
