use std::fmt;
use std::path::Path;
use serde_json::{Map, Value};
use crate::error::{TemplateError, ValidationError};
use crate::job::JobDocument;
use crate::request::GenerationRequest;
use crate::token::CorrelationToken;

/// Address of one overridable input inside the job graph:
/// `template[step]["inputs"][input]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    pub step: &'static str,
    pub input: &'static str,
}

impl FieldPath {
    pub const POSITIVE_TEXT: Self = Self::new("6", "text");
    pub const NEGATIVE_TEXT: Self = Self::new("7", "text");
    pub const SEED: Self = Self::new("3", "seed");
    pub const HEIGHT: Self = Self::new("5", "height");
    pub const WIDTH: Self = Self::new("5", "width");
    pub const OUTPUT_PREFIX: Self = Self::new("9", "filename_prefix");

    /// Every path the overlay is allowed to write. Nothing else is touched.
    pub const ALL: [Self; 6] = [
        Self::POSITIVE_TEXT,
        Self::NEGATIVE_TEXT,
        Self::SEED,
        Self::HEIGHT,
        Self::WIDTH,
        Self::OUTPUT_PREFIX,
    ];

    const fn new(step: &'static str, input: &'static str) -> Self {
        Self { step, input }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.inputs.{}", self.step, self.input)
    }
}

/// The static job graph every request is derived from.
///
/// Construction checks that all of [`FieldPath::ALL`] exist, so an overlay
/// only ever replaces values and never grows the document.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTemplate {
    steps: Map<String, Value>,
}

impl JobTemplate {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_value(serde_json::from_str(&raw)?)
    }

    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        let Value::Object(mut steps) = value else {
            return Err(TemplateError::NotAnObject);
        };

        for path in FieldPath::ALL {
            if slot(&mut steps, path).is_none() {
                return Err(TemplateError::MissingField(path));
            }
        }

        Ok(Self { steps })
    }

    /// Builds the job for one request. The template itself is left untouched.
    pub fn overlay(
        &self,
        request: &GenerationRequest,
        token: &CorrelationToken,
    ) -> Result<JobDocument, ValidationError> {
        let positive_text = request.validate()?;

        let mut steps = self.steps.clone();
        set(&mut steps, FieldPath::POSITIVE_TEXT, positive_text.into());
        if let Some(negative_text) = &request.negative_text {
            set(&mut steps, FieldPath::NEGATIVE_TEXT, negative_text.as_str().into());
        }
        if let Some(seed) = request.seed {
            set(&mut steps, FieldPath::SEED, seed.into());
        }
        if let Some(height) = request.height {
            set(&mut steps, FieldPath::HEIGHT, height.into());
        }
        if let Some(width) = request.width {
            set(&mut steps, FieldPath::WIDTH, width.into());
        }
        set(&mut steps, FieldPath::OUTPUT_PREFIX, token.as_str().into());

        Ok(JobDocument::new(steps))
    }

    pub fn get(&self, path: FieldPath) -> Option<&Value> {
        self.steps.get(path.step)?.get("inputs")?.get(path.input)
    }
}

fn slot(steps: &mut Map<String, Value>, path: FieldPath) -> Option<&mut Value> {
    steps.get_mut(path.step)?.get_mut("inputs")?.get_mut(path.input)
}

fn set(steps: &mut Map<String, Value>, path: FieldPath, value: Value) {
    if let Some(slot) = slot(steps, path) {
        *slot = value;
    }
}
