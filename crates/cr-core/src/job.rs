use serde::Serialize;
use serde_json::{Map, Value};
use crate::template::FieldPath;

/// A template with one request's overrides applied, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobDocument(Map<String, Value>);

impl JobDocument {
    pub(crate) fn new(steps: Map<String, Value>) -> Self {
        Self(steps)
    }

    pub fn get(&self, path: FieldPath) -> Option<&Value> {
        self.0.get(path.step)?.get("inputs")?.get(path.input)
    }

    /// The label the backend will prefix its output file with.
    pub fn output_prefix(&self) -> Option<&str> {
        self.get(FieldPath::OUTPUT_PREFIX)?.as_str()
    }

    /// Wraps the document the way the backend's `/prompt` endpoint expects.
    pub fn envelope(&self) -> SubmitEnvelope<'_> {
        SubmitEnvelope { prompt: self }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitEnvelope<'a> {
    pub prompt: &'a JobDocument,
}
