use uuid::Uuid;
use crate::error::{DecodeError, EncodingError};

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";
const CLOSE: &[u8] = b"--";

/// Boundary the first gateway clients were written against.
pub const LEGACY_BOUNDARY: &str = "boundary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Part {
    pub fn new(content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            body,
        }
    }

    /// Media type without parameters, lowercased.
    pub fn media_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    pub fn legacy() -> Self {
        Self(LEGACY_BOUNDARY.to_string())
    }

    pub fn random() -> Self {
        Self(format!("{LEGACY_BOUNDARY}-{}", Uuid::new_v4().simple()))
    }

    /// The legacy boundary unless some payload contains it, in which case a
    /// random one that collides with nothing.
    pub fn choose(parts: &[Part]) -> Self {
        let mut boundary = Self::legacy();
        while boundary.collides(parts) {
            boundary = Self::random();
        }
        boundary
    }

    /// Reads the `boundary` parameter of a `multipart/*` content type.
    pub fn from_content_type(content_type: &str) -> Result<Self, DecodeError> {
        let mut fields = content_type.split(';');
        let media_type = fields.next().unwrap_or_default().trim();
        if !media_type.to_ascii_lowercase().starts_with("multipart/") {
            return Err(DecodeError::NotMultipart(content_type.to_string()));
        }

        fields
            .filter_map(|param| param.split_once('='))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
            .map(|(_, value)| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .ok_or(DecodeError::MissingBoundary)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn content_type(&self) -> String {
        format!("multipart/mixed; boundary={}", self.0)
    }

    fn delimiter(&self) -> Vec<u8> {
        [CLOSE, self.0.as_bytes()].concat()
    }

    fn collides(&self, parts: &[Part]) -> bool {
        let delimiter = self.delimiter();
        parts.iter().any(|part| find(&part.body, &delimiter).is_some())
    }
}

pub fn encode(boundary: &Boundary, parts: &[Part]) -> Result<Vec<u8>, EncodingError> {
    let delimiter = boundary.delimiter();
    let framing = delimiter.len() + 2 * CRLF.len() + HEADER_END.len() + "Content-Type: ".len();
    let capacity = parts
        .iter()
        .map(|part| framing + part.content_type.len() + part.body.len())
        .sum::<usize>()
        + delimiter.len()
        + CLOSE.len()
        + CRLF.len();

    let mut out = Vec::with_capacity(capacity);
    for part in parts {
        if part.content_type.is_empty() || part.content_type.contains(['\r', '\n']) {
            return Err(EncodingError::InvalidContentType(part.content_type.clone()));
        }
        if find(&part.body, &delimiter).is_some() {
            return Err(EncodingError::BoundaryCollision {
                boundary: boundary.0.clone(),
            });
        }

        out.extend_from_slice(&delimiter);
        out.extend_from_slice(CRLF);
        out.extend_from_slice(b"Content-Type: ");
        out.extend_from_slice(part.content_type.as_bytes());
        out.extend_from_slice(HEADER_END);
        out.extend_from_slice(&part.body);
        out.extend_from_slice(CRLF);
    }
    out.extend_from_slice(&delimiter);
    out.extend_from_slice(CLOSE);
    out.extend_from_slice(CRLF);

    Ok(out)
}

pub fn decode(boundary: &Boundary, body: &[u8]) -> Result<Vec<Part>, DecodeError> {
    let delimiter = boundary.delimiter();
    let mut parts = Vec::new();

    // anything before the first delimiter is preamble
    for (index, segment) in split(body, &delimiter).into_iter().skip(1).enumerate() {
        if segment.starts_with(CLOSE) {
            return Ok(parts);
        }

        let segment = segment.strip_prefix(CRLF).unwrap_or(segment);
        let head_len = find(segment, HEADER_END).ok_or(DecodeError::MalformedPart { index })?;
        let (head, rest) = segment.split_at(head_len);
        let payload = &rest[HEADER_END.len()..];
        let payload = payload.strip_suffix(CRLF).unwrap_or(payload);

        let content_type = header_value(head, "content-type")
            .ok_or(DecodeError::MissingContentType { index })?;
        parts.push(Part::new(content_type, payload.to_vec()));
    }

    Err(DecodeError::Unterminated)
}

fn header_value(head: &[u8], name: &str) -> Option<String> {
    String::from_utf8_lossy(head)
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn split<'a>(body: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut segments = Vec::new();
    let mut rest = body;
    while let Some(at) = find(rest, delimiter) {
        segments.push(&rest[..at]);
        rest = &rest[at + delimiter.len()..];
    }
    segments.push(rest);
    segments
}
