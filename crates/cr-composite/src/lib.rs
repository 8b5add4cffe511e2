//! Single-body responses carrying a JSON part and a binary part.
//!
//! The framing is `multipart/mixed`: each part opens with `--{boundary}`,
//! declares its `Content-Type`, and the body closes with `--{boundary}--`.
//! Part payloads are written verbatim, so a payload must never contain the
//! delimiter. [`Boundary::choose`] picks one that does not collide.

pub mod error;
pub mod mixed;
pub mod response;

pub use error::{DecodeError, EncodingError};
pub use mixed::{Boundary, Part};
pub use response::{CompositeResponse, EncodedBody};
