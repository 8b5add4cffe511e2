use std::ops::Range;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::ValidationError;

pub const MIN_POSITIVE_TEXT_LEN: usize = 3;
pub const MAX_DIMENSION: u32 = 768;

/// Seeds synthesized for callers that did not pick one.
pub const SEED_RANGE: Range<u64> = 0..10_000;

/// A content-generation request as submitted by a caller.
///
/// Every override is optional; `None` leaves the template default in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub positive_text: Option<String>,
    pub negative_text: Option<String>,
    pub seed: Option<u64>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    #[serde(default)]
    pub wait_for_image: bool,
}

impl GenerationRequest {
    pub fn new(positive_text: impl Into<String>) -> Self {
        Self {
            positive_text: Some(positive_text.into()),
            ..Self::default()
        }
    }

    /// Checks the request bounds and returns the positive text.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let text = self
            .positive_text
            .as_deref()
            .ok_or(ValidationError::MissingPositiveText)?;

        let len = text.chars().count();
        if len < MIN_POSITIVE_TEXT_LEN {
            return Err(ValidationError::PositiveTextTooShort {
                min: MIN_POSITIVE_TEXT_LEN,
                len,
            });
        }

        for (field, value) in [("height", self.height), ("width", self.width)] {
            if let Some(value) = value.filter(|value| *value > MAX_DIMENSION) {
                return Err(ValidationError::DimensionTooLarge {
                    field,
                    max: MAX_DIMENSION,
                    value,
                });
            }
        }

        Ok(text)
    }

    /// Returns the seed to submit, drawing a fresh one when the caller left
    /// it out or sent zero.
    pub fn resolve_seed(&mut self) -> u64 {
        self.resolve_seed_with(&mut rand::rng())
    }

    pub fn resolve_seed_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        match self.seed {
            Some(seed) if seed != 0 => seed,
            _ => {
                let seed = rng.random_range(SEED_RANGE);
                self.seed = Some(seed);
                seed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_missing_positive_text() {
        let request = GenerationRequest::default();
        assert_eq!(request.validate(), Err(ValidationError::MissingPositiveText));
    }

    #[test]
    fn test_short_positive_text() {
        let request = GenerationRequest::new("ok");
        assert_eq!(
            request.validate(),
            Err(ValidationError::PositiveTextTooShort { min: 3, len: 2 })
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // three chars, nine bytes
        let request = GenerationRequest::new("日本語");
        assert_eq!(request.validate(), Ok("日本語"));
    }

    #[test]
    fn test_dimension_bounds() {
        let mut request = GenerationRequest::new("beautiful scenery");
        request.height = Some(999);
        request.width = Some(512);
        assert_eq!(
            request.validate(),
            Err(ValidationError::DimensionTooLarge { field: "height", max: 768, value: 999 })
        );

        request.height = Some(768);
        request.width = Some(769);
        assert!(matches!(
            request.validate(),
            Err(ValidationError::DimensionTooLarge { field: "width", .. })
        ));

        request.width = Some(768);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_explicit_seed_is_kept() {
        let mut request = GenerationRequest::new("a throne made of candy");
        request.seed = Some(42);
        assert_eq!(request.resolve_seed(), 42);
        assert_eq!(request.seed, Some(42));
    }

    #[test]
    fn test_missing_or_zero_seed_is_synthesized() {
        let mut rng = StdRng::seed_from_u64(7);
        for initial in [None, Some(0)] {
            for _ in 0..200 {
                let mut request = GenerationRequest::new("a beach at sunset");
                request.seed = initial;
                let seed = request.resolve_seed_with(&mut rng);
                assert!(SEED_RANGE.contains(&seed));
                assert_eq!(request.seed, Some(seed));
            }
        }
    }

    #[test]
    fn test_deserialize_defaults() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"positive_text": "a beach at sunset"}"#).unwrap();
        assert_eq!(request, GenerationRequest::new("a beach at sunset"));
        assert!(!request.wait_for_image);
    }
}
