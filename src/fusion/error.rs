//! Error types for rank fusion.

/// Failures surfaced by a fusion call. Both variants are input-validation
/// failures; retrying with the same input always fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum FusionError {
    /// The payload is not a sequence of ranked lists, or `k` is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A document has no canonical representation.
    #[error("document cannot be canonically serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FusionError {
    /// Stable machine-readable kind, used in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, FusionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_input() {
        let err = FusionError::InvalidInput("input must be a list of result lists".into());
        assert_eq!(
            err.to_string(),
            "invalid input: input must be a list of result lists"
        );
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn serialization_kind_wraps_serde_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FusionError::from(source);
        assert_eq!(err.kind(), "serialization");
        assert!(
            err.to_string()
                .starts_with("document cannot be canonically serialized:")
        );
    }
}
