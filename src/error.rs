//! Error types for face normalization

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Unknown landmark type: {0}")]
    UnknownLandmark(i32),

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    #[error("Unknown field in serialized face: `{0}` is neither a face field nor a landmark name")]
    UnknownField(String),

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_display() {
        let err = TransformError::UnknownLandmark(12);
        assert!(err.to_string().contains("Unknown landmark"));
        assert!(err.to_string().contains("12"));

        let err = TransformError::InvalidTransform("scale must be positive".to_string());
        assert!(err.to_string().contains("Invalid transform"));
    }

    #[test]
    fn test_transform_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TransformError = serde_err.into();
        match err {
            TransformError::Payload(_) => {}
            _ => panic!("Expected Payload error"),
        }
    }
}
