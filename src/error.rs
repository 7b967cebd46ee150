use std::fmt;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("configuration error: {0}")]
    Config(String),
    /// Input rejected locally; no request was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
    #[error("failed to encode request: {0}")]
    Encode(#[source] BoxError),
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TrackingError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport(err.into())
    }

    pub fn encode<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Encode(err.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All rule failures for one value, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any rule failed for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_fields() {
        let errors = ValidationErrors::new(vec![
            FieldError {
                field: "tracking_number",
                message: "must not be empty".to_string(),
            },
            FieldError {
                field: "courier_code",
                message: "must not be empty".to_string(),
            },
        ]);
        assert_eq!(
            errors.to_string(),
            "tracking_number: must not be empty; courier_code: must not be empty"
        );

        let err = TrackingError::from(errors);
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("validation failed: tracking_number"));
    }

    #[test]
    fn test_transport_wraps_source() {
        let err = TrackingError::transport("connection refused");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
