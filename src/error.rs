//! Error handling for the track-editor library.
//!
//! Only ingestion and configuration can fail. Editing operations report
//! rejections through [`crate::EditOutcome`] instead of returning errors.

use std::fmt;

/// Error type for track ingestion and editor configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEditError {
    /// A point has a non-finite or out-of-range coordinate
    InvalidCoordinates { index: usize, message: String },
    /// Editor configuration is unusable
    ConfigError { message: String },
    /// Track JSON could not be decoded
    ParseError { message: String },
}

impl fmt::Display for TrackEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackEditError::InvalidCoordinates { index, message } => {
                write!(f, "Point {} has invalid coordinates: {}", index, message)
            }
            TrackEditError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            TrackEditError::ParseError { message } => {
                write!(f, "Track parse error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrackEditError {}

impl From<serde_json::Error> for TrackEditError {
    fn from(err: serde_json::Error) -> Self {
        TrackEditError::ParseError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for track-editor operations.
pub type Result<T> = std::result::Result<T, TrackEditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackEditError::InvalidCoordinates {
            index: 3,
            message: "latitude is NaN".to_string(),
        };
        assert!(err.to_string().contains("Point 3"));
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_parse_error_from_json() {
        let err: TrackEditError = serde_json::from_str::<Vec<f64>>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, TrackEditError::ParseError { .. }));
    }
}
