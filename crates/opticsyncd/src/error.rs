//! Error types for opticsyncd

use thiserror::Error;

/// Telemetry extraction and fusion errors.
///
/// Errors are local per document: a malformed document fails its own
/// extractor, and the caller decides whether to degrade to an empty extract
/// or abort the cycle.
#[derive(Error, Debug)]
pub enum OpticsError {
    /// The whole document failed to parse.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Counter state could not be read or written.
    #[error("State store error: {0}")]
    StateStore(String),

    /// Report or state serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for opticsyncd operations.
pub type Result<T> = std::result::Result<T, OpticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OpticsError::StateStore("directory not writable".to_string());
        assert_eq!(err.to_string(), "State store error: directory not writable");
    }

    #[test]
    fn test_xml_error_conversion() {
        let parse_err = roxmltree::Document::parse("<unclosed").unwrap_err();
        let err: OpticsError = parse_err.into();
        assert!(err.to_string().starts_with("XML parse error"));
    }
}
