use std::fmt;

/// Error kinds for categorizing snippet failures.
///
/// Malformed markup is never an error (the parser repairs it); errors here
/// are contract violations or serializer plumbing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetErrorKind {
    /// The marker element is absent from the tree (serialize before load)
    MarkerMissing,
    /// The underlying serializer reported a write failure
    Serializer,
    /// Serializer output could not be interpreted as UTF-8
    Encoding,
}

/// An error produced while serializing a snippet document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetError {
    /// Human-readable error message
    pub message: String,
    /// Error categorization
    pub kind: SnippetErrorKind,
}

impl SnippetError {
    /// Create a new snippet error.
    pub fn new(message: impl Into<String>, kind: SnippetErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Create an error for a missing marker element.
    pub fn marker_missing(marker: &str) -> Self {
        Self {
            message: format!(
                "marker element with id '{}' not found; load a fragment before serializing",
                marker
            ),
            kind: SnippetErrorKind::MarkerMissing,
        }
    }

    /// Create an error for a serializer write failure.
    pub fn serializer(detail: impl fmt::Display) -> Self {
        Self {
            message: format!("serializer failure: {}", detail),
            kind: SnippetErrorKind::Serializer,
        }
    }

    /// Create an error for serializer output that is not valid UTF-8.
    pub fn encoding(detail: impl fmt::Display) -> Self {
        Self {
            message: format!("serializer produced invalid UTF-8: {}", detail),
            kind: SnippetErrorKind::Encoding,
        }
    }
}

impl fmt::Display for SnippetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SnippetError {}
