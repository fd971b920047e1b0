//! Error types for the stencil compiler front-end

use thiserror::Error;

/// Errors surfaced by any stage of the compilation pipeline.
///
/// Every stage returns the first defect it detects; there is no recovery or
/// best-effort continuation, so a single error aborts the compilation unit
/// that produced it. The crate never terminates the process: presenting
/// errors and choosing exit codes belongs to the driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lexical / syntactic errors
    /// Malformed source text
    ///
    /// **Triggered by:** unknown characters, unterminated comments, malformed
    /// numbers, or token sequences the grammar does not admit
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where the error occurred (1-indexed)
        line: usize,
        /// Column number where the error occurred (1-indexed)
        col: usize,
        /// Error description
        message: String,
    },

    /// Source ended in the middle of a construct
    #[error("Unexpected end of file")]
    UnexpectedEof,

    /// Unexpected token encountered during parsing
    #[error("Unexpected token at line {line}, column {col}: expected {expected}, got {got}")]
    UnexpectedToken {
        /// Expected token description
        expected: String,
        /// Actual token received
        got: String,
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        col: usize,
    },

    // Structural errors
    /// Structurally incomplete stencil
    ///
    /// **Triggered by:** a stencil block without a `Do` method, or a `Do`
    /// method with no vertical regions
    #[error("Malformed AST: {message}")]
    MalformedAst {
        /// Description of the missing structure
        message: String,
    },

    // Semantic validation errors
    /// Two storages in one stencil share a name
    #[error("Duplicate storage '{name}' in stencil '{stencil}'")]
    DuplicateStorage {
        /// Enclosing stencil name
        stencil: String,
        /// The redeclared storage name
        name: String,
    },

    /// A field access names a storage that was never declared
    #[error("Unresolved field '{name}' in stencil '{stencil}'")]
    UnresolvedField {
        /// Enclosing stencil name
        stencil: String,
        /// The unknown identifier
        name: String,
    },

    /// A vertical region interval is inverted or out of range after
    /// resolving its bounds
    #[error("Invalid interval in stencil '{stencil}': [{lower}, {upper}] is not a valid vertical range")]
    InvalidInterval {
        /// Enclosing stencil name
        stencil: String,
        /// Resolved lower level
        lower: i64,
        /// Resolved upper level
        upper: i64,
    },

    /// Two vertical regions in one Do method cover intersecting intervals
    #[error("Overlapping vertical regions in stencil '{stencil}': [{first_lower}, {first_upper}] intersects [{second_lower}, {second_upper}]")]
    OverlappingRegions {
        /// Enclosing stencil name
        stencil: String,
        /// Resolved lower level of the earlier region
        first_lower: i64,
        /// Resolved upper level of the earlier region
        first_upper: i64,
        /// Resolved lower level of the later region
        second_lower: i64,
        /// Resolved upper level of the later region
        second_upper: i64,
    },

    // Serialization-boundary errors
    /// Serialized SIR is truncated, corrupt, or not an SIR document at all
    #[error("Decode error: {message}")]
    Decode {
        /// What failed while decoding
        message: String,
    },

    /// Serialized SIR comes from an incompatible future format version
    #[error("Unsupported SIR format version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Major version found in the document header
        found: u32,
        /// Highest major version this build understands
        supported: u32,
    },

    /// I/O failure on the serializer's sink or the reader's source
    #[error("I/O error: {message}")]
    Io {
        /// The underlying I/O error rendered as text
        message: String,
    },
}

impl Error {
    /// Create a syntax error with a source location
    pub fn syntax(line: usize, col: usize, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create a malformed-AST error with a message
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedAst {
            message: message.into(),
        }
    }

    /// Create a decode error with a message
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

// io::Error is neither Clone nor PartialEq, so carry its rendering instead
// of the error itself.
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for stencilc operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = Error::syntax(3, 7, "unexpected character '#'");
        assert_eq!(
            err.to_string(),
            "Syntax error at line 3, column 7: unexpected character '#'"
        );
    }

    #[test]
    fn test_version_error_display() {
        let err = Error::UnsupportedVersion {
            found: 2,
            supported: 1,
        };
        assert!(err.to_string().contains("version 2"));
        assert!(err.to_string().contains("supported: 1"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "sink closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
