//! Error types for Aprendiz operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Aprendiz operations.
///
/// Provides detailed context about failures including dimension mismatches,
/// singular matrices, invalid hyperparameters, and unfitted-model use.
///
/// # Examples
///
/// ```
/// use aprendiz::error::AprendizError;
///
/// let err = AprendizError::DimensionMismatch {
///     expected: "100x10".to_string(),
///     actual: "100x5".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum AprendizError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Input that must be non-empty was empty.
    EmptyInput {
        /// What was empty (e.g., "training labels")
        what: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Model used before fit() was called.
    NotFitted {
        /// Model name (e.g., "DecisionTreeClassifier")
        model: String,
    },

    /// Matrix is singular (not positive definite).
    SingularMatrix {
        /// Context where the decomposition failed
        context: String,
    },

    /// A CSV cell could not be parsed as a number.
    CsvParse {
        /// 1-based data row (header excluded)
        row: usize,
        /// Column name
        column: String,
        /// Offending cell content
        value: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AprendizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AprendizError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            AprendizError::EmptyInput { what } => {
                write!(f, "Empty input: {what} must contain at least one element")
            }
            AprendizError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter {param}={value}: must satisfy {constraint}"
                )
            }
            AprendizError::NotFitted { model } => {
                write!(f, "{model} is not fitted: call fit() first")
            }
            AprendizError::SingularMatrix { context } => {
                write!(f, "Singular matrix: {context}")
            }
            AprendizError::CsvParse { row, column, value } => {
                write!(
                    f,
                    "CSV parse error at row {row}, column '{column}': '{value}' is not a number"
                )
            }
            AprendizError::Io(err) => write!(f, "I/O error: {err}"),
            AprendizError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            AprendizError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AprendizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AprendizError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AprendizError {
    fn from(err: std::io::Error) -> Self {
        AprendizError::Io(err)
    }
}

impl From<csv::Error> for AprendizError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => {
                AprendizError::Other(format!("CSV I/O error: {err}"))
            }
            _ => AprendizError::Other(format!("CSV error: {err}")),
        }
    }
}

impl From<&str> for AprendizError {
    fn from(msg: &str) -> Self {
        AprendizError::Other(msg.to_string())
    }
}

impl From<String> for AprendizError {
    fn from(msg: String) -> Self {
        AprendizError::Other(msg)
    }
}

impl AprendizError {
    /// Creates a `DimensionMismatch` from a dimension name and two sizes.
    #[must_use]
    pub fn dimension_mismatch(dim: &str, expected: usize, actual: usize) -> Self {
        AprendizError::DimensionMismatch {
            expected: format!("{dim}={expected}"),
            actual: format!("{dim}={actual}"),
        }
    }

    /// Creates an `EmptyInput` for the named input.
    #[must_use]
    pub fn empty_input(what: &str) -> Self {
        AprendizError::EmptyInput {
            what: what.to_string(),
        }
    }

    /// Creates a `NotFitted` for the named model.
    #[must_use]
    pub fn not_fitted(model: &str) -> Self {
        AprendizError::NotFitted {
            model: model.to_string(),
        }
    }
}

/// Result type alias for Aprendiz operations.
pub type Result<T> = std::result::Result<T, AprendizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = AprendizError::DimensionMismatch {
            expected: "4x2".to_string(),
            actual: "4x3".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dimension mismatch"));
        assert!(msg.contains("4x2"));
        assert!(msg.contains("4x3"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = AprendizError::dimension_mismatch("rows", 100, 50);
        let msg = err.to_string();
        assert!(msg.contains("rows=100"));
        assert!(msg.contains("rows=50"));
    }

    #[test]
    fn test_empty_input_display() {
        let err = AprendizError::empty_input("training labels");
        let msg = err.to_string();
        assert!(msg.contains("Empty input"));
        assert!(msg.contains("training labels"));
    }

    #[test]
    fn test_invalid_hyperparameter_display() {
        let err = AprendizError::InvalidHyperparameter {
            param: "max_depth".to_string(),
            value: "0".to_string(),
            constraint: "max_depth >= 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("max_depth=0"));
        assert!(msg.contains("max_depth >= 1"));
    }

    #[test]
    fn test_not_fitted_display() {
        let err = AprendizError::not_fitted("DecisionTreeClassifier");
        let msg = err.to_string();
        assert!(msg.contains("DecisionTreeClassifier"));
        assert!(msg.contains("fit()"));
    }

    #[test]
    fn test_csv_parse_display() {
        let err = AprendizError::CsvParse {
            row: 3,
            column: "Height".to_string(),
            value: "tall".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("Height"));
        assert!(msg.contains("tall"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: AprendizError = io_err.into();
        assert!(matches!(err, AprendizError::Io(_)));
    }

    #[test]
    fn test_from_str() {
        let err: AprendizError = "something went wrong".into();
        assert!(matches!(err, AprendizError::Other(_)));
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AprendizError::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_other() {
        use std::error::Error;
        let err = AprendizError::Other("test".to_string());
        assert!(err.source().is_none());
    }
}
