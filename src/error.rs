//! Error types for the crop yield collection service
//!
//! Two failure domains exist: a submission that does not satisfy the record
//! schema, and a storage operation that could not reach or write the
//! document store. The HTTP status mapping lives in the handler layer so
//! these types stay transport-free.

use thiserror::Error;

/// A submission rejected before any storage access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are absent or empty
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
}

impl ValidationError {
    /// Names of the fields that failed validation
    pub fn fields(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingFields { fields } => fields,
        }
    }
}

/// A failure communicating with or writing to the document store
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store could not be reached at startup
    #[error("connection failed: {0}")]
    Connection(String),

    /// An insert was rejected or lost
    #[error("write failed: {0}")]
    Write(String),

    /// A read query failed
    #[error("query failed: {0}")]
    Query(String),

    /// The store is temporarily unavailable
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        StorageError::Connection(msg.into())
    }

    /// Create a write error
    pub fn write(msg: impl Into<String>) -> Self {
        StorageError::Write(msg.into())
    }

    /// Create a query error
    pub fn query(msg: impl Into<String>) -> Self {
        StorageError::Query(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingFields {
            fields: vec!["cropName", "location"],
        };
        assert_eq!(err.to_string(), "missing required fields: cropName, location");
    }

    #[test]
    fn test_validation_error_fields() {
        let err = ValidationError::MissingFields {
            fields: vec!["yieldAmount"],
        };
        assert_eq!(err.fields(), &["yieldAmount"]);
    }

    #[test]
    fn test_storage_error_constructors() {
        assert!(matches!(
            StorageError::connection("refused"),
            StorageError::Connection(_)
        ));
        assert!(matches!(StorageError::write("lost"), StorageError::Write(_)));
        assert!(matches!(StorageError::query("bad"), StorageError::Query(_)));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Unavailable("simulated outage".to_string());
        assert_eq!(err.to_string(), "store unavailable: simulated outage");
    }
}
