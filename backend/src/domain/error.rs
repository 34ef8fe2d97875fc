//! Repository error taxonomy.
//!
//! Domain failures are explicit variants rather than opaque strings so the
//! HTTP adapter can map each one to a status code and envelope message.
//! Nothing here is thrown; callers must handle every case.

/// Failures reported by [`crate::domain::ports::CountryRepository`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No non-deleted row with the requested id.
    #[error("country not found")]
    NotFound,

    /// Delete requested for a row whose flag is already set.
    #[error("country is already deleted")]
    AlreadyDeleted,

    /// Another non-deleted row already holds this name.
    #[error("country name already exists")]
    DuplicateName,

    /// Another non-deleted row already holds this code.
    #[error("country code already exists")]
    DuplicateCode,

    /// A write the repository expected to change a row changed none.
    /// Should not occur under correct usage; kept as a distinct signal so
    /// the anomaly is visible rather than silently swallowed.
    #[error("no rows were affected by the write")]
    NoRowsAffected,

    /// The store could not be reached or a connection checkout failed.
    #[error("database connection error: {message}")]
    Connection { message: String },

    /// The store rejected or failed the query.
    #[error("database query error: {message}")]
    Query { message: String },
}

impl RepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Whether this failure is a name or code collision.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName | Self::DuplicateCode)
    }
}
