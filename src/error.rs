use thiserror::Error;

use crate::ai::GatewayError;
use crate::db::DatabaseError;

/// Errors surfaced at the store boundary. None of them are fatal: callers
/// either show the message or continue with a default/placeholder.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{field} is required")]
    Validation { field: String },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Stored data under '{key}' could not be read: {reason}")]
    Serialization { key: String, reason: String },

    #[error("External service failed: {0}")]
    ExternalService(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

impl StoreError {
    pub(crate) fn required(field: &str) -> Self {
        Self::Validation { field: field.into() }
    }

    pub(crate) fn serialization(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            key: key.into(),
            reason: err.to_string(),
        }
    }

    /// Validation-class errors leave state untouched and are user-fixable.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidField { .. })
    }
}

impl From<GatewayError> for StoreError {
    fn from(err: GatewayError) -> Self {
        StoreError::ExternalService(err.to_string())
    }
}
