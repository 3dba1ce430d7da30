//! Errors raised by the portal services

use std::fmt;

use arogya_common::{domain_status, AppError};
use arogya_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected failure; the message is logged, never shown to clients
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status and stable error code
    fn classify(&self) -> (u16, &'static str) {
        match self {
            Self::Domain(e) => (domain_status(e), e.code()),
            Self::App(e) => (e.status_code(), e.error_code()),
            Self::NotFound { .. } => (404, "NOT_FOUND"),
            Self::Validation(_) => (400, "VALIDATION_ERROR"),
            Self::Conflict(_) => (409, "CONFLICT"),
            Self::Internal(_) => (500, "INTERNAL_ERROR"),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.classify().0
    }

    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => Self::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => Self::NotFound(format!("{resource} {id}")),
            ServiceError::Validation(msg) => Self::Validation(msg),
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::Internal(msg) => Self::Internal(anyhow::anyhow!(msg)),
        }
    }
}
