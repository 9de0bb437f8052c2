pub mod catalog;
pub mod checkout_store;
pub mod memory;
pub mod models;
pub mod sessions;

use crate::domain::errors::DomainError;

// Error conversions (infrastructure concern only)

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
