use thiserror::Error;
use uuid::Uuid;

/// One invalid shipping-form field, surfaced field-by-field to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found")]
    NotFound,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Insufficient inventory for {title}. Available: {available}")]
    InsufficientInventory {
        product_id: Uuid,
        title: String,
        available: i32,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Internal error: {0}")]
    Internal(String),
}
