use actix_web::HttpResponse;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::{DomainError, FieldError};

#[derive(Debug, Error)]
pub enum AppError {
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

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::EmptyCart => AppError::EmptyCart,
            DomainError::InsufficientInventory {
                product_id,
                title,
                available,
            } => AppError::InsufficientInventory {
                product_id,
                title,
                available,
            },
            DomainError::Validation(fields) => AppError::Validation(fields),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::EmptyCart | AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::InsufficientInventory {
                product_id,
                available,
                ..
            } => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string(),
                "product_id": product_id,
                "available": available,
            })),
            AppError::Validation(fields) => {
                let details: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|f| (f.field.clone(), f.message.clone().into()))
                    .collect();
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": self.to_string(),
                    "fields": details,
                }))
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn not_found_returns_404() {
        assert_eq!(AppError::NotFound.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn empty_cart_returns_400() {
        assert_eq!(
            AppError::EmptyCart.error_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn insufficient_inventory_returns_409() {
        let err = AppError::InsufficientInventory {
            product_id: Uuid::new_v4(),
            title: "Mug".to_string(),
            available: 2,
        };
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Insufficient inventory for Mug. Available: 2");
    }

    #[test]
    fn validation_returns_400() {
        let err = AppError::Validation(vec![FieldError::new("name", "This field is required")]);
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_returns_500_and_hides_details() {
        let err = AppError::Internal("connection refused".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_map_onto_app_errors() {
        assert!(matches!(
            AppError::from(DomainError::NotFound),
            AppError::NotFound
        ));
        assert!(matches!(
            AppError::from(DomainError::EmptyCart),
            AppError::EmptyCart
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidInput("q".to_string())),
            AppError::BadRequest(_)
        ));
    }
}
