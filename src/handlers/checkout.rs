use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::checkout::CheckoutForm;
use crate::errors::AppError;
use crate::state::AppContext;

use super::orders::OrderResponse;
use super::{json_with_session, session_id};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub name: String,
    /// Required for guest checkout.
    #[serde(default)]
    pub email: String,
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Philippines".to_string()
}

impl From<CheckoutRequest> for CheckoutForm {
    fn from(req: CheckoutRequest) -> Self {
        CheckoutForm {
            name: req.name,
            email: req.email,
            address1: req.address1,
            address2: req.address2,
            city: req.city,
            postal_code: req.postal_code,
            country: req.country,
        }
    }
}

/// POST /checkout
///
/// Converts the session's cart into a persisted order, decrementing inventory
/// atomically. On success the cart is empty and the order is queued for
/// replication to the secondary record-keeping service.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty cart or invalid shipping data"),
        (status = 409, description = "Insufficient inventory"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn checkout(
    ctx: web::Data<AppContext>,
    req: HttpRequest,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let sid = session_id(&req);
    let service = ctx.checkout.clone();
    let session = sid.value.clone();
    let form = CheckoutForm::from(body.into_inner());

    // The HTTP surface has no authentication layer; orders placed here are
    // guest orders. Registered-customer checkout goes through the same
    // service with a user id.
    let order = web::block(move || service.checkout(&session, None, &form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(json_with_session(
        &sid,
        StatusCode::CREATED,
        &OrderResponse::from(order),
    ))
}
