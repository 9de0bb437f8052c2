use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::cart_service::CartDetail;
use crate::errors::AppError;
use crate::state::AppContext;

use super::{json_with_session, session_id};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartQtyResponse {
    /// Total quantity across all cart entries.
    pub qty: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: Uuid,
    pub title: String,
    /// Price snapshot from when the item was added, as a decimal string.
    pub price: String,
    pub quantity: i32,
    pub total_price: String,
    /// The product's current available stock.
    pub inventory: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub total_price: String,
    pub total_quantity: i64,
}

impl From<CartDetail> for CartResponse {
    fn from(detail: CartDetail) -> Self {
        CartResponse {
            items: detail
                .lines
                .into_iter()
                .map(|line| CartLineResponse {
                    product_id: line.product.id,
                    title: line.product.title.clone(),
                    price: line.price.to_string(),
                    quantity: line.quantity,
                    total_price: line.total_price.to_string(),
                    inventory: line.product.inventory,
                })
                .collect(),
            total_price: detail.total_price.to_string(),
            total_quantity: detail.total_quantity,
        }
    }
}

/// GET /cart
///
/// The session's cart joined with live products.
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart contents", body = CartResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    ctx: web::Data<AppContext>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let sid = session_id(&req);
    let carts = ctx.carts.clone();
    let session = sid.value.clone();

    let detail = web::block(move || carts.detail(&session))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(json_with_session(
        &sid,
        StatusCode::OK,
        &CartResponse::from(detail),
    ))
}

/// POST /cart/items
///
/// Add a quantity of a product to the cart (increments an existing entry).
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartQtyResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn add_cart_item(
    ctx: web::Data<AppContext>,
    req: HttpRequest,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let sid = session_id(&req);
    let carts = ctx.carts.clone();
    let session = sid.value.clone();
    let body = body.into_inner();

    let cart = web::block(move || carts.add(&session, body.product_id, body.quantity, false))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(json_with_session(
        &sid,
        StatusCode::OK,
        &CartQtyResponse { qty: cart.len() },
    ))
}

/// PUT /cart/items/{product_id}
///
/// Set an entry's quantity, replacing the current value.
#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartQtyResponse),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    ctx: web::Data<AppContext>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let sid = session_id(&req);
    let carts = ctx.carts.clone();
    let session = sid.value.clone();
    let product_id = path.into_inner();
    let quantity = body.into_inner().quantity;

    let cart = web::block(move || carts.add(&session, product_id, quantity, true))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(json_with_session(
        &sid,
        StatusCode::OK,
        &CartQtyResponse { qty: cart.len() },
    ))
}

/// DELETE /cart/items/{product_id}
///
/// Remove an entry. Removing an absent entry is a no-op, not an error.
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Item removed", body = CartQtyResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn remove_cart_item(
    ctx: web::Data<AppContext>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let sid = session_id(&req);
    let carts = ctx.carts.clone();
    let session = sid.value.clone();
    let product_id = path.into_inner();

    let cart = web::block(move || carts.remove(&session, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(json_with_session(
        &sid,
        StatusCode::OK,
        &CartQtyResponse { qty: cart.len() },
    ))
}
