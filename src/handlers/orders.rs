use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{Customer, OrderView};
use crate::errors::AppError;
use crate::state::AppContext;

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomerResponse {
    Registered { user_id: Uuid },
    Guest { name: String, email: String },
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        match c {
            Customer::Registered(user_id) => CustomerResponse::Registered { user_id },
            Customer::Guest { name, email } => CustomerResponse::Guest { name, email },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShippingResponse {
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub total_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer: CustomerResponse,
    pub shipping: ShippingResponse,
    pub paid: bool,
    pub status: String,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: String,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        let total_amount = order.total_amount().to_string();
        OrderResponse {
            id: order.id,
            customer: CustomerResponse::from(order.customer),
            shipping: ShippingResponse {
                name: order.shipping.name,
                address1: order.shipping.address1,
                address2: order.shipping.address2,
                city: order.shipping.city,
                postal_code: order.shipping.postal_code,
                country: order.shipping.country,
            },
            paid: order.paid,
            status: order.status.as_str().to_string(),
            created_at: order.created_at.to_rfc3339(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    id: item.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price.to_string(),
                    total_price: item.total_price().to_string(),
                })
                .collect(),
            total_amount,
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    ctx: web::Data<AppContext>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let orders = ctx.orders.clone();
    let order_id = path.into_inner();

    let order = web::block(move || orders.find_by_id(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders
///
/// Returns a paginated list of orders (without their items).
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    ctx: web::Data<AppContext>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let orders = ctx.orders.clone();
    let result = web::block(move || orders.list(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
