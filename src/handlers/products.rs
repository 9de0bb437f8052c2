use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::ProductView;
use crate::errors::AppError;
use crate::state::AppContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub inventory: i32,
    pub is_active: bool,
}

impl From<ProductView> for ProductResponse {
    fn from(p: ProductView) -> Self {
        ProductResponse {
            id: p.id,
            category_id: p.category_id,
            title: p.title,
            slug: p.slug,
            description: p.description,
            price: p.price.to_string(),
            inventory: p.inventory,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListProductsParams {
    /// Case-insensitive title substring filter.
    pub q: Option<String>,
}

/// GET /products
///
/// Active products, optionally filtered by title substring.
#[utoipa::path(
    get,
    path = "/products",
    params(
        ("q" = Option<String>, Query, description = "Title substring filter"),
    ),
    responses(
        (status = 200, description = "List of active products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    ctx: web::Data<AppContext>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let catalog = ctx.catalog.clone();
    let q = query.into_inner().q;

    let products = web::block(move || catalog.list_products(q.as_deref()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductResponse> = products
        .into_iter()
        .filter(|p| p.is_active)
        .map(ProductResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product(
    ctx: web::Data<AppContext>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let catalog = ctx.catalog.clone();
    let id = path.into_inner();

    let product = web::block(move || catalog.find(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match product {
        Some(p) => Ok(HttpResponse::Ok().json(ProductResponse::from(p))),
        None => Err(AppError::NotFound),
    }
}
