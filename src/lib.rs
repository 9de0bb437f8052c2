pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod replication;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;

pub use db::{create_pool, DbPool};
pub use state::AppContext;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::cart::get_cart,
        handlers::cart::add_cart_item,
        handlers::cart::update_cart_item,
        handlers::cart::remove_cart_item,
        handlers::checkout::checkout,
        handlers::orders::get_order,
        handlers::orders::list_orders,
    ),
    components(schemas(
        handlers::products::ProductResponse,
        handlers::cart::AddCartItemRequest,
        handlers::cart::UpdateCartItemRequest,
        handlers::cart::CartQtyResponse,
        handlers::cart::CartLineResponse,
        handlers::cart::CartResponse,
        handlers::checkout::CheckoutRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::CustomerResponse,
        handlers::orders::ShippingResponse,
        handlers::orders::ListOrdersResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

/// Route table, shared between the real server and the HTTP tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/products", web::get().to(handlers::products::list_products))
        .route("/products/{id}", web::get().to(handlers::products::get_product))
        .route("/cart", web::get().to(handlers::cart::get_cart))
        .route("/cart/items", web::post().to(handlers::cart::add_cart_item))
        .route(
            "/cart/items/{product_id}",
            web::put().to(handlers::cart::update_cart_item),
        )
        .route(
            "/cart/items/{product_id}",
            web::delete().to(handlers::cart::remove_cart_item),
        )
        .route("/checkout", web::post().to(handlers::checkout::checkout))
        .route("/orders", web::get().to(handlers::orders::list_orders))
        .route("/orders/{id}", web::get().to(handlers::orders::get_order))
        .route("/api-docs/openapi.json", web::get().to(openapi_json));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server.
pub fn build_server(
    ctx: AppContext,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let data = web::Data::new(ctx);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind((host.to_string(), port))?
    .run())
}
