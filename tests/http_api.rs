//! End-to-end HTTP flow over the in-memory adapters: browse, fill a cart,
//! check out, and read the order back. The replication worker is deliberately
//! absent so the suite also proves a dead replication pipeline never fails a
//! checkout.

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use shop_service::domain::ports::ProductCatalog;
use shop_service::infrastructure::memory::{InMemorySessions, InMemoryStore};
use shop_service::replication::{channel, SecondaryClient, SecondaryConfig};
use shop_service::{routes, AppContext};

fn inventory_of(store: &InMemoryStore, id: Uuid) -> i32 {
    store
        .find(id)
        .expect("catalog lookup")
        .expect("product exists")
        .inventory
}

fn test_context() -> (Arc<InMemoryStore>, AppContext) {
    let store = Arc::new(InMemoryStore::new());
    let sessions = Arc::new(InMemorySessions::new());

    // Point replication at a dead endpoint and drop the worker entirely:
    // checkout must not care.
    let client = SecondaryClient::new(&SecondaryConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_millis(100),
    })
    .expect("client should build");
    let (sink, worker) = channel(client, store.clone());
    drop(worker);

    let ctx = AppContext::new(store.clone(), store.clone(), sessions, Arc::new(sink));
    (store, ctx)
}

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    let raw = resp.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    Some(Cookie::new(name.trim().to_string(), value.to_string()))
}

fn checkout_body() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "address1": "1 Main St",
        "city": "Manila",
        "postal_code": "1000",
        "country": "Philippines",
    })
}

#[actix_web::test]
async fn full_cart_and_checkout_flow() {
    let (store, ctx) = test_context();
    let product_a = store.seed_product("Django for Beginners", "10.00", 5);
    let product_b = store.seed_product("Rust in Action", "25.00", 5);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx))
            .configure(routes),
    )
    .await;

    // Browse the catalog.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/products").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let products: Value = test::read_body_json(resp).await;
    assert_eq!(products.as_array().unwrap().len(), 2);

    // First cart mutation mints a session cookie.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/items")
            .set_json(json!({"product_id": product_a, "quantity": 2}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let sid = session_cookie(&resp).expect("first response must set the session cookie");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["qty"], 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/items")
            .cookie(sid.clone())
            .set_json(json!({"product_id": product_b, "quantity": 1}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["qty"], 3);

    // Cart detail joins live products and totals in decimal.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/cart").cookie(sid.clone()).to_request(),
    )
    .await;
    let cart: Value = test::read_body_json(resp).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["total_price"], "45.00");
    assert_eq!(cart["total_quantity"], 3);

    // Checkout succeeds even though the replication pipeline is dead.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkout")
            .cookie(sid.clone())
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["total_amount"], "45.00");
    assert_eq!(order["status"], "new");
    assert_eq!(order["paid"], false);
    assert_eq!(order["customer"]["type"], "guest");
    let order_id = order["id"].as_str().unwrap().to_string();

    // Inventory was decremented and the cart is empty.
    assert_eq!(inventory_of(&store, product_a), 3);
    assert_eq!(inventory_of(&store, product_b), 4);
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/cart").cookie(sid.clone()).to_request(),
    )
    .await;
    let cart: Value = test::read_body_json(resp).await;
    assert_eq!(cart["total_quantity"], 0);

    // The order can be read back.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list["total"], 1);

    // A second checkout on the now-empty cart is rejected.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkout")
            .cookie(sid)
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn insufficient_inventory_returns_conflict_and_keeps_the_cart() {
    let (store, ctx) = test_context();
    let product = store.seed_product("Limited", "10.00", 3);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx))
            .configure(routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/items")
            .set_json(json!({"product_id": product, "quantity": 10}))
            .to_request(),
    )
    .await;
    let sid = session_cookie(&resp).expect("session cookie");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkout")
            .cookie(sid.clone())
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["available"], 3);

    // Nothing was committed; the cart is intact for a retry.
    assert_eq!(inventory_of(&store, product), 3);
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/cart").cookie(sid).to_request(),
    )
    .await;
    let cart: Value = test::read_body_json(resp).await;
    assert_eq!(cart["total_quantity"], 10);
}

#[actix_web::test]
async fn adding_an_unknown_product_is_a_404() {
    let (_store, ctx) = test_context();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx))
            .configure(routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/items")
            .set_json(json!({"product_id": Uuid::new_v4(), "quantity": 1}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_replaces_quantity_and_delete_removes_the_line() {
    let (store, ctx) = test_context();
    let product = store.seed_product("Mug", "9.99", 10);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx))
            .configure(routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/items")
            .set_json(json!({"product_id": product, "quantity": 2}))
            .to_request(),
    )
    .await;
    let sid = session_cookie(&resp).expect("session cookie");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/cart/items/{product}"))
            .cookie(sid.clone())
            .set_json(json!({"quantity": 7}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["qty"], 7);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/cart/items/{product}"))
            .cookie(sid)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["qty"], 0);
}

#[actix_web::test]
async fn invalid_shipping_form_reports_fields() {
    let (store, ctx) = test_context();
    let product = store.seed_product("Mug", "9.99", 10);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ctx))
            .configure(routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/items")
            .set_json(json!({"product_id": product, "quantity": 1}))
            .to_request(),
    )
    .await;
    let sid = session_cookie(&resp).expect("session cookie");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkout")
            .cookie(sid)
            .set_json(json!({
                "name": "",
                "email": "not-an-email",
                "address1": "1 Main St",
                "city": "Manila",
                "postal_code": "1000",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"].get("name").is_some());
    assert!(body["fields"].get("email").is_some());
}
