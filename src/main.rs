use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use shop_service::domain::ports::{OrderStore, ProductCatalog, SessionCarts};
use shop_service::infrastructure::catalog::DieselCatalog;
use shop_service::infrastructure::checkout_store::DieselOrderStore;
use shop_service::infrastructure::sessions::DieselSessions;
use shop_service::replication::{self, SecondaryClient, SecondaryConfig};
use shop_service::{build_server, create_pool, run_migrations, AppContext};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    let catalog: Arc<dyn ProductCatalog> = Arc::new(DieselCatalog::new(pool.clone()));
    let orders: Arc<dyn OrderStore> = Arc::new(DieselOrderStore::new(pool.clone()));
    let sessions: Arc<dyn SessionCarts> = Arc::new(DieselSessions::new(pool));

    let secondary = SecondaryConfig::from_env();
    let client = SecondaryClient::new(&secondary).expect("Failed to build replication client");
    let (sink, worker) = replication::channel(client, catalog.clone());
    actix_web::rt::spawn(worker.run());

    let ctx = AppContext::new(catalog, orders, sessions, Arc::new(sink));

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Replicating orders to {}", secondary.base_url);

    build_server(ctx, &host, port)?.await
}
