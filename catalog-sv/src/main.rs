extern crate env_logger;
extern crate log;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware};
use actix_web::web::Data;
use log::info;

use crate::config::Settings;
use crate::core::messages::Messages;
use crate::core::store::CatalogStore;
use crate::db::PgCatalog;

mod api;
mod config;
mod core;
mod db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG",
      format!("{}actix_web=debug", std::env::var("RUST_LOG")
          .map_or_else(|_| "info,".to_string(), |ll| format!("{},", ll))
      ));
    env_logger::init();

    let settings = Settings::from_env().expect("invalid configuration");

    let messages = Data::new(match &settings.messages_file {
        Some(path) => Messages::load(path)
            .unwrap_or_else(|e| panic!("couldn't load messages from {:?}: {}", path, e)),
        None => Messages::default(),
    });

    let pg_pool = db::connect(&settings.database_url, settings.pool_max_size)
        .expect("Failed to create pool.");
    let store: Arc<dyn CatalogStore> = Arc::new(PgCatalog::new(pg_pool));
    let store = Data::from(store);

    info!("Starting server at: {}", &settings.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(messages.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&settings.bind)?
    .run()
    .await
}
