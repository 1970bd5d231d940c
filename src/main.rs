#[macro_use]
extern crate diesel;

pub mod app;
pub mod database;
pub mod schema;

mod auth;
mod routes;
mod services;

use std::io;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use app::{AppState, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let bind = (config.bind_addr.clone(), config.port);

    let app_state = AppState::new(config)
        .map_err(|err| io::Error::new(io::ErrorKind::ConnectionRefused, err.to_string()))?;

    log::info!("Server running on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(app_state.clone()))
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
