use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use server::config::ServerConfig;
use server::handlers;
use server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = ServerConfig::load()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let srv_tx = spawn_server(config.grace_window());
    let listen_addr = config.listen_addr();
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Listening on {}", listen_addr);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(web::Data::new(srv_tx.clone()))
            .wrap(cors)
            .configure(handlers::root)
    })
    .bind(listen_addr)?
    .run()
    .await
}
