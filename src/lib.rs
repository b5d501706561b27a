#[macro_use]
extern crate diesel;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
pub mod auth;
pub mod csrf;
pub mod db;
pub mod error;
pub mod extractors;
pub mod models;
pub mod policy;
pub mod routes;
pub mod schema;
pub mod uploads;

pub async fn run() -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "carnet=debug,actix_web=info");
    }
    env_logger::init();
    let pool = db::create_connection_pool();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8088".to_owned());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::new().max_age(3600).finish())
            .data(pool.clone())
            .service(routes::home::home)
            .service(routes::home::search)
            .service(routes::articles::show)
            .service(routes::articles::new_form)
            .service(routes::articles::create)
            .service(routes::articles::edit_form)
            .service(routes::articles::edit)
            .service(routes::articles::delete)
            .service(routes::articles::toggle_publish)
            .service(routes::articles::like)
            .service(routes::articles::dashboard)
            .service(routes::comments::post_comment)
            .service(routes::comments::delete_comment)
            .service(routes::auth::register_form)
            .service(routes::auth::register)
            .service(routes::auth::login_form)
            .service(routes::auth::login)
            .service(routes::auth::logout)
    })
    .bind(bind_addr)?
    .run()
    .await
}
