use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use std::process;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use sketchbook::config;
use sketchbook::http::controllers;
use sketchbook::App;

#[derive(Debug, Error)]
#[error("Failed to start the server")]
struct StartServerError;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:?}");
        process::exit(1);
    }
}

fn run() -> Result<(), StartServerError> {
    let config = config::Server::load().change_context(StartServerError)?;
    sketchbook::telemetry::init(&config.logging).change_context(StartServerError)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers.get())
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: config::Server) -> Result<(), StartServerError> {
    let address = (config.ip, config.port);
    let workers = config.workers.get();
    let app = App::new(config).await.change_context(StartServerError)?;

    tracing::info!("listening on {}:{}", address.0, address.1);
    HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::default())
            .configure(controllers::configure)
    })
    .workers(workers)
    .bind(address)
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?
    .run()
    .await
    .change_context(StartServerError)
}
