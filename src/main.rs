#[macro_use]
extern crate tracing;

mod config;
mod controller;
mod errors;
mod processor;
mod records;
mod routes;
mod storage;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use mimalloc::MiMalloc;
use poem::listener::TcpListener;
use poem::middleware::Tracing;
use poem::{EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use tracing::Level;

use crate::controller::ImageController;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[clap(name = "pinhole", version)]
/// A small image hosting service with automatic thumbnailing and
/// pluggable storage backends.
struct ServerConfig {
    #[clap(long, env, default_value = "127.0.0.1")]
    /// The binding host of the server.
    host: String,

    #[clap(short, long, env, default_value = "8000")]
    /// The binding port of the server.
    port: u16,

    #[clap(long, env, default_value = "info")]
    /// The level tracing logs are emitted at.
    log_level: Level,

    #[clap(short, long, env, default_value = "config.yaml")]
    /// The path to the runtime config file, either YAML or JSON.
    config_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: ServerConfig = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    config::init(&args.config_file).await?;

    let storage = config::config().backend.connect().await?;
    let records = config::config().database.connect().await?;

    let controller = Arc::new(ImageController::new(
        storage,
        records,
        config::config().thumbnail,
        Duration::from_secs(config::config().request_timeout_secs),
    ));

    let api = OpenApiService::new(routes::ImagesApi, "Pinhole API", env!("CARGO_PKG_VERSION"))
        .server(format!("http://{}:{}/v1", args.host, args.port));
    let docs = api.redoc();

    let app = Route::new()
        .nest("/v1", api)
        .nest("/ui", docs)
        .data(controller)
        .with(Tracing);

    info!("serving requests @ http://{}:{}", args.host, args.port);
    Server::new(TcpListener::bind(format!("{}:{}", args.host, args.port)))
        .run(app)
        .await?;

    Ok(())
}
