use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

use error::ServerError;

fn main() -> Result<(), ServerError> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    // Multi-threaded runtime; worker count from config or the CPU count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), ServerError> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let router = handler::demo::router()?;

    logger::log_server_start(&addr, &cfg);
    for (method, pattern) in router.routes() {
        logger::log_route_registered(method, pattern);
    }

    let state = Arc::new(config::AppState::new(cfg, router));
    server::start_server_loop(listener, state).await;
    Ok(())
}
