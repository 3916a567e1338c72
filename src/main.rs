use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use shortcoder::api::middleware::RequestIdMiddleware;
use shortcoder::api::{ShortcodeController, server};
use shortcoder::cli::Cli;
use shortcoder::config::{StaticConfig, get_config, init_config_from, update_config};
use shortcoder::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(path) = cli.generate_config.as_deref() {
        std::fs::write(path, StaticConfig::generate_sample_config())
            .with_context(|| format!("Failed to write sample config to {}", path))?;
        println!("Sample configuration written to {}", path);
        return Ok(());
    }

    init_config_from(&cli.config);
    let mut config = (*get_config()).clone();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    update_config(config.clone());

    let _guard = init_logging(&config.logging);

    let controller = match ShortcodeController::from_config(&config) {
        Ok(controller) => Arc::new(controller),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);
    info!(
        "Short links under {}, API under {}",
        config.service.service_base_url, config.service.api_base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .app_data(web::Data::new(controller.clone()))
            .configure(server::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
