use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;

use companies::auth::Authenticator;
use companies::config::{AppConfig, DEFAULT_CONFIG_PATH};
use companies::db::open_store;
use companies::handlers;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting companies service...");

    // Load configuration
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = AppConfig::load_from_file(&config_path)
        .and_then(AppConfig::from_env_overrides)
        .and_then(|config| config.validate().map(|_| config))
        .unwrap_or_else(|e| {
            log::error!("Failed to load configuration from '{}': {}", config_path, e);
            eprintln!("Hint: Set CONFIG_PATH to the location of config.json");
            std::process::exit(1);
        });

    let authenticator = Authenticator::from_config(&config, bcrypt::DEFAULT_COST)
        .context("failed to initialize authentication")?;
    log::info!(
        "Session lifetime set to {} minutes",
        authenticator.session_lifetime().as_secs() / 60
    );

    // A store that cannot be reached at startup is fatal
    log::info!("Opening company store ({:?})...", config.storage);
    let store = open_store(&config)
        .await
        .context("failed to open company store")?;

    let (host, port) = config.bind_address();
    log::info!("Starting HTTP server at {}:{}...", host, port);

    let authenticator = web::Data::new(authenticator);
    let store = web::Data::from(store);

    HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(authenticator.clone())
            .app_data(store.clone())
            // Middleware
            .wrap(actix_middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {}:{}", host, port))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    Ok(())
}
