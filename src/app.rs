use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment},
    errors::AppError,
    fixtures,
    middleware::RequestLogger,
    repositories::InMemoryKnowledgeRepository,
    routes, services,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> AppResult<()> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

/// Process exit status for a fatal startup error, `None` when serving may simply stop
pub fn exit_code(err: &AppError) -> Option<i32> {
    match err {
        AppError::Server(_) => Some(1),
        AppError::Config(_) => Some(2),
        AppError::Logger(_) => Some(3),
        _ => None,
    }
}

/// Whether `err` can be raised before [`setup_logging`] has run, so `log` output would be lost
pub fn precedes_logger(err: &AppError) -> bool {
    matches!(err, AppError::Config(_) | AppError::Logger(_))
}

// Development accepts any caller, production only serves reads cross-origin
fn cors(environment: &Environment) -> Cors {
    match environment {
        Environment::Production => Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET"])
            .max_age(3600),
        _ => Cors::permissive(),
    }
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    setup_logging(&config)?;

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );
    info!("Share links use base URL {}", config.share.base_url);

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // One store shared by every worker
    let repository = Arc::new(InMemoryKnowledgeRepository::new());
    if config.app.seed_fixtures {
        let seeded = fixtures::seed(repository.as_ref()).await?;
        info!("Seeded {} knowledge articles", seeded);
    }

    let state = web::Data::new(AppState::new(
        config.app.name.clone(),
        config.app.version.clone(),
        config.share.base_url.clone(),
        repository.clone(),
    ));

    let enable_debug_logging = config.app.environment != Environment::Production;

    // Create a cloned config for the closure
    let app_config = config.clone();

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T %{x-request-id}o"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{x-request-id}o"
    };

    HttpServer::new(move || {
        let repository = repository.clone();
        let share_base_url = app_config.share.base_url.clone();

        App::new()
            .app_data(state.clone())
            .configure(move |cfg| services::register(repository, share_base_url, cfg))
            // Inside the access log so the request id is set by the time it logs
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(Logger::new(log_format))
            .wrap(cors(&app_config.app.environment))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
