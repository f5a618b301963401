use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use attache_search::config::{LoggingSettings, Settings, SourceKind};
use attache_search::core::{FilterInterpreter, MatchEngine, QueryPipeline};
use attache_search::routes::{self, AppState};
use attache_search::services::{AirtableClient, FileSource, OpenAiClient, PlaceSource};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

fn build_source(settings: &Settings) -> std::io::Result<Arc<dyn PlaceSource>> {
    match settings.dataset.source {
        SourceKind::Airtable => {
            let airtable = &settings.airtable;
            if airtable.base_id.is_empty() {
                return Err(startup_error("Airtable source selected", "airtable.base_id is not set"));
            }
            let client = AirtableClient::new(
                airtable.endpoint.clone(),
                airtable.token.clone(),
                airtable.base_id.clone(),
                airtable.table_name.clone(),
                airtable.timeout_secs,
                airtable.max_pages,
            )
            .map_err(|e| startup_error("Failed to create Airtable client", e))?;

            info!("Airtable source initialized (table: {})", airtable.table_name);
            Ok(Arc::new(client))
        }
        SourceKind::File => {
            let path = settings
                .dataset
                .path
                .clone()
                .ok_or_else(|| startup_error("File source selected", "dataset.path is not set"))?;

            info!("File source initialized ({})", path.display());
            Ok(Arc::new(FileSource::new(path)))
        }
    }
}

fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let logging = settings.as_ref().map(|s| s.logging.clone()).unwrap_or_default();
    init_logging(&logging);

    info!("Starting Attaché search service...");

    let settings = settings.map_err(|e| startup_error("Failed to load configuration", e))?;

    info!("Configuration loaded successfully");

    if settings.openai.api_key.is_empty() {
        error!("openai.api_key is empty; free-text queries will fail until it is set");
    }

    let oracle = OpenAiClient::new(
        settings.openai.endpoint.clone(),
        settings.openai.api_key.clone(),
        settings.openai.model.clone(),
        settings.openai.temperature,
        settings.openai.timeout_secs,
    )
    .map_err(|e| startup_error("Failed to create oracle client", e))?;

    info!("Oracle client initialized (model: {})", settings.openai.model);

    let source = build_source(&settings)?;

    let engine = MatchEngine::new(settings.matching.city_mode);

    info!("Match engine initialized with city mode: {:?}", engine.city_mode());

    let app_state = AppState {
        pipeline: QueryPipeline::new(FilterInterpreter::new(Arc::new(oracle)), source, engine),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
