use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use std::sync::Arc;
use surplus_matcher::config::{AuditBackend, EstimatorProvider, Settings};
use surplus_matcher::core::Matcher;
use surplus_matcher::routes::{self, AppState};
use surplus_matcher::services::{AuditLog, CatalogStore, CsvAuditLog, PostgresAuditLog, QuantityEstimator, RemoteEstimator};
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_estimator(settings: &Settings) -> std::io::Result<Arc<dyn QuantityEstimator>> {
    match settings.estimator.provider {
        EstimatorProvider::Linear => {
            info!("Using linear quantity estimator");
            Ok(Arc::new(settings.estimator.linear.clone()))
        }
        EstimatorProvider::Remote => {
            let endpoint = settings.estimator.endpoint.clone().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "estimator.endpoint is required for the remote provider")
            })?;
            let remote = RemoteEstimator::new(endpoint.as_str(), settings.estimator.timeout_secs)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            info!("Using remote quantity estimator at {}", endpoint);
            Ok(Arc::new(remote))
        }
    }
}

async fn build_audit_log(settings: &Settings) -> std::io::Result<Option<Arc<dyn AuditLog>>> {
    match settings.audit.backend {
        AuditBackend::Disabled => {
            warn!("Audit logging disabled");
            Ok(None)
        }
        AuditBackend::Csv => {
            info!("Appending match history to {}", settings.audit.csv_path);
            Ok(Some(Arc::new(CsvAuditLog::new(settings.audit.csv_path.as_str()))))
        }
        AuditBackend::Postgres => {
            let url = settings.audit.database_url.as_deref().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "audit.database_url is required for the postgres backend")
            })?;
            let log = PostgresAuditLog::new(
                url,
                settings.audit.max_connections.unwrap_or(5),
                settings.audit.min_connections.unwrap_or(1),
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;
            info!("PostgreSQL match history initialized");
            Ok(Some(Arc::new(log)))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_logging();

    info!("Starting surplus matching service...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    let catalog = Arc::new(CatalogStore::new(settings.catalog.path.as_str(), settings.catalog.ttl_secs));

    // Warm the cache; a bad file is reported but the service still starts
    match catalog.snapshot().await {
        Ok(snapshot) => info!(
            "Catalog ready: {} candidates ({} rows rejected)",
            snapshot.candidates.len(),
            snapshot.rejected.len()
        ),
        Err(e) => error!("Catalog not loaded at startup: {}", e),
    }

    let estimator = build_estimator(&settings)?;
    let audit = build_audit_log(&settings).await?;

    let policy = settings.matching.policy();
    let matcher = Matcher::new(policy);

    info!("Matcher initialized with policy: {:?}", policy);

    let app_state = AppState {
        catalog,
        matcher,
        estimator,
        audit,
        default_kitchen: settings.kitchen.profile(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
