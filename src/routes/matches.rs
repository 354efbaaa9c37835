use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{resolve_shortlist_size, Matcher};
use crate::models::{
    AuditRecord, CatalogResponse, ErrorResponse, EstimateRequest, EstimateResponse, FindMatchesRequest,
    FindMatchesResponse, HealthResponse, HistoryQuery, HistoryResponse, KitchenInput, KitchenProfile,
    MatchRequest, Position, WasteFeatures,
};
use crate::services::{outreach, AuditLog, CatalogStore, QuantityEstimator};
use std::sync::Arc;

/// Hard cap on history page size
const MAX_HISTORY_LIMIT: usize = 500;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub matcher: Matcher,
    pub estimator: Arc<dyn QuantityEstimator>,
    pub audit: Option<Arc<dyn AuditLog>>,
    pub default_kitchen: KitchenProfile,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/estimate", web::post().to(estimate))
        .route("/catalog", web::get().to(get_catalog))
        .route("/catalog/reload", web::post().to(reload_catalog))
        .route("/history", web::get().to(get_history));
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

/// Fill missing kitchen fields from the configured defaults
fn resolve_kitchen(input: &KitchenInput, defaults: &KitchenProfile) -> KitchenProfile {
    KitchenProfile {
        name: input.name.clone().unwrap_or_else(|| defaults.name.clone()),
        contact: input.contact.clone().unwrap_or_else(|| defaults.contact.clone()),
        position: Position::new(
            input.latitude.unwrap_or(defaults.position.latitude),
            input.longitude.unwrap_or(defaults.position.longitude),
        ),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_size = state.catalog.cached().await.map(|s| s.candidates.len());

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size,
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "kitchen": {"name": "string", "contact": "string", "latitude": 13.01, "longitude": 80.23},
///   "requiredCapacityKg": 10,
///   "features": {"mealsPrepared": 120, "guestsServed": 90, "cuisine": "string", "timeOfDay": "string"},
///   "foodType": "Vegetarian",
///   "shortlistSize": 3
/// }
/// ```
/// Exactly one of `requiredCapacityKg` and `features` must be present.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let kitchen = resolve_kitchen(&req.kitchen, &state.default_kitchen);

    let required_capacity_kg = match (req.required_capacity_kg, req.features) {
        (Some(kg), None) => kg,
        (None, Some(features)) => {
            let features = WasteFeatures::from(features);
            match state.estimator.estimate(&features).await {
                Ok(kg) => {
                    tracing::debug!("Estimated {} kg for {}", kg, kitchen.name);
                    kg
                }
                Err(e) => {
                    tracing::error!("Quantity estimation failed for {}: {}", kitchen.name, e);
                    return error_response(StatusCode::BAD_GATEWAY, "Estimation failed", e.to_string());
                }
            }
        }
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request",
                "Provide exactly one of requiredCapacityKg or features",
            );
        }
    };

    let shortlist_size = match resolve_shortlist_size(req.shortlist_size, state.matcher.policy().shortlist_size) {
        Ok(size) => size,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "Invalid request", e.to_string()),
    };

    let snapshot = match state.catalog.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Failed to load NGO catalog: {}", e);
            return error_response(StatusCode::SERVICE_UNAVAILABLE, "Catalog unavailable", e.to_string());
        }
    };

    let request = MatchRequest::new(kitchen.position, required_capacity_kg, req.food_type);

    let shortlist = match state.matcher.find_matches(&request, &snapshot.candidates, shortlist_size) {
        Ok(shortlist) => shortlist,
        Err(e) => {
            tracing::info!("Rejected match request from {}: {}", kitchen.name, e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request", e.to_string());
        }
    };

    if let Some(audit) = &state.audit {
        let record = AuditRecord::from_match(&kitchen, &request, &shortlist);
        if let Err(e) = audit.append(&record).await {
            tracing::warn!("Match completed but audit append failed: {}", e);
        }
    }

    let response = FindMatchesResponse {
        status: if shortlist.is_empty() { "no matches" } else { "matched" }.to_string(),
        required_capacity_kg,
        matches: outreach::list_items(&kitchen, &shortlist),
        markers: outreach::map_markers(&kitchen, &shortlist),
        outreach: outreach::build_outreach(&kitchen, required_capacity_kg, &shortlist),
        total_candidates: shortlist.total_candidates,
        eligible_candidates: shortlist.eligible_candidates,
        rejected_rows: snapshot.rejected.len(),
    };

    tracing::info!(
        "Returning {} matches for {} ({} kg {}, {} eligible of {})",
        response.matches.len(),
        kitchen.name,
        required_capacity_kg,
        request.food_type,
        shortlist.eligible_candidates,
        shortlist.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Quantity estimate endpoint
///
/// POST /api/v1/estimate
async fn estimate(
    state: web::Data<AppState>,
    req: web::Json<EstimateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let features = WasteFeatures::from(req.into_inner().features);
    match state.estimator.estimate(&features).await {
        Ok(predicted_kg) => HttpResponse::Ok().json(EstimateResponse { predicted_kg }),
        Err(e) => {
            tracing::error!("Quantity estimation failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "Estimation failed", e.to_string())
        }
    }
}

fn catalog_response(snapshot: &crate::services::CatalogSnapshot) -> CatalogResponse {
    CatalogResponse {
        source: snapshot.source.clone(),
        candidate_count: snapshot.candidates.len(),
        rejected: snapshot.rejected.clone(),
        loaded_at: snapshot.loaded_at,
    }
}

/// Catalog summary, including rows rejected at load time
///
/// GET /api/v1/catalog
async fn get_catalog(state: web::Data<AppState>) -> impl Responder {
    match state.catalog.snapshot().await {
        Ok(snapshot) => HttpResponse::Ok().json(catalog_response(&snapshot)),
        Err(e) => {
            tracing::error!("Failed to load NGO catalog: {}", e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Catalog unavailable", e.to_string())
        }
    }
}

/// Drop the cached catalog and load it again
///
/// POST /api/v1/catalog/reload
async fn reload_catalog(state: web::Data<AppState>) -> impl Responder {
    match state.catalog.reload().await {
        Ok(snapshot) => {
            tracing::info!(
                "Catalog reloaded: {} candidates, {} rejected",
                snapshot.candidates.len(),
                snapshot.rejected.len()
            );
            HttpResponse::Ok().json(catalog_response(&snapshot))
        }
        Err(e) => {
            tracing::error!("Failed to reload NGO catalog: {}", e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Catalog unavailable", e.to_string())
        }
    }
}

/// Recent match history
///
/// GET /api/v1/history?limit={limit}
async fn get_history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    let Some(audit) = &state.audit else {
        return error_response(StatusCode::NOT_FOUND, "History disabled", "Audit logging is disabled");
    };

    let limit = query.limit.min(MAX_HISTORY_LIMIT);
    match audit.recent(limit).await {
        Ok(records) => HttpResponse::Ok().json(HistoryResponse { records }),
        Err(e) => {
            tracing::error!("Failed to read match history: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read history", e.to_string())
        }
    }
}
