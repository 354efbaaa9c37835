use serde::{Deserialize, Serialize};
use crate::models::domain::{AuditRecord, MalformedCandidateError, MapMarker};

/// One shortlisted NGO as rendered in the recommendation list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchItem {
    pub rank: usize,
    pub name: String,
    pub area: String,
    #[serde(rename = "capacityKg")]
    pub capacity_kg: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    /// Two-decimal distance for display
    #[serde(rename = "distanceLabel")]
    pub distance_label: String,
    pub contact: String,
    #[serde(rename = "acceptedFoodTypes")]
    pub accepted_food_types: String,
    #[serde(rename = "routeUrl")]
    pub route_url: String,
}

/// Outreach message and messaging deep-link for the top candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outreach {
    pub message: String,
    #[serde(rename = "deepLink")]
    pub deep_link: String,
}

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    /// "matched" or "no matches"
    pub status: String,
    #[serde(rename = "requiredCapacityKg")]
    pub required_capacity_kg: f64,
    pub matches: Vec<MatchItem>,
    pub markers: Vec<MapMarker>,
    pub outreach: Option<Outreach>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "eligibleCandidates")]
    pub eligible_candidates: usize,
    #[serde(rename = "rejectedRows")]
    pub rejected_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    #[serde(rename = "predictedKg")]
    pub predicted_kg: f64,
}

/// Catalog summary including rows skipped at load time
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub source: String,
    #[serde(rename = "candidateCount")]
    pub candidate_count: usize,
    pub rejected: Vec<MalformedCandidateError>,
    #[serde(rename = "loadedAt")]
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub records: Vec<AuditRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "catalogSize")]
    pub catalog_size: Option<usize>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
