use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel accepted-type value meaning "accepts any food type"
pub const FOOD_TYPE_BOTH: &str = "both";

/// Geographic position in decimal degrees (WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both coordinates are finite and inside the WGS-84 ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Recipient organization (NGO) record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub area: String,
    #[serde(rename = "capacityKg")]
    pub capacity_kg: f64,
    pub position: Position,
    pub contact: String,
    #[serde(rename = "acceptedFoodTypes")]
    pub accepted_food_types: String,
}

/// A single catalog row rejected during validation
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("malformed candidate at row {row} ({}): {reason}", .name.as_deref().unwrap_or("<unnamed>"))]
pub struct MalformedCandidateError {
    pub row: usize,
    pub name: Option<String>,
    pub reason: String,
}

/// Input to a single matching call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub origin: Position,
    #[serde(rename = "requiredCapacityKg")]
    pub required_capacity_kg: f64,
    #[serde(rename = "foodType")]
    pub food_type: String,
}

impl MatchRequest {
    pub fn new(origin: Position, required_capacity_kg: f64, food_type: impl Into<String>) -> Self {
        Self {
            origin,
            required_capacity_kg,
            food_type: food_type.into(),
        }
    }
}

/// Request-level rejection, raised before any filtering happens
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRequestError {
    #[error("required capacity must be a non-negative number, got {0}")]
    NegativeCapacity(f64),

    #[error("shortlist size must be non-negative, got {0}")]
    NegativeShortlist(i64),

    #[error("origin ({latitude}, {longitude}) is outside the valid coordinate range")]
    InvalidOrigin { latitude: f64, longitude: f64 },
}

/// One shortlisted candidate with its distance from the origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub candidate: Candidate,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// Ordered shortlist plus the counters the presentation layer reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortlist {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "eligibleCandidates")]
    pub eligible_candidates: usize,
}

impl Shortlist {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn top(&self) -> Option<&MatchResult> {
        self.matches.first()
    }
}

/// Kitchen identity used for outreach and audit records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenProfile {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    pub position: Position,
}

/// Feature tuple consumed by the quantity-prediction capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteFeatures {
    #[serde(rename = "mealsPrepared")]
    pub meals_prepared: u32,
    #[serde(rename = "guestsServed")]
    pub guests_served: u32,
    pub cuisine: String,
    #[serde(rename = "timeOfDay")]
    pub time_of_day: String,
}

/// Map marker rendered for the kitchen or a shortlisted candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Kitchen,
    Ngo,
}

/// One completed match, appended to the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: uuid::Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub kitchen_name: String,
    pub required_capacity_kg: f64,
    pub kitchen_latitude: f64,
    pub kitchen_longitude: f64,
    pub food_type: String,
    pub match_count: usize,
    #[serde(default)]
    pub top_candidate: Option<String>,
}

impl AuditRecord {
    pub fn from_match(kitchen: &KitchenProfile, request: &MatchRequest, shortlist: &Shortlist) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            kitchen_name: kitchen.name.clone(),
            required_capacity_kg: request.required_capacity_kg,
            kitchen_latitude: request.origin.latitude,
            kitchen_longitude: request.origin.longitude,
            food_type: request.food_type.clone(),
            match_count: shortlist.matches.len(),
            top_candidate: shortlist.top().map(|m| m.candidate.name.clone()),
        }
    }
}
