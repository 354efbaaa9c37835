// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AuditRecord, Candidate, InvalidRequestError, KitchenProfile, MalformedCandidateError, MapMarker,
    MarkerKind, MatchRequest, MatchResult, Position, Shortlist, WasteFeatures, FOOD_TYPE_BOTH,
};
pub use requests::{EstimateRequest, FeaturesInput, FindMatchesRequest, HistoryQuery, KitchenInput};
pub use responses::{
    CatalogResponse, ErrorResponse, EstimateResponse, FindMatchesResponse, HealthResponse,
    HistoryResponse, MatchItem, Outreach,
};
