//! Surplus Matcher - connects kitchens holding surplus food with nearby NGOs
//!
//! The core is a pure matching-and-ranking engine: filter recipient
//! organizations by capacity and accepted food type, measure geodesic
//! distance from the kitchen, and return a short, stable, distance-ordered
//! shortlist. The HTTP layer around it loads the NGO catalog, estimates
//! the surplus quantity, renders outreach messages and keeps a match history.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchPolicy, DistanceMethod, FoodTypePolicy, geodesic_distance_km, haversine_distance_km};
pub use models::{Candidate, MatchRequest, MatchResult, Position, Shortlist, InvalidRequestError, MalformedCandidateError};
