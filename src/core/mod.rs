// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;

pub use distance::{geodesic_distance_km, haversine_distance_km, DistanceMethod};
pub use filters::{accepts_food_type, has_capacity, is_eligible, FoodTypePolicy};
pub use matcher::{rank_candidates, resolve_shortlist_size, validate_request, MatchPolicy, Matcher, DEFAULT_SHORTLIST_SIZE};
