use crate::models::{Candidate, InvalidRequestError, MatchRequest, MatchResult, Shortlist};
use crate::core::{distance::DistanceMethod, filters::{is_eligible, FoodTypePolicy}};

/// Shortlist length used when the caller does not ask for one
pub const DEFAULT_SHORTLIST_SIZE: usize = 3;

/// Tunables for a matching run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    pub distance: DistanceMethod,
    pub food_types: FoodTypePolicy,
    pub shortlist_size: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            distance: DistanceMethod::Geodesic,
            food_types: FoodTypePolicy::strict(),
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
        }
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Capacity and food-type filtering
/// 2. Distance computation from the kitchen
/// 3. Stable ranking by ascending distance
/// 4. Truncation to the shortlist size
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Find the closest compatible candidates for a request
    ///
    /// # Arguments
    /// * `request` - Kitchen position, required quantity and food type
    /// * `candidates` - Validated catalog, read-only
    /// * `shortlist_size` - Maximum number of matches to return
    ///
    /// # Returns
    /// Shortlist ordered by ascending distance, or an error when the
    /// request itself is invalid
    pub fn find_matches(
        &self,
        request: &MatchRequest,
        candidates: &[Candidate],
        shortlist_size: usize,
    ) -> Result<Shortlist, InvalidRequestError> {
        validate_request(request)?;

        let matches = rank_candidates(
            request,
            candidates,
            shortlist_size,
            self.policy.distance,
            &self.policy.food_types,
        );
        let eligible_candidates = candidates
            .iter()
            .filter(|c| is_eligible(c, request.required_capacity_kg, &request.food_type, &self.policy.food_types))
            .count();

        tracing::debug!(
            "Matched {} of {} eligible candidates ({} in catalog)",
            matches.len(),
            eligible_candidates,
            candidates.len()
        );

        Ok(Shortlist {
            matches,
            total_candidates: candidates.len(),
            eligible_candidates,
        })
    }

    /// Same as [`Matcher::find_matches`] with the configured shortlist size
    pub fn find_default(
        &self,
        request: &MatchRequest,
        candidates: &[Candidate],
    ) -> Result<Shortlist, InvalidRequestError> {
        self.find_matches(request, candidates, self.policy.shortlist_size)
    }
}

/// Reject requests that must not reach the filter stage
pub fn validate_request(request: &MatchRequest) -> Result<(), InvalidRequestError> {
    let required = request.required_capacity_kg;
    if !required.is_finite() || required < 0.0 {
        return Err(InvalidRequestError::NegativeCapacity(required));
    }

    if !request.origin.is_valid() {
        return Err(InvalidRequestError::InvalidOrigin {
            latitude: request.origin.latitude,
            longitude: request.origin.longitude,
        });
    }

    Ok(())
}

/// Convert a caller-supplied shortlist size, falling back to `default` when absent
pub fn resolve_shortlist_size(requested: Option<i64>, default: usize) -> Result<usize, InvalidRequestError> {
    match requested {
        None => Ok(default),
        Some(size) if size < 0 => Err(InvalidRequestError::NegativeShortlist(size)),
        Some(size) => Ok(usize::try_from(size).unwrap_or(usize::MAX)),
    }
}

/// Filter, measure, rank and truncate
///
/// Pure function of its arguments. `sort_by` is stable, so equal distances
/// keep catalog order.
pub fn rank_candidates(
    request: &MatchRequest,
    candidates: &[Candidate],
    shortlist_size: usize,
    method: DistanceMethod,
    policy: &FoodTypePolicy,
) -> Vec<MatchResult> {
    let mut ranked: Vec<MatchResult> = candidates
        .iter()
        .filter(|c| is_eligible(c, request.required_capacity_kg, &request.food_type, policy))
        .map(|c| MatchResult {
            distance_km: method.distance_km(&request.origin, &c.position),
            candidate: c.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(shortlist_size);
    ranked
}
