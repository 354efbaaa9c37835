use crate::models::Candidate;

const MIXED: &str = "mixed";
const VEGETARIAN: &str = "vegetarian";
const NON_VEGETARIAN: &str = "non-vegetarian";

/// Food-type compatibility rule
///
/// A candidate is compatible when its accepted type equals the requested
/// type (case-insensitive) or is the "both" sentinel. The sentinel applies
/// on the candidate side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoodTypePolicy {
    /// Let a "Mixed" request also match vegetarian and non-vegetarian intake
    pub mixed_accepts_specific: bool,
}

impl FoodTypePolicy {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn with_mixed_wildcard() -> Self {
        Self { mixed_accepts_specific: true }
    }

    #[inline]
    pub fn is_compatible(&self, accepted: &str, requested: &str) -> bool {
        let accepted = accepted.trim();
        let requested = requested.trim();

        if accepted.eq_ignore_ascii_case(crate::models::FOOD_TYPE_BOTH)
            || accepted.eq_ignore_ascii_case(requested)
        {
            return true;
        }

        self.mixed_accepts_specific
            && requested.eq_ignore_ascii_case(MIXED)
            && (accepted.eq_ignore_ascii_case(VEGETARIAN) || accepted.eq_ignore_ascii_case(NON_VEGETARIAN))
    }
}

/// Check that a candidate can take the required quantity
#[inline]
pub fn has_capacity(candidate: &Candidate, required_capacity_kg: f64) -> bool {
    candidate.capacity_kg >= required_capacity_kg
}

/// Check that a candidate accepts the requested food type
#[inline]
pub fn accepts_food_type(candidate: &Candidate, food_type: &str, policy: &FoodTypePolicy) -> bool {
    policy.is_compatible(&candidate.accepted_food_types, food_type)
}

/// Combined eligibility predicate; pure, no side effects
#[inline]
pub fn is_eligible(
    candidate: &Candidate,
    required_capacity_kg: f64,
    food_type: &str,
    policy: &FoodTypePolicy,
) -> bool {
    has_capacity(candidate, required_capacity_kg) && accepts_food_type(candidate, food_type, policy)
}
