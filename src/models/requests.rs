use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::WasteFeatures;

/// Kitchen block of a find-matches request; missing fields fall back to config
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct KitchenInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    pub contact: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Request to find recipient NGOs for a kitchen's surplus
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(default)]
    #[validate(nested)]
    pub kitchen: KitchenInput,
    #[serde(alias = "required_capacity_kg", rename = "requiredCapacityKg")]
    pub required_capacity_kg: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub features: Option<FeaturesInput>,
    #[validate(length(min = 1))]
    #[serde(alias = "food_type", rename = "foodType")]
    pub food_type: String,
    #[serde(alias = "shortlist_size", rename = "shortlistSize")]
    pub shortlist_size: Option<i64>,
}

/// Estimator features as they arrive on the wire
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeaturesInput {
    #[serde(alias = "meals_prepared", rename = "mealsPrepared")]
    pub meals_prepared: u32,
    #[serde(alias = "guests_served", rename = "guestsServed")]
    pub guests_served: u32,
    #[validate(length(min = 1))]
    pub cuisine: String,
    #[validate(length(min = 1))]
    #[serde(alias = "time_of_day", rename = "timeOfDay")]
    pub time_of_day: String,
}

impl From<FeaturesInput> for WasteFeatures {
    fn from(value: FeaturesInput) -> Self {
        WasteFeatures {
            meals_prepared: value.meals_prepared,
            guests_served: value.guests_served,
            cuisine: value.cuisine,
            time_of_day: value.time_of_day,
        }
    }
}

/// Request to run only the quantity estimator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(nested)]
    pub features: FeaturesInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    20
}
