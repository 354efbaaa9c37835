use crate::models::WasteFeatures;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while estimating the surplus quantity
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Model server returned error: {0}")]
    ApiError(String),

    #[error("Invalid prediction: {0}")]
    InvalidPrediction(f64),
}

/// Capability that turns kitchen features into a required quantity in kg
#[async_trait]
pub trait QuantityEstimator: Send + Sync {
    async fn estimate(&self, features: &WasteFeatures) -> Result<f64, EstimatorError>;
}

/// Plain functions and closures are estimators too
#[async_trait]
impl<F> QuantityEstimator for F
where
    F: Fn(&WasteFeatures) -> Result<f64, EstimatorError> + Send + Sync,
{
    async fn estimate(&self, features: &WasteFeatures) -> Result<f64, EstimatorError> {
        self(features).and_then(check_prediction)
    }
}

fn check_prediction(value: f64) -> Result<f64, EstimatorError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EstimatorError::InvalidPrediction(value))
    }
}

/// Deterministic linear stand-in for the trained model
///
/// prediction = intercept
///            + meals_coef * meals_prepared
///            + guests_coef * guests_served
///            + cuisine offset + time-of-day offset
///
/// clamped at zero. Category lookups are case-insensitive; unknown
/// categories contribute nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearEstimator {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default = "default_meals_coef")]
    pub meals_coef: f64,
    #[serde(default = "default_guests_coef")]
    pub guests_coef: f64,
    #[serde(default)]
    pub cuisine_offsets: HashMap<String, f64>,
    #[serde(default)]
    pub time_offsets: HashMap<String, f64>,
}

fn default_meals_coef() -> f64 { 0.4 }
fn default_guests_coef() -> f64 { -0.35 }

impl Default for LinearEstimator {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            meals_coef: default_meals_coef(),
            guests_coef: default_guests_coef(),
            cuisine_offsets: HashMap::new(),
            time_offsets: HashMap::new(),
        }
    }
}

impl LinearEstimator {
    fn offset(table: &HashMap<String, f64>, key: &str) -> f64 {
        table
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    pub fn predict(&self, features: &WasteFeatures) -> f64 {
        let raw = self.intercept
            + self.meals_coef * features.meals_prepared as f64
            + self.guests_coef * features.guests_served as f64
            + Self::offset(&self.cuisine_offsets, &features.cuisine)
            + Self::offset(&self.time_offsets, &features.time_of_day);

        raw.max(0.0)
    }
}

#[async_trait]
impl QuantityEstimator for LinearEstimator {
    async fn estimate(&self, features: &WasteFeatures) -> Result<f64, EstimatorError> {
        check_prediction(self.predict(features))
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: (u32, u32, &'a str, &'a str),
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: f64,
}

/// Client for a model-serving endpoint
///
/// Sends `{"features": [meals, guests, cuisine, time_of_day]}` and expects
/// `{"prediction": <kg>}` back.
pub struct RemoteEstimator {
    endpoint: String,
    client: Client,
}

impl RemoteEstimator {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, EstimatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl QuantityEstimator for RemoteEstimator {
    async fn estimate(&self, features: &WasteFeatures) -> Result<f64, EstimatorError> {
        let body = PredictRequest {
            features: (
                features.meals_prepared,
                features.guests_served,
                features.cuisine.as_str(),
                features.time_of_day.as_str(),
            ),
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!("Model server error {}: {}", status, text);
            return Err(EstimatorError::ApiError(format!("{}: {}", status, text)));
        }

        let parsed: PredictResponse = response.json().await?;
        tracing::debug!("Remote prediction: {} kg", parsed.prediction);

        check_prediction(parsed.prediction)
    }
}
