// Remote estimator tests against a mock model server

use surplus_matcher::models::WasteFeatures;
use surplus_matcher::services::{EstimatorError, QuantityEstimator, RemoteEstimator};

fn features() -> WasteFeatures {
    WasteFeatures {
        meals_prepared: 120,
        guests_served: 90,
        cuisine: "South Indian".to_string(),
        time_of_day: "Lunch".to_string(),
    }
}

#[tokio::test]
async fn test_remote_prediction() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/predict")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "features": [120, 90, "South Indian", "Lunch"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"prediction": 14.5}"#)
        .create_async()
        .await;

    let estimator = RemoteEstimator::new(format!("{}/predict", server.url()), 5).unwrap();
    let predicted = estimator.estimate(&features()).await.unwrap();

    assert_eq!(predicted, 14.5);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/predict")
        .with_status(500)
        .with_body("model not loaded")
        .create_async()
        .await;

    let estimator = RemoteEstimator::new(format!("{}/predict", server.url()), 5).unwrap();
    let err = estimator.estimate(&features()).await.unwrap_err();

    match err {
        EstimatorError::ApiError(message) => assert!(message.contains("model not loaded")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_negative_prediction_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"prediction": -3.0}"#)
        .create_async()
        .await;

    let estimator = RemoteEstimator::new(format!("{}/predict", server.url()), 5).unwrap();
    let err = estimator.estimate(&features()).await.unwrap_err();

    assert!(matches!(err, EstimatorError::InvalidPrediction(v) if v == -3.0));
}
