// HTTP API tests for Surplus Matcher

use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use surplus_matcher::core::Matcher;
use surplus_matcher::models::{KitchenProfile, Position, WasteFeatures};
use surplus_matcher::routes::{configure_routes, AppState};
use surplus_matcher::services::{AuditLog, CatalogStore, CsvAuditLog, EstimatorError};

const CATALOG: &str = "Name,Area,Capacity_kg,Latitude,Longitude,Contact,Accepted_Food_Types\n\
                       Annam Food Bank,T. Nagar,40,13.0418,80.2341,9840000001,Vegetarian\n\
                       Seva Samajam,Adyar,25,13.0012,80.2565,9840000002,Both\n\
                       Karunai Illam,Guindy,15,13.0067,80.2206,9840000003,Non-Vegetarian\n\
                       Broken Row,Nowhere,forty,13.0,80.0,0,Both\n";

struct Fixture {
    state: AppState,
    audit: Arc<CsvAuditLog>,
    _dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("ngos.csv");
    std::fs::File::create(&catalog_path)
        .unwrap()
        .write_all(CATALOG.as_bytes())
        .unwrap();

    let audit = Arc::new(CsvAuditLog::new(dir.path().join("waste_logs.csv")));
    let estimator = |features: &WasteFeatures| Ok::<f64, EstimatorError>(features.meals_prepared as f64 / 10.0);

    let state = AppState {
        catalog: Arc::new(CatalogStore::new(catalog_path, 60)),
        matcher: Matcher::default(),
        estimator: Arc::new(estimator),
        audit: Some(audit.clone() as Arc<dyn AuditLog>),
        default_kitchen: KitchenProfile {
            name: "My Kitchen".to_string(),
            contact: "9000000000".to_string(),
            position: Position::new(13.0106, 80.2336),
        },
    };

    Fixture { state, audit, _dir: dir }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_find_matches_returns_ranked_list_and_outreach() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({"requiredCapacityKg": 10, "foodType": "Vegetarian"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "matched");
    assert_eq!(body["matches"][0]["name"], "Seva Samajam");
    assert_eq!(body["matches"][1]["name"], "Annam Food Bank");
    assert_eq!(body["matches"].as_array().unwrap().len(), 2);
    assert_eq!(body["markers"].as_array().unwrap().len(), 3);
    assert_eq!(body["markers"][0]["kind"], "kitchen");
    assert_eq!(body["rejectedRows"], 1);
    assert!(body["outreach"]["message"]
        .as_str()
        .unwrap()
        .starts_with("My Kitchen has 10kg food ready"));

    let history = fx.audit.recent(5).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].top_candidate.as_deref(), Some("Seva Samajam"));
}

#[actix_web::test]
async fn test_no_matches_is_not_an_error() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({"requiredCapacityKg": 500, "foodType": "Vegetarian"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "no matches");
    assert!(body["matches"].as_array().unwrap().is_empty());
    assert!(body["outreach"].is_null());
}

#[actix_web::test]
async fn test_features_are_estimated() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({
            "features": {"mealsPrepared": 300, "guestsServed": 250, "cuisine": "South Indian", "timeOfDay": "Lunch"},
            "foodType": "Non-Vegetarian",
            "kitchen": {"name": "Hotel Saravana"}
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["requiredCapacityKg"], 30.0);
    // Seva Samajam (25 kg) and Karunai Illam (15 kg) are both too small for 30 kg
    assert_eq!(body["matches"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/estimate")
        .set_json(json!({"features": {"mealsPrepared": 120, "guestsServed": 90, "cuisine": "Chinese", "timeOfDay": "Dinner"}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["predictedKg"], 12.0);
}

#[actix_web::test]
async fn test_invalid_requests_are_rejected() {
    let fx = fixture();
    let app = app!(fx.state);

    for payload in [
        json!({"requiredCapacityKg": -1, "foodType": "Vegetarian"}),
        json!({"requiredCapacityKg": 5, "foodType": "Vegetarian", "shortlistSize": -2}),
        json!({"foodType": "Vegetarian"}),
        json!({"requiredCapacityKg": 5, "foodType": ""}),
        json!({"requiredCapacityKg": 5, "foodType": "Both", "kitchen": {"latitude": 123.0}}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/matches/find")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "payload {} should be rejected", payload);
    }

    assert!(fx.audit.recent(5).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_shortlist_size_override() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({"requiredCapacityKg": 1, "foodType": "Vegetarian", "shortlistSize": 1}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["matches"].as_array().unwrap().len(), 1);
    assert_eq!(body["eligibleCandidates"], 2);
}

#[actix_web::test]
async fn test_catalog_and_history_endpoints() {
    let fx = fixture();
    let app = app!(fx.state);

    let req = test::TestRequest::get().uri("/api/v1/catalog").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["candidateCount"], 3);
    assert_eq!(body["rejected"][0]["name"], "Broken Row");
    assert_eq!(body["rejected"][0]["row"], 4);

    let req = test::TestRequest::post().uri("/api/v1/catalog/reload").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["candidateCount"], 3);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalogSize"], 3);

    let req = test::TestRequest::get().uri("/api/v1/history?limit=5").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["records"].as_array().unwrap().is_empty());
}
