// Integration tests for Surplus Matcher

use surplus_matcher::core::{FoodTypePolicy, MatchPolicy, Matcher};
use surplus_matcher::models::{Candidate, KitchenProfile, MatchRequest, Position};
use surplus_matcher::services::{outreach, parse_catalog};

const ORIGIN: Position = Position { latitude: 13.0106, longitude: 80.2336 };

fn north_of_origin(km: f64) -> Position {
    Position::new(ORIGIN.latitude + km / 110.62, ORIGIN.longitude)
}

fn create_candidate(name: &str, capacity_kg: f64, accepted: &str, position: Position) -> Candidate {
    Candidate {
        name: name.to_string(),
        area: "Chennai".to_string(),
        capacity_kg,
        position,
        contact: format!("{} desk", name),
        accepted_food_types: accepted.to_string(),
    }
}

fn scenario_catalog() -> Vec<Candidate> {
    vec![
        create_candidate("A", 20.0, "Vegetarian", north_of_origin(2.0)),
        create_candidate("B", 5.0, "Vegetarian", north_of_origin(1.0)),
        create_candidate("C", 50.0, "Both", north_of_origin(5.0)),
    ]
}

fn names(result: &surplus_matcher::models::Shortlist) -> Vec<&str> {
    result.matches.iter().map(|m| m.candidate.name.as_str()).collect()
}

#[test]
fn test_vegetarian_scenario() {
    let matcher = Matcher::default();
    let request = MatchRequest::new(ORIGIN, 10.0, "Vegetarian");

    let result = matcher.find_default(&request, &scenario_catalog()).unwrap();

    assert_eq!(names(&result), vec!["A", "C"]);
    assert!((result.matches[0].distance_km - 2.0).abs() < 0.05);
    assert!((result.matches[1].distance_km - 5.0).abs() < 0.05);
}

#[test]
fn test_non_vegetarian_scenario() {
    let matcher = Matcher::default();
    let request = MatchRequest::new(ORIGIN, 10.0, "Non-Vegetarian");

    let result = matcher.find_default(&request, &scenario_catalog()).unwrap();

    assert_eq!(names(&result), vec!["C"]);
}

#[test]
fn test_shortlist_of_one_scenario() {
    let matcher = Matcher::default();
    let request = MatchRequest::new(ORIGIN, 10.0, "Vegetarian");

    let result = matcher.find_matches(&request, &scenario_catalog(), 1).unwrap();

    assert_eq!(names(&result), vec!["A"]);
}

#[test]
fn test_unknown_food_type_without_both_is_empty() {
    let matcher = Matcher::default();
    let request = MatchRequest::new(ORIGIN, 1.0, "Vegan");
    let catalog = vec![
        create_candidate("A", 20.0, "Vegetarian", north_of_origin(2.0)),
        create_candidate("B", 20.0, "Non-Vegetarian", north_of_origin(3.0)),
    ];

    let result = matcher.find_default(&request, &catalog).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.total_candidates, 2);
}

#[test]
fn test_mixed_policy_is_opt_in() {
    let request = MatchRequest::new(ORIGIN, 1.0, "Mixed");
    let catalog = vec![
        create_candidate("veg", 20.0, "Vegetarian", north_of_origin(1.0)),
        create_candidate("mixed", 20.0, "Mixed", north_of_origin(4.0)),
    ];

    let strict = Matcher::default().find_default(&request, &catalog).unwrap();
    assert_eq!(names(&strict), vec!["mixed"]);

    let widened = Matcher::new(MatchPolicy {
        food_types: FoodTypePolicy::with_mixed_wildcard(),
        ..MatchPolicy::default()
    })
    .find_default(&request, &catalog)
    .unwrap();
    assert_eq!(names(&widened), vec!["veg", "mixed"]);
}

#[test]
fn test_catalog_input_is_not_mutated() {
    let matcher = Matcher::default();
    let request = MatchRequest::new(ORIGIN, 10.0, "Vegetarian");
    let catalog = scenario_catalog();
    let before = catalog.clone();

    let _ = matcher.find_default(&request, &catalog).unwrap();

    assert_eq!(catalog, before);
}

#[test]
fn test_end_to_end_from_csv_to_outreach() {
    let csv = "Name,Area,Capacity_kg,Latitude,Longitude,Contact,Accepted_Food_Types\n\
               Annam Food Bank,T. Nagar,40,13.0418,80.2341,9840000001,Vegetarian\n\
               Broken Row,Nowhere,forty,13.0,80.0,0,Both\n\
               Seva Samajam,Adyar,25,13.0012,80.2565,9840000002,Both\n\
               Karunai Illam,Guindy,15,13.0067,80.2206,9840000003,Non-Vegetarian\n\
               Nalam Home,Velachery,8,12.9815,80.2180,9840000005,Vegetarian\n";

    let snapshot = parse_catalog(csv.as_bytes(), "inline").unwrap();
    assert_eq!(snapshot.candidates.len(), 4);
    assert_eq!(snapshot.rejected.len(), 1);
    assert_eq!(snapshot.rejected[0].name.as_deref(), Some("Broken Row"));

    let kitchen = KitchenProfile {
        name: "Hotel Saravana".to_string(),
        contact: "9000000000".to_string(),
        position: ORIGIN,
    };
    let request = MatchRequest::new(kitchen.position, 10.0, "vegetarian");
    let result = Matcher::default().find_default(&request, &snapshot.candidates).unwrap();

    // Nalam Home is too small, Karunai Illam takes non-veg only
    assert_eq!(names(&result), vec!["Seva Samajam", "Annam Food Bank"]);
    for pair in result.matches.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km);
    }

    let outreach = outreach::build_outreach(&kitchen, 10.0, &result).unwrap();
    assert!(outreach.message.contains("Suggested NGO: Seva Samajam - 9840000002"));
    assert!(outreach.deep_link.starts_with("https://api.whatsapp.com/send?phone=&text=Hotel%20Saravana"));

    let markers = outreach::map_markers(&kitchen, &result);
    assert_eq!(markers.len(), 3);
}
