use crate::models::{KitchenProfile, MapMarker, MarkerKind, MatchItem, MatchResult, Outreach, Position, Shortlist};

const WHATSAPP_SEND_URL: &str = "https://api.whatsapp.com/send";
const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir";

/// Directions link from the kitchen to a candidate
pub fn route_url(from: &Position, to: &Position) -> String {
    format!(
        "{}/{},{}/{},{}",
        MAPS_DIRECTIONS_URL, from.latitude, from.longitude, to.latitude, to.longitude
    )
}

/// Outreach text embedding the kitchen and the top-ranked NGO
pub fn compose_message(kitchen: &KitchenProfile, required_capacity_kg: f64, top: &MatchResult) -> String {
    format!(
        "{} has {}kg food ready at ({}, {}). Contact: {}. Suggested NGO: {} - {}",
        kitchen.name,
        required_capacity_kg,
        kitchen.position.latitude,
        kitchen.position.longitude,
        kitchen.contact,
        top.candidate.name,
        top.candidate.contact,
    )
}

/// Messaging deep-link with the message fully percent-encoded
pub fn whatsapp_link(message: &str) -> String {
    format!("{}?phone=&text={}", WHATSAPP_SEND_URL, urlencoding::encode(message))
}

/// Message plus deep-link, or `None` when nothing matched
pub fn build_outreach(kitchen: &KitchenProfile, required_capacity_kg: f64, shortlist: &Shortlist) -> Option<Outreach> {
    let top = shortlist.top()?;
    let message = compose_message(kitchen, required_capacity_kg, top);
    let deep_link = whatsapp_link(&message);

    Some(Outreach { message, deep_link })
}

/// Recommendation list entries in shortlist order
pub fn list_items(kitchen: &KitchenProfile, shortlist: &Shortlist) -> Vec<MatchItem> {
    shortlist
        .matches
        .iter()
        .enumerate()
        .map(|(idx, m)| MatchItem {
            rank: idx + 1,
            name: m.candidate.name.clone(),
            area: m.candidate.area.clone(),
            capacity_kg: m.candidate.capacity_kg,
            distance_km: m.distance_km,
            distance_label: format!("{:.2} km", m.distance_km),
            contact: m.candidate.contact.clone(),
            accepted_food_types: m.candidate.accepted_food_types.clone(),
            route_url: route_url(&kitchen.position, &m.candidate.position),
        })
        .collect()
}

/// Kitchen marker first, then one marker per shortlisted NGO
pub fn map_markers(kitchen: &KitchenProfile, shortlist: &Shortlist) -> Vec<MapMarker> {
    std::iter::once(MapMarker {
        latitude: kitchen.position.latitude,
        longitude: kitchen.position.longitude,
        label: kitchen.name.clone(),
        kind: MarkerKind::Kitchen,
    })
    .chain(shortlist.matches.iter().map(|m| MapMarker {
        latitude: m.candidate.position.latitude,
        longitude: m.candidate.position.longitude,
        label: m.candidate.name.clone(),
        kind: MarkerKind::Ngo,
    }))
    .collect()
}
