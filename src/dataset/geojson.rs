//! Boundary parse: GeoJSON in, validated venues out.
//!
//! All shape coercion happens here, once. Features that are not usable
//! points (missing geometry, non-point geometry, incomplete or non-finite
//! coordinates) are skipped and counted, never fatal. The rest of the crate
//! only ever sees [`Venue`] records.

use crate::dataset::{Dataset, OccupancySeries, Venue, VenueId};
use crate::timekey::TIME_SLOTS;
use geojson::{Feature, GeoJson, Value, feature::Id};
use serde_json::Value as JsonValue;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] geojson::Error),
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents)
}

pub fn parse_str(text: &str) -> Result<Dataset, DatasetError> {
    let geojson: GeoJson = text.parse()?;
    Ok(from_geojson(geojson))
}

/// Accepts a FeatureCollection, a single Feature, or a bare Geometry,
/// the three shapes the upstream exports produce.
pub fn from_geojson(geojson: GeoJson) -> Dataset {
    match geojson {
        GeoJson::FeatureCollection(collection) => from_features(collection.features),
        GeoJson::Feature(feature) => from_features(vec![feature]),
        GeoJson::Geometry(geometry) => from_features(vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }]),
    }
}

fn from_features(features: Vec<Feature>) -> Dataset {
    let mut venues = Vec::new();
    let mut skipped = 0usize;
    for feature in features {
        match venue_from_feature(feature) {
            Some(venue) => venues.push(venue),
            None => skipped += 1,
        }
    }
    Dataset { venues, skipped }
}

fn venue_from_feature(feature: Feature) -> Option<Venue> {
    let geometry = feature.geometry.as_ref()?;
    let Value::Point(ref coords) = geometry.value else {
        return None;
    };
    let lon = coords.first().copied()?;
    let lat = coords.get(1).copied()?;
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }

    let properties = feature.properties.clone().unwrap_or_default();
    let venue_id = id_from_feature(feature.id.as_ref())
        .or_else(|| properties.get("id").and_then(JsonValue::as_u64));
    let name = string_property(&properties, &["title", "name"]);
    let category = string_property(&properties, &["categoryName", "category"]);
    let reviews_count = properties
        .get("reviewsCount")
        .and_then(coerce_number)
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0);
    let occupancy = properties.get("occ").and_then(parse_occupancy);

    Some(Venue {
        venue_id,
        name,
        category,
        reviews_count,
        lon,
        lat,
        occupancy,
    })
}

fn id_from_feature(id: Option<&Id>) -> Option<VenueId> {
    match id {
        Some(Id::Number(number)) => number.as_u64(),
        _ => None,
    }
}

fn string_property(
    properties: &serde_json::Map<String, JsonValue>,
    keys: &[&str],
) -> Option<String> {
    keys.iter()
        .find_map(|key| properties.get(*key).and_then(JsonValue::as_str))
        .map(str::to_string)
}

fn coerce_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// The occupancy series arrives either as a JSON array or as a JSON-encoded
/// string of one; both are decoded here. Series shorter than a full week
/// are dropped. Non-numeric entries stay NaN and are neutralized by the
/// weight function.
fn parse_occupancy(value: &JsonValue) -> Option<OccupancySeries> {
    match value {
        JsonValue::Array(items) => series_from_items(items),
        JsonValue::String(text) => {
            let parsed: JsonValue = serde_json::from_str(text).ok()?;
            match parsed {
                JsonValue::Array(items) => series_from_items(&items),
                _ => None,
            }
        }
        _ => None,
    }
}

fn series_from_items(items: &[JsonValue]) -> Option<OccupancySeries> {
    if items.len() < TIME_SLOTS {
        return None;
    }
    let values: Vec<f64> = items
        .iter()
        .map(|item| item.as_f64().unwrap_or(f64::NAN))
        .collect();
    OccupancySeries::from_slice(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timekey::TimeKey;
    use serde_json::json;

    fn occ_array(value: f64) -> JsonValue {
        json!(vec![value; TIME_SLOTS])
    }

    #[test]
    fn parses_points_with_occupancy_array() -> Result<(), DatasetError> {
        let text = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 7,
                "geometry": { "type": "Point", "coordinates": [-95.36, 29.76] },
                "properties": {
                    "title": "Taqueria Central",
                    "categoryName": "Mexican restaurant",
                    "reviewsCount": 128,
                    "occ": occ_array(40.0)
                }
            }]
        })
        .to_string();

        let dataset = parse_str(&text)?;

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped, 0);
        let venue = &dataset.venues[0];
        assert_eq!(venue.venue_id, Some(7));
        assert_eq!(venue.name.as_deref(), Some("Taqueria Central"));
        assert_eq!(venue.category.as_deref(), Some("Mexican restaurant"));
        assert_eq!(venue.reviews_count, 128);
        assert_eq!(venue.lon, -95.36);
        assert_eq!(venue.lat, 29.76);
        let occupancy = venue.occupancy.as_ref().expect("occupancy parsed");
        assert_eq!(occupancy.value_at(TimeKey::new(2, 9)), 40.0);
        Ok(())
    }

    #[test]
    fn parses_occupancy_encoded_as_json_string() -> Result<(), DatasetError> {
        let encoded = serde_json::to_string(&vec![55.0; TIME_SLOTS]).expect("encode occ");
        let text = json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-95.4, 29.7] },
            "properties": { "occ": encoded }
        })
        .to_string();

        let dataset = parse_str(&text)?;

        assert_eq!(dataset.len(), 1);
        let occupancy = dataset.venues[0].occupancy.as_ref().expect("occupancy");
        assert_eq!(occupancy.value_at(TimeKey::new(0, 0)), 55.0);
        Ok(())
    }

    #[test]
    fn short_occupancy_series_is_dropped_but_venue_kept() -> Result<(), DatasetError> {
        let text = json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-95.4, 29.7] },
            "properties": { "occ": [10.0, 20.0] }
        })
        .to_string();

        let dataset = parse_str(&text)?;

        assert_eq!(dataset.len(), 1);
        assert!(dataset.venues[0].occupancy.is_none());
        Ok(())
    }

    #[test]
    fn skips_non_point_and_incomplete_features() -> Result<(), DatasetError> {
        let text = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-95.3, 29.8] },
                    "properties": {}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-95.3, 29.8], [-95.2, 29.9]]
                    },
                    "properties": {}
                },
                { "type": "Feature", "geometry": null, "properties": {} },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "MultiPoint",
                        "coordinates": [[-95.3, 29.8]]
                    },
                    "properties": {}
                }
            ]
        })
        .to_string();

        let dataset = parse_str(&text)?;

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped, 3);
        Ok(())
    }

    #[test]
    fn bare_geometry_is_accepted() -> Result<(), DatasetError> {
        let text = json!({ "type": "Point", "coordinates": [-95.3, 29.8] }).to_string();

        let dataset = parse_str(&text)?;

        assert_eq!(dataset.len(), 1);
        assert!(dataset.venues[0].occupancy.is_none());
        Ok(())
    }

    #[test]
    fn invalid_json_returns_parse_error() {
        let result = parse_str("{ not geojson");
        assert!(matches!(result, Err(DatasetError::Parse(_))));
    }
}
