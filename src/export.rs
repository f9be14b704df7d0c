//! Serializations of grid geometry and per-slot results.
//!
//! Thin projections of the engine's outputs for external consumers:
//! GeoJSON feature collections for map sources and CSV for spreadsheets.

use crate::grid::Grid;
use serde_json::{Value, json};

/// Grid geometry as a FeatureCollection; each feature carries its stable
/// cell id and, when a result is supplied, the deficit score.
pub fn grid_feature_collection(grid: &Grid, index: Option<&[f64]>) -> Value {
    let features: Vec<Value> = (0..grid.len())
        .map(|id| {
            let ring = grid.cell_ring(id);
            let mut properties = json!({ "id": id });
            if let Some(index) = index
                && let Some(&hunger01) = index.get(id)
            {
                properties["hunger01"] = json!(hunger01);
            }
            json!({
                "type": "Feature",
                "id": id,
                "properties": properties,
                "geometry": { "type": "Polygon", "coordinates": [ring] }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Per-cell scores as CSV, one row per cell id.
pub fn index_csv(index: &[f64]) -> String {
    let mut lines = Vec::with_capacity(index.len() + 1);
    lines.push("id,hunger01".to_string());
    for (id, hunger01) in index.iter().enumerate() {
        lines.push(format!("{id},{hunger01}"));
    }
    lines.join("\n")
}
