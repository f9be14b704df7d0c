use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Ko,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthSuccessResponse {
    pub status: HealthStatus,
    pub venues: usize,
    pub skipped_features: usize,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthErrorResponse {
    pub error_code: HealthErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthErrorCode {
    InternalError,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GridErrorResponse {
    pub error_code: GridErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridErrorCode {
    NoData,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct IndexCell {
    pub id: usize,
    pub hunger01: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexSuccessResponse {
    pub day: u8,
    pub hour: u8,
    pub time_index: usize,
    pub cells: Vec<IndexCell>,
    pub non_empty_cells: usize,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexErrorResponse {
    pub error_code: IndexErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexErrorCode {
    NoData,
    InternalError,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsSuccessResponse {
    pub venues: usize,
    pub skipped_features: usize,
    pub cells: usize,
    pub non_empty_cells: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_area_km2: Option<f64>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsErrorResponse {
    pub error_code: StatsErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatsErrorCode {
    InternalError,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VenueWeight {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub w: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VenuesSuccessResponse {
    pub day: u8,
    pub hour: u8,
    pub venues: Vec<VenueWeight>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VenuesErrorResponse {
    pub error_code: VenuesErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenuesErrorCode {
    NoData,
    InternalError,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ViewResponse {
    pub day: u8,
    pub hour: u8,
    pub playing: bool,
    pub interval_ms: u64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ControlErrorResponse {
    pub error_code: ControlErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlErrorCode {
    InternalError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn health_response_serializes_with_lowercase_status() {
        let response = HealthSuccessResponse {
            status: HealthStatus::Degraded,
            venues: 42,
            skipped_features: 3,
            timestamp: "2026-08-06T12:30:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize health response");
        assert_eq!(
            value,
            json!({
                "status": "degraded",
                "venues": 42,
                "skipped_features": 3,
                "timestamp": "2026-08-06T12:30:00Z"
            })
        );
    }

    #[test]
    fn error_codes_serialize_screaming_snake_case() {
        let response = IndexErrorResponse {
            error_code: IndexErrorCode::NoData,
            error_message: "No grid available".to_string(),
            timestamp: "2026-08-06T12:30:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize error response");
        assert_eq!(value["error_code"], "NO_DATA");
    }

    #[test]
    fn stats_response_omits_cell_area_when_missing() {
        let response = StatsSuccessResponse {
            venues: 0,
            skipped_features: 0,
            cells: 0,
            non_empty_cells: 0,
            cell_area_km2: None,
            timestamp: "2026-08-06T12:30:00Z".to_string(),
        };

        let value = serde_json::to_value(response).expect("serialize stats response");
        assert!(value.get("cell_area_km2").is_none());
    }

    #[test]
    fn venue_weight_omits_missing_name() {
        let venue = VenueWeight {
            id: 3,
            name: None,
            lon: -95.36,
            lat: 29.76,
            w: 0.4,
        };

        let value = serde_json::to_value(venue).expect("serialize venue weight");
        assert_eq!(
            value,
            json!({ "id": 3, "lon": -95.36, "lat": 29.76, "w": 0.4 })
        );
    }
}
