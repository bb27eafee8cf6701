use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The five measured water-quality metrics of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Tds,
    Ph,
    Turbidity,
    Lead,
    Color,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Tds,
        MetricKind::Ph,
        MetricKind::Turbidity,
        MetricKind::Lead,
        MetricKind::Color,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Tds => "tds",
            MetricKind::Ph => "ph",
            MetricKind::Turbidity => "turbidity",
            MetricKind::Lead => "lead",
            MetricKind::Color => "color",
        }
    }
}

/// A single value/status pair borrowed from a reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric<'a> {
    pub value: f64,
    pub status: &'a str,
}

/// One timestamped batch of sensor measurements, in the wire format the
/// dashboard and the station firmware share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadingMessage {
    #[serde(rename = "TDS_Value")]
    pub tds_value: f64,
    #[serde(rename = "TDS_Status")]
    pub tds_status: String,
    #[serde(rename = "PH_Value")]
    pub ph_value: f64,
    #[serde(rename = "PH_Status")]
    pub ph_status: String,
    #[serde(rename = "Turbidity_Value")]
    pub turbidity_value: f64,
    #[serde(rename = "Turbidity_Status")]
    pub turbidity_status: String,
    #[serde(rename = "Lead_Value")]
    pub lead_value: f64,
    #[serde(rename = "Lead_Status")]
    pub lead_status: String,
    #[serde(rename = "Color_Value")]
    pub color_value: f64,
    #[serde(rename = "Color_Status")]
    pub color_status: String,
    #[serde(rename = "Color_Result")]
    pub color_result: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ReadingMessage {
    pub fn metric(&self, kind: MetricKind) -> Metric<'_> {
        let (value, status) = match kind {
            MetricKind::Tds => (self.tds_value, &self.tds_status),
            MetricKind::Ph => (self.ph_value, &self.ph_status),
            MetricKind::Turbidity => (self.turbidity_value, &self.turbidity_status),
            MetricKind::Lead => (self.lead_value, &self.lead_status),
            MetricKind::Color => (self.color_value, &self.color_status),
        };
        Metric {
            value,
            status: status.as_str(),
        }
    }

    /// Returns the first metric that carries a NaN or infinite value
    pub fn non_finite_metric(&self) -> Option<MetricKind> {
        MetricKind::ALL
            .into_iter()
            .find(|kind| !self.metric(*kind).value.is_finite())
    }
}

impl std::default::Default for ReadingMessage {
    fn default() -> Self {
        ReadingMessage {
            tds_value: 0.0,
            tds_status: String::new(),
            ph_value: 0.0,
            ph_status: String::new(),
            turbidity_value: 0.0,
            turbidity_status: String::new(),
            lead_value: 0.0,
            lead_status: String::new(),
            color_value: 0.0,
            color_status: String::new(),
            color_result: String::new(),
            timestamp: Utc::now(),
        }
    }
}

/// A reading as pushed by a station, tagged with its identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationReading {
    pub station_id: i32,
    #[serde(flatten)]
    pub reading: ReadingMessage,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let reading = ReadingMessage {
            tds_value: 120.0,
            tds_status: "Safe".to_owned(),
            color_result: "Clear".to_owned(),
            ..Default::default()
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["TDS_Value"], 120.0);
        assert_eq!(json["TDS_Status"], "Safe");
        assert_eq!(json["Color_Result"], "Clear");
        assert!(json.get("tds_value").is_none());
    }

    #[test]
    fn test_station_reading_without_timestamp() {
        let before = Utc::now();
        let json = r#"{
            "station_id": 3,
            "TDS_Value": 1.0, "TDS_Status": "safe",
            "PH_Value": 7.1, "PH_Status": "neutral",
            "Turbidity_Value": 0.4, "Turbidity_Status": "safe",
            "Lead_Value": 0.001, "Lead_Status": "safe",
            "Color_Value": 12, "Color_Status": "warning",
            "Color_Result": "Yellowish"
        }"#;

        let pushed: StationReading = serde_json::from_str(json).unwrap();
        assert_eq!(3, pushed.station_id);
        assert_eq!(7.1, pushed.reading.metric(MetricKind::Ph).value);
        assert_eq!("warning", pushed.reading.metric(MetricKind::Color).status);
        assert!(pushed.reading.timestamp >= before);
    }

    #[test]
    fn test_non_finite_metric() {
        let mut reading = ReadingMessage::default();
        assert_eq!(None, reading.non_finite_metric());

        reading.lead_value = f64::NAN;
        assert_eq!(Some(MetricKind::Lead), reading.non_finite_metric());
    }
}
