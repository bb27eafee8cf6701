//! Presentation rules of the station dashboard.
//!
//! Each metric is drawn as a needle gauge with an LCD value and a colored
//! status label. Nothing here touches a UI toolkit, the functions only
//! compute what should be shown.

use crate::{MetricKind, ReadingMessage};

pub const LCD_PLACEHOLDER: &str = "--";
pub const STATUS_PLACEHOLDER: &str = "NA";
pub const STATUS_ERROR: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeConfig {
    pub max_value: f64,
    pub min_rotation: f64,
    pub decimals: usize,
}

impl GaugeConfig {
    pub fn of(kind: MetricKind) -> GaugeConfig {
        let (max_value, decimals) = match kind {
            MetricKind::Tds => (1000.0, 0),
            MetricKind::Ph => (14.0, 2),
            MetricKind::Turbidity => (10.0, 2),
            MetricKind::Lead => (0.012, 4),
            MetricKind::Color => (100.0, 0),
        };
        GaugeConfig {
            max_value,
            min_rotation: -130.0,
            decimals,
        }
    }

    /// Needle angle in degrees, sweeping symmetrically from `min_rotation`
    /// to `-min_rotation`
    pub fn needle_rotation(&self, value: f64) -> f64 {
        let max_rotation = self.min_rotation.abs();
        let range = max_rotation - self.min_rotation;
        let clamped = value.max(0.0).min(self.max_value);
        let fraction = if self.max_value != 0.0 {
            clamped / self.max_value
        } else {
            0.0
        };
        self.min_rotation + fraction * range
    }
}

/// Color category of a status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Safe,
    Neutral,
    Warning,
    Failed,
}

impl StatusClass {
    pub fn classify(label: &str) -> StatusClass {
        match label.to_lowercase().as_str() {
            "safe" => StatusClass::Safe,
            "neutral" => StatusClass::Neutral,
            "warning" => StatusClass::Warning,
            _ => StatusClass::Failed,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StatusClass::Safe => "status-safe",
            StatusClass::Neutral => "status-neutral",
            StatusClass::Warning => "status-warning",
            StatusClass::Failed => "status-failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    pub kind: MetricKind,
    pub rotation: f64,
    pub lcd: String,
    pub status: String,
    pub class: StatusClass,
}

impl GaugeView {
    pub fn from_reading(kind: MetricKind, reading: &ReadingMessage) -> GaugeView {
        let config = GaugeConfig::of(kind);
        let metric = reading.metric(kind);
        let status = if metric.status.is_empty() {
            STATUS_PLACEHOLDER.to_owned()
        } else {
            metric.status.to_owned()
        };

        // the color gauge has no scale, its needle stays parked
        let (rotation, lcd) = match kind {
            MetricKind::Color => (config.min_rotation, color_lcd(reading)),
            _ if metric.value.is_finite() => (
                config.needle_rotation(metric.value),
                format!("{:.*}", config.decimals, metric.value),
            ),
            _ => (config.needle_rotation(0.0), LCD_PLACEHOLDER.to_owned()),
        };

        GaugeView {
            kind,
            rotation,
            lcd,
            class: StatusClass::classify(&status),
            status,
        }
    }

    pub fn error(kind: MetricKind) -> GaugeView {
        GaugeView {
            kind,
            rotation: GaugeConfig::of(kind).min_rotation,
            lcd: LCD_PLACEHOLDER.to_owned(),
            status: STATUS_ERROR.to_owned(),
            class: StatusClass::Failed,
        }
    }
}

fn color_lcd(reading: &ReadingMessage) -> String {
    if !reading.color_result.is_empty() {
        reading.color_result.clone()
    } else if reading.color_value.is_finite() {
        format!("{}", reading.color_value)
    } else {
        LCD_PLACEHOLDER.to_owned()
    }
}

/// All five gauges for a reading, in display order
pub fn gauges(reading: &ReadingMessage) -> Vec<GaugeView> {
    MetricKind::ALL
        .iter()
        .map(|kind| GaugeView::from_reading(*kind, reading))
        .collect()
}

/// All five gauges reset to their error position
pub fn error_gauges() -> Vec<GaugeView> {
    MetricKind::ALL.iter().map(|kind| GaugeView::error(*kind)).collect()
}
