//! Trend comparison between the two most recent upload summaries
//!
//! For each averaged metric the comparator reports
//! `(latest - previous) / previous * 100`, rounded to two decimal places.
//! A change from zero, or between missing averages, is undefined: it is
//! reported as `None` (serialized as `null`) and rendered as a dash, never
//! as `NaN` or infinity.

use crate::app::models::{Metric, UploadSummary};
use crate::app::services::history_store::HistoryStore;
use crate::constants::{TREND_DECIMAL_PLACES, UNDEFINED_DELTA};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Change of one averaged metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub metric: Metric,
    pub previous: Option<f64>,
    pub latest: Option<f64>,
    /// Rounded percentage; `None` when undefined
    pub percent_change: Option<f64>,
}

impl MetricDelta {
    fn between(metric: Metric, latest: &UploadSummary, previous: &UploadSummary) -> Self {
        let latest_value = latest.average(metric);
        let previous_value = previous.average(metric);

        let percent_change = match (previous_value, latest_value) {
            (Some(previous), Some(latest)) => percent_change(previous, latest),
            _ => None,
        };

        Self {
            metric,
            previous: previous_value,
            latest: latest_value,
            percent_change,
        }
    }

    /// Percentage for display, or the undefined placeholder
    pub fn render(&self) -> String {
        render_percent(self.percent_change)
    }
}

/// Comparison of the latest summary against the one before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendComparison {
    pub latest_uploaded_at: DateTime<Utc>,
    pub previous_uploaded_at: DateTime<Utc>,
    pub flowrate: MetricDelta,
    pub pressure: MetricDelta,
    pub temperature: MetricDelta,
}

impl TrendComparison {
    /// Delta for one metric
    pub fn delta(&self, metric: Metric) -> &MetricDelta {
        match metric {
            Metric::Flowrate => &self.flowrate,
            Metric::Pressure => &self.pressure,
            Metric::Temperature => &self.temperature,
        }
    }

    /// All deltas in reporting order
    pub fn deltas(&self) -> [&MetricDelta; 3] {
        Metric::ALL.map(|metric| self.delta(metric))
    }
}

/// Compare two summaries
pub fn compare(latest: &UploadSummary, previous: &UploadSummary) -> TrendComparison {
    TrendComparison {
        latest_uploaded_at: latest.uploaded_at,
        previous_uploaded_at: previous.uploaded_at,
        flowrate: MetricDelta::between(Metric::Flowrate, latest, previous),
        pressure: MetricDelta::between(Metric::Pressure, latest, previous),
        temperature: MetricDelta::between(Metric::Temperature, latest, previous),
    }
}

/// Compare the two most recent stored summaries; `None` with fewer than two
pub fn compare_latest(store: &dyn HistoryStore) -> Option<TrendComparison> {
    store
        .latest_pair()
        .map(|(latest, previous)| compare(&latest, &previous))
}

/// Rounded percentage change, `None` when it is not a finite number
pub fn percent_change(previous: f64, latest: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    let change = (latest - previous) / previous * 100.0;
    let scale = 10f64.powi(TREND_DECIMAL_PLACES);
    let rounded = (change * scale).round() / scale;

    // Adding zero folds -0.0 into 0.0
    rounded.is_finite().then_some(rounded + 0.0)
}

/// `+12.35%`, `-4.00%` or the undefined placeholder
pub fn render_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.*}%", TREND_DECIMAL_PLACES as usize, v),
        None => UNDEFINED_DELTA.to_string(),
    }
}
