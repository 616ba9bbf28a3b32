//! Report payload for an external document renderer
//!
//! The payload bundles the latest summary (with its equipment list when
//! retained), the current trend and a flat list of `label: value` lines in
//! the order a report page lists them. Rendering the document is left to the
//! caller.

use crate::app::models::{Metric, UploadSummary};
use crate::app::services::history_store::HistoryStore;
use crate::app::services::trend_comparator::{self, TrendComparison};
use crate::constants::{DISPLAY_DECIMAL_PLACES, REPORT_TITLE};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One `label: value` line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub value: String,
}

impl ReportLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Everything a renderer needs for the latest upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub summary: UploadSummary,
    pub trend: Option<TrendComparison>,
    pub lines: Vec<ReportLine>,
}

impl ReportPayload {
    /// Build the payload for the most recent stored summary
    pub fn from_store(store: &dyn HistoryStore, generated_at: DateTime<Utc>) -> Result<Self> {
        let latest = store
            .latest()
            .ok_or_else(|| Error::not_found("latest (history is empty)"))?;
        let trend = trend_comparator::compare_latest(store);

        Ok(Self::new(latest.as_ref().clone(), trend, generated_at))
    }

    /// Build the payload for a given summary
    pub fn new(
        summary: UploadSummary,
        trend: Option<TrendComparison>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let lines = report_lines(&summary, trend.as_ref());
        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            summary,
            trend,
            lines,
        }
    }

    /// Lines joined as `label: value`, one per row
    pub fn to_text(&self) -> String {
        let mut text = format!("{}\n\n", self.title);
        for line in &self.lines {
            text.push_str(&format!("{}: {}\n", line.label, line.value));
        }
        text
    }
}

fn report_lines(summary: &UploadSummary, trend: Option<&TrendComparison>) -> Vec<ReportLine> {
    let mut lines = vec![ReportLine::new("uploaded_at", summary.id())];

    if let Some(filename) = &summary.filename {
        lines.push(ReportLine::new("filename", filename));
    }

    lines.push(ReportLine::new(
        "total_equipment",
        summary.total_equipment.to_string(),
    ));

    for metric in Metric::ALL {
        lines.push(ReportLine::new(
            format!("average_{}", metric.label()),
            format_average(summary.average(metric), metric.unit()),
        ));
    }

    lines.push(ReportLine::new(
        "equipment_type_distribution",
        format_distribution(&summary.equipment_type_distribution),
    ));
    lines.push(ReportLine::new("rejected_rows", summary.rejected_rows.to_string()));

    for warning in &summary.validation_warnings {
        lines.push(ReportLine::new(
            format!("warning.{}", warning.kind),
            format!("{} [{}]", warning.message, warning.details.join("; ")),
        ));
    }

    if let Some(trend) = trend {
        for delta in trend.deltas() {
            lines.push(ReportLine::new(
                format!("trend.{}", delta.metric),
                delta.render(),
            ));
        }
    }

    lines
}

/// Average rounded for display, `n/a` when absent
pub fn format_average(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*} {}", DISPLAY_DECIMAL_PLACES, v, unit),
        None => "n/a".to_string(),
    }
}

/// `Pump: 2, Valve: 1`
pub fn format_distribution(distribution: &BTreeMap<String, usize>) -> String {
    distribution
        .iter()
        .map(|(label, count)| format!("{}: {}", label, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{EquipmentRecord, PendingSummary, Warning, WarningKind};
    use crate::app::services::history_store::InMemoryHistoryStore;
    use crate::config::HistoryConfig;
    use chrono::TimeZone;

    fn create_pending(flowrate: f64) -> PendingSummary {
        let mut distribution = BTreeMap::new();
        distribution.insert("Pump".to_string(), 2);
        distribution.insert("Valve".to_string(), 1);

        PendingSummary {
            filename: Some("plant.csv".to_string()),
            total_equipment: 3,
            average_flowrate: Some(flowrate),
            average_pressure: Some(8.0),
            average_temperature: Some(70.0 / 3.0),
            equipment_type_distribution: distribution,
            validation_warnings: vec![Warning {
                kind: WarningKind::PressureHigh,
                message: WarningKind::PressureHigh.message().to_string(),
                details: vec!["P-101: 11.0 bar".to_string()],
            }],
            rejected_rows: 1,
            equipment: Some(vec![
                EquipmentRecord::new("P-101", "Pump", flowrate, 11.0, 80.0).unwrap(),
            ]),
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_history_has_no_report() {
        let store = InMemoryHistoryStore::new(HistoryConfig::default());
        let err = ReportPayload::from_store(&store, generated_at()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_report_for_single_upload() {
        let store = InMemoryHistoryStore::new(HistoryConfig::default());
        store.append(create_pending(11.25)).unwrap();

        let payload = ReportPayload::from_store(&store, generated_at()).unwrap();
        assert_eq!(payload.title, "Chemical Equipment Report");
        assert!(payload.trend.is_none());
        assert!(payload.summary.equipment.is_some());

        let labels: Vec<&str> = payload.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "uploaded_at",
                "filename",
                "total_equipment",
                "average_flowrate",
                "average_pressure",
                "average_temperature",
                "equipment_type_distribution",
                "rejected_rows",
                "warning.pressure_high",
            ]
        );

        let value = |label: &str| {
            payload
                .lines
                .iter()
                .find(|l| l.label == label)
                .map(|l| l.value.clone())
                .unwrap()
        };
        assert_eq!(value("average_flowrate"), "11.25 m³/h");
        assert_eq!(value("average_temperature"), "23.33 °C");
        assert_eq!(value("equipment_type_distribution"), "Pump: 2, Valve: 1");
    }

    #[test]
    fn test_report_includes_trend_lines() {
        let store = InMemoryHistoryStore::new(HistoryConfig::default());
        store.append(create_pending(10.0)).unwrap();
        store.append(create_pending(12.5)).unwrap();

        let payload = ReportPayload::from_store(&store, generated_at()).unwrap();
        assert!(payload.trend.is_some());

        let text = payload.to_text();
        assert!(text.starts_with("Chemical Equipment Report\n\n"));
        assert!(text.contains("trend.flowrate: +25.00%\n"));
        assert!(text.contains("trend.pressure: +0.00%\n"));
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(8.0), "bar"), "8.00 bar");
        assert_eq!(format_average(None, "bar"), "n/a");
    }
}
