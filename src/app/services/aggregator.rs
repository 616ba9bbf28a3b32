//! Aggregation over validated equipment records
//!
//! A pure reduction: counts, arithmetic means and the type distribution.
//! Averages are kept unrounded; rounding is a presentation concern.

use crate::app::models::{EquipmentRecord, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate figures for one upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub total_equipment: usize,
    pub average_flowrate: Option<f64>,
    pub average_pressure: Option<f64>,
    pub average_temperature: Option<f64>,
    /// Count per exact, trimmed type label
    pub equipment_type_distribution: BTreeMap<String, usize>,
}

impl Aggregate {
    /// Average for the given metric
    pub fn average(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Flowrate => self.average_flowrate,
            Metric::Pressure => self.average_pressure,
            Metric::Temperature => self.average_temperature,
        }
    }
}

/// Reduce records to totals, means and the type distribution
pub fn aggregate(records: &[EquipmentRecord]) -> Aggregate {
    let metric_mean = |metric: Metric| mean(records.iter().map(|r| r.reading(metric)));

    Aggregate {
        total_equipment: records.len(),
        average_flowrate: metric_mean(Metric::Flowrate),
        average_pressure: metric_mean(Metric::Pressure),
        average_temperature: metric_mean(Metric::Temperature),
        equipment_type_distribution: type_distribution(records),
    }
}

/// Arithmetic mean; `None` for an empty sequence
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Records grouped by type label; distinct casings stay distinct
pub fn type_distribution(records: &[EquipmentRecord]) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for record in records {
        *distribution
            .entry(record.equipment_type.clone())
            .or_insert(0) += 1;
    }
    distribution
}
