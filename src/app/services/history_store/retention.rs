//! Retention policy for stored summaries
//!
//! Two knobs: `max_entries` evicts the oldest summaries (0 keeps everything,
//! otherwise at least two are kept so a trend can always be computed), and
//! `equipment_retention` decides which summaries keep their equipment list.

use crate::app::models::UploadSummary;
use crate::config::{EquipmentRetention, HistoryConfig};
use crate::constants::MIN_HISTORY_ENTRIES;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Shape a new summary before it is stored
pub fn prepare_new(summary: UploadSummary, config: &HistoryConfig) -> UploadSummary {
    match config.equipment_retention {
        EquipmentRetention::None => UploadSummary {
            equipment: None,
            ..summary
        },
        EquipmentRetention::LatestOnly | EquipmentRetention::All => summary,
    }
}

/// Apply eviction and equipment retention to entries ordered oldest first
pub fn apply(entries: &mut VecDeque<Arc<UploadSummary>>, config: &HistoryConfig) {
    if config.max_entries != 0 {
        // Configs built in code skip validation, so the floor is applied here
        let cap = config.max_entries.max(MIN_HISTORY_ENTRIES);
        while entries.len() > cap {
            if let Some(evicted) = entries.pop_front() {
                debug!("Evicted upload {} from history", evicted.id());
            }
        }
    }

    let keep_from = match config.equipment_retention {
        EquipmentRetention::All => return,
        EquipmentRetention::LatestOnly => entries.len().saturating_sub(1),
        EquipmentRetention::None => entries.len(),
    };

    for entry in entries.iter_mut().take(keep_from) {
        if entry.equipment.is_some() {
            *entry = Arc::new(entry.without_equipment());
        }
    }
}
