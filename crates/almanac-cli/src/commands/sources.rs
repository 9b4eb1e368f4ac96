use almanac_core::{Aggregator, Category, ProviderId};
use serde::Serialize;

use super::CommandOutput;

/// One registered source as printed by `almanac sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRow {
    pub id: ProviderId,
    pub label: &'static str,
    pub category: Category,
    pub status: &'static str,
}

pub fn run(aggregator: &Aggregator) -> CommandOutput {
    let rows = aggregator
        .snapshots()
        .into_iter()
        .map(|snapshot| SourceRow {
            id: snapshot.id,
            label: snapshot.label(),
            category: snapshot.category,
            status: snapshot.status_label(),
        })
        .collect();
    CommandOutput::Sources(rows)
}
