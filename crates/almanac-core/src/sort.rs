//! Date ordering and truncation of merged record sets.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{record_instant, NormalizedRecord};

/// Limit used when the request omits `limit` or sends a non-numeric value.
pub const DEFAULT_LIMIT: i64 = 50;

/// Chronological direction applied to validly dated records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn compare(self, left: &OffsetDateTime, right: &OffsetDateTime) -> Ordering {
        match self {
            Self::Ascending => left.cmp(right),
            Self::Descending => right.cmp(left),
        }
    }
}

/// Coerces a raw `limit` parameter; absent or non-numeric input yields [`DEFAULT_LIMIT`].
pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_LIMIT)
}

/// Orders `records` by date and keeps the first `limit`.
///
/// Unparsable dates always sort after valid ones. The sort is stable, so ties
/// (including every unparsable date) keep their emission order.
pub fn sort_and_limit(
    records: Vec<NormalizedRecord>,
    limit: i64,
    order: SortOrder,
) -> Vec<NormalizedRecord> {
    if limit <= 0 {
        return Vec::new();
    }

    let mut keyed: Vec<(Option<OffsetDateTime>, NormalizedRecord)> = records
        .into_iter()
        .map(|record| (record_instant(&record.date), record))
        .collect();

    keyed.sort_by(|(left, _), (right, _)| match (left, right) {
        (Some(left), Some(right)) => order.compare(left, right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    keyed
        .into_iter()
        .take(limit)
        .map(|(_, record)| record)
        .collect()
}
