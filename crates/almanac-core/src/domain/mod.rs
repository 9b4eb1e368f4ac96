//! # Domain Models
//!
//! Canonical record types shared by every provider adapter, the aggregator,
//! the sorter and the fallback generator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`NormalizedRecord`] | One calendar/case/document entry in canonical shape |
//! | [`Category`] | Closed domain partition (congressional, economic, ...) |
//! | [`CategoryFilter`] | Request-level category selection with wildcard |
//! | [`ImpactLevel`] | low / medium / high / critical |
//! | [`UtcDateTime`] | UTC timestamp used in response envelopes |

mod category;
mod record;
mod timestamp;

pub use category::{Category, CategoryFilter, ImpactLevel};
pub use record::NormalizedRecord;
pub use timestamp::{format_date, parse_date, record_instant, UtcDateTime};
