//! Fixed substitute records served when live aggregation yields nothing.
//!
//! Every set is literal data: no clock, no randomness, no I/O. Records are
//! tagged through `source` (`"<label> - Fallback"`), a `fallback-` id prefix
//! and the `fallbackVersion` extra field.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{Category, CategoryFilter, ImpactLevel, NormalizedRecord, ProviderId};

/// Version of the literal data below; bump when any record changes.
pub const FALLBACK_SET_VERSION: &str = "2024.06";

/// Suffix appended to the provider label of every fallback record.
pub const FALLBACK_MARKER: &str = " - Fallback";

struct FallbackEntry {
    key: &'static str,
    provider: ProviderId,
    title: &'static str,
    date: &'static str,
    impact: ImpactLevel,
    location: &'static str,
    description: &'static str,
    extra: &'static [(&'static str, &'static str)],
}

// Each set is listed in ascending date order.
const CONGRESSIONAL: &[FallbackEntry] = &[
    FallbackEntry {
        key: "congressional-1",
        provider: ProviderId::Congress,
        title: "House Appropriations Committee Markup of FY2025 Spending Bills",
        date: "2024-06-13",
        impact: ImpactLevel::Critical,
        location: "2359 Rayburn House Office Building, Washington, DC",
        description: "House Markup: House Appropriations Committee (Scheduled)",
        extra: &[
            ("chamber", "House"),
            ("committee", "House Appropriations Committee"),
            ("meetingStatus", "Scheduled"),
            ("meetingType", "Markup"),
        ],
    },
    FallbackEntry {
        key: "congressional-2",
        provider: ProviderId::Congress,
        title: "Senate Banking Committee Hearing on Monetary Policy",
        date: "2024-07-09",
        impact: ImpactLevel::High,
        location: "538 Dirksen Senate Office Building, Washington, DC",
        description: "Senate Hearing: Committee on Banking, Housing, and Urban Affairs (Scheduled)",
        extra: &[
            ("chamber", "Senate"),
            ("committee", "Committee on Banking, Housing, and Urban Affairs"),
            ("meetingStatus", "Scheduled"),
            ("meetingType", "Hearing"),
        ],
    },
];

const ECONOMIC: &[FallbackEntry] = &[
    FallbackEntry {
        key: "economic-1",
        provider: ProviderId::Treasury,
        title: "10-Year Note Auction",
        date: "2024-06-11",
        impact: ImpactLevel::Critical,
        location: "U.S. Department of the Treasury, Washington, DC",
        description: "10-Year Note Auction; offering amount $39000000000",
        extra: &[
            ("securityType", "Note"),
            ("securityTerm", "10-Year"),
            ("offeringAmount", "39000000000"),
        ],
    },
    FallbackEntry {
        key: "economic-2",
        provider: ProviderId::Fred,
        title: "Consumer Price Index",
        date: "2024-06-12",
        impact: ImpactLevel::Critical,
        location: "Washington, DC",
        description: "Scheduled publication of Consumer Price Index",
        extra: &[("releaseId", "10")],
    },
    FallbackEntry {
        key: "economic-3",
        provider: ProviderId::Fred,
        title: "Employment Situation",
        date: "2024-07-05",
        impact: ImpactLevel::Critical,
        location: "Washington, DC",
        description: "Scheduled publication of Employment Situation",
        extra: &[("releaseId", "50")],
    },
    FallbackEntry {
        key: "economic-4",
        provider: ProviderId::Fred,
        title: "Federal Open Market Committee Rate Decision",
        date: "2024-07-31",
        impact: ImpactLevel::Critical,
        location: "Washington, DC",
        description: "Scheduled publication of Federal Open Market Committee Rate Decision",
        extra: &[("releaseId", "101")],
    },
];

const JUDICIAL: &[FallbackEntry] = &[
    FallbackEntry {
        key: "judicial-1",
        provider: ProviderId::CourtListener,
        title: "Securities and Exchange Commission v. Jarkesy",
        date: "2024-06-27",
        impact: ImpactLevel::High,
        location: "Supreme Court of the United States, Washington, DC",
        description: "Docket 22-859; decided",
        extra: &[
            ("docketNumber", "22-859"),
            ("court", "scotus"),
            ("status", "decided"),
        ],
    },
    FallbackEntry {
        key: "judicial-2",
        provider: ProviderId::CourtListener,
        title: "Loper Bright Enterprises v. Raimondo",
        date: "2024-06-28",
        impact: ImpactLevel::Critical,
        location: "Supreme Court of the United States, Washington, DC",
        description: "Docket 22-451; decided",
        extra: &[
            ("docketNumber", "22-451"),
            ("court", "scotus"),
            ("status", "decided"),
        ],
    },
];

const REGULATORY: &[FallbackEntry] = &[
    FallbackEntry {
        key: "regulatory-1",
        provider: ProviderId::Regulations,
        title: "Proposed Rule: Enhanced Disclosure Requirements for Investment Advisers",
        date: "2024-06-03",
        impact: ImpactLevel::High,
        location: "SEC, Washington, DC",
        description: "Proposed Rule posted by SEC; comments due 2024-08-02",
        extra: &[
            ("documentType", "Proposed Rule"),
            ("agencyId", "SEC"),
            ("commentEndDate", "2024-08-02"),
        ],
    },
    FallbackEntry {
        key: "regulatory-2",
        provider: ProviderId::Regulations,
        title: "Final Rule: National Ambient Air Quality Standards Revision",
        date: "2024-06-20",
        impact: ImpactLevel::Critical,
        location: "EPA, Washington, DC",
        description: "Rule posted by EPA",
        extra: &[("documentType", "Rule"), ("agencyId", "EPA")],
    },
];

const fn entries_for(category: Category) -> &'static [FallbackEntry] {
    match category {
        Category::Congressional => CONGRESSIONAL,
        Category::Economic => ECONOMIC,
        Category::Judicial => JUDICIAL,
        Category::Regulatory => REGULATORY,
    }
}

impl FallbackEntry {
    fn category(&self) -> Category {
        self.provider.category()
    }

    fn to_record(&self) -> NormalizedRecord {
        let mut extra: BTreeMap<String, Value> = self
            .extra
            .iter()
            .map(|(key, value)| ((*key).to_owned(), Value::from(*value)))
            .collect();
        extra.insert(
            String::from("fallbackVersion"),
            Value::from(FALLBACK_SET_VERSION),
        );

        NormalizedRecord {
            id: format!("fallback-{}", self.key),
            title: self.title.to_owned(),
            date: self.date.to_owned(),
            category: self.category(),
            impact_level: self.impact,
            location: self.location.to_owned(),
            description: self.description.to_owned(),
            source: format!("{}{FALLBACK_MARKER}", self.provider.label()),
            extra,
        }
    }
}

/// Returns the fixed fallback set for `filter`.
///
/// A single category yields that category's full set; the wildcard yields the
/// first record of every category, in ascending date order.
pub fn fallback_records(filter: CategoryFilter) -> Vec<NormalizedRecord> {
    match filter {
        CategoryFilter::Only(category) => entries_for(category)
            .iter()
            .map(FallbackEntry::to_record)
            .collect(),
        CategoryFilter::All => {
            let mut general: Vec<&FallbackEntry> = Category::ALL
                .iter()
                .filter_map(|category| entries_for(*category).first())
                .collect();
            general.sort_by_key(|entry| entry.date);
            general.into_iter().map(FallbackEntry::to_record).collect()
        }
    }
}

/// Whether `record` came from [`fallback_records`].
pub fn is_fallback_record(record: &NormalizedRecord) -> bool {
    record.source.ends_with(FALLBACK_MARKER)
}
