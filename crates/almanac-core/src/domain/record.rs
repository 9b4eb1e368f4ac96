use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Category, ImpactLevel, ValidationError};

/// Canonical record produced by every adapter and by the fallback generator.
///
/// Category-specific fields (chamber, docket number, committee, ...) live in
/// `extra` and are flattened into the serialized object unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub category: Category,
    pub impact_level: ImpactLevel,
    pub location: String,
    pub description: String,
    pub source: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NormalizedRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        category: Category,
        impact_level: ImpactLevel,
        location: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            category,
            impact_level,
            location: location.into(),
            description: description.into(),
            source: source.into(),
            extra: BTreeMap::new(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Adds a category-specific pass-through field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Checks the record against the canonical shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyRecordField { field: "id" });
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyRecordField { field: "title" });
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::EmptyRecordField { field: "source" });
        }

        let tagged = self
            .id
            .split_once('-')
            .is_some_and(|(tag, rest)| !tag.is_empty() && !rest.is_empty());
        if !tagged {
            return Err(ValidationError::UntaggedRecordId {
                id: self.id.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedRecord {
        NormalizedRecord::new(
            "courtlistener-68541",
            "Loper Bright Enterprises v. Raimondo",
            "2024-06-28",
            Category::Judicial,
            ImpactLevel::Critical,
            "Supreme Court of the United States, Washington, DC",
            "Decided",
            "CourtListener",
        )
        .expect("valid record")
    }

    #[test]
    fn serializes_with_camel_case_and_flattened_extras() {
        let record = sample().with_extra("docketNumber", "22-451");
        let value = serde_json::to_value(&record).expect("serializable");

        assert_eq!(value["impactLevel"], "critical");
        assert_eq!(value["category"], "judicial");
        assert_eq!(value["docketNumber"], "22-451");
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn rejects_blank_title() {
        let err = NormalizedRecord::new(
            "fred-1",
            "  ",
            "2024-01-01",
            Category::Economic,
            ImpactLevel::Low,
            "",
            "",
            "FRED",
        )
        .expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyRecordField { field: "title" });
    }

    #[test]
    fn rejects_id_without_source_tag() {
        let mut record = sample();
        record.id = String::from("68541");
        assert!(matches!(
            record.validate(),
            Err(ValidationError::UntaggedRecordId { .. })
        ));
    }

    #[test]
    fn extras_survive_a_json_round_trip() {
        let record = sample().with_extra("status", "decided");
        let json = serde_json::to_string(&record).expect("serializable");
        let back: NormalizedRecord = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back.extra_str("status"), Some("decided"));
        assert_eq!(back, record);
    }
}
