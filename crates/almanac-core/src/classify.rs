//! Keyword-based impact classification shared by the adapters.

use crate::ImpactLevel;

/// Level assigned when no rule matches.
pub const BASELINE_IMPACT: ImpactLevel = ImpactLevel::Medium;

/// One ordered classification rule: any keyword hit assigns `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactRule {
    pub keywords: &'static [&'static str],
    pub level: ImpactLevel,
}

impl ImpactRule {
    pub const fn new(level: ImpactLevel, keywords: &'static [&'static str]) -> Self {
        Self { keywords, level }
    }

    fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| contains_word(text, keyword))
    }
}

/// True when `keyword` occurs in `text` bounded by non-alphanumerics or the ends.
fn contains_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + keyword.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Returns the level of the first rule whose keywords occur in `text`.
///
/// Matching is case-insensitive. Rules must be listed most-specific first.
pub fn classify_impact(text: &str, rules: &[ImpactRule]) -> ImpactLevel {
    let text = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&text))
        .map_or(BASELINE_IMPACT, |rule| rule.level)
}

/// Joins the non-empty parts into one classification string.
pub fn classification_text<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[ImpactRule] = &[
        ImpactRule::new(ImpactLevel::Critical, &["federal open market committee"]),
        ImpactRule::new(ImpactLevel::High, &["federal", "markup"]),
        ImpactRule::new(ImpactLevel::Low, &["postponed"]),
    ];

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(
            classify_impact("Federal Open Market Committee statement", RULES),
            ImpactLevel::Critical
        );
        assert_eq!(classify_impact("Federal Register notice", RULES), ImpactLevel::High);
    }

    #[test]
    fn unmatched_text_gets_the_baseline() {
        assert_eq!(classify_impact("Field hearing", RULES), ImpactLevel::Medium);
        assert_eq!(classify_impact("", RULES), ImpactLevel::Medium);
    }

    #[test]
    fn keywords_only_match_whole_words() {
        let rules = &[ImpactRule::new(ImpactLevel::Low, &["other", "10-year"])];

        assert_eq!(
            classify_impact("Notice Mother and Infant Nutrition Program Expansion", rules),
            ImpactLevel::Medium
        );
        assert_eq!(classify_impact("Another notice", rules), ImpactLevel::Medium);
        assert_eq!(classify_impact("Other", rules), ImpactLevel::Low);
        assert_eq!(classify_impact("Other: supporting material", rules), ImpactLevel::Low);
        assert_eq!(classify_impact("10-Year Note", rules), ImpactLevel::Low);
    }

    #[test]
    fn classification_text_skips_blank_parts() {
        assert_eq!(classification_text(["Markup", " ", "Postponed "]), "Markup Postponed");
    }
}
