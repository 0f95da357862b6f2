/// Entity label filter.
///
/// A filter wrapped in double quotes matches the whole label exactly,
/// case-sensitively. Any other non-empty filter is a case-insensitive
/// substring. Filtering changes how many entities are colored, so the
/// colors the matching entities receive can differ from an unfiltered run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityFilter {
    /// Match every entity.
    #[default]
    All,
    /// Whole-label, case-sensitive match.
    Exact(String),
    /// Case-insensitive substring match; stored lowercased.
    Substring(String),
}

impl EntityFilter {
    /// Parse a filter as typed by the user.
    #[must_use]
    pub fn parse(filter: &str) -> Self {
        if filter.is_empty() {
            return Self::All;
        }
        if let Some(inner) = filter
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return Self::Exact(inner.to_owned());
        }
        Self::Substring(filter.to_lowercase())
    }

    /// Whether `label` passes the filter.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(pattern) => label == pattern,
            Self::Substring(pattern) => {
                label.to_lowercase().contains(pattern.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_everything() {
        let filter = EntityFilter::parse("");
        assert_eq!(filter, EntityFilter::All);
        assert!(filter.matches("anything"));
    }

    #[test]
    fn quoted_is_exact_and_case_sensitive() {
        let filter = EntityFilter::parse("\"Actin\"");
        assert!(filter.matches("Actin"));
        assert!(!filter.matches("actin"));
        assert!(!filter.matches("Actin filament"));
    }

    #[test]
    fn unquoted_is_case_insensitive_substring() {
        let filter = EntityFilter::parse("ACT");
        assert!(filter.matches("F-actin"));
        assert!(filter.matches("Actin"));
        assert!(!filter.matches("Tubulin"));
    }

    #[test]
    fn lone_quote_is_a_substring() {
        let filter = EntityFilter::parse("\"");
        assert_eq!(filter, EntityFilter::Substring("\"".to_owned()));
    }
}
