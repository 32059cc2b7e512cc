//! Category → base severity lookup.

use std::collections::HashMap;

/// Base score for categories missing from the table.
pub const DEFAULT_SEVERITY: u8 = 40;

/// Civic categories and their inherent urgency (0..=100).
pub const CIVIC_CATEGORIES: [(&str, u8); 11] = [
    ("Safety & Security", 90),
    ("Health & Sanitation", 85),
    ("Water Supply", 80),
    ("Electricity", 75),
    ("Road & Infrastructure", 70),
    ("Street Lights", 65),
    ("Waste Management", 60),
    ("Public Transport", 55),
    ("Education", 50),
    ("Parks & Recreation", 45),
    ("Other", 40),
];

/// Immutable severity table injected into [`crate::RuleClassifier`].
#[derive(Debug, Clone)]
pub struct SeverityTable {
    entries: HashMap<String, u8>,
    fallback: u8,
}

impl SeverityTable {
    /// Builds a table from `(category, score)` pairs. Scores above 100 are clamped.
    pub fn new<I, S>(entries: I, fallback: u8) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, score)| (name.into(), score.min(100)))
                .collect(),
            fallback: fallback.min(100),
        }
    }

    /// The standard civic table.
    pub fn civic_defaults() -> Self {
        Self::new(CIVIC_CATEGORIES, DEFAULT_SEVERITY)
    }

    /// Exact-name lookup; unknown categories get the fallback score.
    pub fn base_score(&self, category: &str) -> u8 {
        self.entries.get(category).copied().unwrap_or(self.fallback)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self::civic_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories() {
        let t = SeverityTable::civic_defaults();
        assert_eq!(t.base_score("Safety & Security"), 90);
        assert_eq!(t.base_score("Electricity"), 75);
        assert_eq!(t.base_score("Parks & Recreation"), 45);
        assert_eq!(t.base_score("Other"), 40);
    }

    #[test]
    fn unknown_category_is_neutral_low() {
        let t = SeverityTable::civic_defaults();
        assert!(!t.contains("Noise"));
        assert_eq!(t.base_score("Noise"), DEFAULT_SEVERITY);
        // Lookup is exact; case variants are unknown.
        assert_eq!(t.base_score("electricity"), DEFAULT_SEVERITY);
    }

    #[test]
    fn custom_table_clamps() {
        let t = SeverityTable::new([("Flood", 250u8)], 10);
        assert_eq!(t.base_score("Flood"), 100);
        assert_eq!(t.base_score("x"), 10);
    }
}
