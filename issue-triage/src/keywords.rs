//! Keyword severity tiers.
//!
//! Matching is plain lowercase substring search. There is no stemming and no
//! negation handling: "not dangerous" still hits "dangerous".

const CRITICAL_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "dangerous",
    "hazardous",
    "life-threatening",
    "critical",
    "severe",
    "immediate",
    "fatal",
    "death",
    "injury",
    "injured",
    "accident",
    "collapsed",
    "fire",
    "explosion",
    "leak",
    "flooding",
    "burst",
    "broken glass",
    "exposed wire",
    "live wire",
    "electric shock",
    "gas leak",
    "contaminated",
    "toxic",
    "overflow",
    "manholes",
    "open manhole",
];

const HIGH_KEYWORDS: &[&str] = &[
    "broken",
    "damaged",
    "not working",
    "malfunctioning",
    "blocked",
    "overflowing",
    "stagnant",
    "foul smell",
    "spreading",
    "growing",
    "worse",
    "deteriorating",
    "multiple",
    "several",
    "many",
    "weeks",
    "days",
];

const MEDIUM_KEYWORDS: &[&str] = &[
    "issue",
    "problem",
    "concern",
    "needs attention",
    "requires",
    "should be",
    "would be",
    "improvement",
    "repair",
    "fix",
    "maintenance",
];

/// The three mutually exclusive buckets, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTier {
    Critical,
    High,
    Medium,
}

/// The tier that applied to a text and the keywords that triggered it,
/// in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierMatch {
    pub tier: KeywordTier,
    pub keywords: Vec<String>,
}

/// Immutable keyword configuration.
#[derive(Debug, Clone)]
pub struct KeywordTiers {
    critical: Vec<String>,
    high: Vec<String>,
    medium: Vec<String>,
}

impl KeywordTiers {
    /// Custom tiers. Keywords are lowercased and deduplicated.
    pub fn new<S: AsRef<str>>(critical: &[S], high: &[S], medium: &[S]) -> Self {
        Self {
            critical: normalize(critical),
            high: normalize(high),
            medium: normalize(medium),
        }
    }

    fn list(&self, tier: KeywordTier) -> &[String] {
        match tier {
            KeywordTier::Critical => &self.critical,
            KeywordTier::High => &self.high,
            KeywordTier::Medium => &self.medium,
        }
    }

    /// All keywords of `tier` contained in `text` (expected lowercase).
    pub fn matches(&self, tier: KeywordTier, text: &str) -> Vec<String> {
        self.list(tier)
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .cloned()
            .collect()
    }

    /// First tier (critical → high → medium) with at least one hit.
    pub fn detect(&self, text: &str) -> Option<TierMatch> {
        [KeywordTier::Critical, KeywordTier::High, KeywordTier::Medium]
            .into_iter()
            .find_map(|tier| {
                let keywords = self.matches(tier, text);
                (!keywords.is_empty()).then_some(TierMatch { tier, keywords })
            })
    }
}

impl Default for KeywordTiers {
    fn default() -> Self {
        Self::new(CRITICAL_KEYWORDS, HIGH_KEYWORDS, MEDIUM_KEYWORDS)
    }
}

fn normalize<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for w in words {
        let w = w.as_ref().trim().to_lowercase();
        if !w.is_empty() && !out.contains(&w) {
            out.push(w);
        }
    }
    out
}
