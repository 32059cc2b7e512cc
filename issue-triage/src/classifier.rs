//! Rule-based priority scoring.
//!
//! `score = base(category) + tier bonus + cluster boost`, clamped to 0..=100.
//! The classifier holds only immutable tables, so identical contexts always
//! produce identical assessments.

use crate::keywords::{KeywordTier, KeywordTiers, TierMatch};
use crate::model::{IssueContext, PriorityAssessment};
use crate::severity_table::SeverityTable;

/// Flat bonus when any critical keyword matches.
pub const CRITICAL_BONUS: u32 = 30;
/// Flat bonus when a high keyword matches and no critical one does.
pub const HIGH_BONUS: u32 = 15;
/// Per distinct medium keyword.
pub const MEDIUM_BONUS_PER_MATCH: u32 = 5;
pub const MEDIUM_BONUS_CAP: u32 = 10;
/// Per similar nearby issue.
pub const CLUSTER_BONUS_PER_ISSUE: u32 = 2;
pub const CLUSTER_BONUS_CAP: u32 = 20;

/// Keywords echoed back in the factor line.
const FACTOR_KEYWORD_LIMIT: usize = 3;

/// Deterministic fallback scorer.
#[derive(Debug, Clone, Default)]
pub struct RuleClassifier {
    table: SeverityTable,
    tiers: KeywordTiers,
}

impl RuleClassifier {
    pub fn new(table: SeverityTable, tiers: KeywordTiers) -> Self {
        Self { table, tiers }
    }

    pub fn table(&self) -> &SeverityTable {
        &self.table
    }

    /// Scores `ctx`. Never fails.
    pub fn classify(&self, ctx: &IssueContext) -> PriorityAssessment {
        let base = self.table.base_score(&ctx.category);
        let text = ctx.searchable_text();
        let tier = self.tiers.detect(&text);

        let raw = u32::from(base)
            + tier.as_ref().map_or(0, tier_bonus)
            + cluster_bonus(ctx.similar_issues_count);
        let score = raw.min(100) as u8;

        let mut factors = Vec::with_capacity(3);
        factors.push(format!(
            "Category: {} (base severity {base})",
            ctx.category
        ));
        if let Some(m) = &tier {
            factors.push(tier_factor(m));
        }
        if ctx.similar_issues_count > 0 {
            factors.push(format!(
                "{} similar issue(s) in area (widespread problem)",
                ctx.similar_issues_count
            ));
        }

        PriorityAssessment::rule_based(score, factors)
    }
}

/// Score added by the matched tier.
pub fn tier_bonus(m: &TierMatch) -> u32 {
    match m.tier {
        KeywordTier::Critical => CRITICAL_BONUS,
        KeywordTier::High => HIGH_BONUS,
        KeywordTier::Medium => {
            (MEDIUM_BONUS_PER_MATCH * m.keywords.len() as u32).min(MEDIUM_BONUS_CAP)
        }
    }
}

/// `min(2n, 20)`.
pub fn cluster_bonus(similar_issues_count: u32) -> u32 {
    similar_issues_count
        .saturating_mul(CLUSTER_BONUS_PER_ISSUE)
        .min(CLUSTER_BONUS_CAP)
}

fn tier_factor(m: &TierMatch) -> String {
    let label = match m.tier {
        KeywordTier::Critical => "Critical keywords detected",
        KeywordTier::High => "Urgency indicators",
        KeywordTier::Medium => "Maintenance indicators",
    };
    let shown: Vec<&str> = m
        .keywords
        .iter()
        .take(FACTOR_KEYWORD_LIMIT)
        .map(String::as_str)
        .collect();
    format!("{label}: {}", shown.join(", "))
}
