//! Prompt templates sent to the AI providers.

use crate::model::IssueContext;

/// System instruction for providers that accept one.
pub const TRIAGE_SYSTEM_PROMPT: &str =
    "You are an expert civic issue triage AI. Respond only with valid JSON.";

/// Fixed instruction for the photo signal.
pub const PHOTO_PROMPT: &str = r#"Analyze this civic issue photo and provide:
1. Severity assessment (Low/Medium/High/Critical)
2. Brief description of what you see
3. List of any safety hazards detected

Respond in JSON format:
{
  "severity": "Low|Medium|High|Critical",
  "description": "What you see in the image",
  "detectedHazards": ["hazard1", "hazard2"]
}"#;

/// Builds the triage prompt for one issue.
pub fn build_triage_prompt(ctx: &IssueContext) -> String {
    format!(
        r#"You are an expert civic issue triage system. Analyze this civic issue report and determine its priority level.

**Issue Details:**
- Category: {category}
- Title: {title}
- Description: {description}
- Similar issues in area: {similar}
- Photos attached: {photos}

**Priority Levels:**
- Critical (85-100): Immediate safety threats, life-threatening situations, major infrastructure failures
- High (70-84): Significant problems requiring urgent attention, public safety concerns
- Medium (50-69): Important issues needing timely resolution, quality of life impacts
- Low (0-49): Minor concerns for routine maintenance, aesthetic improvements

**Analysis Instructions:**
1. Consider public safety impact
2. Assess urgency and time sensitivity
3. Evaluate potential for escalation
4. Consider community impact (number of affected citizens)
5. Factor in similar issues count (indicates widespread problem)

**Response Format (JSON):**
{{
  "priority": "Critical|High|Medium|Low",
  "score": 0-100,
  "reasoning": "Brief explanation of why this priority was assigned",
  "safetyRisk": "None|Low|Moderate|High|Critical",
  "urgencyLevel": "Can wait|Within week|Within 24h|Immediate",
  "impactAssessment": "Description of potential impact"
}}

Provide ONLY the JSON response, no additional text."#,
        category = ctx.category,
        title = ctx.title,
        description = ctx.description,
        similar = ctx.similar_issues_count,
        photos = ctx.photo_refs.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoPoint;

    #[test]
    fn prompt_embeds_issue_fields() {
        let ctx = IssueContext::new(
            "Water Supply",
            "Pipe burst",
            "Main road flooded",
            GeoPoint::new(0.0, 0.0),
        )
        .with_similar_issues(4)
        .with_photos(vec!["https://img/1.jpg".into(), "https://img/2.jpg".into()]);

        let p = build_triage_prompt(&ctx);
        assert!(p.contains("- Category: Water Supply"));
        assert!(p.contains("- Title: Pipe burst"));
        assert!(p.contains("- Description: Main road flooded"));
        assert!(p.contains("- Similar issues in area: 4"));
        assert!(p.contains("- Photos attached: 2"));
        for field in [
            "\"priority\"",
            "\"score\"",
            "\"reasoning\"",
            "\"safetyRisk\"",
            "\"urgencyLevel\"",
            "\"impactAssessment\"",
        ] {
            assert!(p.contains(field), "missing {field}");
        }
    }
}
