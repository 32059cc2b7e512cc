//! Optional photo analysis signal.
//!
//! Only the first photo is sent. The result is advisory and is never mixed
//! into the priority score.

use std::sync::Arc;
use std::time::Duration;

use ai_llm_service::ChatModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::PriorityLevel;
use crate::prompt::PHOTO_PROMPT;
use crate::verdict::{parse_json_reply, priority_name};

/// What the vision model saw in a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAnalysis {
    #[serde(deserialize_with = "priority_name")]
    pub severity: PriorityLevel,
    pub description: String,
    #[serde(default)]
    pub detected_hazards: Vec<String>,
}

#[derive(Clone)]
pub struct PhotoAnalyzer {
    vision: Option<Arc<dyn ChatModel>>,
    timeout: Duration,
}

impl PhotoAnalyzer {
    pub fn new(vision: Option<Arc<dyn ChatModel>>, timeout: Duration) -> Self {
        Self { vision, timeout }
    }

    pub fn is_configured(&self) -> bool {
        self.vision.is_some()
    }

    /// Analyzes `photo_refs[0]`. `None` when there are no photos, no vision
    /// model, or the call or its reply fails in any way.
    pub async fn analyze(&self, photo_refs: &[String]) -> Option<PhotoAnalysis> {
        let first = photo_refs.first()?;
        let vision = self.vision.as_ref()?;

        debug!(model = %vision.model(), photos = photo_refs.len(), "analyzing first photo");

        let reply = match tokio::time::timeout(
            self.timeout,
            vision.describe_image(PHOTO_PROMPT, first),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "photo analysis failed");
                return None;
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "photo analysis timed out");
                return None;
            }
        };

        parse_json_reply::<PhotoAnalysis>(&reply)
            .inspect_err(|e| warn!(error = %e, "photo analysis reply unusable"))
            .ok()
    }
}

impl std::fmt::Debug for PhotoAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoAnalyzer")
            .field("vision", &self.vision.as_ref().map(|m| m.model().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
