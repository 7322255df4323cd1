use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::Stage;

/// Descriptor of a candidate share target, as the sharing/pre-survey prompts
/// present it to the oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborInfo {
    pub id: u64,
    pub patient_info: Value,
    pub profile: Value,
    pub disease: String,
}

/// Sampled neighbors grouped by tie strength, ready for prompt rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeighborInfos {
    pub strong: Vec<NeighborInfo>,
    pub moderate: Vec<NeighborInfo>,
    pub weak: Vec<NeighborInfo>,
}

/// Stage prompt templates, owned by configuration. Placeholders `{profile}`,
/// `{news_text}` and (sharing/pre-survey only) `{neighbor_infos}` are
/// substituted by plain string replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplates {
    pub sharing: String,
    pub survey: SurveyTemplates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyTemplates {
    pub before: String,
    pub after: String,
}

impl PromptTemplates {
    /// Render the prompt for one stage. `profile` must already be the
    /// clinical-field-free view of the user.
    pub fn render(
        &self,
        stage: Stage,
        profile: &Value,
        news_text: &str,
        neighbor_infos: &NeighborInfos,
    ) -> String {
        let template = match stage {
            Stage::Sharing => &self.sharing,
            Stage::PreSurvey => &self.survey.before,
            Stage::PostSurvey => &self.survey.after,
        };

        let profile_json = pretty(profile);
        let mut prompt = template
            .replace("{profile}", &profile_json)
            .replace("{news_text}", news_text);

        // the post-survey template never sees candidate targets
        if matches!(stage, Stage::Sharing | Stage::PreSurvey) {
            let neighbors_json = serde_json::to_value(neighbor_infos)
                .map(|v| pretty(&v))
                .unwrap_or_default();
            prompt = prompt.replace("{neighbor_infos}", &neighbors_json);
        }

        prompt
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
