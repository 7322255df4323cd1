use async_trait::async_trait;

/// Which question the oracle is being asked for an activated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PreSurvey,
    Sharing,
    PostSurvey,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PreSurvey => "pre_survey",
            Stage::Sharing => "sharing",
            Stage::PostSurvey => "post_survey",
        }
    }
}

/// Returned when the transport gives up; the engine treats it like any
/// other unparseable response.
pub const SENTINEL_RESPONSE: &str = "none";

/// The decision-making collaborator. The engine renders the stage prompt
/// from its templates and hands over opaque text; the oracle hands back
/// opaque text. Implementations never fail past this boundary — after
/// exhausting retries they return [`SENTINEL_RESPONSE`].
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn decide(&self, stage: Stage, prompt: &str) -> String;
}
