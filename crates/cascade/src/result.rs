use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One activated user's reaction: the parsed sharing decision plus the raw
/// survey texts, kept opaque for downstream analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub user_id: u64,
    #[serde(rename = "Emotion")]
    pub emotion: f64,
    #[serde(rename = "Willingness")]
    pub willingness: f64,
    #[serde(rename = "Credibility")]
    pub credibility: f64,
    #[serde(rename = "Share_to")]
    pub share_to: Vec<u64>,
    #[serde(rename = "Pre_Survey_Response")]
    pub pre_survey_response: String,
    #[serde(rename = "Post_Survey_Response")]
    pub post_survey_response: String,
}

/// Result of one propagation run from a single seed user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub root: u64,
    pub activated_users: Vec<u64>,
    pub feedback: Vec<Feedback>,
    pub depth: usize,
    pub breadth: usize,
    pub rate: f64,
}

impl Chain {
    pub fn new(
        root: u64,
        activated: HashSet<u64>,
        feedback: Vec<Feedback>,
        depth: usize,
        total_users: usize,
    ) -> Self {
        let breadth = activated.len();
        let rate = if total_users == 0 {
            0.0
        } else {
            round_to(breadth as f64 / total_users as f64, 4)
        };

        let mut activated_users: Vec<u64> = activated.into_iter().collect();
        activated_users.sort_unstable();

        Self {
            root,
            activated_users,
            feedback,
            depth,
            breadth,
            rate,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub avg_depth: f64,
    pub avg_breadth: f64,
    pub avg_rate: f64,
}

/// Everything recorded for one news item. Assembled once all its chains
/// finish, written out, then dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResult {
    pub news_id: u64,
    pub disease: String,
    pub chains: Vec<Chain>,
    pub summary: Summary,
}

pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
