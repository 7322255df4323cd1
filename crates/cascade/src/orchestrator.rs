use anyhow::Result;
use rand::Rng;
use std::collections::HashSet;
use tracing::info;

use oracle::DecisionOracle;
use population::{NewsItem, UserDirectory};

use crate::engine::PropagationEngine;
use crate::result::{Chain, NewsResult, Summary, round_to};
use crate::writer::ResultWriter;

/// Drives propagation across every seed user of every news item and rolls
/// chain results up into per-item summaries.
pub struct CampaignOrchestrator<'a, O, R> {
    directory: &'a UserDirectory,
    engine: PropagationEngine<'a, O, R>,
    used_users: HashSet<u64>,
}

impl<'a, O: DecisionOracle, R: Rng> CampaignOrchestrator<'a, O, R> {
    pub fn new(directory: &'a UserDirectory, engine: PropagationEngine<'a, O, R>) -> Self {
        Self {
            directory,
            engine,
            used_users: HashSet::new(),
        }
    }

    /// Mark ids as consumed for subsequent chains of the current news item.
    /// The engine itself never mutates the set, and the default `run_news`
    /// loop never calls this, so out of the box the exclusion only covers
    /// ids present when a chain starts. Callers driving `run_seed`
    /// themselves can mark each chain's activated set to get full
    /// cross-chain exclusion.
    pub fn mark_used(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.used_users.extend(ids);
    }

    /// Run one chain against the current `used_users` state.
    pub async fn run_seed(&mut self, news: &NewsItem, seed: u64) -> Chain {
        self.engine.propagate(news, seed, &self.used_users).await
    }

    /// Process one news item: find seeds, run one chain per seed, summarize.
    /// The consumed-user set starts empty for every item.
    pub async fn run_news(&mut self, news: &NewsItem) -> NewsResult {
        self.used_users.clear();
        let seeds = self.directory.find_seed_users(&news.disease);
        info!(
            news_id = news.id,
            disease = %news.disease,
            seeds = seeds.len(),
            "Simulating news item"
        );

        let mut chains: Vec<Chain> = Vec::new();
        for seed in seeds {
            if self.used_users.contains(&seed) {
                continue;
            }
            info!(news_id = news.id, seed = seed, "Starting propagation");
            let chain = self.run_seed(news, seed).await;
            chains.push(chain);
        }

        let summary = summarize(&chains);
        NewsResult {
            news_id: news.id,
            disease: news.disease.clone(),
            chains,
            summary,
        }
    }

    /// Full campaign: every news item in order, each result written and
    /// flushed before the next item starts.
    pub async fn run(&mut self, news_list: &[NewsItem], writer: &mut ResultWriter) -> Result<()> {
        for news in news_list {
            let result = self.run_news(news).await;
            info!(
                news_id = result.news_id,
                chains = result.chains.len(),
                avg_breadth = result.summary.avg_breadth,
                "News item complete"
            );
            writer.write(&result)?;
        }
        Ok(())
    }
}

fn summarize(chains: &[Chain]) -> Summary {
    if chains.is_empty() {
        return Summary::default();
    }
    let n = chains.len() as f64;
    let avg_depth = chains.iter().map(|c| c.depth as f64).sum::<f64>() / n;
    let avg_breadth = chains.iter().map(|c| c.breadth as f64).sum::<f64>() / n;
    let avg_rate = chains.iter().map(|c| c.rate).sum::<f64>() / n;

    Summary {
        avg_depth: round_to(avg_depth, 2),
        avg_breadth: round_to(avg_breadth, 2),
        avg_rate: round_to(avg_rate, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oracle::{PromptTemplates, Stage, SurveyTemplates};
    use population::{RelationSampler, SamplingConfig, User};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const EMPTY_SHARE: &str = "Emotion: 0.5; Willingness: 0.5; Credibility: 0.5; Share_to: []";

    struct ScriptedOracle {
        sharing: Mutex<VecDeque<String>>,
    }

    impl ScriptedOracle {
        fn new<const N: usize>(responses: [&str; N]) -> Self {
            Self {
                sharing: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl DecisionOracle for ScriptedOracle {
        async fn decide(&self, stage: Stage, _prompt: &str) -> String {
            match stage {
                Stage::Sharing => self
                    .sharing
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| EMPTY_SHARE.to_string()),
                _ => "survey response".to_string(),
            }
        }
    }

    fn user(id: u64, disease: &str, strong: Vec<u64>) -> User {
        serde_json::from_value(serde_json::json!({
            "profile": { "id": id },
            "diseaseInfo": { "disease": disease },
            "relations": { "strong": strong, "moderate": [], "weak": [] }
        }))
        .unwrap()
    }

    fn templates() -> PromptTemplates {
        PromptTemplates {
            sharing: "{profile} {news_text} {neighbor_infos}".to_string(),
            survey: SurveyTemplates {
                before: "{profile} {news_text}".to_string(),
                after: "{profile} {news_text}".to_string(),
            },
        }
    }

    fn news(id: u64, disease: &str) -> NewsItem {
        NewsItem {
            id,
            content: "a health update".to_string(),
            disease: disease.to_string(),
        }
    }

    fn orchestrator<'a, O: DecisionOracle>(
        directory: &'a UserDirectory,
        oracle: &'a O,
        templates: &'a PromptTemplates,
    ) -> CampaignOrchestrator<'a, O, StdRng> {
        let engine = PropagationEngine::new(
            directory,
            oracle,
            templates,
            RelationSampler::new(SamplingConfig::default()),
            3,
            StdRng::seed_from_u64(0),
        );
        CampaignOrchestrator::new(directory, engine)
    }

    #[tokio::test]
    async fn test_one_chain_per_seed_and_summary() {
        let directory = UserDirectory::new(vec![
            user(1, "flu", vec![3]),
            user(2, "flu", vec![]),
            user(3, "gout", vec![]),
        ]);
        let oracle = ScriptedOracle::new([
            // seed 1 shares to 3, 3 shares nothing, seed 2 shares nothing
            "Emotion: 0.5; Willingness: 0.5; Credibility: 0.5; Share_to: [3]",
            EMPTY_SHARE,
            EMPTY_SHARE,
        ]);
        let t = templates();
        let mut orch = orchestrator(&directory, &oracle, &t);

        let result = orch.run_news(&news(1, "flu")).await;

        assert_eq!(result.chains.len(), 2);
        assert_eq!(result.chains[0].root, 1);
        assert_eq!(result.chains[1].root, 2);
        // depths 2 and 1, breadths 2 and 1, rates 2/3 and 1/3
        assert_eq!(result.summary.avg_depth, 1.5);
        assert_eq!(result.summary.avg_breadth, 1.5);
        assert_eq!(result.summary.avg_rate, 0.5);
    }

    #[tokio::test]
    async fn test_news_without_seeds_gets_zero_summary() {
        let directory = UserDirectory::new(vec![user(1, "flu", vec![])]);
        let oracle = ScriptedOracle::new([]);
        let t = templates();
        let mut orch = orchestrator(&directory, &oracle, &t);

        let result = orch.run_news(&news(1, "measles")).await;

        assert!(result.chains.is_empty());
        assert_eq!(result.summary.avg_depth, 0.0);
        assert_eq!(result.summary.avg_breadth, 0.0);
        assert_eq!(result.summary.avg_rate, 0.0);
    }

    #[tokio::test]
    async fn test_default_loop_does_not_exclude_across_chains() {
        // both seeds share to 3; without mark_used, 3 is activated twice
        let directory = UserDirectory::new(vec![
            user(1, "flu", vec![3]),
            user(2, "flu", vec![3]),
            user(3, "gout", vec![]),
        ]);
        let oracle = ScriptedOracle::new([
            "Emotion: 0.5; Willingness: 0.5; Credibility: 0.5; Share_to: [3]",
            EMPTY_SHARE,
            "Emotion: 0.5; Willingness: 0.5; Credibility: 0.5; Share_to: [3]",
            EMPTY_SHARE,
        ]);
        let t = templates();
        let mut orch = orchestrator(&directory, &oracle, &t);

        let result = orch.run_news(&news(1, "flu")).await;

        assert_eq!(result.chains[0].activated_users, vec![1, 3]);
        assert_eq!(result.chains[1].activated_users, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_mark_used_gives_cross_chain_exclusion() {
        let directory = UserDirectory::new(vec![
            user(1, "flu", vec![3]),
            user(2, "flu", vec![3]),
            user(3, "gout", vec![]),
        ]);
        let oracle = ScriptedOracle::new([
            "Emotion: 0.5; Willingness: 0.5; Credibility: 0.5; Share_to: [3]",
            EMPTY_SHARE,
            "Emotion: 0.5; Willingness: 0.5; Credibility: 0.5; Share_to: [3]",
        ]);
        let t = templates();
        let mut orch = orchestrator(&directory, &oracle, &t);
        let item = news(1, "flu");

        let first = orch.run_seed(&item, 1).await;
        orch.mark_used(first.activated_users.iter().copied());
        let second = orch.run_seed(&item, 2).await;

        assert_eq!(first.activated_users, vec![1, 3]);
        // 3 was consumed by the first chain, so the second share is dropped
        assert_eq!(second.activated_users, vec![2]);
        assert_eq!(second.depth, 1);
    }

    #[tokio::test]
    async fn test_run_writes_one_entry_per_news_item() {
        let directory = UserDirectory::new(vec![
            user(1, "flu", vec![]),
            user(2, "gout", vec![]),
        ]);
        let oracle = ScriptedOracle::new([]);
        let t = templates();
        let mut orch = orchestrator(&directory, &oracle, &t);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut writer = ResultWriter::create(&path).unwrap();

        let items = vec![news(1, "flu"), news(2, "gout")];
        orch.run(&items, &mut writer).await.unwrap();
        writer.finish().unwrap();

        let parsed: Vec<NewsResult> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].news_id, 1);
        assert_eq!(parsed[0].chains.len(), 1);
        assert_eq!(parsed[1].disease, "gout");
    }
}
