use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

use oracle::{
    DecisionOracle, NeighborInfo, NeighborInfos, PromptTemplates, SharingDecision, Stage,
    parse_sharing_response,
};
use population::{NewsItem, Relations, RelationSampler, UserDirectory};

use crate::result::{Chain, Feedback};

/// Runs one depth-bounded cascade from a seed user. Rounds are an explicit
/// frontier loop, never recursion, so memory stays proportional to the
/// frontier and each transition is testable on its own.
pub struct PropagationEngine<'a, O, R> {
    directory: &'a UserDirectory,
    oracle: &'a O,
    templates: &'a PromptTemplates,
    sampler: RelationSampler,
    max_depth: usize,
    rng: R,
}

impl<'a, O: DecisionOracle, R: Rng> PropagationEngine<'a, O, R> {
    pub fn new(
        directory: &'a UserDirectory,
        oracle: &'a O,
        templates: &'a PromptTemplates,
        sampler: RelationSampler,
        max_depth: usize,
        rng: R,
    ) -> Self {
        Self {
            directory,
            oracle,
            templates,
            sampler,
            max_depth,
            rng,
        }
    }

    /// Run one chain. `used_users` is a cross-chain exclusion set owned by
    /// the orchestrator; the engine only reads it. Never fails: oracle
    /// trouble degrades individual feedback entries, not the chain.
    pub async fn propagate(
        &mut self,
        news: &NewsItem,
        root: u64,
        used_users: &HashSet<u64>,
    ) -> Chain {
        let total_users = self.directory.len();
        let mut activated: HashSet<u64> = HashSet::from([root]);
        let mut feedback: Vec<Feedback> = Vec::new();

        if self.directory.get(root).is_none() {
            // unresolvable seed: no rounds run, no feedback
            debug!(root = root, "Seed user not in directory");
            return Chain::new(root, activated, feedback, 0, total_users);
        }

        let mut frontier = vec![root];
        let mut depth = 0;

        while !frontier.is_empty() && depth < self.max_depth {
            depth += 1;
            debug!(news_id = news.id, round = depth, active = frontier.len(), "Propagation round");

            let mut next_frontier: Vec<u64> = Vec::new();
            let mut queued: HashSet<u64> = HashSet::new();

            for &uid in &frontier {
                let Some(user) = self.directory.get(uid) else {
                    continue;
                };

                let sampled = self.sampler.sample(&user.relations, &mut self.rng);
                let neighbor_infos = self.neighbor_infos(&sampled, used_users, &activated);

                let profile = user.prompt_view();
                let pre_survey_response = self
                    .ask(Stage::PreSurvey, &profile, news, &neighbor_infos)
                    .await;
                let sharing_response = self
                    .ask(Stage::Sharing, &profile, news, &neighbor_infos)
                    .await;

                let decision = match parse_sharing_response(&sharing_response) {
                    Ok(decision) => decision,
                    Err(e) => {
                        warn!(user_id = uid, error = %e, "Unparseable sharing response, using neutral defaults");
                        SharingDecision::default()
                    }
                };

                let post_survey_response = self
                    .ask(Stage::PostSurvey, &profile, news, &neighbor_infos)
                    .await;

                for &sid in &decision.share_to {
                    if !activated.contains(&sid)
                        && !used_users.contains(&sid)
                        && queued.insert(sid)
                    {
                        next_frontier.push(sid);
                    }
                }

                feedback.push(Feedback {
                    user_id: uid,
                    emotion: decision.emotion,
                    willingness: decision.willingness,
                    credibility: decision.credibility,
                    share_to: decision.share_to,
                    pre_survey_response,
                    post_survey_response,
                });
            }

            activated.extend(next_frontier.iter().copied());
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        Chain::new(root, activated, feedback, depth, total_users)
    }

    async fn ask(
        &self,
        stage: Stage,
        profile: &serde_json::Value,
        news: &NewsItem,
        neighbor_infos: &NeighborInfos,
    ) -> String {
        let prompt = self
            .templates
            .render(stage, profile, &news.content, neighbor_infos);
        self.oracle.decide(stage, &prompt).await
    }

    /// Assemble the candidate-target descriptors for one user's prompts,
    /// dropping ids that are already consumed, already activated, or not
    /// in the directory at all.
    fn neighbor_infos(
        &self,
        sampled: &Relations,
        used_users: &HashSet<u64>,
        activated: &HashSet<u64>,
    ) -> NeighborInfos {
        NeighborInfos {
            strong: self.describe(&sampled.strong, used_users, activated),
            moderate: self.describe(&sampled.moderate, used_users, activated),
            weak: self.describe(&sampled.weak, used_users, activated),
        }
    }

    fn describe(
        &self,
        ids: &[u64],
        used_users: &HashSet<u64>,
        activated: &HashSet<u64>,
    ) -> Vec<NeighborInfo> {
        ids.iter()
            .filter(|id| !used_users.contains(id) && !activated.contains(id))
            .filter_map(|&id| self.directory.get(id))
            .map(|user| NeighborInfo {
                id: user.id(),
                patient_info: serde_json::Value::Object(user.patient_info.clone()),
                profile: serde_json::to_value(&user.profile).unwrap_or_default(),
                disease: user.disease().to_string(),
            })
            .collect()
    }
}
