use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::schema::{NewsItem, User};

/// The loaded user population, indexed by id for O(1) lookup.
pub struct UserDirectory {
    users: Vec<User>,
    by_id: HashMap<u64, usize>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        let by_id = users
            .iter()
            .enumerate()
            .map(|(idx, u)| (u.id(), idx))
            .collect();
        Self { users, by_id }
    }

    /// Load the directory from a JSON array of user records.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .context(format!("Failed to read user file: {:?}", path))?;
        let users: Vec<User> = serde_json::from_str(&content)
            .context(format!("Failed to parse user file: {:?}", path))?;
        Ok(Self::new(users))
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.by_id.get(&id).map(|&idx| &self.users[idx])
    }

    pub fn contains(&self, id: u64) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Total population size, the denominator for share rates.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Seed users for a news item: everyone whose disease label equals the
    /// query, case-insensitively. Exact equality on purpose — no fuzzy
    /// matching here (see `matcher::fuzzy_match`). Users with an empty
    /// disease label never match.
    pub fn find_seed_users(&self, disease: &str) -> Vec<u64> {
        self.users
            .iter()
            .filter(|u| !u.disease().is_empty())
            .filter(|u| u.disease().eq_ignore_ascii_case(disease))
            .map(|u| u.id())
            .collect()
    }
}

/// Load the news list from a JSON array of `{id, content, disease}` records.
pub async fn load_news(path: &Path) -> Result<Vec<NewsItem>> {
    let content = fs::read_to_string(path)
        .await
        .context(format!("Failed to read news file: {:?}", path))?;
    let news: Vec<NewsItem> = serde_json::from_str(&content)
        .context(format!("Failed to parse news file: {:?}", path))?;
    Ok(news)
}
