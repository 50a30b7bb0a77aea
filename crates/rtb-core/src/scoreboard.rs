//! In-memory per-user reaction tallies.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{Category, UserId};

/// Per-user counters, keyed by rating symbol.
///
/// Both maps always exist; a missing symbol reads as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserScore {
    pub questions: HashMap<String, u64>,
    pub answers: HashMap<String, u64>,
}

impl UserScore {
    pub fn count(&self, category: Category, symbol: &str) -> u64 {
        self.counters(category).get(symbol).copied().unwrap_or(0)
    }

    pub fn counters(&self, category: Category) -> &HashMap<String, u64> {
        match category {
            Category::Question => &self.questions,
            Category::Answer => &self.answers,
        }
    }

    fn counters_mut(&mut self, category: Category) -> &mut HashMap<String, u64> {
        match category {
            Category::Question => &mut self.questions,
            Category::Answer => &mut self.answers,
        }
    }
}

/// Shared scoreboard. One coarse lock around the whole map; every
/// read-modify-write happens under a single acquisition.
#[derive(Default)]
pub struct Scoreboard {
    inner: Mutex<HashMap<UserId, UserScore>>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment `user`'s counter for `symbol` in the map selected by `category`,
    /// creating the entry if needed. Returns the new count.
    pub async fn record(&self, user: &UserId, category: Category, symbol: &str) -> u64 {
        let mut map = self.inner.lock().await;
        let slot = map
            .entry(user.clone())
            .or_default()
            .counters_mut(category)
            .entry(symbol.to_string())
            .or_insert(0);
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Snapshot of a user's score. Unknown users get an empty score.
    pub async fn score(&self, user: &UserId) -> UserScore {
        self.inner
            .lock()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) async fn contains(&self, user: &UserId) -> bool {
        self.inner.lock().await.contains_key(user)
    }

    #[cfg(test)]
    pub(crate) async fn user_count(&self) -> usize {
        self.inner.lock().await.len()
    }
}
