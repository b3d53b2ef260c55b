use std::collections::HashMap;
use std::hash::Hash;

use crate::evaluation::Score;

/// Memo of heuristic scores keyed by position identity.
///
/// Scores are stored canonical and without any repetition penalty. The table
/// is unbounded and lives as long as the engine that owns it; call `clear`
/// before reusing it for an unrelated game.
#[derive(Debug, Clone)]
pub struct EvaluationCache<K> {
    table: HashMap<K, Score>,
    hits: u64,
    misses: u64,
}

impl<K> Default for EvaluationCache<K> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<K: Eq + Hash> EvaluationCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a stored score, counting the hit or miss.
    pub fn get(&mut self, key: &K) -> Option<Score> {
        let entry = self.table.get(key).copied();
        match entry {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        entry
    }

    pub fn insert(&mut self, key: K, score: Score) {
        self.table.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
