use crate::catalog::Category;
use std::collections::HashSet;

/// Parent-chosen settings for one game, immutable once play starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Uppercase canonical letter tokens, single letters or "CH"
    pub allowed_letters: HashSet<String>,
    pub allowed_categories: HashSet<Category>,
    pub word_count: usize,
    pub uppercase_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        // Starter letter set: the vowels plus the first consonants a Czech
        // first-grader usually learns
        let starter = [
            "A", "Á", "E", "É", "I", "Í", "J", "L", "M", "O", "Ó", "P", "S", "T", "U", "Ú", "Ů",
        ];
        Self {
            allowed_letters: starter.iter().map(|t| t.to_string()).collect(),
            allowed_categories: Category::ALL.iter().copied().collect(),
            word_count: 10,
            uppercase_only: true,
        }
    }
}

/// Outcome of one word, appended in word order as each word resolves and
/// never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub word: String,
    pub success: bool,
    pub attempts: u32,
    /// Accumulated listening time, whole seconds
    pub reading_time: u64,
}

/// Derived view of a finished game for the summary screen.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    results: Vec<AttemptResult>,
}

impl SessionSummary {
    pub fn new(results: Vec<AttemptResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[AttemptResult] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// 3 stars for a clean run, 2 for at least half, 1 otherwise
    pub fn stars(&self) -> usize {
        if self.results.is_empty() {
            return 0;
        }
        let percentage = (self.correct_count() as f64 / self.total() as f64) * 100.0;
        if percentage == 100.0 {
            3
        } else if percentage >= 50.0 {
            2
        } else {
            1
        }
    }

    /// Words shown in the "practice these" box: the outright failures
    pub fn missed_words(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.word.as_str())
            .collect()
    }

    pub fn average_reading_time(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let sum: u64 = self.results.iter().map(|r| r.reading_time).sum();
        Some(sum as f64 / self.results.len() as f64)
    }
}
