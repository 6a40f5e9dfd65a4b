//! Session leaderboard
//!
//! Lives only as long as the page does; tracks the top 10 rounds.

use serde::{Deserialize, Serialize};

/// Maximum number of rounds to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Result of one finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub score: u32,
    /// Drops caught
    pub caught: u32,
    /// Drops that hit the ground
    pub missed: u32,
    /// Trips to a tank
    pub deposits: u32,
}

/// Best rounds this session, highest score first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RoundRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a round to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, record: RoundRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        // Ties go below earlier rounds
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top score, 0 when nothing has been recorded
    pub fn best(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(score: u32) -> RoundRecord {
        RoundRecord {
            score,
            caught: score / 10,
            missed: 0,
            deposits: 0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(round(0)), None);
        assert!(scores.is_empty());
        assert_eq!(scores.best(), 0);
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(round(50)), Some(1));
        assert_eq!(scores.add_score(round(120)), Some(1));
        assert_eq!(scores.add_score(round(80)), Some(2));
        assert_eq!(scores.add_score(round(80)), Some(3));

        let ordered: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![120, 80, 80, 50]);
        assert_eq!(scores.best(), 120);
    }

    #[test]
    fn test_truncates_to_max() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.add_score(round(i * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));

        assert!(!scores.qualifies(30));
        assert_eq!(scores.potential_rank(35), Some(10));
        assert_eq!(scores.potential_rank(500), Some(1));
    }
}
