use crate::core::network::ScoreService;
use crate::gameplay::scores::LeaderboardEntry;
use chrono::{DateTime, Local};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaderboardStats {
    pub players: usize,
    pub top_score: u32,
    pub average_score: u32,
}

#[derive(Debug, Clone)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub fetched_at: DateTime<Local>,
    pub error: Option<String>,
}

/// Competition ranking ("1224"): equal scores share a rank, the next rank skips.
/// Sorts by score, highest first; ties keep their incoming order.
pub fn assign_ranks(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    let mut rank = 0;
    let mut prev: Option<u32> = None;
    for (i, entry) in entries.iter_mut().enumerate() {
        if prev != Some(entry.score) {
            rank = i as u32 + 1;
            prev = Some(entry.score);
        }
        entry.rank = rank;
    }
}

pub fn stats(entries: &[LeaderboardEntry]) -> LeaderboardStats {
    if entries.is_empty() {
        return LeaderboardStats::default();
    }
    let sum: u64 = entries.iter().map(|e| e.score as u64).sum();
    LeaderboardStats {
        players: entries.len(),
        top_score: entries.iter().map(|e| e.score).max().unwrap_or(0),
        average_score: (sum as f64 / entries.len() as f64).round() as u32,
    }
}

impl Leaderboard {
    /// Never fails: on error the board is empty and `error` says why.
    pub fn fetch(service: &dyn ScoreService) -> Self {
        let fetched_at = Local::now();
        match service.leaderboard() {
            Ok(mut entries) => {
                if entries.iter().any(|e| e.rank == 0) {
                    assign_ranks(&mut entries);
                }
                info!("Leaderboard loaded ({} entries).", entries.len());
                Self { entries, fetched_at, error: None }
            }
            Err(e) => {
                warn!("Failed to load leaderboard: {}", e);
                Self { entries: Vec::new(), fetched_at, error: Some(e.to_string()) }
            }
        }
    }

    pub fn stats(&self) -> LeaderboardStats {
        stats(&self.entries)
    }

    /// Index of the row that belongs to this player's displayed score.
    pub fn highlight(&self, nickname: &str, score: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.nickname == nickname && e.score == score)
    }
}
