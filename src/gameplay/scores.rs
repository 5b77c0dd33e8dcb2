use serde::{Deserialize, Serialize};
use std::fmt;

// --- Record Identity ---

/// Server-issued record id. Opaque to the client; the backend may send numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

// --- Records ---

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: RecordId,
    pub nickname: String,
    pub score: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaderboardEntry {
    /// 0 when the server did not rank the entry.
    #[serde(default)]
    pub rank: u32,
    #[serde(alias = "username")]
    pub nickname: String,
    pub score: u32,
}
