use crate::gameplay::scores::{LeaderboardEntry, RecordId, ScoreRecord};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

pub type NetError = Box<dyn Error + Send + Sync>;

/// Persistence service holding score records and the leaderboard.
///
/// The server owns record identity and the active flag; callers treat every
/// response as authoritative.
pub trait ScoreService: Send + Sync {
    fn scores_for(&self, nickname: &str) -> Result<Vec<ScoreRecord>, NetError>;
    fn submit_score(&self, nickname: &str, score: u32, is_active: bool) -> Result<RecordId, NetError>;
    fn activate(&self, nickname: &str, score_id: &RecordId) -> Result<(), NetError>;
    /// Overwrites whatever the server holds for `nickname`.
    fn replace_score(&self, nickname: &str, score: u32) -> Result<RecordId, NetError>;
    fn percentile(&self, accuracy: u32) -> Result<u32, NetError>;
    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, NetError>;
}

// --- Wire Structs ---

#[derive(Deserialize, Debug)]
struct ScoresResponse {
    #[serde(default)]
    scores: Vec<RecordDto>,
}

#[derive(Deserialize, Debug)]
struct RecordDto {
    id: RecordId,
    score: u32,
    #[serde(rename = "isActive", alias = "is_active", default)]
    is_active: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    nickname: &'a str,
    score: u32,
    is_active: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ActivateRequest<'a> {
    nickname: &'a str,
    score_id: &'a RecordId,
}

#[derive(Serialize, Debug)]
struct ReplaceRequest<'a> {
    nickname: &'a str,
    score: u32,
}

#[derive(Deserialize, Debug)]
struct IdResponse {
    id: RecordId,
}

#[derive(Deserialize, Debug)]
struct PercentileResponse {
    percentile: f64,
}

// Current backend wraps entries; the standalone board page reads a bare array.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum LeaderboardResponse {
    Wrapped {
        #[serde(default)]
        entries: Vec<LeaderboardEntry>,
    },
    Bare(Vec<LeaderboardEntry>),
}

impl LeaderboardResponse {
    fn into_entries(self) -> Vec<LeaderboardEntry> {
        match self {
            LeaderboardResponse::Wrapped { entries } => entries,
            LeaderboardResponse::Bare(entries) => entries,
        }
    }
}

/// Builds the ureq agent used for every request. Non-2xx statuses come back as responses
/// and are turned into errors by `ensure_ok`, which names the failed request.
pub fn get_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Percent-encodes one URL path segment (RFC 3986 unreserved characters pass through).
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[derive(Clone)]
pub struct HttpScoreService {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpScoreService {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        info!("Score service at {} (timeout {:?})", base_url, timeout);
        Self {
            agent: get_agent(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_ok(status: ureq::http::StatusCode, what: &str) -> Result<(), NetError> {
    if !status.is_success() {
        return Err(format!("{what} returned status {status}").into());
    }
    Ok(())
}

impl ScoreService for HttpScoreService {
    fn scores_for(&self, nickname: &str) -> Result<Vec<ScoreRecord>, NetError> {
        let url = self.url(&format!("/api/scores/{}", encode_path_segment(nickname)));
        debug!("GET {}", url);
        let response = self.agent.get(&url).call()?;
        ensure_ok(response.status(), "score lookup")?;

        let data: ScoresResponse = response.into_body().read_json()?;
        Ok(data
            .scores
            .into_iter()
            .map(|r| ScoreRecord {
                id: r.id,
                nickname: nickname.to_string(),
                score: r.score,
                is_active: r.is_active,
            })
            .collect())
    }

    fn submit_score(&self, nickname: &str, score: u32, is_active: bool) -> Result<RecordId, NetError> {
        let url = self.url("/api/score");
        debug!("POST {} score={} active={}", url, score, is_active);
        let response = self
            .agent
            .post(&url)
            .send_json(&SubmitRequest { nickname, score, is_active })?;
        ensure_ok(response.status(), "score submission")?;

        let data: IdResponse = response.into_body().read_json()?;
        Ok(data.id)
    }

    fn activate(&self, nickname: &str, score_id: &RecordId) -> Result<(), NetError> {
        let url = self.url("/api/score/activate");
        debug!("PUT {} id={}", url, score_id);
        let response = self
            .agent
            .put(&url)
            .send_json(&ActivateRequest { nickname, score_id })?;
        ensure_ok(response.status(), "score activation")
    }

    fn replace_score(&self, nickname: &str, score: u32) -> Result<RecordId, NetError> {
        let url = self.url("/api/score");
        debug!("PUT {} score={}", url, score);
        let response = self
            .agent
            .put(&url)
            .send_json(&ReplaceRequest { nickname, score })?;
        ensure_ok(response.status(), "score replacement")?;

        let data: IdResponse = response.into_body().read_json()?;
        Ok(data.id)
    }

    fn percentile(&self, accuracy: u32) -> Result<u32, NetError> {
        let url = self.url(&format!("/api/percentile/{accuracy}"));
        let response = self.agent.get(&url).call()?;
        ensure_ok(response.status(), "percentile lookup")?;

        let data: PercentileResponse = response.into_body().read_json()?;
        Ok(data.percentile.round().clamp(0.0, 100.0) as u32)
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, NetError> {
        let url = self.url("/api/leaderboard");
        debug!("GET {}", url);
        let response = self.agent.get(&url).call()?;
        ensure_ok(response.status(), "leaderboard")?;

        let data: LeaderboardResponse = response.into_body().read_json()?;
        Ok(data.into_entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(encode_path_segment("ann_1.x~"), "ann_1.x~");
        assert_eq!(encode_path_segment("a b/c?"), "a%20b%2Fc%3F");
        assert_eq!(encode_path_segment("Ёж"), "%D0%81%D0%B6");
    }

    #[test]
    fn score_list_accepts_both_field_spellings() {
        let camel: ScoresResponse =
            serde_json::from_str(r#"{"scores":[{"id":3,"score":250,"isActive":true}]}"#).unwrap();
        assert_eq!(camel.scores[0].id, RecordId::Int(3));
        assert!(camel.scores[0].is_active);

        let snake: ScoresResponse =
            serde_json::from_str(r#"{"scores":[{"id":"x9","score":80,"is_active":false},{"id":4,"score":1}]}"#)
                .unwrap();
        assert_eq!(snake.scores[0].id, RecordId::Text("x9".into()));
        assert!(!snake.scores[0].is_active);
        assert!(!snake.scores[1].is_active);

        let empty: ScoresResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.scores.is_empty());
    }

    #[test]
    fn request_bodies_use_camel_case() {
        let body = serde_json::to_value(SubmitRequest { nickname: "ann", score: 310, is_active: true }).unwrap();
        assert_eq!(body, serde_json::json!({"nickname": "ann", "score": 310, "isActive": true}));

        let id = RecordId::Int(12);
        let body = serde_json::to_value(ActivateRequest { nickname: "ann", score_id: &id }).unwrap();
        assert_eq!(body, serde_json::json!({"nickname": "ann", "scoreId": 12}));
    }

    #[test]
    fn submit_response_ignores_extra_fields() {
        let data: IdResponse = serde_json::from_str(r#"{"ok":true,"id":57}"#).unwrap();
        assert_eq!(data.id, RecordId::Int(57));
    }

    #[test]
    fn leaderboard_accepts_wrapped_and_bare_payloads() {
        let wrapped: LeaderboardResponse =
            serde_json::from_str(r#"{"entries":[{"rank":1,"nickname":"ann","score":390}]}"#).unwrap();
        let entries = wrapped.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].nickname, "ann");

        let bare: LeaderboardResponse =
            serde_json::from_str(r#"[{"username":"bob","score":120},{"nickname":"cy","score":90,"rank":2}]"#)
                .unwrap();
        let entries = bare.into_entries();
        assert_eq!(entries[0].nickname, "bob");
        assert_eq!(entries[0].rank, 0);
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn error_statuses_name_the_request() {
        assert!(ensure_ok(ureq::http::StatusCode::OK, "leaderboard").is_ok());
        assert!(ensure_ok(ureq::http::StatusCode::CREATED, "score submission").is_ok());
        let err = ensure_ok(ureq::http::StatusCode::NOT_FOUND, "score lookup").unwrap_err();
        assert!(err.to_string().starts_with("score lookup returned status 404"), "{err}");
        assert!(ensure_ok(ureq::http::StatusCode::BAD_GATEWAY, "score activation").is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let service = HttpScoreService::new("http://localhost:8000/", Duration::from_secs(1));
        assert_eq!(service.url("/api/leaderboard"), "http://localhost:8000/api/leaderboard");
    }
}
