use serde::{Deserialize, Deserializer, Serialize};

/// One player's standing, owned by the game service.
///
/// Every field is required on the wire: a standing without `points` is a
/// malformed response, never a zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    #[serde(alias = "fid", deserialize_with = "string_or_number")]
    pub external_id: String,
    #[serde(alias = "display_name")]
    pub display_name: String,
    #[serde(alias = "username")]
    pub handle: String,
    pub points: i64,
    pub wins: u32,
    #[serde(alias = "total_games")]
    pub total_games: u32,
}

/// Response of the leaderboard endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub leaderboard: Vec<PlayerStanding>,
    pub total_finished_games: u64,
}

/// Externally owned game record; only the id is meaningful locally
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameSession {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

impl GameSession {
    /// Public page of the game under the service base url
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/games/{}", base_url.trim_end_matches('/'), self.id)
    }
}

/// Body of the game-creation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateGameRequest {
    pub fids_or_usernames: Vec<String>,
    #[serde(rename = "betAmount")]
    pub bet_amount: String,
    #[serde(rename = "creatorAddress")]
    pub creator_address: String,
    #[serde(rename = "creatorFid")]
    pub creator_fid: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

/// Ids arrive as either JSON strings or integers depending on the endpoint
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    match Id::deserialize(deserializer)? {
        Id::Text(s) => Ok(s),
        Id::Int(n) => Ok(n.to_string()),
    }
}
