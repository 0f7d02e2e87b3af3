use serde::Deserialize;

/// `GET /ts/state`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThirtySecondsState {
    pub num_teams: usize,
    pub finish_score: u64,
    pub team_names: Vec<String>,
    pub positions: Vec<u64>,
    pub current_team_idx: usize,
    /// Die result of the current turn; `None` until rolled.
    #[serde(default)]
    pub handicap: Option<u8>,
    pub round_number: u32,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub current_words: Vec<String>,
    #[serde(default)]
    pub total_words: usize,
    #[serde(default)]
    pub used_words_count: usize,
}

/// `POST /ts/roll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RollReply {
    pub handicap: u8,
}

/// `POST /ts/draw`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordsReply {
    pub words: Vec<String>,
    pub round_number: u32,
    pub current_team_idx: usize,
}

/// `POST /ts/score`; the server clears the handicap and the words.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TurnScoreReply {
    pub positions: Vec<u64>,
    pub team_names: Vec<String>,
    pub steps: u64,
    pub correct: u8,
    pub handicap: u8,
    pub current_team_idx: usize,
    #[serde(default)]
    pub winner: Option<String>,
    pub finish_score: u64,
}
