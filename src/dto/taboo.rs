use serde::Deserialize;

/// A word with the words that may not be said.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TabooCard {
    pub word: String,
    #[serde(default)]
    pub taboo: Vec<String>,
}

/// `GET /taboe/state`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TabooState {
    pub num_teams: usize,
    pub finish_score: u64,
    pub team_names: Vec<String>,
    pub positions: Vec<u64>,
    pub current_team_idx: usize,
    pub round_number: u32,
    pub turn_correct: u32,
    pub turn_taboe: u32,
    pub turn_active: bool,
    #[serde(default)]
    pub current_card: Option<TabooCard>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub total_cards: usize,
}

/// `POST /taboe/correct` and `POST /taboe/taboe_fout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TurnCountReply {
    pub turn_correct: u32,
    pub turn_taboe: u32,
}

/// `POST /taboe/end_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndTurnReply {
    pub positions: Vec<u64>,
    pub team_names: Vec<String>,
    pub steps: u64,
    pub current_team_idx: usize,
    #[serde(default)]
    pub winner: Option<String>,
    pub finish_score: u64,
}
