use serde::Deserialize;

use super::common::SongLinks;

/// `GET /gty/state`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YearState {
    pub num_teams: usize,
    pub rounds_to_win: u32,
    pub team_names: Vec<String>,
    pub scores: Vec<u32>,
    pub round_number: u32,
    pub revealed: bool,
    #[serde(default)]
    pub winner: Option<String>,
    /// Years each team has collected, sorted ascending.
    #[serde(default)]
    pub team_years: Vec<Vec<i32>>,
    #[serde(default)]
    pub jetons: Vec<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(flatten)]
    pub links: SongLinks,
    /// Present only once the song was revealed.
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// `POST /gty/next`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearNextReply {
    pub round: u32,
    #[serde(flatten)]
    pub links: SongLinks,
}

/// `POST /gty/reveal`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearRevealReply {
    pub artist: String,
    pub title: String,
    pub year: i32,
}

/// `POST /gty/award`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearAwardReply {
    pub scores: Vec<u32>,
    pub team_names: Vec<String>,
    pub team_years: Vec<Vec<i32>>,
    pub jetons: Vec<u32>,
    #[serde(default)]
    pub winner: Option<String>,
}

/// `POST /gty/jeton`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearJetonReply {
    pub jetons: Vec<u32>,
    pub team_names: Vec<String>,
}

/// `POST /gty/undo`; the server clears the winner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearUndoReply {
    pub scores: Vec<u32>,
    pub team_names: Vec<String>,
    pub team_years: Vec<Vec<i32>>,
    pub jetons: Vec<u32>,
}
