use std::collections::BTreeMap;

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// `GET /bluf/state`. Votes are keyed by team index sent as a string.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BluffState {
    pub num_teams: usize,
    pub points_to_win: u32,
    pub team_names: Vec<String>,
    pub scores: Vec<u32>,
    pub round_number: u32,
    pub revealed: bool,
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    #[serde(default)]
    pub votes: BTreeMap<usize, bool>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub statement: Option<String>,
    /// Whether the statement is true; present once revealed.
    #[serde(default)]
    pub answer: Option<bool>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// `POST /bluf/next`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatementReply {
    pub statement: String,
    pub round_number: u32,
}

/// `POST /bluf/vote`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VotesReply {
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub votes: BTreeMap<usize, bool>,
    pub team_names: Vec<String>,
}

/// `POST /bluf/reveal`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BluffRevealReply {
    pub answer: bool,
    #[serde(default)]
    pub explanation: String,
    pub scores: Vec<u32>,
    pub team_names: Vec<String>,
    #[serde(default)]
    pub winner: Option<String>,
}
