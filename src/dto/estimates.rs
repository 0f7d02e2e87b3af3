use std::collections::BTreeMap;

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// `GET /schat/state`. Guesses are keyed by team index sent as a string.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EstimatesState {
    pub num_teams: usize,
    pub points_to_win: u32,
    pub team_names: Vec<String>,
    pub scores: Vec<u32>,
    pub round_number: u32,
    pub revealed: bool,
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    #[serde(default)]
    pub guesses: BTreeMap<usize, f64>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<f64>,
}

/// `POST /schat/next`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionReply {
    pub question: String,
    pub round_number: u32,
}

/// `POST /schat/guess`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuessesReply {
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub guesses: BTreeMap<usize, f64>,
    pub team_names: Vec<String>,
}

/// `POST /schat/reveal`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EstimatesRevealReply {
    pub answer: f64,
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub guesses: BTreeMap<usize, f64>,
    pub scores: Vec<u32>,
    pub team_names: Vec<String>,
    #[serde(default)]
    pub winner: Option<String>,
}
