use serde::Deserialize;

use super::common::SongLinks;

/// One square of the shared bingo card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BingoCell {
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub claimed_by: Option<usize>,
}

/// `GET /mbingo/state`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BingoState {
    pub num_players: usize,
    pub player_names: Vec<String>,
    /// Cards are `card_size` by `card_size`.
    pub card_size: usize,
    #[serde(default)]
    pub card: Vec<BingoCell>,
    pub revealed: bool,
    /// Position in the play queue; `-1` before the first song.
    pub play_idx: i64,
    pub total_songs: usize,
    #[serde(flatten)]
    pub links: SongLinks,
    #[serde(default)]
    pub current_card_idx: Option<usize>,
    #[serde(default)]
    pub current_artist: Option<String>,
    #[serde(default)]
    pub current_title: Option<String>,
}

/// `POST /mbingo/next_song`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NextSongReply {
    #[serde(flatten)]
    pub links: SongLinks,
    pub song_number: usize,
    pub total_songs: usize,
}

/// `POST /mbingo/claim`. A wrong claim is a 200 with `correct: false` and a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClaimReply {
    pub correct: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cell_idx: Option<usize>,
    #[serde(default)]
    pub player_idx: Option<usize>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub player_names: Option<Vec<String>>,
}

/// `POST /mbingo/reveal`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BingoRevealReply {
    pub card_idx: usize,
    pub artist: String,
    pub title: String,
}
