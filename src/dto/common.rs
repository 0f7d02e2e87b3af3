use serde::Deserialize;

/// Where to listen to the current song. Every link is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongLinks {
    #[serde(default)]
    pub youtube_link: Option<String>,
    #[serde(default)]
    pub spotify_link: Option<String>,
    #[serde(default)]
    pub qr_url: Option<String>,
}

impl SongLinks {
    /// True when the server described a song at all.
    pub fn is_present(&self) -> bool {
        self.youtube_link.is_some() || self.spotify_link.is_some() || self.qr_url.is_some()
    }
}

/// Fields every team game returns after a scoring change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PositionsReply {
    pub positions: Vec<u64>,
    pub team_names: Vec<String>,
    pub current_team_idx: usize,
    pub finish_score: u64,
}
