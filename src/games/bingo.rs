use serde_json::Value;

use crate::{
    dao::api::FormRequest,
    dto::bingo::{BingoRevealReply, BingoState, ClaimReply, NextSongReply},
    view::{Node, Scene, UiAction, widgets},
};

use super::{Endpoints, Frame, GameConfig, GameKind, Reconcile, decode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BingoPhase {
    #[default]
    Next,
    /// A song plays; players claim the square they think it is.
    Listen,
    /// The current song is known, claimed or not.
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BingoAction {
    Claim { player: usize, cell: usize },
}

/// Music Bingo: one shared card, first complete line wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicBingo;

/// Squares claimed per player.
pub fn claim_counts(state: &BingoState) -> Vec<u32> {
    let mut counts = vec![0; state.num_players];
    for owner in state.card.iter().filter_map(|cell| cell.claimed_by) {
        if let Some(count) = counts.get_mut(owner) {
            *count += 1;
        }
    }
    counts
}

/// Player owning a complete row, column or diagonal.
pub fn completed_line(state: &BingoState) -> Option<usize> {
    let size = state.card_size;
    if size == 0 || state.card.len() != size * size {
        return None;
    }
    let owner = |index: usize| state.card[index].claimed_by;

    let rows = (0..size).map(|row| (0..size).map(move |col| row * size + col).collect::<Vec<_>>());
    let cols = (0..size).map(|col| (0..size).map(move |row| row * size + col).collect::<Vec<_>>());
    let diagonals = [
        (0..size).map(|i| i * size + i).collect::<Vec<_>>(),
        (0..size).map(|i| i * size + (size - 1 - i)).collect::<Vec<_>>(),
    ];

    rows.chain(cols).chain(diagonals).find_map(|line| {
        let first = owner(line[0])?;
        line.iter().all(|&index| owner(index) == Some(first)).then_some(first)
    })
}

impl GameConfig for MusicBingo {
    type Snapshot = BingoState;
    type Phase = BingoPhase;
    type Action = BingoAction;

    fn kind(&self) -> GameKind {
        GameKind::MusicBingo
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: Some("/mbingo/state"),
            undo: None,
            reveal: Some("/mbingo/reveal"),
            reset: None,
        }
    }

    fn decode_state(&self, body: Value) -> serde_json::Result<BingoState> {
        decode(body)
    }

    fn infer_phase(&self, snapshot: &BingoState) -> BingoPhase {
        match (snapshot.links.is_present(), snapshot.revealed) {
            (true, false) => BingoPhase::Listen,
            (true, true) => BingoPhase::Reveal,
            (false, _) => BingoPhase::Next,
        }
    }

    fn phase_name(&self, phase: BingoPhase) -> &'static str {
        match phase {
            BingoPhase::Next => "next",
            BingoPhase::Listen => "listen",
            BingoPhase::Reveal => "reveal",
        }
    }

    fn winner(&self, snapshot: &BingoState) -> Option<String> {
        let player = completed_line(snapshot)?;
        Some(
            snapshot
                .player_names
                .get(player)
                .cloned()
                .unwrap_or_else(|| format!("Speler {}", player + 1)),
        )
    }

    fn advance_path(&self, phase: BingoPhase) -> Option<&'static str> {
        match phase {
            BingoPhase::Next | BingoPhase::Reveal => Some("/mbingo/next_song"),
            BingoPhase::Listen => None,
        }
    }

    fn apply_advance(
        &self,
        snapshot: &BingoState,
        _phase: BingoPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<BingoState>> {
        let reply: NextSongReply = decode(body)?;
        Ok(Reconcile::Replace(BingoState {
            links: reply.links,
            play_idx: reply.song_number as i64 - 1,
            total_songs: reply.total_songs,
            revealed: false,
            current_card_idx: None,
            current_artist: None,
            current_title: None,
            ..snapshot.clone()
        }))
    }

    fn action_request(
        &self,
        snapshot: &BingoState,
        phase: BingoPhase,
        action: &BingoAction,
    ) -> Option<FormRequest> {
        let BingoAction::Claim { player, cell } = *action;
        let open = snapshot
            .card
            .get(cell)
            .is_some_and(|square| square.claimed_by.is_none());
        if phase != BingoPhase::Listen || player >= snapshot.num_players || !open {
            return None;
        }
        Some(
            FormRequest::new("/mbingo/claim")
                .field("player", player)
                .field("cell", cell),
        )
    }

    fn apply_action(
        &self,
        snapshot: &BingoState,
        action: &BingoAction,
        body: Value,
    ) -> serde_json::Result<Reconcile<BingoState>> {
        let reply: ClaimReply = decode(body)?;
        if !reply.correct {
            return Ok(Reconcile::Keep(reply.message));
        }
        let BingoAction::Claim { player, cell } = *action;
        let cell = reply.cell_idx.unwrap_or(cell);
        let player = reply.player_idx.unwrap_or(player);

        let mut next = snapshot.clone();
        if let Some(square) = next.card.get_mut(cell) {
            square.claimed_by = Some(player);
        }
        if let Some(names) = reply.player_names {
            next.player_names = names;
        }
        next.revealed = true;
        next.current_card_idx = Some(cell);
        next.current_artist = reply.artist;
        next.current_title = reply.title;
        Ok(Reconcile::Replace(next))
    }

    fn can_reveal(&self, _snapshot: &BingoState, phase: BingoPhase) -> bool {
        phase == BingoPhase::Listen
    }

    fn apply_reveal(
        &self,
        snapshot: &BingoState,
        body: Value,
    ) -> serde_json::Result<Reconcile<BingoState>> {
        let reply: BingoRevealReply = decode(body)?;
        Ok(Reconcile::Replace(BingoState {
            revealed: true,
            current_card_idx: Some(reply.card_idx),
            current_artist: Some(reply.artist),
            current_title: Some(reply.title),
            ..snapshot.clone()
        }))
    }

    fn render(&self, frame: Frame<'_, BingoState, BingoPhase>) -> Scene<BingoAction> {
        let state = frame.snapshot;
        let listening = frame.phase == BingoPhase::Listen;

        let size = state.card_size.max(1);
        let rows = state.card.chunks(size).enumerate().map(|(row, squares)| {
            let cells = squares.iter().enumerate().map(|(col, square)| {
                let cell = row * size + col;
                let mut td = Node::el("td")
                    .attr("data-cell", cell.to_string())
                    .child(format!("{} - {}", square.artist, square.title));
                if let Some(owner) = square.claimed_by {
                    let color = widgets::participant_color(owner);
                    td = td
                        .class("claimed")
                        .attr("style", format!("background: {color}"));
                }
                if state.current_card_idx == Some(cell) {
                    td = td.class("current");
                }
                td.into()
            });
            Node::el("tr").children(cells).into()
        });

        let mut stage = vec![Node::el("table").class("bingo-card").children(rows).into()];
        let mut controls = Vec::new();
        match frame.phase {
            BingoPhase::Next => {
                controls.push(widgets::button("Volgend nummer", UiAction::Advance));
            }
            BingoPhase::Listen => {
                stage.extend(widgets::link("YouTube", state.links.youtube_link.as_deref()));
                stage.extend(widgets::link("Spotify", state.links.spotify_link.as_deref()));
                for (cell, square) in state.card.iter().enumerate() {
                    if square.claimed_by.is_some() {
                        continue;
                    }
                    for (player, name) in state.player_names.iter().enumerate() {
                        controls.push(
                            Node::el("button")
                                .class("claim")
                                .child(format!("{name}: {}", square.title))
                                .on_click(UiAction::Act(BingoAction::Claim { player, cell }))
                                .disabled(!listening)
                                .into(),
                        );
                    }
                }
                controls.push(
                    Node::el("button")
                        .child("Onthul")
                        .on_click(UiAction::Reveal)
                        .disabled(!frame.reveal_ready)
                        .into(),
                );
            }
            BingoPhase::Reveal => {
                if let (Some(artist), Some(title)) = (&state.current_artist, &state.current_title) {
                    stage.push(widgets::heading(format!("{artist} - {title}")));
                }
                controls.push(widgets::button("Volgend nummer", UiAction::Advance));
            }
        }

        let played = u64::try_from(state.play_idx + 1).unwrap_or(0);
        Scene {
            scoreboard: widgets::scoreboard(&state.player_names, &claim_counts(state), None),
            progress: widgets::progress("Nummers", played, state.total_songs as u64),
            stage: widgets::section(self.phase_name(frame.phase), stage),
            controls: Node::el("div").class("controls").children(controls).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::games::Step;

    fn state(claims: [Option<usize>; 9], extra: Value) -> BingoState {
        let card: Vec<Value> = claims
            .iter()
            .enumerate()
            .map(|(index, owner)| {
                json!({
                    "artist": format!("Artiest {index}"),
                    "title": format!("Nummer {index}"),
                    "claimed_by": owner
                })
            })
            .collect();
        let mut body = json!({
            "num_players": 2,
            "player_names": ["Anna", "Bram"],
            "card_size": 3,
            "card": card,
            "revealed": false,
            "play_idx": 2,
            "total_songs": 9
        });
        if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
            body.extend(extra);
        }
        MusicBingo.decode_state(body).unwrap()
    }

    const NONE: [Option<usize>; 9] = [None; 9];

    #[test]
    fn a_full_column_or_diagonal_wins() {
        let mut column = NONE;
        for cell in [1, 4, 7] {
            column[cell] = Some(1);
        }
        assert_eq!(MusicBingo.winner(&state(column, json!({}))).as_deref(), Some("Bram"));

        let mut diagonal = NONE;
        for cell in [2, 4, 6] {
            diagonal[cell] = Some(0);
        }
        assert_eq!(completed_line(&state(diagonal, json!({}))), Some(0));

        let mut mixed = NONE;
        mixed[0] = Some(0);
        mixed[1] = Some(1);
        mixed[2] = Some(0);
        assert_eq!(completed_line(&state(mixed, json!({}))), None);
        assert_eq!(claim_counts(&state(mixed, json!({}))), vec![2, 1]);
    }

    #[test]
    fn playing_song_is_listen_until_revealed() {
        let playing = state(NONE, json!({ "youtube_link": "https://youtu.be/a" }));
        assert_eq!(MusicBingo.infer_phase(&playing), BingoPhase::Listen);
        assert_eq!(MusicBingo.infer_phase(&state(NONE, json!({}))), BingoPhase::Next);
    }

    #[test]
    fn wrong_claim_keeps_state_with_message() {
        let playing = state(NONE, json!({ "youtube_link": "https://youtu.be/a" }));
        let claim = BingoAction::Claim { player: 0, cell: 3 };
        assert_eq!(
            MusicBingo
                .apply_action(
                    &playing,
                    &claim,
                    json!({ "correct": false, "message": "Fout! Dat is niet het juiste nummer." }),
                )
                .unwrap(),
            Reconcile::Keep(Some("Fout! Dat is niet het juiste nummer.".into()))
        );
    }

    #[test]
    fn correct_claim_marks_the_square_and_reveals() {
        let playing = state(NONE, json!({ "youtube_link": "https://youtu.be/a" }));
        let claim = BingoAction::Claim { player: 1, cell: 4 };
        let Reconcile::Replace(after) = MusicBingo
            .apply_action(
                &playing,
                &claim,
                json!({
                    "correct": true,
                    "cell_idx": 4,
                    "player_idx": 1,
                    "artist": "Artiest 4",
                    "title": "Nummer 4",
                    "scores": [0, 1],
                    "player_names": ["Anna", "Bram"]
                }),
            )
            .unwrap()
        else {
            panic!("a correct claim should replace the snapshot");
        };
        assert_eq!(after.card[4].claimed_by, Some(1));
        assert_eq!(
            MusicBingo.next_phase(Step::Action(&claim), BingoPhase::Listen, &after),
            BingoPhase::Reveal
        );
        assert!(
            MusicBingo
                .action_request(
                    &after,
                    BingoPhase::Listen,
                    &BingoAction::Claim { player: 0, cell: 4 },
                )
                .is_none()
        );
    }

    #[test]
    fn next_song_clears_the_previous_reveal() {
        let revealed = state(
            NONE,
            json!({
                "youtube_link": "https://youtu.be/a",
                "revealed": true,
                "current_card_idx": 0,
                "current_artist": "Artiest 0",
                "current_title": "Nummer 0"
            }),
        );
        let Reconcile::Replace(after) = MusicBingo
            .apply_advance(
                &revealed,
                BingoPhase::Reveal,
                json!({ "youtube_link": "https://youtu.be/b", "song_number": 4, "total_songs": 9 }),
            )
            .unwrap()
        else {
            panic!("next song should replace the snapshot");
        };
        assert_eq!(after.play_idx, 3);
        assert_eq!(after.current_artist, None);
        assert_eq!(MusicBingo.infer_phase(&after), BingoPhase::Listen);
    }
}
