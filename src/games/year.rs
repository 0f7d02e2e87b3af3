use serde_json::Value;

use crate::{
    dao::api::FormRequest,
    dto::year::{
        YearAwardReply, YearJetonReply, YearNextReply, YearRevealReply, YearState, YearUndoReply,
    },
    view::{Node, Scene, UiAction, widgets},
};

use super::{Endpoints, Frame, GameConfig, GameKind, Reconcile, Step, decode, named_winner};

/// Phases of a Guess the Year round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearPhase {
    /// Waiting for the next song.
    #[default]
    Next,
    /// A song is playing; teams place it on their timeline.
    Listen,
    /// Artist, title and year are shown; a team may be awarded.
    Reveal,
}

/// Jeton bookkeeping operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JetonOp {
    Add,
    Use,
}

impl JetonOp {
    fn as_str(self) -> &'static str {
        match self {
            JetonOp::Add => "add",
            JetonOp::Use => "use",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearAction {
    /// The team placed the song correctly.
    Award(usize),
    Jeton { team: usize, op: JetonOp },
}

/// Guess the Year: teams place songs on a timeline of release years.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessTheYear;

impl GameConfig for GuessTheYear {
    type Snapshot = YearState;
    type Phase = YearPhase;
    type Action = YearAction;

    fn kind(&self) -> GameKind {
        GameKind::GuessTheYear
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: Some("/gty/state"),
            undo: Some("/gty/undo"),
            reveal: Some("/gty/reveal"),
            reset: None,
        }
    }

    fn decode_state(&self, body: Value) -> serde_json::Result<YearState> {
        decode(body)
    }

    fn infer_phase(&self, snapshot: &YearState) -> YearPhase {
        match (snapshot.links.is_present(), snapshot.revealed) {
            (true, false) => YearPhase::Listen,
            (true, true) => YearPhase::Reveal,
            (false, _) => YearPhase::Next,
        }
    }

    fn phase_name(&self, phase: YearPhase) -> &'static str {
        match phase {
            YearPhase::Next => "next",
            YearPhase::Listen => "listen",
            YearPhase::Reveal => "reveal",
        }
    }

    fn winner(&self, snapshot: &YearState) -> Option<String> {
        named_winner(&snapshot.winner)
    }

    fn advance_path(&self, phase: YearPhase) -> Option<&'static str> {
        match phase {
            YearPhase::Next | YearPhase::Reveal => Some("/gty/next"),
            YearPhase::Listen => None,
        }
    }

    fn apply_advance(
        &self,
        snapshot: &YearState,
        _phase: YearPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<YearState>> {
        let reply: YearNextReply = decode(body)?;
        Ok(Reconcile::Replace(YearState {
            round_number: reply.round,
            revealed: false,
            links: reply.links,
            artist: None,
            title: None,
            year: None,
            ..snapshot.clone()
        }))
    }

    fn action_request(
        &self,
        snapshot: &YearState,
        phase: YearPhase,
        action: &YearAction,
    ) -> Option<FormRequest> {
        match *action {
            YearAction::Award(team) if phase == YearPhase::Reveal && team < snapshot.num_teams => {
                Some(FormRequest::new("/gty/award").field("team", team))
            }
            YearAction::Jeton { team, op } if team < snapshot.num_teams => {
                if op == JetonOp::Use && snapshot.jetons.get(team).copied().unwrap_or(0) == 0 {
                    return None;
                }
                Some(
                    FormRequest::new("/gty/jeton")
                        .field("team", team)
                        .field("action", op.as_str()),
                )
            }
            _ => None,
        }
    }

    fn apply_action(
        &self,
        snapshot: &YearState,
        action: &YearAction,
        body: Value,
    ) -> serde_json::Result<Reconcile<YearState>> {
        let next = match action {
            YearAction::Award(_) => {
                let reply: YearAwardReply = decode(body)?;
                YearState {
                    scores: reply.scores,
                    team_names: reply.team_names,
                    team_years: reply.team_years,
                    jetons: reply.jetons,
                    winner: reply.winner,
                    ..snapshot.clone()
                }
            }
            YearAction::Jeton { .. } => {
                let reply: YearJetonReply = decode(body)?;
                YearState {
                    jetons: reply.jetons,
                    team_names: reply.team_names,
                    ..snapshot.clone()
                }
            }
        };
        Ok(Reconcile::Replace(next))
    }

    fn apply_undo(
        &self,
        snapshot: &YearState,
        body: Value,
    ) -> serde_json::Result<Reconcile<YearState>> {
        let reply: YearUndoReply = decode(body)?;
        Ok(Reconcile::Replace(YearState {
            scores: reply.scores,
            team_names: reply.team_names,
            team_years: reply.team_years,
            jetons: reply.jetons,
            winner: None,
            ..snapshot.clone()
        }))
    }

    fn can_reveal(&self, _snapshot: &YearState, phase: YearPhase) -> bool {
        phase == YearPhase::Listen
    }

    fn apply_reveal(
        &self,
        snapshot: &YearState,
        body: Value,
    ) -> serde_json::Result<Reconcile<YearState>> {
        let reply: YearRevealReply = decode(body)?;
        Ok(Reconcile::Replace(YearState {
            revealed: true,
            artist: Some(reply.artist),
            title: Some(reply.title),
            year: Some(reply.year),
            ..snapshot.clone()
        }))
    }

    fn next_phase(
        &self,
        step: Step<'_, YearAction>,
        from: YearPhase,
        snapshot: &YearState,
    ) -> YearPhase {
        match step {
            // An awarded song is done; the next one can be drawn.
            Step::Action(YearAction::Award(_)) => YearPhase::Next,
            Step::Action(YearAction::Jeton { .. }) => from,
            _ => self.infer_phase(snapshot),
        }
    }

    fn render(&self, frame: Frame<'_, YearState, YearPhase>) -> Scene<YearAction> {
        let state = frame.snapshot;
        let scoreboard = widgets::scoreboard(&state.team_names, &state.scores, None);
        let progress = widgets::race(
            &state.team_names,
            &state.scores.iter().map(|score| u64::from(*score)).collect::<Vec<_>>(),
            u64::from(state.rounds_to_win),
        );

        let mut stage = vec![widgets::heading(format!("Ronde {}", state.round_number))];
        match frame.phase {
            YearPhase::Next => stage.push(widgets::paragraph("Klaar voor het volgende nummer.")),
            YearPhase::Listen => {
                stage.extend(widgets::link("YouTube", state.links.youtube_link.as_deref()));
                stage.extend(widgets::link("Spotify", state.links.spotify_link.as_deref()));
                stage.extend(widgets::link("QR-code", state.links.qr_url.as_deref()));
            }
            YearPhase::Reveal => {
                let artist = state.artist.as_deref().unwrap_or("?");
                let title = state.title.as_deref().unwrap_or("?");
                let year = state.year.map(|year| year.to_string()).unwrap_or_default();
                stage.push(widgets::paragraph(format!("{artist} - {title}")));
                stage.push(Node::el("p").class("year").child(year).into());
            }
        }
        for (team, years) in state.team_years.iter().enumerate() {
            let name = state.team_names.get(team).map(String::as_str).unwrap_or("?");
            let years = years.iter().map(i32::to_string).collect::<Vec<_>>().join(", ");
            stage.push(
                Node::el("p")
                    .class("timeline")
                    .child(format!("{name}: {years}"))
                    .into(),
            );
        }

        let mut controls = Vec::new();
        match frame.phase {
            YearPhase::Next => controls.push(widgets::button("Volgend nummer", UiAction::Advance)),
            YearPhase::Listen => controls.push(
                Node::el("button")
                    .child("Onthullen")
                    .on_click(UiAction::Reveal)
                    .disabled(!frame.reveal_ready)
                    .into(),
            ),
            YearPhase::Reveal => {
                for (team, name) in state.team_names.iter().enumerate() {
                    controls.push(widgets::button(
                        format!("Punt voor {name}"),
                        UiAction::Act(YearAction::Award(team)),
                    ));
                }
                controls.push(widgets::button("Volgend nummer", UiAction::Advance));
            }
        }
        for (team, name) in state.team_names.iter().enumerate() {
            let jetons = state.jetons.get(team).copied().unwrap_or(0);
            controls.push(widgets::button(
                format!("{name}: jeton erbij ({jetons})"),
                UiAction::Act(YearAction::Jeton {
                    team,
                    op: JetonOp::Add,
                }),
            ));
            controls.push(
                Node::el("button")
                    .child(format!("{name}: jeton inzetten"))
                    .on_click(UiAction::Act(YearAction::Jeton {
                        team,
                        op: JetonOp::Use,
                    }))
                    .disabled(jetons == 0)
                    .into(),
            );
        }
        controls.push(widgets::button("Ongedaan maken", UiAction::Undo));

        Scene {
            scoreboard,
            progress,
            stage: widgets::section(self.phase_name(frame.phase), stage),
            controls: Node::el("div").class("controls").children(controls).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn state(extra: Value) -> YearState {
        let mut body = json!({
            "num_teams": 2,
            "rounds_to_win": 5,
            "team_names": ["Rood", "Blauw"],
            "scores": [1, 0],
            "round_number": 3,
            "revealed": false,
            "winner": null,
            "team_years": [[1984], []],
            "jetons": [0, 2],
            "difficulty": "normaal"
        });
        if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
            body.extend(extra);
        }
        GuessTheYear.decode_state(body).unwrap()
    }

    #[test]
    fn phase_is_inferred_from_song_and_reveal() {
        assert_eq!(GuessTheYear.infer_phase(&state(json!({}))), YearPhase::Next);
        let listening = state(json!({ "youtube_link": "https://youtu.be/a", "qr_url": null }));
        assert_eq!(GuessTheYear.infer_phase(&listening), YearPhase::Listen);
        let revealed = state(json!({
            "youtube_link": "https://youtu.be/a",
            "revealed": true,
            "artist": "Queen",
            "title": "Radio Ga Ga",
            "year": 1984
        }));
        assert_eq!(GuessTheYear.infer_phase(&revealed), YearPhase::Reveal);
    }

    #[test]
    fn next_reply_replaces_song_and_clears_answer() {
        let before = state(json!({
            "youtube_link": "old",
            "revealed": true,
            "artist": "Queen",
            "title": "Radio Ga Ga",
            "year": 1984
        }));
        let reply = json!({
            "round": 4,
            "youtube_link": "new",
            "spotify_link": "sp",
            "qr_url": null
        });
        let Reconcile::Replace(after) = GuessTheYear
            .apply_advance(&before, YearPhase::Reveal, reply)
            .unwrap()
        else {
            panic!("next should replace the snapshot");
        };
        assert_eq!(after.round_number, 4);
        assert!(!after.revealed);
        assert_eq!(after.artist, None);
        assert_eq!(after.links.youtube_link.as_deref(), Some("new"));
        assert_eq!(after.scores, before.scores);
        assert_eq!(GuessTheYear.infer_phase(&after), YearPhase::Listen);
    }

    #[test]
    fn award_moves_to_next_and_carries_winner() {
        let before = state(json!({ "youtube_link": "a", "revealed": true }));
        let reply = json!({
            "scores": [5, 0],
            "team_names": ["Rood", "Blauw"],
            "team_years": [[1984, 1990], []],
            "jetons": [0, 2],
            "winner": "Rood"
        });
        let action = YearAction::Award(0);
        let Reconcile::Replace(after) = GuessTheYear.apply_action(&before, &action, reply).unwrap()
        else {
            panic!("award should replace the snapshot");
        };
        assert_eq!(GuessTheYear.winner(&after).as_deref(), Some("Rood"));
        assert_eq!(
            GuessTheYear.next_phase(Step::Action(&action), YearPhase::Reveal, &after),
            YearPhase::Next
        );
    }

    #[test]
    fn award_is_only_offered_after_reveal() {
        let snapshot = state(json!({ "youtube_link": "a" }));
        let award = YearAction::Award(1);
        assert_eq!(GuessTheYear.action_request(&snapshot, YearPhase::Listen, &award), None);
        let request = GuessTheYear
            .action_request(&snapshot, YearPhase::Reveal, &award)
            .unwrap();
        assert_eq!(request.path, "/gty/award");
        assert_eq!(request.form, vec![("team", "1".to_string())]);
        assert_eq!(
            GuessTheYear.action_request(&snapshot, YearPhase::Reveal, &YearAction::Award(2)),
            None
        );
    }

    #[test]
    fn using_a_jeton_requires_one() {
        let snapshot = state(json!({}));
        let use_first = YearAction::Jeton {
            team: 0,
            op: JetonOp::Use,
        };
        let use_second = YearAction::Jeton {
            team: 1,
            op: JetonOp::Use,
        };
        assert_eq!(GuessTheYear.action_request(&snapshot, YearPhase::Next, &use_first), None);
        let request = GuessTheYear
            .action_request(&snapshot, YearPhase::Next, &use_second)
            .unwrap();
        assert_eq!(
            request.form,
            vec![("team", "1".to_string()), ("action", "use".to_string())]
        );
    }

    #[test]
    fn undo_clears_winner() {
        let before = state(json!({ "winner": "Rood", "scores": [5, 0] }));
        let reply = json!({
            "scores": [4, 0],
            "team_names": ["Rood", "Blauw"],
            "team_years": [[1984], []],
            "jetons": [0, 2]
        });
        let Reconcile::Replace(after) = GuessTheYear.apply_undo(&before, reply).unwrap() else {
            panic!("undo should replace the snapshot");
        };
        assert_eq!(after.scores, vec![4, 0]);
        assert_eq!(GuessTheYear.winner(&after), None);
    }

    #[test]
    fn reveal_button_follows_precondition() {
        let snapshot = state(json!({ "youtube_link": "a" }));
        let scene = GuessTheYear.render(Frame {
            snapshot: &snapshot,
            phase: YearPhase::Listen,
            reveal_ready: false,
        });
        let controls = scene.controls.bindings();
        let reveal = controls
            .iter()
            .find(|element| element.on_click == Some(UiAction::Reveal))
            .unwrap();
        assert!(reveal.disabled);
    }
}
