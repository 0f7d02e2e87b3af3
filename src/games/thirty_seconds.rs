use std::time::Duration;

use serde_json::Value;

use crate::{
    dao::api::FormRequest,
    dto::{
        common::PositionsReply,
        thirty_seconds::{RollReply, ThirtySecondsState, TurnScoreReply, WordsReply},
        validation::validate_correct_count,
    },
    view::{Node, Scene, UiAction, widgets},
};

use super::{Endpoints, Frame, GameConfig, GameKind, Reconcile, Step, decode, named_winner};

/// Outcome of the last scored turn, kept for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSummary {
    pub correct: u8,
    pub handicap: u8,
    pub steps: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirtySecondsSnapshot {
    pub state: ThirtySecondsState,
    pub last_turn: Option<TurnSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThirtySecondsPhase {
    /// Roll the die for this turn's handicap.
    #[default]
    Roll,
    /// Draw five words.
    Draw,
    /// The clock runs while the team explains.
    Play,
    /// Enter how many words were guessed.
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThirtySecondsAction {
    /// Number of words guessed this turn.
    Score(u8),
}

/// 30 Seconds: explain five words before the sand runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThirtySeconds;

impl GameConfig for ThirtySeconds {
    type Snapshot = ThirtySecondsSnapshot;
    type Phase = ThirtySecondsPhase;
    type Action = ThirtySecondsAction;

    fn kind(&self) -> GameKind {
        GameKind::ThirtySeconds
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: Some("/ts/state"),
            undo: Some("/ts/undo"),
            reveal: None,
            reset: None,
        }
    }

    fn decode_state(&self, body: Value) -> serde_json::Result<ThirtySecondsSnapshot> {
        Ok(ThirtySecondsSnapshot {
            state: decode(body)?,
            last_turn: None,
        })
    }

    fn infer_phase(&self, snapshot: &ThirtySecondsSnapshot) -> ThirtySecondsPhase {
        let state = &snapshot.state;
        if !state.current_words.is_empty() {
            // A reload never resumes the clock; the turn goes straight to scoring.
            ThirtySecondsPhase::Score
        } else if state.handicap.is_some() {
            ThirtySecondsPhase::Draw
        } else {
            ThirtySecondsPhase::Roll
        }
    }

    fn phase_name(&self, phase: ThirtySecondsPhase) -> &'static str {
        match phase {
            ThirtySecondsPhase::Roll => "roll",
            ThirtySecondsPhase::Draw => "draw",
            ThirtySecondsPhase::Play => "play",
            ThirtySecondsPhase::Score => "score",
        }
    }

    fn winner(&self, snapshot: &ThirtySecondsSnapshot) -> Option<String> {
        named_winner(&snapshot.state.winner)
    }

    fn advance_path(&self, phase: ThirtySecondsPhase) -> Option<&'static str> {
        match phase {
            ThirtySecondsPhase::Roll => Some("/ts/roll"),
            ThirtySecondsPhase::Draw => Some("/ts/draw"),
            ThirtySecondsPhase::Play | ThirtySecondsPhase::Score => None,
        }
    }

    fn apply_advance(
        &self,
        snapshot: &ThirtySecondsSnapshot,
        phase: ThirtySecondsPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<ThirtySecondsSnapshot>> {
        let mut next = snapshot.clone();
        match phase {
            ThirtySecondsPhase::Roll => {
                let reply: RollReply = decode(body)?;
                next.state.handicap = Some(reply.handicap);
            }
            _ => {
                let reply: WordsReply = decode(body)?;
                // Drawn words are marked used server-side.
                next.state.used_words_count += reply.words.len();
                next.state.current_words = reply.words;
                next.state.round_number = reply.round_number;
                next.state.current_team_idx = reply.current_team_idx;
            }
        }
        Ok(Reconcile::Replace(next))
    }

    fn action_request(
        &self,
        snapshot: &ThirtySecondsSnapshot,
        phase: ThirtySecondsPhase,
        action: &ThirtySecondsAction,
    ) -> Option<FormRequest> {
        let ThirtySecondsAction::Score(correct) = *action;
        if phase != ThirtySecondsPhase::Score
            || validate_correct_count(correct).is_err()
            || usize::from(correct) > snapshot.state.current_words.len()
        {
            return None;
        }
        Some(FormRequest::new("/ts/score").field("correct", correct))
    }

    fn apply_action(
        &self,
        snapshot: &ThirtySecondsSnapshot,
        _action: &ThirtySecondsAction,
        body: Value,
    ) -> serde_json::Result<Reconcile<ThirtySecondsSnapshot>> {
        let reply: TurnScoreReply = decode(body)?;
        let state = ThirtySecondsState {
            positions: reply.positions,
            team_names: reply.team_names,
            current_team_idx: reply.current_team_idx,
            winner: reply.winner,
            finish_score: reply.finish_score,
            handicap: None,
            current_words: Vec::new(),
            ..snapshot.state.clone()
        };
        Ok(Reconcile::Replace(ThirtySecondsSnapshot {
            state,
            last_turn: Some(TurnSummary {
                correct: reply.correct,
                handicap: reply.handicap,
                steps: reply.steps,
            }),
        }))
    }

    fn apply_undo(
        &self,
        snapshot: &ThirtySecondsSnapshot,
        body: Value,
    ) -> serde_json::Result<Reconcile<ThirtySecondsSnapshot>> {
        let reply: PositionsReply = decode(body)?;
        let state = ThirtySecondsState {
            positions: reply.positions,
            team_names: reply.team_names,
            current_team_idx: reply.current_team_idx,
            finish_score: reply.finish_score,
            winner: None,
            ..snapshot.state.clone()
        };
        Ok(Reconcile::Replace(ThirtySecondsSnapshot {
            state,
            last_turn: None,
        }))
    }

    fn next_phase(
        &self,
        step: Step<'_, ThirtySecondsAction>,
        from: ThirtySecondsPhase,
        snapshot: &ThirtySecondsSnapshot,
    ) -> ThirtySecondsPhase {
        match (step, from) {
            (Step::Advance, ThirtySecondsPhase::Draw) => ThirtySecondsPhase::Play,
            (Step::Timer, ThirtySecondsPhase::Play) => ThirtySecondsPhase::Score,
            _ => self.infer_phase(snapshot),
        }
    }

    fn timed_phase(&self) -> Option<ThirtySecondsPhase> {
        Some(ThirtySecondsPhase::Play)
    }

    fn default_timer(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn render(
        &self,
        frame: Frame<'_, ThirtySecondsSnapshot, ThirtySecondsPhase>,
    ) -> Scene<ThirtySecondsAction> {
        let state = &frame.snapshot.state;
        let team = state
            .team_names
            .get(state.current_team_idx)
            .map(String::as_str)
            .unwrap_or("?");

        let mut stage = vec![widgets::heading(format!("{team} is aan de beurt"))];
        let mut controls = Vec::new();
        match frame.phase {
            ThirtySecondsPhase::Roll => {
                if let Some(last) = frame.snapshot.last_turn {
                    stage.push(widgets::paragraph(format!(
                        "Vorige beurt: {} goed, -{} = {} stappen",
                        last.correct, last.handicap, last.steps
                    )));
                }
                controls.push(widgets::button("Gooi de dobbelsteen", UiAction::Advance));
            }
            ThirtySecondsPhase::Draw => {
                let handicap = state.handicap.unwrap_or(0);
                stage.push(widgets::paragraph(format!("Dobbelsteen: -{handicap}")));
                controls.push(widgets::button("Trek woorden", UiAction::Advance));
            }
            ThirtySecondsPhase::Play | ThirtySecondsPhase::Score => {
                let words = state
                    .current_words
                    .iter()
                    .map(|word| Node::el("li").child(word.as_str()).into());
                stage.push(Node::el("ol").class("words").children(words).into());
                if frame.phase == ThirtySecondsPhase::Play {
                    controls.push(widgets::button("Tijd stoppen", UiAction::Finish));
                } else {
                    stage.push(widgets::paragraph("Hoeveel woorden zijn geraden?"));
                    for correct in 0..=state.current_words.len().min(5) as u8 {
                        controls.push(widgets::button(
                            correct.to_string(),
                            UiAction::Act(ThirtySecondsAction::Score(correct)),
                        ));
                    }
                }
            }
        }
        controls.push(widgets::button("Ongedaan maken", UiAction::Undo));

        Scene {
            scoreboard: widgets::scoreboard(
                &state.team_names,
                &state.positions,
                Some(state.current_team_idx),
            ),
            progress: Node::el("div")
                .class("progress-panel")
                .children([
                    widgets::race(&state.team_names, &state.positions, state.finish_score),
                    widgets::progress(
                        "Woorden gebruikt",
                        state.used_words_count as u64,
                        state.total_words as u64,
                    ),
                ])
                .into(),
            stage: widgets::section(self.phase_name(frame.phase), stage),
            controls: Node::el("div").class("controls").children(controls).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(extra: Value) -> ThirtySecondsSnapshot {
        let mut body = json!({
            "num_teams": 2,
            "finish_score": 30,
            "team_names": ["Uilen", "Vossen"],
            "positions": [4, 7],
            "current_team_idx": 0,
            "handicap": null,
            "round_number": 2,
            "winner": null,
            "current_words": [],
            "total_words": 200,
            "used_words_count": 10
        });
        if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
            body.extend(extra);
        }
        ThirtySeconds.decode_state(body).unwrap()
    }

    #[test]
    fn reload_mid_turn_lands_on_scoring() {
        assert_eq!(ThirtySeconds.infer_phase(&snapshot(json!({}))), ThirtySecondsPhase::Roll);
        assert_eq!(
            ThirtySeconds.infer_phase(&snapshot(json!({ "handicap": 1 }))),
            ThirtySecondsPhase::Draw
        );
        let mid_turn =
            snapshot(json!({ "handicap": 1, "current_words": ["a", "b", "c", "d", "e"] }));
        assert_eq!(ThirtySeconds.infer_phase(&mid_turn), ThirtySecondsPhase::Score);
    }

    #[test]
    fn drawing_starts_the_timed_phase() {
        let before = snapshot(json!({ "handicap": 2 }));
        let reply = json!({
            "words": ["fiets", "appel", "Parijs", "gitaar", "zon"],
            "round_number": 3,
            "current_team": "Uilen",
            "current_team_idx": 0
        });
        let Reconcile::Replace(after) = ThirtySeconds
            .apply_advance(&before, ThirtySecondsPhase::Draw, reply)
            .unwrap()
        else {
            panic!("draw should replace the snapshot");
        };
        assert_eq!(after.state.used_words_count, 15);
        let phase = ThirtySeconds.next_phase(Step::Advance, ThirtySecondsPhase::Draw, &after);
        assert_eq!(phase, ThirtySecondsPhase::Play);
        assert!(ThirtySeconds.restarts_timer(Step::Advance, ThirtySecondsPhase::Draw, phase));
        assert_eq!(
            ThirtySeconds.next_phase(Step::Timer, ThirtySecondsPhase::Play, &after),
            ThirtySecondsPhase::Score
        );
    }

    #[test]
    fn score_clears_turn_and_passes_to_next_team() {
        let before = snapshot(json!({ "handicap": 1, "current_words": ["a", "b", "c", "d", "e"] }));
        let reply = json!({
            "positions": [7, 7],
            "team_names": ["Uilen", "Vossen"],
            "steps": 3,
            "correct": 4,
            "handicap": 1,
            "current_team_idx": 1,
            "winner": null,
            "finish_score": 30
        });
        let action = ThirtySecondsAction::Score(4);
        let Reconcile::Replace(after) = ThirtySeconds.apply_action(&before, &action, reply).unwrap()
        else {
            panic!("score should replace the snapshot");
        };
        assert_eq!(after.state.handicap, None);
        assert!(after.state.current_words.is_empty());
        assert_eq!(after.state.current_team_idx, 1);
        assert_eq!(after.last_turn.map(|turn| turn.steps), Some(3));
        assert_eq!(
            ThirtySeconds.next_phase(Step::Action(&action), ThirtySecondsPhase::Score, &after),
            ThirtySecondsPhase::Roll
        );
    }

    #[test]
    fn score_request_is_bounded_by_drawn_words() {
        let scoring = snapshot(json!({ "handicap": 0, "current_words": ["a", "b", "c"] }));
        assert!(
            ThirtySeconds
                .action_request(&scoring, ThirtySecondsPhase::Score, &ThirtySecondsAction::Score(3))
                .is_some()
        );
        assert!(
            ThirtySeconds
                .action_request(&scoring, ThirtySecondsPhase::Score, &ThirtySecondsAction::Score(4))
                .is_none()
        );
        assert!(
            ThirtySeconds
                .action_request(&scoring, ThirtySecondsPhase::Play, &ThirtySecondsAction::Score(1))
                .is_none()
        );
    }
}
