use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    dao::api::FormRequest,
    dto::estimates::{EstimatesRevealReply, EstimatesState, GuessesReply, QuestionReply},
    view::{Node, Scene, UiAction, widgets},
};

use super::{
    Endpoints, Frame, GameConfig, GameKind, Reconcile, bluff::everyone_responded, decode,
    named_winner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatesPhase {
    #[default]
    Next,
    /// Teams enter their estimate.
    Guess,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimatesAction {
    Guess { team: usize, value: f64 },
}

/// Estimates: the closest guess scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimates;

impl GameConfig for Estimates {
    type Snapshot = EstimatesState;
    type Phase = EstimatesPhase;
    type Action = EstimatesAction;

    fn kind(&self) -> GameKind {
        GameKind::Estimates
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: Some("/schat/state"),
            undo: None,
            reveal: Some("/schat/reveal"),
            reset: None,
        }
    }

    fn decode_state(&self, body: Value) -> serde_json::Result<EstimatesState> {
        decode(body)
    }

    fn infer_phase(&self, snapshot: &EstimatesState) -> EstimatesPhase {
        match (&snapshot.question, snapshot.revealed) {
            (None, _) => EstimatesPhase::Next,
            (Some(_), false) => EstimatesPhase::Guess,
            (Some(_), true) => EstimatesPhase::Reveal,
        }
    }

    fn phase_name(&self, phase: EstimatesPhase) -> &'static str {
        match phase {
            EstimatesPhase::Next => "next",
            EstimatesPhase::Guess => "guess",
            EstimatesPhase::Reveal => "reveal",
        }
    }

    fn winner(&self, snapshot: &EstimatesState) -> Option<String> {
        named_winner(&snapshot.winner)
    }

    fn advance_path(&self, phase: EstimatesPhase) -> Option<&'static str> {
        match phase {
            EstimatesPhase::Next | EstimatesPhase::Reveal => Some("/schat/next"),
            EstimatesPhase::Guess => None,
        }
    }

    fn apply_advance(
        &self,
        snapshot: &EstimatesState,
        _phase: EstimatesPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<EstimatesState>> {
        let reply: QuestionReply = decode(body)?;
        Ok(Reconcile::Replace(EstimatesState {
            question: Some(reply.question),
            round_number: reply.round_number,
            revealed: false,
            guesses: BTreeMap::new(),
            answer: None,
            ..snapshot.clone()
        }))
    }

    fn action_request(
        &self,
        snapshot: &EstimatesState,
        phase: EstimatesPhase,
        action: &EstimatesAction,
    ) -> Option<FormRequest> {
        let EstimatesAction::Guess { team, value } = *action;
        if phase != EstimatesPhase::Guess || team >= snapshot.num_teams || !value.is_finite() {
            return None;
        }
        Some(
            FormRequest::new("/schat/guess")
                .field("team", team)
                .field("guess", value),
        )
    }

    fn apply_action(
        &self,
        snapshot: &EstimatesState,
        _action: &EstimatesAction,
        body: Value,
    ) -> serde_json::Result<Reconcile<EstimatesState>> {
        let reply: GuessesReply = decode(body)?;
        Ok(Reconcile::Replace(EstimatesState {
            guesses: reply.guesses,
            team_names: reply.team_names,
            ..snapshot.clone()
        }))
    }

    fn can_reveal(&self, snapshot: &EstimatesState, phase: EstimatesPhase) -> bool {
        phase == EstimatesPhase::Guess && everyone_responded(snapshot.num_teams, &snapshot.guesses)
    }

    fn apply_reveal(
        &self,
        snapshot: &EstimatesState,
        body: Value,
    ) -> serde_json::Result<Reconcile<EstimatesState>> {
        let reply: EstimatesRevealReply = decode(body)?;
        Ok(Reconcile::Replace(EstimatesState {
            revealed: true,
            answer: Some(reply.answer),
            guesses: reply.guesses,
            scores: reply.scores,
            team_names: reply.team_names,
            winner: reply.winner,
            ..snapshot.clone()
        }))
    }

    fn render(&self, frame: Frame<'_, EstimatesState, EstimatesPhase>) -> Scene<EstimatesAction> {
        let state = frame.snapshot;
        let mut stage = Vec::new();
        let mut controls = Vec::new();

        if let Some(question) = &state.question {
            stage.push(widgets::heading(format!("Vraag {}", state.round_number)));
            stage.push(widgets::paragraph(question.as_str()));
        }
        let guesses = state.team_names.iter().enumerate().map(|(team, name)| {
            let guess = state
                .guesses
                .get(&team)
                .map(f64::to_string)
                .unwrap_or_else(|| "-".into());
            Node::el("li")
                .attr("data-team", team.to_string())
                .child(format!("{name}: {guess}"))
                .into()
        });
        match frame.phase {
            EstimatesPhase::Next => {
                controls.push(widgets::button("Volgende vraag", UiAction::Advance));
            }
            EstimatesPhase::Guess => {
                stage.push(Node::el("ul").class("guesses").children(guesses).into());
                controls.push(
                    Node::el("button")
                        .child("Onthul")
                        .on_click(UiAction::Reveal)
                        .disabled(!frame.reveal_ready)
                        .into(),
                );
            }
            EstimatesPhase::Reveal => {
                if let Some(answer) = state.answer {
                    stage.push(widgets::heading(format!("Antwoord: {answer}")));
                }
                stage.push(Node::el("ul").class("guesses").children(guesses).into());
                controls.push(widgets::button("Volgende vraag", UiAction::Advance));
            }
        }

        Scene {
            scoreboard: widgets::scoreboard(&state.team_names, &state.scores, None),
            progress: widgets::race(
                &state.team_names,
                &state.scores.iter().map(|&score| u64::from(score)).collect::<Vec<_>>(),
                u64::from(state.points_to_win),
            ),
            stage: widgets::section(self.phase_name(frame.phase), stage),
            controls: Node::el("div").class("controls").children(controls).into(),
        }
    }
}
