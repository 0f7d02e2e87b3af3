use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    dao::api::FormRequest,
    dto::bluff::{BluffRevealReply, BluffState, StatementReply, VotesReply},
    view::{Node, Scene, UiAction, widgets},
};

use super::{Endpoints, Frame, GameConfig, GameKind, Reconcile, decode, named_winner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BluffPhase {
    #[default]
    Next,
    /// Teams vote true or false on the statement.
    Vote,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BluffAction {
    /// `vote` is true when the team believes the statement.
    Vote { team: usize, vote: bool },
}

/// Bluff: is the statement true or made up?
#[derive(Debug, Clone, Copy, Default)]
pub struct Bluff;

/// True once every team has an entry in `responses`.
pub(crate) fn everyone_responded<V>(num_teams: usize, responses: &BTreeMap<usize, V>) -> bool {
    num_teams > 0 && (0..num_teams).all(|team| responses.contains_key(&team))
}

impl GameConfig for Bluff {
    type Snapshot = BluffState;
    type Phase = BluffPhase;
    type Action = BluffAction;

    fn kind(&self) -> GameKind {
        GameKind::Bluff
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: Some("/bluf/state"),
            undo: None,
            reveal: Some("/bluf/reveal"),
            reset: None,
        }
    }

    fn decode_state(&self, body: Value) -> serde_json::Result<BluffState> {
        decode(body)
    }

    fn infer_phase(&self, snapshot: &BluffState) -> BluffPhase {
        match (&snapshot.statement, snapshot.revealed) {
            (None, _) => BluffPhase::Next,
            (Some(_), false) => BluffPhase::Vote,
            (Some(_), true) => BluffPhase::Reveal,
        }
    }

    fn phase_name(&self, phase: BluffPhase) -> &'static str {
        match phase {
            BluffPhase::Next => "next",
            BluffPhase::Vote => "vote",
            BluffPhase::Reveal => "reveal",
        }
    }

    fn winner(&self, snapshot: &BluffState) -> Option<String> {
        named_winner(&snapshot.winner)
    }

    fn advance_path(&self, phase: BluffPhase) -> Option<&'static str> {
        match phase {
            BluffPhase::Next | BluffPhase::Reveal => Some("/bluf/next"),
            BluffPhase::Vote => None,
        }
    }

    fn apply_advance(
        &self,
        snapshot: &BluffState,
        _phase: BluffPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<BluffState>> {
        let reply: StatementReply = decode(body)?;
        Ok(Reconcile::Replace(BluffState {
            statement: Some(reply.statement),
            round_number: reply.round_number,
            revealed: false,
            votes: BTreeMap::new(),
            answer: None,
            explanation: None,
            ..snapshot.clone()
        }))
    }

    fn action_request(
        &self,
        snapshot: &BluffState,
        phase: BluffPhase,
        action: &BluffAction,
    ) -> Option<FormRequest> {
        let BluffAction::Vote { team, vote } = *action;
        if phase != BluffPhase::Vote || team >= snapshot.num_teams {
            return None;
        }
        Some(
            FormRequest::new("/bluf/vote")
                .field("team", team)
                .field("vote", vote),
        )
    }

    fn apply_action(
        &self,
        snapshot: &BluffState,
        _action: &BluffAction,
        body: Value,
    ) -> serde_json::Result<Reconcile<BluffState>> {
        let reply: VotesReply = decode(body)?;
        Ok(Reconcile::Replace(BluffState {
            votes: reply.votes,
            team_names: reply.team_names,
            ..snapshot.clone()
        }))
    }

    fn can_reveal(&self, snapshot: &BluffState, phase: BluffPhase) -> bool {
        phase == BluffPhase::Vote && everyone_responded(snapshot.num_teams, &snapshot.votes)
    }

    fn apply_reveal(
        &self,
        snapshot: &BluffState,
        body: Value,
    ) -> serde_json::Result<Reconcile<BluffState>> {
        let reply: BluffRevealReply = decode(body)?;
        Ok(Reconcile::Replace(BluffState {
            revealed: true,
            answer: Some(reply.answer),
            explanation: Some(reply.explanation),
            scores: reply.scores,
            team_names: reply.team_names,
            winner: reply.winner,
            ..snapshot.clone()
        }))
    }

    fn render(&self, frame: Frame<'_, BluffState, BluffPhase>) -> Scene<BluffAction> {
        let state = frame.snapshot;
        let mut stage = Vec::new();
        let mut controls = Vec::new();

        if let Some(statement) = &state.statement {
            stage.push(widgets::heading(format!("Ronde {}", state.round_number)));
            stage.push(Node::el("blockquote").class("statement").child(statement.as_str()).into());
        }
        match frame.phase {
            BluffPhase::Next => {
                controls.push(widgets::button("Volgende stelling", UiAction::Advance));
            }
            BluffPhase::Vote => {
                for (team, name) in state.team_names.iter().enumerate() {
                    let cast = match state.votes.get(&team) {
                        Some(true) => "waar",
                        Some(false) => "bluf",
                        None => "nog niet gestemd",
                    };
                    stage.push(widgets::paragraph(format!("{name}: {cast}")));
                    controls.push(widgets::button(
                        format!("{name}: waar"),
                        UiAction::Act(BluffAction::Vote { team, vote: true }),
                    ));
                    controls.push(widgets::button(
                        format!("{name}: bluf"),
                        UiAction::Act(BluffAction::Vote { team, vote: false }),
                    ));
                }
                controls.push(
                    Node::el("button")
                        .child("Onthul")
                        .on_click(UiAction::Reveal)
                        .disabled(!frame.reveal_ready)
                        .into(),
                );
            }
            BluffPhase::Reveal => {
                let verdict = match state.answer {
                    Some(true) => "Waar!",
                    Some(false) => "Bluf!",
                    None => "?",
                };
                stage.push(widgets::heading(verdict));
                let explanation = state.explanation.as_deref().filter(|text| !text.is_empty());
                if let Some(explanation) = explanation {
                    stage.push(widgets::paragraph(explanation));
                }
                controls.push(widgets::button("Volgende stelling", UiAction::Advance));
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
