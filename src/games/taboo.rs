use serde_json::Value;

use crate::{
    dao::api::FormRequest,
    dto::{
        common::PositionsReply,
        taboo::{EndTurnReply, TabooCard, TabooState, TurnCountReply},
    },
    view::{Node, Scene, UiAction, widgets},
};

use super::{Endpoints, Frame, GameConfig, GameKind, Reconcile, Step, decode, named_winner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabooPhase {
    /// Between turns.
    #[default]
    Ready,
    /// The clock runs; cards are drawn one after another.
    Play,
    /// The clock ran out; the turn still needs to be closed.
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabooAction {
    Correct,
    /// A forbidden word was said.
    Taboo,
    EndTurn,
}

/// Taboo: describe the word without the forbidden ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Taboo;

impl GameConfig for Taboo {
    type Snapshot = TabooState;
    type Phase = TabooPhase;
    type Action = TabooAction;

    fn kind(&self) -> GameKind {
        GameKind::Taboo
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: Some("/taboe/state"),
            undo: Some("/taboe/undo"),
            reveal: None,
            reset: None,
        }
    }

    fn decode_state(&self, body: Value) -> serde_json::Result<TabooState> {
        decode(body)
    }

    fn infer_phase(&self, snapshot: &TabooState) -> TabooPhase {
        if snapshot.turn_active {
            TabooPhase::TimeUp
        } else {
            TabooPhase::Ready
        }
    }

    fn phase_name(&self, phase: TabooPhase) -> &'static str {
        match phase {
            TabooPhase::Ready => "ready",
            TabooPhase::Play => "play",
            TabooPhase::TimeUp => "time-up",
        }
    }

    fn winner(&self, snapshot: &TabooState) -> Option<String> {
        named_winner(&snapshot.winner)
    }

    fn advance_path(&self, phase: TabooPhase) -> Option<&'static str> {
        match phase {
            TabooPhase::Ready | TabooPhase::Play => Some("/taboe/draw"),
            TabooPhase::TimeUp => None,
        }
    }

    fn apply_advance(
        &self,
        snapshot: &TabooState,
        _phase: TabooPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<TabooState>> {
        let card: TabooCard = decode(body)?;
        if !snapshot.turn_active {
            // The first draw of a turn also resets counters and bumps the round server-side.
            return Ok(Reconcile::Refetch);
        }
        Ok(Reconcile::Replace(TabooState {
            current_card: Some(card),
            ..snapshot.clone()
        }))
    }

    fn action_request(
        &self,
        snapshot: &TabooState,
        phase: TabooPhase,
        action: &TabooAction,
    ) -> Option<FormRequest> {
        if phase == TabooPhase::Ready || !snapshot.turn_active {
            return None;
        }
        let path = match action {
            TabooAction::Correct => "/taboe/correct",
            TabooAction::Taboo => "/taboe/taboe_fout",
            TabooAction::EndTurn => "/taboe/end_turn",
        };
        Some(FormRequest::new(path))
    }

    fn apply_action(
        &self,
        snapshot: &TabooState,
        action: &TabooAction,
        body: Value,
    ) -> serde_json::Result<Reconcile<TabooState>> {
        let next = match action {
            TabooAction::Correct | TabooAction::Taboo => {
                let reply: TurnCountReply = decode(body)?;
                TabooState {
                    turn_correct: reply.turn_correct,
                    turn_taboe: reply.turn_taboe,
                    ..snapshot.clone()
                }
            }
            TabooAction::EndTurn => {
                let reply: EndTurnReply = decode(body)?;
                TabooState {
                    positions: reply.positions,
                    team_names: reply.team_names,
                    current_team_idx: reply.current_team_idx,
                    winner: reply.winner,
                    finish_score: reply.finish_score,
                    turn_active: false,
                    current_card: None,
                    turn_correct: 0,
                    turn_taboe: 0,
                    ..snapshot.clone()
                }
            }
        };
        Ok(Reconcile::Replace(next))
    }

    fn apply_undo(
        &self,
        snapshot: &TabooState,
        body: Value,
    ) -> serde_json::Result<Reconcile<TabooState>> {
        let reply: PositionsReply = decode(body)?;
        Ok(Reconcile::Replace(TabooState {
            positions: reply.positions,
            team_names: reply.team_names,
            current_team_idx: reply.current_team_idx,
            finish_score: reply.finish_score,
            winner: None,
            ..snapshot.clone()
        }))
    }

    fn next_phase(
        &self,
        step: Step<'_, TabooAction>,
        from: TabooPhase,
        snapshot: &TabooState,
    ) -> TabooPhase {
        match (step, from) {
            // A card drawn while the clock ran out does not start a new turn.
            (Step::Advance, TabooPhase::TimeUp) => TabooPhase::TimeUp,
            (Step::Advance, _) => TabooPhase::Play,
            (Step::Timer, TabooPhase::Play) => TabooPhase::TimeUp,
            (Step::Action(TabooAction::Correct | TabooAction::Taboo), _) => from,
            _ => self.infer_phase(snapshot),
        }
    }

    fn timed_phase(&self) -> Option<TabooPhase> {
        Some(TabooPhase::Play)
    }

    fn render(&self, frame: Frame<'_, TabooState, TabooPhase>) -> Scene<TabooAction> {
        let state = frame.snapshot;
        let team = state
            .team_names
            .get(state.current_team_idx)
            .map(String::as_str)
            .unwrap_or("?");

        let mut stage = vec![widgets::heading(format!("{team} is aan de beurt"))];
        let mut controls = Vec::new();
        match frame.phase {
            TabooPhase::Ready => {
                stage.push(widgets::paragraph(format!("Ronde {}", state.round_number)));
                controls.push(widgets::button("Start de beurt", UiAction::Advance));
            }
            TabooPhase::Play | TabooPhase::TimeUp => {
                if let Some(card) = &state.current_card {
                    let forbidden = card
                        .taboo
                        .iter()
                        .map(|word| Node::el("li").child(word.as_str()).into());
                    stage.push(
                        Node::el("div")
                            .class("card")
                            .child(Node::el("h3").child(card.word.as_str()))
                            .child(Node::el("ul").class("taboo").children(forbidden))
                            .into(),
                    );
                }
                stage.push(widgets::paragraph(format!(
                    "Goed: {}  Taboe: {}",
                    state.turn_correct, state.turn_taboe
                )));
                controls.push(widgets::button("Goed", UiAction::Act(TabooAction::Correct)));
                controls.push(widgets::button("Taboe!", UiAction::Act(TabooAction::Taboo)));
                if frame.phase == TabooPhase::Play {
                    controls.push(widgets::button("Volgende kaart", UiAction::Advance));
                } else {
                    stage.push(widgets::paragraph("De tijd is om!"));
                }
                controls.push(widgets::button(
                    "Beurt afsluiten",
                    UiAction::Act(TabooAction::EndTurn),
                ));
            }
        }
        controls.push(widgets::button("Ongedaan maken", UiAction::Undo));

        Scene {
            scoreboard: widgets::scoreboard(
                &state.team_names,
                &state.positions,
                Some(state.current_team_idx),
            ),
            progress: widgets::race(&state.team_names, &state.positions, state.finish_score),
            stage: widgets::section(self.phase_name(frame.phase), stage),
            controls: Node::el("div").class("controls").children(controls).into(),
        }
    }
}
