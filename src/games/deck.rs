use serde_json::Value;

use crate::{
    dto::deck::{DilemmaReply, PersonReply, WordReply},
    view::{Node, Scene, UiAction, widgets},
};

use super::{Endpoints, Frame, GameConfig, GameKind, Reconcile, Step, decode};

/// Games that only draw the next item from a server-side deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckVariant {
    Hints,
    /// Like Hints, but every drawing is timed.
    Pictionary,
    WhoAmI,
    ThisOrThat,
}

impl DeckVariant {
    fn next_path(self) -> &'static str {
        match self {
            DeckVariant::Hints | DeckVariant::Pictionary => "/next",
            DeckVariant::WhoAmI => "/wbi/next",
            DeckVariant::ThisOrThat => "/dod/next",
        }
    }

    fn reset_path(self) -> Option<&'static str> {
        match self {
            DeckVariant::Hints | DeckVariant::Pictionary => Some("/reset_used"),
            DeckVariant::WhoAmI => None,
            DeckVariant::ThisOrThat => Some("/dod/reset"),
        }
    }
}

/// The item currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckCard {
    Word {
        word: String,
        category: Option<String>,
        color: Option<String>,
    },
    Person(String),
    Dilemma {
        option_a: String,
        option_b: String,
    },
}

/// Deck games have no state endpoint; the snapshot lives in the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSnapshot {
    pub card: Option<DeckCard>,
    /// Items drawn by this controller.
    pub shown: usize,
    /// Deck size, when the server reports it.
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckPhase {
    #[default]
    Idle,
    Showing,
    /// Pictionary only: the drawing time ran out.
    TimeUp,
}

/// Deck games take no actions besides drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoAction {}

#[derive(Debug, Clone, Copy)]
pub struct DeckGame {
    pub variant: DeckVariant,
}

impl DeckGame {
    pub fn new(variant: DeckVariant) -> Self {
        Self { variant }
    }

    fn is_timed(&self) -> bool {
        self.variant == DeckVariant::Pictionary
    }
}

impl GameConfig for DeckGame {
    type Snapshot = DeckSnapshot;
    type Phase = DeckPhase;
    type Action = NoAction;

    fn kind(&self) -> GameKind {
        match self.variant {
            DeckVariant::Hints => GameKind::Hints,
            DeckVariant::Pictionary => GameKind::Pictionary,
            DeckVariant::WhoAmI => GameKind::WhoAmI,
            DeckVariant::ThisOrThat => GameKind::ThisOrThat,
        }
    }

    fn endpoints(&self) -> Endpoints {
        Endpoints {
            state: None,
            undo: None,
            reveal: None,
            reset: self.variant.reset_path(),
        }
    }

    fn initial_snapshot(&self) -> Option<DeckSnapshot> {
        Some(DeckSnapshot::default())
    }

    fn decode_state(&self, _body: Value) -> serde_json::Result<DeckSnapshot> {
        Ok(DeckSnapshot::default())
    }

    fn infer_phase(&self, snapshot: &DeckSnapshot) -> DeckPhase {
        if snapshot.card.is_some() && !self.is_timed() {
            DeckPhase::Showing
        } else {
            DeckPhase::Idle
        }
    }

    fn phase_name(&self, phase: DeckPhase) -> &'static str {
        match phase {
            DeckPhase::Idle => "idle",
            DeckPhase::Showing => "showing",
            DeckPhase::TimeUp => "time-up",
        }
    }

    fn winner(&self, _snapshot: &DeckSnapshot) -> Option<String> {
        None
    }

    fn advance_path(&self, _phase: DeckPhase) -> Option<&'static str> {
        Some(self.variant.next_path())
    }

    fn apply_advance(
        &self,
        snapshot: &DeckSnapshot,
        _phase: DeckPhase,
        body: Value,
    ) -> serde_json::Result<Reconcile<DeckSnapshot>> {
        let (card, total) = match self.variant {
            DeckVariant::Hints | DeckVariant::Pictionary => {
                let reply: WordReply = decode(body)?;
                let card = DeckCard::Word {
                    word: reply.word,
                    category: reply.category,
                    color: reply.category_color,
                };
                (card, snapshot.total)
            }
            DeckVariant::WhoAmI => {
                let reply: PersonReply = decode(body)?;
                (DeckCard::Person(reply.person), Some(reply.total))
            }
            DeckVariant::ThisOrThat => {
                let reply: DilemmaReply = decode(body)?;
                let card = DeckCard::Dilemma {
                    option_a: reply.option_a,
                    option_b: reply.option_b,
                };
                (card, Some(reply.total))
            }
        };
        Ok(Reconcile::Replace(DeckSnapshot {
            card: Some(card),
            shown: snapshot.shown + 1,
            total,
        }))
    }

    fn apply_reset(&self, _snapshot: &DeckSnapshot) -> Reconcile<DeckSnapshot> {
        Reconcile::Replace(DeckSnapshot::default())
    }

    fn next_phase(
        &self,
        step: Step<'_, NoAction>,
        from: DeckPhase,
        snapshot: &DeckSnapshot,
    ) -> DeckPhase {
        match (step, from) {
            (Step::Advance, _) => DeckPhase::Showing,
            (Step::Timer, DeckPhase::Showing) => DeckPhase::TimeUp,
            _ => self.infer_phase(snapshot),
        }
    }

    fn timed_phase(&self) -> Option<DeckPhase> {
        self.is_timed().then_some(DeckPhase::Showing)
    }

    fn restarts_timer(&self, step: Step<'_, NoAction>, _from: DeckPhase, to: DeckPhase) -> bool {
        // Each new drawing gets the full time.
        self.is_timed() && step == Step::Advance && to == DeckPhase::Showing
    }

    fn render(&self, frame: Frame<'_, DeckSnapshot, DeckPhase>) -> Scene<NoAction> {
        let snapshot = frame.snapshot;
        let mut stage = Vec::new();
        match &snapshot.card {
            Some(DeckCard::Word { word, category, color }) => {
                if let Some(category) = category {
                    let mut badge = Node::el("span").class("category").child(category.as_str());
                    if let Some(color) = color {
                        badge = badge.attr("style", format!("background: {color}"));
                    }
                    stage.push(badge.into());
                }
                stage.push(widgets::heading(word.as_str()));
            }
            Some(DeckCard::Person(person)) => stage.push(widgets::heading(person.as_str())),
            Some(DeckCard::Dilemma { option_a, option_b }) => {
                stage.push(
                    Node::el("div")
                        .class("dilemma")
                        .child(Node::el("span").class("option-a").child(option_a.as_str()))
                        .child(Node::el("span").class("or").child("of"))
                        .child(Node::el("span").class("option-b").child(option_b.as_str()))
                        .into(),
                );
            }
            None => stage.push(widgets::paragraph("Druk op start om te beginnen.")),
        }
        if frame.phase == DeckPhase::TimeUp {
            stage.push(widgets::paragraph("De tijd is om!"));
        }

        let label = if snapshot.card.is_some() { "Volgende" } else { "Start" };
        let mut controls = vec![widgets::button(label, UiAction::Advance)];
        if frame.phase == DeckPhase::Showing && self.is_timed() {
            controls.push(widgets::button("Klaar", UiAction::Finish));
        }
        if self.variant.reset_path().is_some() {
            controls.push(widgets::button("Alles opnieuw", UiAction::Reset));
        }

        let progress = match snapshot.total {
            Some(total) => widgets::progress("Getoond", snapshot.shown as u64, total as u64),
            None => widgets::paragraph(format!("Getoond: {}", snapshot.shown)),
        };
        Scene {
            scoreboard: Node::empty(),
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

    #[test]
    fn draws_are_counted_per_instance() {
        let game = DeckGame::new(DeckVariant::WhoAmI);
        let empty = game.initial_snapshot().unwrap();
        let Reconcile::Replace(first) = game
            .apply_advance(
                &empty,
                DeckPhase::Idle,
                json!({ "person": "Marie Curie", "number": 1, "total": 40 }),
            )
            .unwrap()
        else {
            panic!("a draw should replace the snapshot");
        };
        assert_eq!(first.shown, 1);
        assert_eq!(first.total, Some(40));
        assert_eq!(first.card, Some(DeckCard::Person("Marie Curie".into())));

        let other = DeckGame::new(DeckVariant::WhoAmI);
        assert_eq!(other.initial_snapshot().unwrap().shown, 0);
    }

    #[test]
    fn only_pictionary_is_timed_and_restarts_on_every_draw() {
        let pictionary = DeckGame::new(DeckVariant::Pictionary);
        assert_eq!(pictionary.timed_phase(), Some(DeckPhase::Showing));
        assert!(pictionary.restarts_timer(Step::Advance, DeckPhase::Showing, DeckPhase::Showing));
        assert_eq!(
            pictionary.next_phase(Step::Timer, DeckPhase::Showing, &DeckSnapshot::default()),
            DeckPhase::TimeUp
        );

        let hints = DeckGame::new(DeckVariant::Hints);
        assert_eq!(hints.timed_phase(), None);
        assert!(!hints.restarts_timer(Step::Advance, DeckPhase::Idle, DeckPhase::Showing));
    }

    #[test]
    fn reset_endpoints_per_variant() {
        assert_eq!(DeckGame::new(DeckVariant::Hints).endpoints().reset, Some("/reset_used"));
        assert_eq!(DeckGame::new(DeckVariant::ThisOrThat).endpoints().reset, Some("/dod/reset"));
        assert_eq!(DeckGame::new(DeckVariant::WhoAmI).endpoints().reset, None);
        assert_eq!(DeckGame::new(DeckVariant::Pictionary).endpoints().state, None);
    }

    #[test]
    fn pictionary_word_shows_its_category() {
        let game = DeckGame::new(DeckVariant::Pictionary);
        let Reconcile::Replace(snapshot) = game
            .apply_advance(
                &DeckSnapshot::default(),
                DeckPhase::Idle,
                json!({ "word": "Olifant", "category": "Dieren", "category_color": "#10B981" }),
            )
            .unwrap()
        else {
            panic!("a draw should replace the snapshot");
        };
        let scene = game.render(Frame {
            snapshot: &snapshot,
            phase: DeckPhase::Showing,
            reveal_ready: false,
        });
        let text = scene.stage.text_content();
        assert!(text.contains("Olifant"));
        assert!(text.contains("Dieren"));
        assert_eq!(scene.controls.bindings().len(), 3);
    }
}
