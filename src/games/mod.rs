//! Per-game configuration plugged into the generic session controller.

/// Music Bingo.
pub mod bingo;
/// Bluff: true or false statements.
pub mod bluff;
/// Hints, Pictionary, Who Am I and This or That.
pub mod deck;
/// Estimates: closest guess wins.
pub mod estimates;
/// Taboo.
pub mod taboo;
/// 30 Seconds.
pub mod thirty_seconds;
/// Guess the Year.
pub mod year;

use std::{fmt, str::FromStr, time::Duration};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{dao::api::FormRequest, view::Scene};

/// Every game the client knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    GuessTheYear,
    ThirtySeconds,
    Taboo,
    Bluff,
    Estimates,
    MusicBingo,
    Hints,
    Pictionary,
    WhoAmI,
    ThisOrThat,
}

impl GameKind {
    pub const ALL: [GameKind; 10] = [
        GameKind::GuessTheYear,
        GameKind::ThirtySeconds,
        GameKind::Taboo,
        GameKind::Bluff,
        GameKind::Estimates,
        GameKind::MusicBingo,
        GameKind::Hints,
        GameKind::Pictionary,
        GameKind::WhoAmI,
        GameKind::ThisOrThat,
    ];

    /// Identifier used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::GuessTheYear => "guess-the-year",
            GameKind::ThirtySeconds => "thirty-seconds",
            GameKind::Taboo => "taboe",
            GameKind::Bluff => "bluf",
            GameKind::Estimates => "schattingen",
            GameKind::MusicBingo => "muziekbingo",
            GameKind::Hints => "hints",
            GameKind::Pictionary => "pictionary",
            GameKind::WhoAmI => "wie-ben-ik",
            GameKind::ThisOrThat => "dit-of-dat",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown game name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game `{0}`")]
pub struct UnknownGame(pub String);

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownGame(value.to_string()))
    }
}

/// Fixed endpoints of a game; `None` when the game has no such operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub state: Option<&'static str>,
    pub undo: Option<&'static str>,
    pub reveal: Option<&'static str>,
    pub reset: Option<&'static str>,
}

/// How a successful reply changes the working snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconcile<S> {
    /// The reply fully describes the new snapshot.
    Replace(S),
    /// Nothing changes; an optional message for the user.
    Keep(Option<String>),
    /// The reply omits changes the server made; fetch the full state.
    Refetch,
}

/// What caused a phase transition.
#[derive(Debug, PartialEq)]
pub enum Step<'a, A> {
    /// A fetched snapshot.
    Load,
    Advance,
    Action(&'a A),
    Undo,
    Reveal,
    /// The timed phase ended, by expiry or early.
    Timer,
}

impl<A> Clone for Step<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Step<'_, A> {}

/// What a renderer gets to work with.
#[derive(Debug)]
pub struct Frame<'a, S, P> {
    pub snapshot: &'a S,
    pub phase: P,
    /// The local precondition for revealing holds.
    pub reveal_ready: bool,
}

/// Everything that differs between games: phases, endpoints, merge rules and rendering.
///
/// Merges are pure: they build a new snapshot from the current one and a reply body.
pub trait GameConfig: Send + Sync + 'static {
    type Snapshot: Clone + fmt::Debug + Send + Sync + 'static;
    type Phase: Copy + Eq + Default + fmt::Debug + Send + Sync + 'static;
    type Action: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    fn kind(&self) -> GameKind;

    fn endpoints(&self) -> Endpoints;

    /// Snapshot available before any request; games without a state endpoint need one.
    fn initial_snapshot(&self) -> Option<Self::Snapshot> {
        None
    }

    /// Decode the body of the state endpoint.
    fn decode_state(&self, body: Value) -> serde_json::Result<Self::Snapshot>;

    /// Phase a snapshot represents. Never yields the timed phase.
    fn infer_phase(&self, snapshot: &Self::Snapshot) -> Self::Phase;

    fn phase_name(&self, phase: Self::Phase) -> &'static str;

    /// Name of the winner, when the snapshot is terminal.
    fn winner(&self, snapshot: &Self::Snapshot) -> Option<String>;

    /// Endpoint that moves `phase` forward, if it can be advanced.
    fn advance_path(&self, phase: Self::Phase) -> Option<&'static str>;

    fn apply_advance(
        &self,
        snapshot: &Self::Snapshot,
        phase: Self::Phase,
        body: Value,
    ) -> serde_json::Result<Reconcile<Self::Snapshot>>;

    /// Request for `action`, or `None` when it is not available in `phase`.
    fn action_request(
        &self,
        snapshot: &Self::Snapshot,
        phase: Self::Phase,
        action: &Self::Action,
    ) -> Option<FormRequest> {
        let _ = (snapshot, phase, action);
        None
    }

    fn apply_action(
        &self,
        snapshot: &Self::Snapshot,
        action: &Self::Action,
        body: Value,
    ) -> serde_json::Result<Reconcile<Self::Snapshot>> {
        let _ = (snapshot, action, body);
        Ok(Reconcile::Refetch)
    }

    fn apply_undo(
        &self,
        snapshot: &Self::Snapshot,
        body: Value,
    ) -> serde_json::Result<Reconcile<Self::Snapshot>> {
        let _ = (snapshot, body);
        Ok(Reconcile::Refetch)
    }

    /// Local affordance for the reveal button; the server decides for itself.
    fn can_reveal(&self, snapshot: &Self::Snapshot, phase: Self::Phase) -> bool {
        let _ = (snapshot, phase);
        false
    }

    fn apply_reveal(
        &self,
        snapshot: &Self::Snapshot,
        body: Value,
    ) -> serde_json::Result<Reconcile<Self::Snapshot>> {
        let _ = (snapshot, body);
        Ok(Reconcile::Refetch)
    }

    /// Snapshot after the used content was reset server-side.
    fn apply_reset(&self, snapshot: &Self::Snapshot) -> Reconcile<Self::Snapshot> {
        let _ = snapshot;
        Reconcile::Refetch
    }

    /// Phase entered after `step` moved away from `from`.
    fn next_phase(
        &self,
        step: Step<'_, Self::Action>,
        from: Self::Phase,
        snapshot: &Self::Snapshot,
    ) -> Self::Phase {
        let _ = (step, from);
        self.infer_phase(snapshot)
    }

    /// Phase guarded by the countdown, if the game has one.
    fn timed_phase(&self) -> Option<Self::Phase> {
        None
    }

    fn default_timer(&self) -> Duration {
        Duration::from_secs(60)
    }

    /// Whether the countdown refills and starts after `step` went from `from` to `to`.
    fn restarts_timer(
        &self,
        step: Step<'_, Self::Action>,
        from: Self::Phase,
        to: Self::Phase,
    ) -> bool {
        let _ = step;
        self.timed_phase() == Some(to) && from != to
    }

    fn render(&self, frame: Frame<'_, Self::Snapshot, Self::Phase>) -> Scene<Self::Action>;
}

/// Decode a reply body into its wire type.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> serde_json::Result<T> {
    serde_json::from_value(body)
}

/// Winner named by the server, ignoring blank names.
pub(crate) fn named_winner(winner: &Option<String>) -> Option<String> {
    winner
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}
