//! Generic session controller: owns the snapshot, the phase and the pending-action locks
//! of one game screen, and talks to the server through [`GameApi`].

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::{ClientConfig, Messages},
    dao::api::{ApiReply, FormRequest, GameApi},
    error::ControllerError,
    games::{Frame, GameConfig, Reconcile, Step},
    services::{alert::AlertFeedback, toast::Toaster},
    state::{CountdownTimer, LockKind, Overlay, PendingLocks, TimerObserver},
    view::{Node, Region, Scene, ToastPort, UiAction, ViewPort, widgets},
};

/// Per-controller knobs that do not come from the shared configuration.
#[derive(Clone, Default)]
pub struct SessionOptions {
    /// Fired when the timed phase runs out.
    pub alert: AlertFeedback,
    /// Overrides the game's default countdown.
    pub timer_duration: Option<Duration>,
}

/// What became of a user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The reply was merged and rendered.
    Applied,
    /// The server has no content left; the exhausted overlay is shown.
    Exhausted,
    /// A request of the same kind is still in flight.
    Busy,
    /// Not available in the current phase.
    Ignored,
    /// The server refused; the message was shown.
    Rejected(String),
    /// Transport or decode failure; the message was shown.
    Failed(String),
    /// The state endpoint did not answer with a snapshot.
    Unavailable,
}

struct SessionState<S, P> {
    snapshot: Option<S>,
    phase: P,
    overlay: Option<Overlay>,
}

/// Drives one game: fetches, mutates and renders its session snapshot.
pub struct SessionController<G: GameConfig, V> {
    id: Uuid,
    game: G,
    api: Arc<dyn GameApi>,
    view: Arc<V>,
    toaster: Toaster,
    alert: AlertFeedback,
    messages: Messages,
    timer: CountdownTimer,
    locks: PendingLocks,
    state: Mutex<SessionState<G::Snapshot, G::Phase>>,
}

/// Forwards countdown callbacks to the controller without keeping it alive.
struct TimerBridge<G: GameConfig, V> {
    controller: Weak<SessionController<G, V>>,
}

impl<G, V> TimerObserver for TimerBridge<G, V>
where
    G: GameConfig,
    V: ViewPort<G::Action> + ToastPort + 'static,
{
    fn on_tick(&self, remaining: Duration, duration: Duration) {
        if let Some(controller) = self.controller.upgrade() {
            controller.view.timer(remaining, duration);
        }
    }

    fn on_done(&self) {
        if let Some(controller) = self.controller.upgrade() {
            controller.on_timer_done();
        }
    }
}

/// Holds one lock kind; releasing it re-renders so the controls come back.
struct PendingGuard<'a, G, V>
where
    G: GameConfig,
    V: ViewPort<G::Action> + ToastPort + 'static,
{
    controller: &'a SessionController<G, V>,
    kind: LockKind,
}

impl<G, V> Drop for PendingGuard<'_, G, V>
where
    G: GameConfig,
    V: ViewPort<G::Action> + ToastPort + 'static,
{
    fn drop(&mut self) {
        self.controller.locks.release(self.kind);
        if !std::thread::panicking() {
            self.controller.render();
        }
    }
}

impl<G, V> SessionController<G, V>
where
    G: GameConfig,
    V: ViewPort<G::Action> + ToastPort + 'static,
{
    pub fn new(
        game: G,
        api: Arc<dyn GameApi>,
        view: Arc<V>,
        config: &ClientConfig,
        options: SessionOptions,
    ) -> Arc<Self> {
        let duration = options
            .timer_duration
            .unwrap_or_else(|| game.default_timer());

        Arc::new_cyclic(|controller| {
            let bridge = Arc::new(TimerBridge {
                controller: controller.clone(),
            });
            let snapshot = game.initial_snapshot();
            let phase = snapshot
                .as_ref()
                .map(|snapshot| game.infer_phase(snapshot))
                .unwrap_or_default();
            let id = Uuid::new_v4();
            debug!(session = %id, game = %game.kind(), "session controller created");

            Self {
                id,
                api,
                toaster: Toaster::new(view.clone(), config.toast_duration),
                view,
                alert: options.alert,
                messages: config.messages.clone(),
                timer: CountdownTimer::new(duration, config.tick_interval, bridge),
                locks: PendingLocks::new(),
                state: Mutex::new(SessionState {
                    snapshot,
                    phase,
                    overlay: None,
                }),
                game,
            }
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn phase(&self) -> G::Phase {
        self.lock_state().phase
    }

    /// Copy of the working snapshot; `None` before the first successful fetch.
    pub fn snapshot(&self) -> Option<G::Snapshot> {
        self.lock_state().snapshot.clone()
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.lock_state().overlay.clone()
    }

    pub fn is_pending(&self, kind: LockKind) -> bool {
        self.locks.is_held(kind)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState<G::Snapshot, G::Phase>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the snapshot with the server's and infer the phase from it.
    pub async fn fetch_state(&self) -> Outcome {
        let Some(path) = self.game.endpoints().state else {
            self.render();
            return Outcome::Ignored;
        };
        let outcome = match self.load_snapshot(path).await {
            Ok(Some(snapshot)) => {
                self.commit(snapshot, Step::Load);
                Outcome::Applied
            }
            Ok(None) => Outcome::Unavailable,
            Err(err) => self.fail(err, path),
        };
        self.render();
        outcome
    }

    /// Move the active phase forward: next item, draw or roll.
    pub async fn advance(&self) -> Outcome {
        let Some(_pending) = self.begin(LockKind::Advance) else {
            return Outcome::Busy;
        };
        let Some(phase) = self.playable_phase() else {
            return Outcome::Ignored;
        };
        let Some(path) = self.game.advance_path(phase) else {
            debug!(session = %self.id, phase = self.game.phase_name(phase), "nothing to advance");
            return Outcome::Ignored;
        };

        match self.post(FormRequest::new(path)).await {
            Err(err) => self.fail(err, path),
            Ok(None) => {
                info!(session = %self.id, game = %self.game.kind(), path, "content exhausted");
                let mut state = self.lock_state();
                state.overlay = Some(Overlay::merge(state.overlay.take(), Overlay::Exhausted));
                Outcome::Exhausted
            }
            Ok(Some(body)) => {
                let merged = self.merge(path, |snapshot| {
                    self.game.apply_advance(snapshot, phase, body)
                });
                match merged {
                    Ok(reconcile) => self.reconcile(reconcile, Step::Advance, path).await,
                    Err(err) => self.fail(err, path),
                }
            }
        }
    }

    /// Send a vote, guess, claim, award or score.
    pub async fn submit_action(&self, action: G::Action) -> Outcome {
        let Some(_pending) = self.begin(LockKind::Action) else {
            return Outcome::Busy;
        };
        let request = {
            let state = self.lock_state();
            match &state.snapshot {
                Some(snapshot) if !is_game_over(&state.overlay) => {
                    self.game.action_request(snapshot, state.phase, &action)
                }
                _ => None,
            }
        };
        let Some(request) = request else {
            debug!(session = %self.id, ?action, "action not available");
            return Outcome::Ignored;
        };
        let path = request.path;

        match self.post(request).await {
            Err(err) => self.fail(err, path),
            Ok(None) => {
                self.reconcile(Reconcile::Refetch, Step::Action(&action), path)
                    .await
            }
            Ok(Some(body)) => {
                let merged = self.merge(path, |snapshot| {
                    self.game.apply_action(snapshot, &action, body)
                });
                match merged {
                    Ok(reconcile) => {
                        self.reconcile(reconcile, Step::Action(&action), path)
                            .await
                    }
                    Err(err) => self.fail(err, path),
                }
            }
        }
    }

    /// Roll back the last scoring change.
    pub async fn undo(&self) -> Outcome {
        let Some(path) = self.game.endpoints().undo else {
            return Outcome::Ignored;
        };
        let Some(_pending) = self.begin(LockKind::Undo) else {
            return Outcome::Busy;
        };
        if self.playable_phase().is_none() {
            return Outcome::Ignored;
        }

        match self.post(FormRequest::new(path)).await {
            Err(err) => self.fail(err, path),
            Ok(None) => self.reconcile(Reconcile::Refetch, Step::Undo, path).await,
            Ok(Some(body)) => {
                match self.merge(path, |snapshot| self.game.apply_undo(snapshot, body)) {
                    Ok(reconcile) => self.reconcile(reconcile, Step::Undo, path).await,
                    Err(err) => self.fail(err, path),
                }
            }
        }
    }

    /// Reveal the answer once the local precondition holds.
    pub async fn reveal(&self) -> Outcome {
        let Some(path) = self.game.endpoints().reveal else {
            return Outcome::Ignored;
        };
        let Some(_pending) = self.begin(LockKind::Reveal) else {
            return Outcome::Busy;
        };
        let ready = {
            let state = self.lock_state();
            match &state.snapshot {
                Some(snapshot) if !is_game_over(&state.overlay) => {
                    self.game.can_reveal(snapshot, state.phase)
                }
                _ => false,
            }
        };
        if !ready {
            return Outcome::Ignored;
        }

        match self.post(FormRequest::new(path)).await {
            Err(err) => self.fail(err, path),
            Ok(None) => self.reconcile(Reconcile::Refetch, Step::Reveal, path).await,
            Ok(Some(body)) => {
                match self.merge(path, |snapshot| self.game.apply_reveal(snapshot, body)) {
                    Ok(reconcile) => self.reconcile(reconcile, Step::Reveal, path).await,
                    Err(err) => self.fail(err, path),
                }
            }
        }
    }

    /// Reset the used content server-side and hide the exhausted overlay.
    pub async fn reset(&self) -> Outcome {
        let Some(path) = self.game.endpoints().reset else {
            return Outcome::Ignored;
        };
        let Some(_pending) = self.begin(LockKind::Reset) else {
            return Outcome::Busy;
        };

        if let Err(err) = self.post(FormRequest::new(path)).await {
            return self.fail(err, path);
        }
        info!(session = %self.id, game = %self.game.kind(), "used content reset");
        self.clear_exhausted();
        self.toaster.info(self.messages.reset_done.clone());

        let reconcile = {
            let state = self.lock_state();
            state
                .snapshot
                .as_ref()
                .map(|snapshot| self.game.apply_reset(snapshot))
        };
        match reconcile {
            Some(Reconcile::Refetch) if self.game.endpoints().state.is_none() => Outcome::Applied,
            Some(reconcile) => self.reconcile(reconcile, Step::Load, path).await,
            None => Outcome::Applied,
        }
    }

    /// Hide the exhausted overlay and keep playing.
    pub fn dismiss(&self) -> Outcome {
        self.clear_exhausted();
        self.render();
        Outcome::Applied
    }

    /// End the timed phase before the countdown runs out. No alert is played.
    pub fn finish_phase(&self) -> Outcome {
        if self.game.timed_phase() != Some(self.phase()) {
            return Outcome::Ignored;
        }
        self.timer.reset(None);
        self.expire_timed_phase();
        Outcome::Applied
    }

    /// Entry point for bound controls.
    pub async fn dispatch(&self, action: UiAction<G::Action>) -> Outcome {
        match action {
            UiAction::Advance => self.advance().await,
            UiAction::Act(action) => self.submit_action(action).await,
            UiAction::Undo => self.undo().await,
            UiAction::Reveal => self.reveal().await,
            UiAction::Reset => self.reset().await,
            UiAction::Finish => self.finish_phase(),
            UiAction::Dismiss => self.dismiss(),
        }
    }

    /// Rebuild every region from the current snapshot, phase, locks and overlay.
    pub fn render(&self) {
        let (scene, overlay) = {
            let state = self.lock_state();
            let scene = match &state.snapshot {
                Some(snapshot) => self.game.render(Frame {
                    snapshot,
                    phase: state.phase,
                    reveal_ready: self.game.can_reveal(snapshot, state.phase),
                }),
                None => Scene::empty(),
            };
            (scene, state.overlay.clone())
        };

        let held = self.locks.held();
        let game_over = is_game_over(&overlay);
        // Any request in flight blocks every control that would send another one.
        let disabled = |action: &UiAction<G::Action>| {
            game_over
                || (!held.is_empty() && !matches!(action, UiAction::Finish | UiAction::Dismiss))
        };

        for (region, mut content) in scene.into_regions() {
            content.disable_where(&disabled);
            self.view.replace(region, content);
        }
        let mut overlay: Node<G::Action> = widgets::overlay(
            overlay.as_ref(),
            &self.messages,
            self.game.endpoints().reset.is_some(),
        );
        overlay.disable_where(&disabled);
        self.view.replace(Region::Overlay, overlay);
        self.view.commit();
    }

    fn begin(&self, kind: LockKind) -> Option<PendingGuard<'_, G, V>> {
        if !self.locks.try_acquire(kind) {
            debug!(session = %self.id, ?kind, "another request is in flight");
            return None;
        }
        let guard = PendingGuard {
            controller: self,
            kind,
        };
        self.render();
        Some(guard)
    }

    /// Current phase, unless there is nothing to play on.
    fn playable_phase(&self) -> Option<G::Phase> {
        let state = self.lock_state();
        (state.snapshot.is_some() && !is_game_over(&state.overlay)).then_some(state.phase)
    }

    async fn post(&self, request: FormRequest) -> Result<Option<Value>, ControllerError> {
        let path = request.path;
        debug!(session = %self.id, path, fields = request.form.len(), "sending request");
        let reply = self.api.post(request).await?;
        debug!(session = %self.id, path, status = reply.status, "reply received");
        classify(path, reply)
    }

    /// GET the state endpoint; `Ok(None)` when it answered without a snapshot.
    async fn load_snapshot(
        &self,
        path: &'static str,
    ) -> Result<Option<G::Snapshot>, ControllerError> {
        let reply = self.api.get(path).await?;
        if reply.status != 200 {
            info!(session = %self.id, path, status = reply.status, "state unavailable");
            return Ok(None);
        }
        let body = reply.body.ok_or(ControllerError::MalformedBody { path })?;
        self.game
            .decode_state(body)
            .map(Some)
            .map_err(|source| ControllerError::Decode { path, source })
    }

    /// Run a pure merge against the snapshot as it is now.
    fn merge(
        &self,
        path: &'static str,
        apply: impl FnOnce(&G::Snapshot) -> serde_json::Result<Reconcile<G::Snapshot>>,
    ) -> Result<Reconcile<G::Snapshot>, ControllerError> {
        let state = self.lock_state();
        let Some(snapshot) = &state.snapshot else {
            return Ok(Reconcile::Refetch);
        };
        apply(snapshot).map_err(|source| ControllerError::Decode { path, source })
    }

    async fn reconcile(
        &self,
        reconcile: Reconcile<G::Snapshot>,
        step: Step<'_, G::Action>,
        path: &'static str,
    ) -> Outcome {
        match reconcile {
            Reconcile::Replace(snapshot) => {
                self.commit(snapshot, step);
                Outcome::Applied
            }
            Reconcile::Keep(None) => Outcome::Applied,
            Reconcile::Keep(Some(message)) => {
                info!(session = %self.id, path, %message, "server declined");
                self.toaster.error(message.clone());
                Outcome::Rejected(message)
            }
            Reconcile::Refetch => {
                let Some(state_path) = self.game.endpoints().state else {
                    return Outcome::Applied;
                };
                match self.load_snapshot(state_path).await {
                    Ok(Some(snapshot)) => {
                        self.commit(snapshot, step);
                        Outcome::Applied
                    }
                    Ok(None) => {
                        warn!(session = %self.id, path, "state unavailable after change");
                        Outcome::Unavailable
                    }
                    Err(err) => self.fail(err, state_path),
                }
            }
        }
    }

    /// Install `snapshot`, enter the phase `step` leads to and update overlay and timer.
    fn commit(&self, snapshot: G::Snapshot, step: Step<'_, G::Action>) {
        let winner = self.game.winner(&snapshot);
        let (from, to) = {
            let mut state = self.lock_state();
            let from = state.phase;
            let to = self.game.next_phase(step, from, &snapshot);
            state.snapshot = Some(snapshot);
            state.phase = to;

            match winner {
                Some(winner) => {
                    info!(session = %self.id, game = %self.game.kind(), %winner, "game won");
                    state.overlay = Some(Overlay::merge(
                        state.overlay.take(),
                        Overlay::GameOver { winner },
                    ));
                }
                None if is_game_over(&state.overlay) => state.overlay = None,
                None => {}
            }
            if matches!(step, Step::Advance) && state.overlay == Some(Overlay::Exhausted) {
                state.overlay = None;
            }
            (from, to)
        };

        if from != to {
            info!(
                session = %self.id,
                game = %self.game.kind(),
                phase = self.game.phase_name(to),
                "phase entered"
            );
        }
        self.update_timer(step, from, to);
    }

    /// Must run without the state lock: timer callbacks re-enter the controller.
    fn update_timer(&self, step: Step<'_, G::Action>, from: G::Phase, to: G::Phase) {
        let timed = self.game.timed_phase();
        if self.game.restarts_timer(step, from, to) {
            self.timer.reset(None);
            self.timer.start();
        } else if timed == Some(from) && timed != Some(to) && !matches!(step, Step::Timer) {
            self.timer.reset(None);
        }
    }

    fn on_timer_done(&self) {
        if self.game.timed_phase() != Some(self.phase()) {
            return;
        }
        info!(session = %self.id, game = %self.game.kind(), "time is up");
        self.alert.fire();
        self.expire_timed_phase();
    }

    fn expire_timed_phase(&self) {
        let entered = {
            let mut state = self.lock_state();
            let from = state.phase;
            if self.game.timed_phase() != Some(from) {
                return;
            }
            let Some(snapshot) = &state.snapshot else {
                return;
            };
            let to = self.game.next_phase(Step::Timer, from, snapshot);
            state.phase = to;
            to
        };
        info!(
            session = %self.id,
            game = %self.game.kind(),
            phase = self.game.phase_name(entered),
            "phase entered"
        );
        self.render();
    }

    fn clear_exhausted(&self) {
        let mut state = self.lock_state();
        if state.overlay == Some(Overlay::Exhausted) {
            state.overlay = None;
        }
    }

    fn fail(&self, err: ControllerError, path: &'static str) -> Outcome {
        let message = err.user_message(&self.messages);
        self.toaster.error(message.clone());
        match err {
            ControllerError::Rejected { status, .. } => {
                info!(session = %self.id, path, status, "request rejected");
                Outcome::Rejected(message)
            }
            err => {
                warn!(session = %self.id, path, error = %err, "request failed");
                Outcome::Failed(message)
            }
        }
    }
}

fn is_game_over(overlay: &Option<Overlay>) -> bool {
    matches!(overlay, Some(Overlay::GameOver { .. }))
}

/// `204` means "no content"; other 2xx replies must carry JSON.
fn classify(path: &'static str, reply: ApiReply) -> Result<Option<Value>, ControllerError> {
    match reply.status {
        204 => Ok(None),
        200..=299 => reply
            .body
            .map(Some)
            .ok_or(ControllerError::MalformedBody { path }),
        status => Err(ControllerError::Rejected {
            status,
            message: reply.error_message(),
        }),
    }
}
