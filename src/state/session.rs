//! Per-controller transient state: pending-action locks and the blocking overlay.

use std::sync::atomic::{AtomicU8, Ordering};

/// Kinds of mutating requests a controller can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKind {
    /// Next item, draw, roll.
    Advance,
    /// Vote, guess, claim, award, score.
    Action,
    Undo,
    Reveal,
    /// Reset of the used-content pool.
    Reset,
}

impl LockKind {
    fn bit(self) -> u8 {
        match self {
            LockKind::Advance => 1 << 0,
            LockKind::Action => 1 << 1,
            LockKind::Undo => 1 << 2,
            LockKind::Reveal => 1 << 3,
            LockKind::Reset => 1 << 4,
        }
    }
}

/// Single-flight guard: at most one mutating request per controller, of any kind.
#[derive(Debug, Default)]
pub struct PendingLocks {
    // Zero when free, otherwise the bit of the kind in flight.
    held: AtomicU8,
}

impl PendingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engage the lock for `kind`; `false` when any request is already in flight.
    pub fn try_acquire(&self, kind: LockKind) -> bool {
        self.held
            .compare_exchange(0, kind.bit(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Free the lock if `kind` holds it.
    pub fn release(&self, kind: LockKind) {
        let _ = self
            .held
            .compare_exchange(kind.bit(), 0, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn is_held(&self, kind: LockKind) -> bool {
        self.held.load(Ordering::Acquire) == kind.bit()
    }

    /// Copy of the current state, used when rendering.
    pub fn held(&self) -> LockSet {
        LockSet {
            bits: self.held.load(Ordering::Acquire),
        }
    }
}

/// Immutable set of engaged locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockSet {
    bits: u8,
}

impl LockSet {
    /// Set with `kind` added.
    pub fn with(self, kind: LockKind) -> Self {
        Self {
            bits: self.bits | kind.bit(),
        }
    }

    pub fn contains(self, kind: LockKind) -> bool {
        self.bits & kind.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }
}

/// Overlay covering the game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// The server has no content left; offers reset or continue.
    Exhausted,
    /// Someone won; blocks further play.
    GameOver {
        /// Display name of the winning team or player.
        winner: String,
    },
}

impl Overlay {
    /// A game-over overlay is never replaced by an exhausted one.
    pub fn merge(current: Option<Overlay>, next: Overlay) -> Overlay {
        match (current, next) {
            (Some(game_over @ Overlay::GameOver { .. }), Overlay::Exhausted) => game_over,
            (_, next) => next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let locks = PendingLocks::new();
        assert!(locks.try_acquire(LockKind::Action));
        assert!(!locks.try_acquire(LockKind::Action));
        assert!(locks.is_held(LockKind::Action));

        locks.release(LockKind::Action);
        assert!(!locks.is_held(LockKind::Action));
        assert!(locks.try_acquire(LockKind::Action));
    }

    #[test]
    fn one_request_of_any_kind_at_a_time() {
        let locks = PendingLocks::new();
        assert!(locks.try_acquire(LockKind::Advance));
        assert!(!locks.try_acquire(LockKind::Undo));
        assert!(!locks.try_acquire(LockKind::Action));

        let held = locks.held();
        assert!(held.contains(LockKind::Advance));
        assert!(!held.contains(LockKind::Undo));

        // Only the holder frees the lock.
        locks.release(LockKind::Undo);
        assert!(locks.is_held(LockKind::Advance));
        locks.release(LockKind::Advance);
        assert!(locks.held().is_empty());
        assert!(locks.try_acquire(LockKind::Undo));
    }

    #[test]
    fn game_over_is_never_hidden_by_exhausted() {
        let game_over = Overlay::GameOver {
            winner: "Team 1".into(),
        };
        assert_eq!(
            Overlay::merge(Some(game_over.clone()), Overlay::Exhausted),
            game_over
        );
        assert_eq!(
            Overlay::merge(Some(Overlay::Exhausted), game_over.clone()),
            game_over
        );
        assert_eq!(Overlay::merge(None, Overlay::Exhausted), Overlay::Exhausted);
    }
}
