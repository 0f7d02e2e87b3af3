/// Pending-action locks and overlays owned by a controller.
pub mod session;
/// Countdown timer driven by a tokio task.
pub mod timer;

pub use self::session::{LockKind, LockSet, Overlay, PendingLocks};
pub use self::timer::{Countdown, CountdownTimer, MAX_TICK_INTERVAL, Tick, TimerObserver};
