use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::runtime::Handle;
use tracing::debug;

use crate::view::{Toast, ToastKind, ToastPort};

struct Slot {
    generation: u64,
    toast: Option<Toast>,
}

/// Single-slot toast display with auto-dismiss. A new toast replaces the visible one.
#[derive(Clone)]
pub struct Toaster {
    port: Arc<dyn ToastPort>,
    duration: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl Toaster {
    pub fn new(port: Arc<dyn ToastPort>, duration: Duration) -> Self {
        Self {
            port,
            duration,
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                toast: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Toast {
            message: message.into(),
            kind: ToastKind::Error,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(Toast {
            message: message.into(),
            kind: ToastKind::Info,
        });
    }

    /// Show `toast` and schedule its dismissal; an older pending dismissal becomes stale.
    pub fn show(&self, toast: Toast) {
        let generation = {
            let mut slot = self.lock();
            slot.generation += 1;
            slot.toast = Some(toast.clone());
            slot.generation
        };
        self.port.show_toast(Some(&toast));

        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime available; toast stays until replaced");
            return;
        };
        let toaster = self.clone();
        runtime.spawn(async move {
            tokio::time::sleep(toaster.duration).await;
            toaster.dismiss(generation);
        });
    }

    /// Toast currently visible.
    pub fn current(&self) -> Option<Toast> {
        self.lock().toast.clone()
    }

    fn dismiss(&self, generation: u64) {
        {
            let mut slot = self.lock();
            if slot.generation != generation || slot.toast.is_none() {
                return;
            }
            slot.toast = None;
        }
        self.port.show_toast(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::recording::RecordingView;

    fn toaster() -> (Arc<RecordingView<()>>, Toaster) {
        let view = Arc::new(RecordingView::new());
        let toaster = Toaster::new(view.clone(), Duration::from_millis(2_500));
        (view, toaster)
    }

    #[tokio::test(start_paused = true)]
    async fn toast_auto_dismisses() {
        let (view, toaster) = toaster();
        toaster.error("Netwerkfout");
        assert_eq!(view.toast().map(|toast| toast.message).as_deref(), Some("Netwerkfout"));

        tokio::time::sleep(Duration::from_millis(2_600)).await;

        assert_eq!(view.toast(), None);
        assert_eq!(toaster.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_toast_replaces_and_outlives_older_timer() {
        let (view, toaster) = toaster();
        toaster.error("eerste");
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        toaster.info("tweede");

        // The first toast's dismissal fires here and must not hide the second.
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(view.toast().map(|toast| toast.message).as_deref(), Some("tweede"));

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(view.toast(), None);

        let shown: Vec<_> = view
            .toast_history()
            .into_iter()
            .map(|toast| toast.map(|toast| toast.message))
            .collect();
        assert_eq!(
            shown,
            vec![Some("eerste".to_string()), Some("tweede".to_string()), None]
        );
    }
}
