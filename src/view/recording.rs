use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use super::{DocumentAttributes, Node, Region, Toast, ToastPort, ViewPort};

struct Recorded<A> {
    regions: BTreeMap<Region, Node<A>>,
    renders: HashMap<Region, usize>,
    ticks: Vec<(Duration, Duration)>,
    toast: Option<Toast>,
    toast_history: Vec<Option<Toast>>,
    attributes: BTreeMap<String, String>,
}

/// Keeps the latest content of every region plus a log of timer ticks and toasts.
pub struct RecordingView<A> {
    recorded: Mutex<Recorded<A>>,
}

impl<A> Default for RecordingView<A> {
    fn default() -> Self {
        Self {
            recorded: Mutex::new(Recorded {
                regions: BTreeMap::new(),
                renders: HashMap::new(),
                ticks: Vec::new(),
                toast: None,
                toast_history: Vec::new(),
                attributes: BTreeMap::new(),
            }),
        }
    }
}

impl<A: Clone> RecordingView<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded<A>> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Latest content of `region`, if it was ever rendered.
    pub fn region(&self, region: Region) -> Option<Node<A>> {
        self.lock().regions.get(&region).cloned()
    }

    /// Text of `region`, empty when never rendered.
    pub fn text(&self, region: Region) -> String {
        self.region(region)
            .map(|node| node.text_content())
            .unwrap_or_default()
    }

    /// Text of every region, in page order.
    pub fn page_text(&self) -> Vec<String> {
        Region::ALL.into_iter().map(|region| self.text(region)).collect()
    }

    /// How many times `region` was replaced.
    pub fn render_count(&self, region: Region) -> usize {
        self.lock().renders.get(&region).copied().unwrap_or(0)
    }

    pub fn ticks(&self) -> Vec<(Duration, Duration)> {
        self.lock().ticks.clone()
    }

    /// Toast currently visible.
    pub fn toast(&self) -> Option<Toast> {
        self.lock().toast.clone()
    }

    /// Every show/hide call, oldest first.
    pub fn toast_history(&self) -> Vec<Option<Toast>> {
        self.lock().toast_history.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.lock().attributes.get(name).cloned()
    }
}

impl<A: Clone + Send> ViewPort<A> for RecordingView<A> {
    fn replace(&self, region: Region, content: Node<A>) {
        let mut recorded = self.lock();
        recorded.regions.insert(region, content);
        *recorded.renders.entry(region).or_default() += 1;
    }

    fn timer(&self, remaining: Duration, duration: Duration) {
        self.lock().ticks.push((remaining, duration));
    }
}

impl<A: Clone + Send> ToastPort for RecordingView<A> {
    fn show_toast(&self, toast: Option<&Toast>) {
        let mut recorded = self.lock();
        recorded.toast = toast.cloned();
        recorded.toast_history.push(toast.cloned());
    }
}

impl<A: Clone + Send> DocumentAttributes for RecordingView<A> {
    fn set_attribute(&self, name: &str, value: &str) {
        self.lock()
            .attributes
            .insert(name.to_string(), value.to_string());
    }
}
