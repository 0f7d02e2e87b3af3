use std::{
    collections::BTreeMap,
    io::{self, Write},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use tracing::debug;

use super::{
    DocumentAttributes, Node, Region, Toast, ToastKind, ToastPort, UiAction, ViewPort, widgets,
};

struct Screen<A> {
    regions: BTreeMap<Region, Node<A>>,
    actions: Vec<UiAction<A>>,
    last_second: Option<u64>,
}

/// Prints the page to stdout and numbers every enabled control.
pub struct ConsoleView<A> {
    screen: Mutex<Screen<A>>,
}

impl<A> Default for ConsoleView<A> {
    fn default() -> Self {
        Self {
            screen: Mutex::new(Screen {
                regions: BTreeMap::new(),
                actions: Vec::new(),
                last_second: None,
            }),
        }
    }
}

impl<A: Clone> ConsoleView<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Screen<A>> {
        self.screen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Action bound to the control printed as `[number]`.
    pub fn binding(&self, number: usize) -> Option<UiAction<A>> {
        let screen = self.lock();
        number
            .checked_sub(1)
            .and_then(|index| screen.actions.get(index))
            .cloned()
    }

    fn print(&self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(err) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            debug!(error = %err, "failed to write to the console");
        }
    }
}

impl<A: Clone + Send> ViewPort<A> for ConsoleView<A> {
    fn replace(&self, region: Region, content: Node<A>) {
        self.lock().regions.insert(region, content);
    }

    fn timer(&self, remaining: Duration, _duration: Duration) {
        let second = remaining.as_millis().div_ceil(1000) as u64;
        {
            let mut screen = self.lock();
            if screen.last_second == Some(second) {
                return;
            }
            screen.last_second = Some(second);
        }
        self.print(&format!("  [tijd] {}", widgets::clock(remaining)));
    }

    fn commit(&self) {
        let mut lines = Vec::new();
        {
            let mut screen = self.lock();
            let mut actions = Vec::new();
            for (region, node) in &screen.regions {
                let text = node.text_content();
                if !text.is_empty() {
                    lines.push(format!("{:>10} | {}", region.as_str(), text));
                }
                for element in node.bindings() {
                    if element.disabled {
                        continue;
                    }
                    if let Some(action) = &element.on_click {
                        actions.push(action.clone());
                        let label = Node::Element(element.clone()).text_content();
                        lines.push(format!("{:>10}   [{}] {}", "", actions.len(), label));
                    }
                }
            }
            screen.actions = actions;
        }
        lines.push(String::new());
        self.print(&lines.join("\n"));
    }
}

impl<A: Clone + Send> ToastPort for ConsoleView<A> {
    fn show_toast(&self, toast: Option<&Toast>) {
        if let Some(toast) = toast {
            let marker = match toast.kind {
                ToastKind::Info => "i",
                ToastKind::Error => "!",
            };
            self.print(&format!("  ({marker}) {}", toast.message));
        }
    }
}

impl<A: Clone + Send> DocumentAttributes for ConsoleView<A> {
    fn set_attribute(&self, name: &str, value: &str) {
        debug!(name, value, "document attribute");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_enabled_controls_are_numbered() {
        let view = ConsoleView::<u8>::new();
        view.replace(
            Region::Controls,
            Node::el("div")
                .child(widgets::button("Volgende", UiAction::Advance))
                .child(
                    Node::el("button")
                        .child("Ongedaan maken")
                        .on_click(UiAction::Undo)
                        .disabled(true),
                )
                .child(widgets::button("Goed", UiAction::Act(3)))
                .into(),
        );
        view.commit();

        assert_eq!(view.binding(0), None);
        assert_eq!(view.binding(1), Some(UiAction::Advance));
        assert_eq!(view.binding(2), Some(UiAction::Act(3)));
        assert_eq!(view.binding(3), None);
    }

    #[test]
    fn numbering_follows_page_order() {
        let view = ConsoleView::<u8>::new();
        view.replace(Region::Overlay, widgets::button("Verder", UiAction::Dismiss));
        view.replace(Region::Controls, widgets::button("Start", UiAction::Advance));
        view.commit();

        assert_eq!(view.binding(1), Some(UiAction::Advance));
        assert_eq!(view.binding(2), Some(UiAction::Dismiss));
    }
}
