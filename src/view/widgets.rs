use std::time::Duration;

use crate::{config::Messages, state::Overlay};

use super::{Node, UiAction};

/// Participant colors, assigned by index and wrapping around.
pub const PLAYER_COLORS: [&str; 6] = [
    "#4F46E5", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899",
];

/// Render-time color of the participant at `index`.
pub fn participant_color(index: usize) -> &'static str {
    PLAYER_COLORS[index % PLAYER_COLORS.len()]
}

/// One scoreboard row per participant; `active` highlights the team whose turn it is.
pub fn scoreboard<A, V: ToString>(
    names: &[String],
    values: &[V],
    active: Option<usize>,
) -> Node<A> {
    let rows = names.iter().enumerate().map(|(index, name)| {
        let value = values
            .get(index)
            .map(ToString::to_string)
            .unwrap_or_else(|| "0".into());
        let mut row = Node::el("li")
            .class("score-entry")
            .attr("style", format!("--team-color: {}", participant_color(index)))
            .child(Node::el("span").class("score-name").child(name.as_str()))
            .child(Node::el("span").class("score-value").child(value));
        if active == Some(index) {
            row = row.class("active");
        }
        row.into()
    });
    Node::el("ul").class("scoreboard").children(rows).into()
}

/// Labelled progress bar; `value` is clamped to `max`.
pub fn progress<A>(label: &str, value: u64, max: u64) -> Node<A> {
    let value = value.min(max);
    Node::el("div")
        .class("progress")
        .child(Node::el("span").class("progress-label").child(label))
        .child(
            Node::el("progress")
                .attr("value", value.to_string())
                .attr("max", max.to_string()),
        )
        .child(Node::el("span").class("progress-count").child(format!("{value} / {max}")))
        .into()
}

/// A progress bar per participant towards a shared target.
pub fn race<A>(names: &[String], positions: &[u64], target: u64) -> Node<A> {
    let bars = names.iter().enumerate().map(|(index, name)| {
        let position = positions.get(index).copied().unwrap_or(0);
        progress(name, position, target)
    });
    Node::el("div").class("race").children(bars).into()
}

pub fn button<A>(label: impl Into<String>, action: UiAction<A>) -> Node<A> {
    Node::el("button").child(label.into()).on_click(action).into()
}

pub fn heading<A>(text: impl Into<String>) -> Node<A> {
    Node::el("h2").child(text.into()).into()
}

pub fn paragraph<A>(text: impl Into<String>) -> Node<A> {
    Node::el("p").child(text.into()).into()
}

/// Phase section; its class names the active phase.
pub fn section<A>(phase: &str, children: impl IntoIterator<Item = Node<A>>) -> Node<A> {
    Node::el("section")
        .class("phase")
        .class(format!("phase-{phase}"))
        .children(children)
        .into()
}

/// Link to the current song; skipped when the server sent none.
pub fn link<A>(label: &str, href: Option<&str>) -> Option<Node<A>> {
    let href = href.filter(|href| !href.is_empty())?;
    Some(Node::el("a").attr("href", href).child(label).into())
}

/// `m:ss`, rounded up so the display reads `0:00` only at expiry.
pub fn clock(remaining: Duration) -> String {
    let millis = remaining.as_millis();
    let seconds = millis.div_ceil(1000);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Overlay region: exhausted prompt or blocking game-over screen.
pub fn overlay<A>(overlay: Option<&Overlay>, messages: &Messages, can_reset: bool) -> Node<A> {
    match overlay {
        None => Node::empty(),
        Some(Overlay::Exhausted) => {
            let mut content = vec![heading(messages.exhausted.clone())];
            if can_reset {
                content.push(button("Opnieuw beginnen", UiAction::Reset));
            }
            content.push(button("Doorgaan", UiAction::Dismiss));
            Node::el("div")
                .class("overlay")
                .class("overlay-exhausted")
                .children(content)
                .into()
        }
        Some(Overlay::GameOver { winner }) => Node::el("div")
            .class("overlay")
            .class("overlay-game-over")
            .children([heading(messages.winner_title(winner))])
            .into(),
    }
}
