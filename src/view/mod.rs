//! Render targets injected into the controller.

/// Text rendering for terminals.
pub mod console;
/// Element tree and bound actions.
pub mod node;
/// In-memory view used to inspect what was rendered.
pub mod recording;
/// Building blocks shared by the game renderers.
pub mod widgets;

use std::time::Duration;

pub use self::node::{Element, Node, UiAction};

/// Logical areas of a game page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Scoreboard,
    Progress,
    /// Phase-specific content: the word, question, song or card.
    Stage,
    Controls,
    Overlay,
}

impl Region {
    /// Every region in page order.
    pub const ALL: [Region; 5] = [
        Region::Scoreboard,
        Region::Progress,
        Region::Stage,
        Region::Controls,
        Region::Overlay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Scoreboard => "scoreboard",
            Region::Progress => "progress",
            Region::Stage => "stage",
            Region::Controls => "controls",
            Region::Overlay => "overlay",
        }
    }
}

/// The four regions a game renderer fills; the controller owns the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<A> {
    pub scoreboard: Node<A>,
    pub progress: Node<A>,
    pub stage: Node<A>,
    pub controls: Node<A>,
}

impl<A> Scene<A> {
    /// Scene with every region cleared.
    pub fn empty() -> Self {
        Self {
            scoreboard: Node::empty(),
            progress: Node::empty(),
            stage: Node::empty(),
            controls: Node::empty(),
        }
    }

    /// Regions paired with their content, in page order.
    pub fn into_regions(self) -> [(Region, Node<A>); 4] {
        [
            (Region::Scoreboard, self.scoreboard),
            (Region::Progress, self.progress),
            (Region::Stage, self.stage),
            (Region::Controls, self.controls),
        ]
    }
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

/// Receives rendered regions. Each call replaces the whole region.
pub trait ViewPort<A>: Send + Sync {
    fn replace(&self, region: Region, content: Node<A>);
    /// Timer progress; called on every tick.
    fn timer(&self, remaining: Duration, duration: Duration);
    /// Called once after all regions of a render pass were replaced.
    fn commit(&self) {}
}

/// Shows or hides the single toast slot (`None` hides it).
pub trait ToastPort: Send + Sync {
    fn show_toast(&self, toast: Option<&Toast>);
}

/// Document-level attributes driven by preferences.
pub trait DocumentAttributes: Send + Sync {
    fn set_attribute(&self, name: &str, value: &str);
}
