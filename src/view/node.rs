//! Minimal element tree handed to view ports.

use indexmap::IndexMap;

/// What activating a bound control asks the controller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction<A> {
    /// Advance the active phase (next, draw, roll).
    Advance,
    /// Game-specific selection (vote, guess, claim, award).
    Act(A),
    Undo,
    Reveal,
    /// Reset the used-content pool.
    Reset,
    /// End the running timed phase early.
    Finish,
    /// Hide the exhausted overlay and keep playing.
    Dismiss,
}

/// A rendered node: text or an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<A> {
    Text(String),
    Element(Element<A>),
}

/// An element with at most one bound action.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<A> {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: IndexMap<&'static str, String>,
    pub children: Vec<Node<A>>,
    pub on_click: Option<UiAction<A>>,
    pub disabled: bool,
}

impl<A> Node<A> {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Start building an element.
    pub fn el(tag: &'static str) -> Element<A> {
        Element {
            tag,
            classes: Vec::new(),
            attrs: IndexMap::new(),
            children: Vec::new(),
            on_click: None,
            disabled: false,
        }
    }

    /// An element without content, used to clear a region.
    pub fn empty() -> Self {
        Node::el("div").into()
    }

    /// All text of the subtree, separated by single spaces.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match self {
            Node::Text(text) if !text.is_empty() => parts.push(text),
            Node::Text(_) => {}
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(parts);
                }
            }
        }
    }

    /// Every element carrying a bound action, in document order.
    pub fn bindings(&self) -> Vec<&Element<A>> {
        let mut found = Vec::new();
        self.collect_bindings(&mut found);
        found
    }

    fn collect_bindings<'a>(&'a self, found: &mut Vec<&'a Element<A>>) {
        if let Node::Element(element) = self {
            if element.on_click.is_some() {
                found.push(element);
            }
            for child in &element.children {
                child.collect_bindings(found);
            }
        }
    }

    /// Disable every bound control whose action matches `predicate`.
    pub fn disable_where(&mut self, predicate: &impl Fn(&UiAction<A>) -> bool) {
        if let Node::Element(element) = self {
            if element.on_click.as_ref().is_some_and(predicate) {
                element.disabled = true;
            }
            for child in &mut element.children {
                child.disable_where(predicate);
            }
        }
    }
}

impl<A> Element<A> {
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node<A>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node<A>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Bind the action triggered when the element is activated; replaces any previous one.
    pub fn on_click(mut self, action: UiAction<A>) -> Self {
        self.on_click = Some(action);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = self.disabled || disabled;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|candidate| candidate == class)
    }
}

impl<A> From<Element<A>> for Node<A> {
    fn from(element: Element<A>) -> Self {
        Node::Element(element)
    }
}

impl<A> From<&str> for Node<A> {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl<A> From<String> for Node<A> {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node<u8> {
        Node::el("section")
            .child(Node::el("h2").child("Ronde 3"))
            .child(
                Node::el("button")
                    .child("Volgende")
                    .on_click(UiAction::Advance),
            )
            .child(
                Node::el("button")
                    .child("Team 1")
                    .on_click(UiAction::Act(0)),
            )
            .into()
    }

    #[test]
    fn text_content_walks_the_tree() {
        assert_eq!(sample().text_content(), "Ronde 3 Volgende Team 1");
    }

    #[test]
    fn bindings_are_listed_once_per_element() {
        let node = sample();
        let bindings = node.bindings();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].on_click, Some(UiAction::Advance));
        assert_eq!(bindings[1].on_click, Some(UiAction::Act(0)));
    }

    #[test]
    fn disable_where_only_touches_matching_actions() {
        let mut node = sample();
        node.disable_where(&|action| matches!(action, UiAction::Act(_)));
        let bindings = node.bindings();
        assert!(!bindings[0].disabled);
        assert!(bindings[1].disabled);
    }
}
