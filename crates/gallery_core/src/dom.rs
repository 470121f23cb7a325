//! Retained document the view tree is attached into.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Detaching a node frees its
//! whole subtree and returns the slots to a free list. Each slot carries a
//! generation that is bumped on release, so ids of removed nodes never
//! resolve again even after their slot is reused. Event dispatch
//! does not run handlers itself: it reports the bubbling path of registered
//! [`Action`]s and leaves their interpretation to the application context.

use shared::domain::CatalogRecord;

use crate::view::{Action, Tag, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Character(char),
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: Tag,
        attrs: Vec<(String, String)>,
        on_click: Option<Action>,
        record: Option<Box<CatalogRecord>>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone)]
struct KeyListener {
    id: ListenerId,
    key: Key,
    action: Action,
}

/// One handler reached while a click bubbled from its target to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handler {
    pub current: NodeId,
    pub action: Action,
}

/// Default activation of a link: open `href` in the browsing context `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub href: String,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
    pub handlers: Vec<Handler>,
    pub link: Option<Navigation>,
}

impl ClickEvent {
    fn inert(target: NodeId) -> Self {
        Self {
            target,
            handlers: Vec::new(),
            link: None,
        }
    }

    /// Whether the click landed on a link or inside one.
    pub fn within_link(&self) -> bool {
        self.link.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    body: NodeId,
    listeners: Vec<KeyListener>,
    next_listener: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Node {
            kind: NodeKind::Element {
                tag: Tag::Body,
                attrs: Vec::new(),
                on_click: None,
                record: None,
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(body),
            }],
            vacant: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Number of arena slots, live or vacant.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether `id` is live and reachable from the body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.body {
                return true;
            }
            cursor = match self.node(current) {
                Some(node) => node.parent,
                None => return false,
            };
        }
        false
    }

    /// Appends `view` under `parent` and returns the id of its root node.
    pub fn attach(&mut self, parent: NodeId, view: View) -> NodeId {
        let id = self.insert(Some(parent), view);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    fn insert(&mut self, parent: Option<NodeId>, view: View) -> NodeId {
        match view {
            View::Text(text) => self.alloc(Node {
                kind: NodeKind::Text(text),
                parent,
                children: Vec::new(),
            }),
            View::Element(element) => {
                let id = self.alloc(Node {
                    kind: NodeKind::Element {
                        tag: element.tag,
                        attrs: element.attrs,
                        on_click: element.on_click,
                        record: element.record.map(Box::new),
                    },
                    parent,
                    children: Vec::new(),
                });
                let children: Vec<NodeId> = element
                    .children
                    .into_iter()
                    .map(|child| self.insert(Some(id), child))
                    .collect();
                if let Some(node) = self.node_mut(id) {
                    node.children = children;
                }
                id
            }
        }
    }

    /// Removes `id` and its subtree. Returns `false` when it was already gone.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if id == self.body {
            return false;
        }
        let Some(parent) = self.node(id).map(|node| node.parent) else {
            return false;
        };
        if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
            parent.children.retain(|child| *child != id);
        }
        self.free(id);
        true
    }

    fn free(&mut self, id: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
        else {
            return;
        };
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);
        for child in node.children {
            self.free(child);
        }
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free(child);
        }
    }

    /// Replaces the children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if !self.exists(id) {
            return;
        }
        self.clear_children(id);
        self.attach(id, View::Text(text.into()));
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag, .. } => Some(*tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Content of a text node; `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match self.node(id).map(|node| &node.kind) {
            Some(NodeKind::Element { attrs, .. }) => attrs.as_slice(),
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(id)
        {
            match attrs.iter_mut().find(|(existing, _)| existing == name) {
                Some(slot) => slot.1 = value,
                None => attrs.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(id)
        {
            attrs.retain(|(existing, _)| existing != name);
        }
    }

    pub fn set_on_click(&mut self, id: NodeId, action: Action) {
        if let Some(Node {
            kind: NodeKind::Element { on_click, .. },
            ..
        }) = self.node_mut(id)
        {
            *on_click = Some(action);
        }
    }

    pub fn on_click(&self, id: NodeId) -> Option<Action> {
        match &self.node(id)?.kind {
            NodeKind::Element { on_click, .. } => *on_click,
            NodeKind::Text(_) => None,
        }
    }

    /// Record attached to the element when it was rendered.
    pub fn record(&self, id: NodeId) -> Option<&CatalogRecord> {
        match &self.node(id)?.kind {
            NodeKind::Element { record, .. } => record.as_deref(),
            NodeKind::Text(_) => None,
        }
    }

    /// First attached element whose `id` attribute equals `element_id`.
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|id| self.attr(*id, "id") == Some(element_id))
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn find_all(&self, root: NodeId, tag: Tag) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.tag(*id) == Some(tag))
            .collect()
    }

    pub fn find(&self, root: NodeId, tag: Tag) -> Option<NodeId> {
        self.find_all(root, tag).into_iter().next()
    }

    fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.exists(id).then_some(id);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent(current);
        }
        path
    }

    /// Dispatches a click on `target`.
    ///
    /// Clicks on detached nodes or on disabled buttons dispatch nothing.
    pub fn click(&self, target: NodeId) -> ClickEvent {
        if !self.is_attached(target) {
            return ClickEvent::inert(target);
        }
        let path = self.ancestors_inclusive(target);
        let disabled = path
            .iter()
            .any(|id| self.tag(*id) == Some(Tag::Button) && self.has_attr(*id, "disabled"));
        if disabled {
            return ClickEvent::inert(target);
        }

        let handlers = path
            .iter()
            .filter_map(|id| {
                self.on_click(*id).map(|action| Handler {
                    current: *id,
                    action,
                })
            })
            .collect();
        let link = path
            .iter()
            .find(|id| self.tag(**id) == Some(Tag::A))
            .and_then(|id| {
                self.attr(*id, "href").map(|href| Navigation {
                    href: href.to_string(),
                    target: self.attr(*id, "target").map(str::to_string),
                })
            });

        ClickEvent {
            target,
            handlers,
            link,
        }
    }

    pub fn add_key_listener(&mut self, key: Key, action: Action) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push(KeyListener { id, key, action });
        id
    }

    pub fn remove_key_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    pub fn key_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Actions of the listeners registered for `key`, in registration order.
    pub fn key_down(&self, key: Key) -> Vec<Action> {
        self.listeners
            .iter()
            .filter(|listener| listener.key == key)
            .map(|listener| listener.action)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/dom_tests.rs"]
mod tests;
