//! Arena-based source tree.
//!
//! html5ever parses into this tree through [`super::tree_sink::ArenaSink`].
//! All nodes live in one vector; parent/child/sibling links are indices into
//! it, so building and dropping the tree never recurses.

use html5ever::QualName;

use super::tag::{TagName, named_enum};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

named_enum! {
    /// Document compatibility mode chosen by the parser from the doctype.
    pub enum QuirksMode {
        NoQuirks => "no-quirks",
        Quirks => "quirks",
        LimitedQuirks => "limited-quirks",
    }
}

impl Default for QuirksMode {
    fn default() -> Self {
        QuirksMode::NoQuirks
    }
}

/// Document-level data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentData {
    /// Doctype name, empty without a doctype.
    pub name: String,
    pub public_identifier: String,
    pub system_identifier: String,
    pub has_doctype: bool,
    pub quirks_mode: QuirksMode,
    /// Position of the root element among the document's children.
    pub root: Option<usize>,
}

/// An attribute as exposed to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element data.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Parser-level name, used by the tree builder for scoping decisions.
    pub name: QualName,
    /// Tag identity exposed by projection.
    pub tag: TagName,
    /// Attributes in source order.
    pub attrs: Vec<Attribute>,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document node. Its data lives in [`SourceTree::document_data`].
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
    CData(String),
    Whitespace(String),
}

impl NodeData {
    /// Kind name of this node, as it appears in projected values.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeData::Document => "document",
            NodeData::Element(_) => "element",
            NodeData::Text(_) => "text",
            NodeData::Comment(_) => "comment",
            NodeData::CData(_) => "cdata",
            NodeData::Whitespace(_) => "whitespace",
        }
    }
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based source tree.
#[derive(Debug)]
pub struct SourceTree {
    nodes: Vec<Node>,
    document: NodeId,
    document_data: DocumentData,
    /// Maximum number of nodes the arena accepts.
    limit: usize,
}

impl SourceTree {
    /// Create a tree holding only a document node.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Create a tree that refuses to grow past `max_nodes` nodes.
    ///
    /// The arena never holds more than `u32::MAX` nodes regardless.
    pub fn with_limit(max_nodes: Option<usize>) -> Self {
        let ceiling = NodeId::NONE.0 as usize;
        let mut tree = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            document_data: DocumentData::default(),
            limit: max_nodes.map_or(ceiling, |n| n.clamp(1, ceiling)),
        };
        tree.nodes.push(Node::new(NodeData::Document));
        tree.document = NodeId(0);
        tree
    }

    /// Allocate a new node, or `None` when the arena is full.
    fn alloc(&mut self, data: NodeData) -> Option<NodeId> {
        if self.nodes.len() >= self.limit {
            return None;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        Some(id)
    }

    /// Get the document node ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Document-level data.
    pub fn document_data(&self) -> &DocumentData {
        &self.document_data
    }

    /// Mutable document-level data.
    pub fn document_data_mut(&mut self) -> &mut DocumentData {
        &mut self.document_data
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(
        &mut self,
        name: QualName,
        tag: TagName,
        attrs: Vec<Attribute>,
    ) -> Option<NodeId> {
        self.alloc(NodeData::Element(ElementData { name, tag, attrs }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> Option<NodeId> {
        self.alloc(NodeData::Text(text))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> Option<NodeId> {
        self.alloc(NodeData::Comment(text))
    }

    /// Create a new CDATA node.
    pub fn create_cdata(&mut self, text: String) -> Option<NodeId> {
        self.alloc(NodeData::CData(text))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to the parent's trailing text node, or create one.
    ///
    /// Returns `false` when a new node was needed and the arena is full.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> bool {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return true;
        }

        match self.create_text(text.to_string()) {
            Some(text_node) => {
                self.append(parent, text_node);
                true
            }
            None => false,
        }
    }

    /// Insert text before a sibling, merging into a preceding text node.
    ///
    /// Returns `false` when a new node was needed and the arena is full.
    pub fn insert_text_before(&mut self, sibling: NodeId, text: &str) -> bool {
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(prev_node) = self.get_mut(prev)
            && let NodeData::Text(ref mut existing) = prev_node.data
        {
            existing.push_str(text);
            return true;
        }

        match self.create_text(text.to_string()) {
            Some(text_node) => {
                self.insert_before(sibling, text_node);
                true
            }
            None => false,
        }
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Move every child of `node` to the end of `new_parent`.
    pub fn reparent_children(&mut self, node: NodeId, new_parent: NodeId) {
        let children: Vec<_> = self.children(node).collect();

        for child in &children {
            if let Some(c) = self.get_mut(*child) {
                c.parent = NodeId::NONE;
                c.prev_sibling = NodeId::NONE;
                c.next_sibling = NodeId::NONE;
            }
        }
        if let Some(n) = self.get_mut(node) {
            n.first_child = NodeId::NONE;
            n.last_child = NodeId::NONE;
        }

        for child in children {
            self.append(new_parent, child);
        }
    }

    /// Finish construction.
    ///
    /// Reclassifies whitespace-only text nodes as [`NodeData::Whitespace`]
    /// and records the position of the root element among the document's
    /// children.
    pub fn seal(&mut self) {
        for node in &mut self.nodes {
            if let NodeData::Text(text) = &mut node.data
                && is_html_whitespace(text)
            {
                node.data = NodeData::Whitespace(std::mem::take(text));
            }
        }

        let root = self
            .children(self.document)
            .position(|id| matches!(self.get(id).map(|n| &n.data), Some(NodeData::Element(_))));
        self.document_data.root = root;
    }

    /// Get the number of nodes, including the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds only the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            tree: self,
            current: first,
        }
    }

    /// Count the children of a node.
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).count()
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// True for non-empty text made only of HTML whitespace.
fn is_html_whitespace(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\x0c' | b'\r'))
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    tree: &'a SourceTree,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .tree
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}
