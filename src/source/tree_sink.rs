//! html5ever TreeSink implementation for [`SourceTree`].

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use html5ever::interface::ElemName;
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode as Html5QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, LocalName, Namespace, QualName};

use super::arena::{Attribute, NodeData, NodeId, QuirksMode, SourceTree};
use super::scan::StartTagScanner;
use super::tag::{KnownTag, TagName};
use crate::options::ParseOptions;

/// Element name handed back to the tree builder.
///
/// Owns its atoms (cheap reference-counted clones) so no borrow of the
/// arena escapes the `RefCell`.
#[derive(Debug, Clone)]
pub struct ElementName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for ElementName {
    fn ns(&self) -> &Namespace {
        &self.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.local
    }
}

/// TreeSink implementation that builds a [`SourceTree`].
///
/// Uses interior mutability (RefCell) because html5ever's TreeSink trait
/// requires methods to take `&self` but we need to mutate the tree.
///
/// Holds the decoded input so unknown tags can recover the source text of
/// their start tag.
pub struct ArenaSink<'a> {
    tree: RefCell<SourceTree>,
    scanner: StartTagScanner<'a>,
    max_nodes: Option<usize>,
    /// Set once the arena refuses an allocation.
    exhausted: Cell<bool>,
    errors: Cell<usize>,
}

impl<'a> ArenaSink<'a> {
    /// `source` must be the exact text handed to the parser.
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        Self {
            tree: RefCell::new(SourceTree::new()),
            scanner: StartTagScanner::new(source, options.scripting),
            max_nodes: options.max_nodes,
            exhausted: Cell::new(false),
            errors: Cell::new(0),
        }
    }

    /// Consume the sink and return the sealed tree.
    ///
    /// Returns `None` if the arena ran out of ids or the tree grew past
    /// `max_nodes`.
    pub fn into_tree(self) -> Option<SourceTree> {
        let mut tree = self.tree.into_inner();
        if self.exhausted.get() {
            return None;
        }
        if let Some(max) = self.max_nodes
            && tree.len() > max
        {
            tracing::debug!(nodes = tree.len(), max, "node limit exceeded");
            return None;
        }
        tree.seal();
        Some(tree)
    }

    /// Number of parse errors html5ever reported.
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    fn track(&self, id: Option<NodeId>) -> NodeId {
        id.unwrap_or_else(|| {
            self.exhausted.set(true);
            NodeId::NONE
        })
    }

    fn append_child(&self, parent: NodeId, child: NodeOrText<NodeId>) {
        let mut tree = self.tree.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => tree.append(parent, node),
            NodeOrText::AppendText(text) => {
                if !tree.append_text(parent, &text) {
                    self.exhausted.set(true);
                }
            }
        }
    }

    /// Find the source text of the next start tag named `local`.
    fn original_tag_text(&self, local: &str) -> String {
        match self.scanner.next_start_tag(local) {
            Some(text) => text.to_string(),
            None => {
                tracing::warn!(
                    tag = local,
                    offset = self.scanner.position(),
                    "start tag not found in source"
                );
                format!("<{local}>")
            }
        }
    }

    fn tag_for(&self, name: &QualName) -> TagName {
        match KnownTag::lookup(&name.local) {
            Some(tag) => TagName::Known(tag),
            None => TagName::Unknown {
                original: self.original_tag_text(&name.local),
            },
        }
    }
}

/// Render an attribute name the way it was written, prefix included.
fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

fn convert_attrs(attrs: Vec<Html5Attribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|a| Attribute {
            name: attribute_name(&a.name),
            value: a.value.to_string(),
        })
        .collect()
}

impl TreeSink for ArenaSink<'_> {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'b>
        = ElementName
    where
        Self: 'b;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.errors.set(self.errors.get() + 1);
        tracing::trace!(%msg, "html parse error");
    }

    fn get_document(&self) -> Self::Handle {
        self.tree.borrow().document()
    }

    fn elem_name<'b>(&'b self, target: &'b Self::Handle) -> Self::ElemName<'b> {
        let tree = self.tree.borrow();
        match tree.get(*target).map(|n| &n.data) {
            Some(NodeData::Element(element)) => ElementName {
                ns: element.name.ns.clone(),
                local: element.name.local.clone(),
            },
            _ => ElementName {
                ns: html5ever::ns!(),
                local: html5ever::local_name!(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let tag = self.tag_for(&name);
        let attrs = convert_attrs(attrs);
        let id = self.tree.borrow_mut().create_element(name, tag, attrs);
        self.track(id)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        let id = self.tree.borrow_mut().create_comment(text.to_string());
        self.track(id)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Only reachable from the XML tree builder; keep a placeholder.
        let id = self.tree.borrow_mut().create_comment(String::new());
        self.track(id)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.append_child(*parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self.tree.borrow().get(*element).map(|n| n.parent);
        match parent {
            Some(parent) if parent.is_some() => self.append_child(parent, child),
            _ => self.append_child(*prev_element, child),
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut tree = self.tree.borrow_mut();
        let data = tree.document_data_mut();
        data.name = name.to_string();
        data.public_identifier = public_id.to_string();
        data.system_identifier = system_id.to_string();
        data.has_doctype = true;
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are exposed as the template's own children.
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: Html5QuirksMode) {
        self.tree.borrow_mut().document_data_mut().quirks_mode = match mode {
            Html5QuirksMode::Quirks => QuirksMode::Quirks,
            Html5QuirksMode::LimitedQuirks => QuirksMode::LimitedQuirks,
            Html5QuirksMode::NoQuirks => QuirksMode::NoQuirks,
        };
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut tree = self.tree.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => tree.insert_before(*sibling, node),
            NodeOrText::AppendText(text) => {
                if !tree.insert_text_before(*sibling, &text) {
                    self.exhausted.set(true);
                }
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut tree = self.tree.borrow_mut();
        if let Some(node) = tree.get_mut(*target)
            && let NodeData::Element(element) = &mut node.data
        {
            for attr in convert_attrs(attrs) {
                if !element.attrs.iter().any(|a| a.name == attr.name) {
                    element.attrs.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.tree.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        self.tree.borrow_mut().reparent_children(*node, *new_parent);
    }
}
