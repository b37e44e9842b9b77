//! Projection of source trees into generic values.
//!
//! The walk keeps its own stack of open containers instead of recursing, so
//! the depth it can reach is bounded by [`ParseOptions::max_depth`] rather
//! than by the thread's stack size.

use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::source::{ChildrenIter, NodeData, NodeId, SourceTree};
use crate::value::{Table, Value};

/// A container whose children are still being projected.
struct Frame<'t> {
    table: Table,
    children: ChildrenIter<'t>,
    kind: FrameKind,
}

enum FrameKind {
    Document { root: Option<usize> },
    Element,
}

/// What projecting a single node produced.
enum Opened<'t> {
    Leaf(Value),
    Container(Frame<'t>),
}

/// Project the whole document of `tree`.
pub fn project_document(tree: &SourceTree, options: &ParseOptions) -> Result<Value> {
    project(tree, tree.document(), options)
}

/// Project `node` and its subtree into a self-contained value.
///
/// A document value carries a `root` entry that is the same table as its
/// child at the tree's root index. Fails if elements nest deeper than
/// `options.max_depth` or the tree violates the adapter contract.
pub fn project(tree: &SourceTree, node: NodeId, options: &ParseOptions) -> Result<Value> {
    let limit = options.max_depth;
    let mut depth = 0;
    let mut stack: Vec<Frame<'_>> = Vec::new();

    match open(tree, node, true)? {
        Opened::Leaf(value) => return Ok(value),
        Opened::Container(frame) => {
            if let FrameKind::Element = frame.kind {
                depth = descend(depth, limit)?;
            }
            stack.push(frame);
        }
    }

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.children.next() {
            match open(tree, child, false)? {
                Opened::Leaf(value) => frame.table.push(value),
                Opened::Container(child_frame) => {
                    depth = descend(depth, limit)?;
                    stack.push(child_frame);
                }
            }
            continue;
        }

        let Some(frame) = stack.pop() else { break };
        let value = close(frame)?;
        match stack.last_mut() {
            Some(parent) => {
                depth -= 1;
                parent.table.push(value);
            }
            None => return Ok(value),
        }
    }

    Err(Error::InvalidNode("projection ended without a value".into()))
}

fn descend(depth: usize, limit: usize) -> Result<usize> {
    let next = depth + 1;
    if next > limit {
        return Err(Error::NestingTooDeep { depth: next, limit });
    }
    Ok(next)
}

fn open<'t>(tree: &'t SourceTree, id: NodeId, is_root: bool) -> Result<Opened<'t>> {
    let node = tree
        .get(id)
        .ok_or_else(|| Error::InvalidNode(format!("dangling node id {}", id.0)))?;

    let opened = match &node.data {
        NodeData::Document if is_root => {
            let doc = tree.document_data();
            let mut table = Table::with_items(7, tree.child_count(id));
            table.push_field("type", "document");
            table.push_field("name", doc.name.as_str());
            table.push_field("public_identifier", doc.public_identifier.as_str());
            table.push_field("system_identifier", doc.system_identifier.as_str());
            table.push_field("has_doctype", doc.has_doctype);
            table.push_field("quirks_mode", doc.quirks_mode.as_str());
            Opened::Container(Frame {
                table,
                children: tree.children(id),
                kind: FrameKind::Document { root: doc.root },
            })
        }
        NodeData::Document => {
            return Err(Error::InvalidNode("document node below the root".into()));
        }
        NodeData::Element(element) => {
            let nattrs = element.attrs.len();
            let mut table = Table::with_items(if nattrs > 0 { 3 } else { 2 }, tree.child_count(id));
            table.push_field("type", "element");
            table.push_field("tag", element.tag.resolve());

            if nattrs > 0 {
                let mut attr = Table::with_capacity(nattrs);
                for attribute in &element.attrs {
                    // The tokenizer drops repeated attribute names.
                    attr.push_field(&attribute.name, attribute.value.as_str());
                }
                table.push_field("attr", attr);
            }

            Opened::Container(Frame {
                table,
                children: tree.children(id),
                kind: FrameKind::Element,
            })
        }
        NodeData::Text(text)
        | NodeData::Comment(text)
        | NodeData::CData(text)
        | NodeData::Whitespace(text) => Opened::Leaf(leaf(node.data.kind(), text)),
    };
    Ok(opened)
}

fn leaf(kind: &str, text: &str) -> Value {
    let mut table = Table::with_capacity(2);
    table.push_field("type", kind);
    table.push_field("text", text);
    Value::from(table)
}

fn close(frame: Frame<'_>) -> Result<Value> {
    let Frame {
        mut table, kind, ..
    } = frame;

    if let FrameKind::Document { root } = kind {
        let index =
            root.ok_or_else(|| Error::InvalidNode("document has no root element".into()))?;
        let child = table.items().get(index).cloned().ok_or_else(|| {
            Error::InvalidNode(format!(
                "root index {index} outside {} document children",
                table.items().len()
            ))
        })?;
        table.push_field("root", child);
    }

    Ok(Value::from(table))
}
