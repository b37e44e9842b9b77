//! Source trees produced by the HTML5 parser.
//!
//! The [`ParserAdapter`] trait is the seam between raw bytes and the tree the
//! projector reads. [`Html5everAdapter`] is the default implementation; it
//! drives html5ever into an arena through [`ArenaSink`].

mod adapter;
mod arena;
mod scan;
mod tag;
mod tree_sink;

pub use adapter::{Html5everAdapter, ParserAdapter};
pub use arena::{
    Attribute, ChildrenIter, DocumentData, ElementData, Node, NodeData, NodeId, QuirksMode,
    SourceTree,
};
pub use tag::{KnownTag, TagName, tag_from_original_text};
pub use tree_sink::ArenaSink;
