//! Parser adapters: raw bytes in, source tree out.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

use super::arena::SourceTree;
use super::tree_sink::ArenaSink;
use crate::options::ParseOptions;
use crate::util::decode_utf8;

/// Produces a [`SourceTree`] from raw input bytes.
///
/// Returning `None` means no tree could be produced at all; conversion then
/// fails with [`crate::Error::ParseFailure`]. An HTML5 parser accepts any
/// input, so this is reserved for resource limits and similar faults.
pub trait ParserAdapter {
    fn parse(&self, input: &[u8], options: &ParseOptions) -> Option<SourceTree>;
}

/// The default adapter, backed by html5ever.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5everAdapter;

impl ParserAdapter for Html5everAdapter {
    fn parse(&self, input: &[u8], options: &ParseOptions) -> Option<SourceTree> {
        let text = decode_utf8(input);
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: options.scripting,
                ..Default::default()
            },
            ..Default::default()
        };

        let sink = ArenaSink::new(&text, options);
        let sink = parse_document(sink, opts).one(&*text);
        tracing::debug!(
            bytes = input.len(),
            parse_errors = sink.error_count(),
            "html5ever finished"
        );
        sink.into_tree()
    }
}

impl<F> ParserAdapter for F
where
    F: Fn(&[u8], &ParseOptions) -> Option<SourceTree>,
{
    fn parse(&self, input: &[u8], options: &ParseOptions) -> Option<SourceTree> {
        self(input, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{KnownTag, NodeData, TagName};

    #[test]
    fn test_html5ever_adapter_builds_document() {
        let tree = Html5everAdapter
            .parse(b"<title>t</title>", &ParseOptions::default())
            .unwrap();
        let root = tree.children(tree.document()).next().unwrap();
        match &tree.get(root).unwrap().data {
            NodeData::Element(html) => assert_eq!(html.tag, TagName::Known(KnownTag::Html)),
            other => panic!("expected html element, got {other:?}"),
        }
    }

    #[test]
    fn test_scripting_flag_changes_noscript_parsing() {
        let html = b"<head><noscript><link rel=x></noscript></head>";

        let scripted = Html5everAdapter
            .parse(html, &ParseOptions::default())
            .unwrap();
        let unscripted = Html5everAdapter
            .parse(html, &ParseOptions::default().with_scripting(false))
            .unwrap();

        let has_link = |tree: &SourceTree| {
            (0..tree.len() as u32).any(|i| {
                matches!(
                    tree.get(crate::source::NodeId(i)).map(|n| &n.data),
                    Some(NodeData::Element(e)) if e.tag == TagName::Known(KnownTag::Link)
                )
            })
        };
        assert!(!has_link(&scripted));
        assert!(has_link(&unscripted));
    }

    #[test]
    fn test_closure_adapter() {
        let failing = |_: &[u8], _: &ParseOptions| -> Option<SourceTree> { None };
        assert!(failing.parse(b"<p>", &ParseOptions::default()).is_none());
    }

    #[test]
    fn test_max_nodes_makes_adapter_fail() {
        let options = ParseOptions::default().with_max_nodes(3);
        assert!(Html5everAdapter.parse(b"<p>x</p>", &options).is_none());
    }
}
