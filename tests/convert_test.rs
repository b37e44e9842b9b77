//! End-to-end conversion tests through the public API.

use std::io::Write;

use pretty_assertions::assert_eq;

use h5value::{
    Error, ParseOptions, Value, convert_bytes, convert_file, convert_string,
    convert_string_with_options,
};

fn text_of(value: &Value) -> Option<&str> {
    value.get("text").and_then(Value::as_str)
}

fn tag_of(value: &Value) -> Option<&str> {
    value.get("tag").and_then(Value::as_str)
}

/// The body element of a converted document.
fn body(doc: &Value) -> &Value {
    let html = doc.get("root").expect("document should have a root");
    html.items()
        .iter()
        .find(|child| tag_of(child) == Some("body"))
        .expect("html should contain body")
}

// ============================================================================
// Documented examples
// ============================================================================

#[test]
fn test_paragraph_example() {
    let doc = convert_string("<p>hi</p>").unwrap();
    let p = &body(&doc).items()[0];

    assert_eq!(p.kind(), Some("element"));
    assert_eq!(tag_of(p), Some("p"));
    assert!(p.get("attr").is_none());
    assert_eq!(p.items().len(), 1);
    assert_eq!(p.items()[0].kind(), Some("text"));
    assert_eq!(text_of(&p.items()[0]), Some("hi"));
}

#[test]
fn test_attribute_example() {
    let doc = convert_string(r#"<div class="a">x</div>"#).unwrap();
    let div = &body(&doc).items()[0];

    let attr = div.get("attr").and_then(Value::as_table).unwrap();
    assert_eq!(attr.len(), 1);
    assert_eq!(attr.get("class").and_then(Value::as_str), Some("a"));
}

#[test]
fn test_missing_file_reports_os_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.html");

    let err = convert_file(&path).unwrap_err();
    let expected = std::fs::read(&path).unwrap_err().to_string();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    assert_eq!(err.to_string(), expected);
}

#[test]
fn test_node_limit_reports_parse_failure() {
    let options = ParseOptions::default().with_max_nodes(5);
    let err = convert_string_with_options("<ul><li>a<li>b<li>c</ul>", &options).unwrap_err();
    assert!(matches!(err, Error::ParseFailure));
    assert_eq!(err.to_string(), "Failed to parse");
}

// ============================================================================
// Document metadata
// ============================================================================

#[test]
fn test_document_without_doctype() {
    let doc = convert_string("<p>x</p>").unwrap();

    assert_eq!(doc.kind(), Some("document"));
    assert_eq!(doc.get("name").and_then(Value::as_str), Some(""));
    assert_eq!(doc.get("public_identifier").and_then(Value::as_str), Some(""));
    assert_eq!(doc.get("system_identifier").and_then(Value::as_str), Some(""));
    assert_eq!(doc.get("has_doctype").and_then(Value::as_bool), Some(false));
    assert_eq!(doc.get("quirks_mode").and_then(Value::as_str), Some("quirks"));
}

#[test]
fn test_html5_doctype_is_no_quirks() {
    let doc = convert_string("<!DOCTYPE html><p>x</p>").unwrap();

    assert_eq!(doc.get("name").and_then(Value::as_str), Some("html"));
    assert_eq!(doc.get("has_doctype").and_then(Value::as_bool), Some(true));
    assert_eq!(doc.get("quirks_mode").and_then(Value::as_str), Some("no-quirks"));
    // The doctype is metadata, not a child.
    assert_eq!(doc.items().len(), 1);
}

#[test]
fn test_legacy_doctypes_set_quirks_modes() {
    let doc = convert_string(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"><p>x</p>"#,
    )
    .unwrap();
    assert_eq!(
        doc.get("public_identifier").and_then(Value::as_str),
        Some("-//W3C//DTD XHTML 1.0 Transitional//EN")
    );
    assert_eq!(
        doc.get("system_identifier").and_then(Value::as_str),
        Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd")
    );
    assert_eq!(
        doc.get("quirks_mode").and_then(Value::as_str),
        Some("limited-quirks")
    );

    let doc =
        convert_string(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN"><p>x</p>"#)
            .unwrap();
    assert_eq!(doc.get("quirks_mode").and_then(Value::as_str), Some("quirks"));
}

#[test]
fn test_root_follows_leading_comment() {
    let doc = convert_string("<!-- lead --><html><body></body></html>").unwrap();

    assert_eq!(doc.items().len(), 2);
    assert_eq!(doc.items()[0].kind(), Some("comment"));
    assert_eq!(text_of(&doc.items()[0]), Some(" lead "));

    let root = doc.get("root").unwrap();
    assert!(root.ptr_eq(&doc.items()[1]));
    assert_eq!(tag_of(root), Some("html"));
}

// ============================================================================
// Node kinds and tags
// ============================================================================

#[test]
fn test_whitespace_and_text_nodes() {
    let doc = convert_string("<div> <p>a</p>\n</div>").unwrap();
    let div = &body(&doc).items()[0];

    let kinds: Vec<_> = div.items().iter().map(|c| c.kind().unwrap()).collect();
    assert_eq!(kinds, vec!["whitespace", "element", "whitespace"]);
    assert_eq!(text_of(&div.items()[0]), Some(" "));
    assert_eq!(text_of(&div.items()[2]), Some("\n"));
}

#[test]
fn test_mixed_text_is_not_whitespace() {
    let doc = convert_string("<p> a </p>").unwrap();
    let p = &body(&doc).items()[0];
    assert_eq!(p.items()[0].kind(), Some("text"));
    assert_eq!(text_of(&p.items()[0]), Some(" a "));
}

#[test]
fn test_entities_are_decoded() {
    let doc = convert_string("<p>a &amp; b &lt;c&gt;</p>").unwrap();
    let p = &body(&doc).items()[0];
    assert_eq!(text_of(&p.items()[0]), Some("a & b <c>"));
}

#[test]
fn test_known_tags_are_lowercase() {
    let doc = convert_string("<DIV><SPAN>x</SPAN></DIV>").unwrap();
    let div = &body(&doc).items()[0];
    assert_eq!(tag_of(div), Some("div"));
    assert_eq!(tag_of(&div.items()[0]), Some("span"));
}

#[test]
fn test_unknown_tags_keep_source_casing() {
    let doc = convert_string("<My-Widget data-id=7>x</My-Widget><x-other></x-other>").unwrap();
    let children = body(&doc).items();

    assert_eq!(tag_of(&children[0]), Some("My-Widget"));
    let attr = children[0].get("attr").and_then(Value::as_table).unwrap();
    assert_eq!(attr.get("data-id").and_then(Value::as_str), Some("7"));
    assert_eq!(tag_of(&children[1]), Some("x-other"));
}

#[test]
fn test_unknown_tag_spelling_comes_from_its_own_start_tag() {
    let doc = convert_string("<!-- <X-A> --><x-a></x-a>").unwrap();
    assert_eq!(tag_of(&body(&doc).items()[0]), Some("x-a"));

    let doc = convert_string(r#"<p title="<X-B>"></p><x-b></x-b>"#).unwrap();
    assert_eq!(tag_of(&body(&doc).items()[1]), Some("x-b"));

    let doc = convert_string("<textarea><X-C></textarea><x-c></x-c>").unwrap();
    assert_eq!(tag_of(&body(&doc).items()[1]), Some("x-c"));
}

#[test]
fn test_svg_tags() {
    let doc = convert_string(r#"<svg><foreignObject></foreignObject><clipPath id="c"></clipPath></svg>"#)
        .unwrap();
    let svg = &body(&doc).items()[0];

    assert_eq!(tag_of(svg), Some("svg"));
    assert_eq!(tag_of(&svg.items()[0]), Some("foreignobject"));
    assert_eq!(tag_of(&svg.items()[1]), Some("clipPath"));
}

#[test]
fn test_attributes_keep_source_order() {
    let doc = convert_string(r#"<a href="/x" title="t" class="c">x</a>"#).unwrap();
    let a = &body(&doc).items()[0];
    let attr = a.get("attr").and_then(Value::as_table).unwrap();

    let names: Vec<_> = attr.fields().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["href", "title", "class"]);
}

#[test]
fn test_template_contents_are_children() {
    let doc = convert_string("<template><p>x</p></template>").unwrap();
    let head = &doc.get("root").unwrap().items()[0];
    let template = &head.items()[0];
    assert_eq!(tag_of(template), Some("template"));
    assert_eq!(tag_of(&template.items()[0]), Some("p"));
}

// ============================================================================
// Depth, identity and inputs
// ============================================================================

#[test]
fn test_deep_nesting_fails_predictably() {
    let html = "<div>".repeat(600);

    let err = convert_string(&html).unwrap_err();
    assert!(matches!(err, Error::NestingTooDeep { limit: 512, .. }));

    let options = ParseOptions::default().with_max_depth(700);
    let doc = convert_string_with_options(&html, &options).unwrap();
    assert_eq!(doc.kind(), Some("document"));
}

#[test]
fn test_conversions_are_equal_but_distinct() {
    let html = "<!DOCTYPE html><ul><li class=a>one<li>two</ul><!-- end -->";
    let first = convert_string(html).unwrap();
    let second = convert_string(html).unwrap();

    assert_eq!(first, second);
    assert!(!first.ptr_eq(&second));
}

#[test]
fn test_convert_file_matches_convert_string() {
    let html = "<title>File</title><p class=x>body</p>";
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(html.as_bytes()).unwrap();

    let from_file = convert_file(file.path()).unwrap();
    assert_eq!(from_file, convert_string(html).unwrap());
}

#[test]
fn test_malformed_utf8_is_replaced() {
    let doc = convert_bytes(b"<p>a\xFFb</p>").unwrap();
    let p = &body(&doc).items()[0];
    assert_eq!(text_of(&p.items()[0]), Some("a\u{FFFD}b"));
}

#[test]
fn test_empty_input_still_has_root() {
    let doc = convert_string("").unwrap();
    let root = doc.get("root").unwrap();
    assert_eq!(tag_of(root), Some("html"));
    let tags: Vec<_> = root.items().iter().filter_map(tag_of).collect();
    assert_eq!(tags, vec!["head", "body"]);
}

#[cfg(feature = "serde")]
#[test]
fn test_json_of_very_deep_document_fails_cleanly() {
    let html = "<div>".repeat(30_000);
    let options = ParseOptions::default().with_max_depth(30_010);
    let doc = convert_string_with_options(&html, &options).unwrap();

    let err = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(move || serde_json::to_string(&doc).map_err(|e| e.to_string()))
        .unwrap()
        .join()
        .unwrap()
        .unwrap_err();
    assert!(err.contains("nest deeper than"), "{err}");
}

#[cfg(feature = "serde")]
#[test]
fn test_json_of_default_depth_limit_document() {
    let html = "<div>".repeat(500);
    let doc = convert_string(&html).unwrap();
    let json = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(move || serde_json::to_string(&doc).map_err(|e| e.to_string()))
        .unwrap()
        .join()
        .unwrap();
    assert!(json.is_ok());
}

#[cfg(feature = "serde")]
#[test]
fn test_json_rendering() {
    let doc = convert_string(r#"<p class="a">hi</p>"#).unwrap();
    let json = serde_json::to_value(&doc).unwrap();

    assert_eq!(json["type"], "document");
    assert_eq!(json["root"], 0);
    assert_eq!(json["children"][0]["tag"], "html");

    let p = &json["children"][0]["children"][1]["children"][0];
    assert_eq!(
        p,
        &serde_json::json!({
            "type": "element",
            "tag": "p",
            "attr": { "class": "a" },
            "children": [{ "type": "text", "text": "hi" }]
        })
    );
}
