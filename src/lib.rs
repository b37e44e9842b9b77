//! # h5value
//!
//! Parse HTML5 and expose the resulting tree as a generic nested value that a
//! scripting host can consume: tables (string-keyed mappings with an optional
//! ordered array area), strings and booleans.
//!
//! ## Quick Start
//!
//! ```
//! use h5value::{convert_string, Value};
//!
//! let doc = convert_string("<p>hi</p>").unwrap();
//! assert_eq!(doc.kind(), Some("document"));
//!
//! // `root` is the same table as the html element in the child list.
//! let html = doc.get("root").unwrap();
//! assert!(html.ptr_eq(&doc.items()[0]));
//!
//! let body = &html.items()[1];
//! let p = &body.items()[0];
//! assert_eq!(p.get("tag").and_then(Value::as_str), Some("p"));
//! assert!(p.get("attr").is_none());
//! assert_eq!(p.items()[0].get("text").and_then(Value::as_str), Some("hi"));
//! ```
//!
//! ## Value shape
//!
//! | node       | fields                                                              | array area |
//! |------------|---------------------------------------------------------------------|------------|
//! | document   | `type`, `name`, `public_identifier`, `system_identifier`, `has_doctype`, `quirks_mode`, `root` | children |
//! | element    | `type`, `tag`, `attr` (only with attributes)                         | children   |
//! | text-like  | `type` (`text`, `comment`, `cdata`, `whitespace`), `text`           | none       |

pub mod error;
pub mod options;
pub mod project;
pub mod source;
pub(crate) mod util;
pub mod value;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::path::Path;

pub use error::{Error, Result};
pub use options::ParseOptions;
pub use project::{project, project_document};
pub use source::{Html5everAdapter, ParserAdapter, SourceTree};
pub use value::{Table, Value};

/// Convert raw input with a specific parser adapter.
///
/// The source tree the adapter produces lives only for this call and is
/// released before returning, on success and on failure alike.
pub fn convert_with<A>(adapter: &A, input: &[u8], options: &ParseOptions) -> Result<Value>
where
    A: ParserAdapter + ?Sized,
{
    let Some(tree) = adapter.parse(input, options) else {
        tracing::debug!(bytes = input.len(), "parser adapter produced no tree");
        return Err(Error::ParseFailure);
    };

    let value = project_document(&tree, options);
    tracing::debug!(
        bytes = input.len(),
        nodes = tree.len(),
        ok = value.is_ok(),
        "conversion finished"
    );
    value
}

/// Convert a string of HTML.
pub fn convert_string(html: &str) -> Result<Value> {
    convert_string_with_options(html, &ParseOptions::default())
}

pub fn convert_string_with_options(html: &str, options: &ParseOptions) -> Result<Value> {
    convert_with(&Html5everAdapter, html.as_bytes(), options)
}

/// Convert HTML bytes, decoded as UTF-8.
pub fn convert_bytes(input: &[u8]) -> Result<Value> {
    convert_bytes_with_options(input, &ParseOptions::default())
}

pub fn convert_bytes_with_options(input: &[u8], options: &ParseOptions) -> Result<Value> {
    convert_with(&Html5everAdapter, input, options)
}

/// Read and convert an HTML file.
///
/// Fails with [`Error::Io`] before any parsing if the file cannot be read.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    convert_file_with_options(path, &ParseOptions::default())
}

pub fn convert_file_with_options<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Value> {
    let input = std::fs::read(path.as_ref())?;
    convert_bytes_with_options(&input, options)
}
