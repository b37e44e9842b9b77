//! WASM bindings for browser-based HTML conversion.
//!
//! This module exposes conversion to JavaScript via wasm-bindgen. Tables
//! become plain objects with their array area under `children`; a table that
//! appears twice (the document's `root`) becomes the same JS object both
//! times. Any depth accepted by the nesting limit converts.

use std::collections::HashMap;
use std::sync::Arc;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::value::{Table, Value};
use crate::{Error, ParseOptions};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Parse a string of HTML into a tree of JS objects.
///
/// Rejects with the error message (`"Failed to parse"` and so on).
#[wasm_bindgen]
pub fn parse(html: &str) -> Result<JsValue, JsValue> {
    let value = crate::convert_string(html).map_err(error_to_js)?;
    JsConverter::default().value(&value)
}

/// Parse raw HTML bytes (UTF-8) into a tree of JS objects.
#[wasm_bindgen]
pub fn parse_bytes(data: &[u8]) -> Result<JsValue, JsValue> {
    let value = crate::convert_bytes(data).map_err(error_to_js)?;
    JsConverter::default().value(&value)
}

/// Parse with an explicit nesting limit.
#[wasm_bindgen]
pub fn parse_with_max_depth(html: &str, max_depth: usize) -> Result<JsValue, JsValue> {
    let options = ParseOptions::default().with_max_depth(max_depth);
    let value = crate::convert_string_with_options(html, &options).map_err(error_to_js)?;
    JsConverter::default().value(&value)
}

fn error_to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Converts values to JS, keeping shared tables shared.
///
/// Tables are built bottom-up from [`Value::tables_bottom_up`], so deep
/// documents never recurse.
#[derive(Default)]
struct JsConverter {
    built: HashMap<*const Table, JsValue>,
}

impl JsConverter {
    fn value(&mut self, value: &Value) -> Result<JsValue, JsValue> {
        for table in value.tables_bottom_up() {
            let object = self.table(table)?;
            self.built.insert(Arc::as_ptr(table), object);
        }
        self.lookup(value)
    }

    /// Build one table whose nested tables are already built.
    fn table(&self, table: &Table) -> Result<JsValue, JsValue> {
        let object = Object::new();
        for (name, field) in table.fields() {
            Reflect::set(&object, &JsValue::from_str(name), &self.lookup(field)?)?;
        }
        if table.has_items() {
            let children = Array::new();
            for item in table.items() {
                children.push(&self.lookup(item)?);
            }
            Reflect::set(&object, &JsValue::from_str("children"), &children)?;
        }
        Ok(object.into())
    }

    fn lookup(&self, value: &Value) -> Result<JsValue, JsValue> {
        match value {
            Value::String(s) => Ok(JsValue::from_str(s)),
            Value::Bool(b) => Ok(JsValue::from_bool(*b)),
            Value::Table(table) => self
                .built
                .get(&Arc::as_ptr(table))
                .cloned()
                .ok_or_else(|| JsValue::from_str("table referenced before it was built")),
        }
    }
}
