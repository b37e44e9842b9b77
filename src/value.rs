//! Generic values handed to the host.
//!
//! A [`Value`] is a string, a boolean, or a shared [`Table`]. A table is a
//! string-keyed mapping that remembers insertion order, optionally carrying
//! an ordered array area alongside its named fields. Tables are reference
//! counted so the same table can appear at two places in a graph (the
//! document's `root` entry and its child list).

use std::collections::HashSet;
use std::sync::Arc;

/// A generic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Table(Arc<Table>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Look up a field of a table value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|t| t.get(key))
    }

    /// The array area of a table value; empty for anything else.
    pub fn items(&self) -> &[Value] {
        match self.as_table() {
            Some(table) => table.items(),
            None => &[],
        }
    }

    /// The `type` field of a node value.
    pub fn kind(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    /// True when both values are the same table instance.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Table(a), Value::Table(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Every distinct table reachable from this value, each listed after
    /// all of the tables nested in it. A shared table appears once.
    ///
    /// Walks with an explicit stack, so any nesting depth is fine.
    pub fn tables_bottom_up(&self) -> Vec<&Arc<Table>> {
        let mut order = Vec::new();
        let Value::Table(top) = self else {
            return order;
        };

        let mut visited: HashSet<*const Table> = HashSet::new();
        visited.insert(Arc::as_ptr(top));
        let mut stack = vec![(top, top.child_tables())];

        while let Some((_, pending)) = stack.last_mut() {
            if let Some(child) = pending.pop() {
                if visited.insert(Arc::as_ptr(child)) {
                    stack.push((child, child.child_tables()));
                }
                continue;
            }
            if let Some((table, _)) = stack.pop() {
                order.push(table);
            }
        }
        order
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(Arc::new(t))
    }
}

/// An insertion-ordered mapping with an optional array area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    fields: Vec<(String, Value)>,
    items: Option<Vec<Value>>,
}

impl Table {
    /// An empty mapping without an array area.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping with room for `fields` entries.
    pub fn with_capacity(fields: usize) -> Self {
        Self {
            fields: Vec::with_capacity(fields),
            items: None,
        }
    }

    /// A mapping that also carries an array area, with room for `items`
    /// entries in it.
    pub fn with_items(fields: usize, items: usize) -> Self {
        Self {
            fields: Vec::with_capacity(fields),
            items: Some(Vec::with_capacity(items)),
        }
    }

    /// Set a field. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Append a field without checking for an existing key.
    ///
    /// The caller guarantees `key` is not present yet.
    pub(crate) fn push_field(&mut self, key: &str, value: impl Into<Value>) {
        debug_assert!(!self.contains_key(key), "duplicate field {key}");
        self.fields.push((key.to_string(), value.into()));
    }

    /// Append to the array area, creating it if needed.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.get_or_insert_with(Vec::new).push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Named fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The array area; empty when there is none.
    pub fn items(&self) -> &[Value] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn has_items(&self) -> bool {
        self.items.is_some()
    }

    /// Number of named fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.items().is_empty()
    }

    /// Index of the item that is the same table instance as `value`.
    pub fn item_index(&self, value: &Value) -> Option<usize> {
        if !matches!(value, Value::Table(_)) {
            return None;
        }
        self.items().iter().position(|item| item.ptr_eq(value))
    }

    /// Tables held directly by this one, items before fields, in reverse so
    /// popping yields them in order.
    fn child_tables(&self) -> Vec<&Arc<Table>> {
        let values = self.items().iter().chain(self.fields.iter().map(|(_, v)| v));
        let mut tables: Vec<_> = values
            .filter_map(|value| match value {
                Value::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        tables.reverse();
        tables
    }

    /// Move every nested table out of this one.
    fn drain_tables(&mut self, pending: &mut Vec<Arc<Table>>) {
        let fields = self.fields.drain(..).map(|(_, v)| v);
        let items = self.items.iter_mut().flat_map(|items| items.drain(..));
        for value in fields.chain(items) {
            if let Value::Table(table) = value {
                pending.push(table);
            }
        }
    }
}

impl Drop for Table {
    // Deep graphs would otherwise recurse once per nesting level.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.drain_tables(&mut pending);
        while let Some(table) = pending.pop() {
            if let Ok(mut table) = Arc::try_unwrap(table) {
                table.drain_tables(&mut pending);
            }
        }
    }
}

/// Deepest table nesting that serialization writes before failing.
///
/// Serializers recurse once per nested table, so this bounds their stack
/// use. Documents within the default [`ParseOptions::max_depth`] fit with
/// room to spare.
///
/// [`ParseOptions::max_depth`]: crate::ParseOptions::max_depth
#[cfg(feature = "serde")]
pub const MAX_SERIALIZE_DEPTH: usize = 2 * crate::options::DEFAULT_MAX_DEPTH;

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

    use super::{MAX_SERIALIZE_DEPTH, Table, Value};

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            Nested { value: self, depth: 0 }.serialize(serializer)
        }
    }

    /// Fields in order, then the array area as `children`.
    ///
    /// A field holding one of the table's own items is written as that
    /// item's index, so shared tables are emitted once. Fails once tables
    /// nest deeper than [`MAX_SERIALIZE_DEPTH`].
    impl Serialize for Table {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            NestedTable { table: self, depth: 0 }.serialize(serializer)
        }
    }

    /// A value below `depth` enclosing tables.
    struct Nested<'v> {
        value: &'v Value,
        depth: usize,
    }

    struct NestedTable<'v> {
        table: &'v Table,
        depth: usize,
    }

    struct NestedItems<'v> {
        items: &'v [Value],
        depth: usize,
    }

    impl Serialize for Nested<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.value {
                Value::String(s) => serializer.serialize_str(s),
                Value::Bool(b) => serializer.serialize_bool(*b),
                Value::Table(table) => NestedTable {
                    table,
                    depth: self.depth,
                }
                .serialize(serializer),
            }
        }
    }

    impl Serialize for NestedTable<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.depth >= MAX_SERIALIZE_DEPTH {
                return Err(S::Error::custom(format_args!(
                    "tables nest deeper than {MAX_SERIALIZE_DEPTH} levels"
                )));
            }
            let depth = self.depth + 1;
            let table = self.table;

            let len = table.fields.len() + usize::from(table.items.is_some());
            let mut map = serializer.serialize_map(Some(len))?;
            for (key, value) in &table.fields {
                match table.item_index(value) {
                    Some(index) => map.serialize_entry(key, &index)?,
                    None => map.serialize_entry(key, &Nested { value, depth })?,
                }
            }
            if let Some(items) = &table.items {
                map.serialize_entry("children", &NestedItems { items, depth })?;
            }
            map.end()
        }
    }

    impl Serialize for NestedItems<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let depth = self.depth;
            serializer.collect_seq(self.items.iter().map(|value| Nested { value, depth }))
        }
    }
}
