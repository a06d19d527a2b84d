// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for INP command data
//!
//! A parsed INP file is a [`CommandDict`]: command keyword → object name →
//! [`InpObject`] (ordered `keyword = value` fields). Every level keeps the
//! order in which entries were first seen in the source text.

use rustc_hash::FxHashMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// Command keyword under which global parameters are stored
pub const PARAMETER_COMMAND: &str = "PARAMETER";

/// Field holding a global parameter's value
pub const PARAMETER_VALUE_FIELD: &str = "VALUE";

/// Decoded INP value
///
/// Represents any value that can appear on the right of a `KEYWORD = value`
/// assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum InpValue {
    /// Numeric literal (integers are stored as floats)
    Number(f64),
    /// Quoted string, quotes removed
    String(String),
    /// Bare word such as `EXTERIOR-WALL`, `YES` or `&D`
    Symbol(String),
    /// Parenthesised, comma-separated list
    List(Vec<InpValue>),
    /// Unevaluated `{...}` expression, inner text only
    Expression(String),
}

impl InpValue {
    /// Try to get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            InpValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as text (quoted string or bare symbol)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InpValue::String(s) | InpValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[InpValue]> {
        match self {
            InpValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is an unevaluated expression
    pub fn is_expression(&self) -> bool {
        matches!(self, InpValue::Expression(_))
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, InpValue::List(_))
    }
}

/// Formats the value in INP syntax
impl fmt::Display for InpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InpValue::Number(n) => write!(f, "{}", n),
            // quoted text cannot hold `"`, eQuest's starred form can
            InpValue::String(s) if s.contains('"') => write!(f, "*{}*", s),
            InpValue::String(s) => write!(f, "\"{}\"", s),
            InpValue::Symbol(s) => f.write_str(s),
            InpValue::List(items) => {
                f.write_str("( ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(" )")
            }
            InpValue::Expression(e) => write!(f, "{{{}}}", e),
        }
    }
}

impl From<f64> for InpValue {
    fn from(n: f64) -> Self {
        InpValue::Number(n)
    }
}

impl Serialize for InpValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InpValue::Number(n) => serializer.serialize_f64(*n),
            InpValue::String(s) | InpValue::Symbol(s) => serializer.serialize_str(s),
            InpValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            InpValue::Expression(e) => serializer.serialize_str(&format!("{{{}}}", e)),
        }
    }
}

/// Insertion-ordered table keyed by name
///
/// Re-inserting an existing name replaces its value in place, so the entry
/// keeps its original position.
#[derive(Clone, Debug)]
pub struct OrderedTable<V> {
    entries: Vec<(String, V)>,
    index: FxHashMap<String, usize>,
}

impl<V> Default for OrderedTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<V> OrderedTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the replaced value if the name existed
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    /// Get a mutable value by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        match self.index.get(name) {
            Some(&pos) => Some(&mut self.entries[pos].1),
            None => None,
        }
    }

    /// Get a value by name, inserting a default first if missing
    pub fn get_or_insert_default(&mut self, name: &str) -> &mut V
    where
        V: Default,
    {
        let pos = match self.index.get(name) {
            Some(&pos) => pos,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    /// Check if a name exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a name in insertion order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V: PartialEq> PartialEq for OrderedTable<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V> Index<&str> for OrderedTable<V> {
    type Output = V;

    /// Panics if the name is missing
    fn index(&self, name: &str) -> &V {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no entry named {:?}", name),
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedTable<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

impl<V: Serialize> Serialize for OrderedTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A single named INP object (one command block)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InpObject {
    /// Field values keyed by keyword, in source order
    pub fields: OrderedTable<InpValue>,
    /// 1-based position among the file's non-parameter objects (0 for parameters)
    pub sequence: usize,
}

impl InpObject {
    pub fn new(fields: OrderedTable<InpValue>, sequence: usize) -> Self {
        Self { fields, sequence }
    }

    /// Get a field value by keyword
    pub fn get(&self, keyword: &str) -> Option<&InpValue> {
        self.fields.get(keyword)
    }

    /// Get a numeric field
    pub fn get_number(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(|v| v.as_number())
    }

    /// Get a text field (quoted string or symbol)
    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(|v| v.as_str())
    }

    /// Get a list field
    pub fn get_list(&self, keyword: &str) -> Option<&[InpValue]> {
        self.get(keyword).and_then(|v| v.as_list())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Index<&str> for InpObject {
    type Output = InpValue;

    fn index(&self, keyword: &str) -> &InpValue {
        &self.fields[keyword]
    }
}

/// Serialized as the field map plus a `__line__` entry with the sequence
impl Serialize for InpObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (k, v) in self.fields.iter() {
            map.serialize_entry(k, v)?;
        }
        map.serialize_entry("__line__", &self.sequence)?;
        map.end()
    }
}

/// A tolerated problem found while parsing leniently
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// 1-based line where the offending block starts
    pub line: usize,
    /// Description of the problem
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Parsed INP file: command keyword → object name → object
///
/// Equality compares commands and objects only; parse warnings are
/// diagnostics of how the dict was read, not part of its content.
#[derive(Clone, Debug, Default)]
pub struct CommandDict {
    commands: OrderedTable<OrderedTable<InpObject>>,
    object_count: usize,
    warnings: Vec<ParseWarning>,
}

impl PartialEq for CommandDict {
    fn eq(&self, other: &Self) -> bool {
        self.object_count == other.object_count && self.commands == other.commands
    }
}

impl CommandDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, replacing the fields of an existing one with the same name
    ///
    /// New objects get the next sequence number; replaced objects keep theirs.
    pub fn insert_object(
        &mut self,
        command: &str,
        name: impl Into<String>,
        fields: OrderedTable<InpValue>,
    ) {
        let name = name.into();
        let objects = self.commands.get_or_insert_default(command);
        if let Some(existing) = objects.get_mut(&name) {
            existing.fields = fields;
            return;
        }
        self.object_count += 1;
        objects.insert(name, InpObject::new(fields, self.object_count));
    }

    /// Insert or replace a global parameter
    pub fn insert_parameter(&mut self, name: impl Into<String>, value: InpValue) {
        let mut fields = OrderedTable::new();
        fields.insert(PARAMETER_VALUE_FIELD, value);
        self.commands
            .get_or_insert_default(PARAMETER_COMMAND)
            .insert(name, InpObject::new(fields, 0));
    }

    /// Get all objects of a command
    pub fn get(&self, command: &str) -> Option<&OrderedTable<InpObject>> {
        self.commands.get(command)
    }

    /// Get a single object
    pub fn object(&self, command: &str, name: &str) -> Option<&InpObject> {
        self.get(command).and_then(|objects| objects.get(name))
    }

    /// Check if any object of a command exists
    pub fn contains_command(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    /// Iterate commands in order of first appearance
    pub fn commands(&self) -> impl Iterator<Item = (&str, &OrderedTable<InpObject>)> {
        self.commands.iter()
    }

    /// Get a global parameter value
    pub fn parameter(&self, name: &str) -> Option<&InpValue> {
        self.object(PARAMETER_COMMAND, name)
            .and_then(|obj| obj.get(PARAMETER_VALUE_FIELD))
    }

    /// Iterate global parameters in definition order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &InpValue)> {
        self.get(PARAMETER_COMMAND)
            .into_iter()
            .flat_map(|objects| objects.iter())
            .filter_map(|(name, obj)| obj.get(PARAMETER_VALUE_FIELD).map(|v| (name, v)))
    }

    /// All non-parameter objects ordered by sequence
    pub fn objects_in_sequence(&self) -> Vec<(&str, &str, &InpObject)> {
        let mut objects: Vec<_> = self
            .commands()
            .filter(|(command, _)| *command != PARAMETER_COMMAND)
            .flat_map(|(command, objects)| {
                objects.iter().map(move |(name, obj)| (command, name, obj))
            })
            .collect();
        objects.sort_by_key(|(_, _, obj)| obj.sequence);
        objects
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of non-parameter objects
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Record a tolerated parse problem
    pub fn push_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Problems tolerated while parsing
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Convert to a JSON value (commands only)
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Index<&str> for CommandDict {
    type Output = OrderedTable<InpObject>;

    fn index(&self, command: &str) -> &OrderedTable<InpObject> {
        &self.commands[command]
    }
}

impl Serialize for CommandDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.commands.serialize(serializer)
    }
}
