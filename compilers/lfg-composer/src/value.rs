use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::function::Function;

pub const PRED: &str = "PRED";

/// Argument frame of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Not yet finalized; renders as `lemma< >`.
    Open,
    /// `lemma<(SUBJ)(OBJ)>`
    Args(Vec<Function>),
    /// Plain `lemma`.
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub lemma: String,
    pub frame: Frame,
}

impl Predicate {
    pub fn open(lemma: impl Into<String>) -> Self {
        Self { lemma: lemma.into(), frame: Frame::Open }
    }

    pub fn bare(lemma: impl Into<String>) -> Self {
        Self { lemma: lemma.into(), frame: Frame::Bare }
    }

    pub fn with_args(lemma: impl Into<String>, args: Vec<Function>) -> Self {
        Self { lemma: lemma.into(), frame: Frame::Args(args) }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.frame {
            Frame::Open => write!(f, "{}< >", self.lemma),
            Frame::Bare => f.write_str(&self.lemma),
            Frame::Args(args) => {
                write!(f, "{}<", self.lemma)?;
                for arg in args {
                    write!(f, "({})", arg)?;
                }
                f.write_str(">")
            }
        }
    }
}

/// A value inside an f-structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FValue {
    Atom(String),
    Pred(Predicate),
    Map(AttrMap),
    /// Coordinations and adjunct sets.
    List(Vec<AttrMap>),
}

impl FValue {
    pub fn atom(text: impl Into<String>) -> Self {
        FValue::Atom(text.into())
    }

    pub fn as_map(&self) -> Option<&AttrMap> {
        match self {
            FValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrMap]> {
        match self {
            FValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Textual content of an atom or predicate.
    pub fn text(&self) -> Option<String> {
        match self {
            FValue::Atom(text) => Some(text.clone()),
            FValue::Pred(pred) => Some(pred.to_string()),
            _ => None,
        }
    }
}

/// Attribute-value mapping that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
    entries: Vec<(String, FValue)>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: FValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Adds `key` unless it is already present; the first value wins.
    /// Returns whether the value was stored.
    pub fn insert(&mut self, key: impl Into<String>, value: FValue) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Adds or overwrites `key`, keeping its original position.
    pub fn set(&mut self, key: impl Into<String>, value: FValue) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Value carried by a node: one description, or an ordered list of them
/// once the node heads a coordination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Map(AttrMap),
    List(Vec<AttrMap>),
}

impl Default for NodeValue {
    fn default() -> Self {
        NodeValue::Map(AttrMap::new())
    }
}

impl NodeValue {
    pub fn single_item(map: AttrMap) -> Self {
        NodeValue::List(vec![map])
    }

    /// The node's own description: the mapping, or the first list item.
    pub fn head(&self) -> Option<&AttrMap> {
        match self {
            NodeValue::Map(map) => Some(map),
            NodeValue::List(items) => items.first(),
        }
    }

    /// Mutable access to the node's own description. An empty list gets a
    /// fresh first item.
    pub fn head_mut(&mut self) -> &mut AttrMap {
        match self {
            NodeValue::Map(map) => map,
            NodeValue::List(items) => {
                if items.is_empty() {
                    items.push(AttrMap::new());
                }
                &mut items[0]
            }
        }
    }

    /// Text of the PRED attribute; predicates yield their lemma.
    pub fn pred_text(&self) -> Option<String> {
        match self.head()?.get(PRED)? {
            FValue::Atom(text) => Some(text.clone()),
            FValue::Pred(pred) => Some(pred.lemma.clone()),
            _ => None,
        }
    }

    pub fn into_list(self) -> Vec<AttrMap> {
        match self {
            NodeValue::Map(map) => vec![map],
            NodeValue::List(items) => items,
        }
    }

    pub fn into_fvalue(self) -> FValue {
        match self {
            NodeValue::Map(map) => FValue::Map(map),
            NodeValue::List(items) => FValue::List(items),
        }
    }
}

/// Composed f-structure: a single attribute holding the matrix predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FStructure {
    root: AttrMap,
}

impl FStructure {
    pub fn new(function: Function, value: NodeValue) -> Self {
        let mut root = AttrMap::new();
        root.set(function.as_str(), value.into_fvalue());
        Self { root }
    }

    pub fn as_map(&self) -> &AttrMap {
        &self.root
    }

    /// Label of the matrix predicate's function.
    pub fn root_label(&self) -> Option<&str> {
        self.root.keys().next()
    }

    /// Follows a path of attribute names through nested mappings; list
    /// values are entered through their first item.
    pub fn lookup(&self, path: &[&str]) -> Option<&FValue> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(first)?;
        for key in rest {
            let map = match current {
                FValue::Map(map) => map,
                FValue::List(items) => items.first()?,
                _ => return None,
            };
            current = map.get(key)?;
        }
        Some(current)
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for FValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FValue::Atom(text) => serializer.serialize_str(text),
            FValue::Pred(pred) => pred.serialize(serializer),
            FValue::Map(map) => map.serialize(serializer),
            FValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for AttrMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for FStructure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

// Attribute-value matrix rendering

fn write_map(f: &mut fmt::Formatter<'_>, map: &AttrMap, indent: usize) -> fmt::Result {
    f.write_str("[")?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i == 0 {
            f.write_str(" ")?;
        } else {
            write!(f, "\n{:width$}", "", width = indent + 2)?;
        }
        write!(f, "{} ", key)?;
        write_value(f, value, indent + 2 + key.len() + 1)?;
    }
    f.write_str(" ]")
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &FValue, indent: usize) -> fmt::Result {
    match value {
        FValue::Atom(text) => write!(f, "'{}'", text),
        FValue::Pred(pred) => write!(f, "'{}'", pred),
        FValue::Map(map) => write_map(f, map, indent),
        FValue::List(items) => {
            f.write_str("{")?;
            for (i, item) in items.iter().enumerate() {
                if i == 0 {
                    f.write_str(" ")?;
                } else {
                    write!(f, "\n{:width$}", "", width = indent + 2)?;
                }
                write_map(f, item, indent + 2)?;
            }
            f.write_str(" }")
        }
    }
}

impl fmt::Display for FValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

impl fmt::Display for FStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_map(f, &self.root, 0)
    }
}
