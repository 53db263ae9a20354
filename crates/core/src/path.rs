//! Dotted property paths over `serde_json::Value` trees.
//!
//! `"meta.custom"` addresses `root["meta"]["custom"]`; an all-digit segment such
//! as the `0` in `"items.0.title"` indexes a sequence. Writes create missing
//! intermediate containers.

use serde_json::Value as JsonValue;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Largest sequence index a path may address. Bigger numeric segments are keys.
pub const MAX_INDEX: usize = u16::MAX as usize;

/// One step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key.
    Key(String),
    /// Sequence index (or the decimal key on a mapping).
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        // `01` stays a key so it round-trips unchanged.
        let canonical = raw == "0" || (!raw.starts_with('0') && !raw.is_empty());
        if canonical && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index @ 0..=MAX_INDEX) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    fn key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    fn empty_container(&self) -> JsonValue {
        match self {
            Segment::Index(index) if *index <= MAX_INDEX => JsonValue::Array(Vec::new()),
            _ => JsonValue::Object(Default::default()),
        }
    }

    fn child<'a>(&self, node: &'a JsonValue) -> Option<&'a JsonValue> {
        match (self, node) {
            (Segment::Key(key), JsonValue::Object(map)) => map.get(key),
            (Segment::Index(index), JsonValue::Object(map)) => map.get(&index.to_string()),
            (Segment::Index(index), JsonValue::Array(items)) => items.get(*index),
            _ => None,
        }
    }

    /// Returns the slot this segment names inside `node`, converting `node`
    /// into a suitable container first when it is not one.
    fn slot<'a>(&self, node: &'a mut JsonValue) -> &'a mut JsonValue {
        let fits = match (self, &*node) {
            (Segment::Index(index), JsonValue::Array(_)) => *index <= MAX_INDEX,
            (_, JsonValue::Object(_)) => true,
            _ => false,
        };
        if !fits {
            *node = self.empty_container();
        }
        match node {
            JsonValue::Array(items) => {
                let Segment::Index(index) = self else {
                    unreachable!("node was converted to a matching container above")
                };
                if items.len() <= *index {
                    items.resize(*index + 1, JsonValue::Null);
                }
                &mut items[*index]
            }
            JsonValue::Object(map) => map.entry(self.key()).or_insert(JsonValue::Null),
            _ => unreachable!("node was converted to a matching container above"),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Typed route through nested mappings and sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath {
    segments: Vec<Segment>,
}

impl PropertyPath {
    /// Builds a path from explicit segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parses a dotted path string. The empty string addresses the root.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self::new(path.split('.').map(Segment::parse).collect())
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the path addresses the root value itself.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Reads the value at this path.
    pub fn get<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| segment.child(node))
    }

    /// Writes `value` at this path, creating intermediate containers.
    ///
    /// A mapping is created ahead of a key segment and a sequence ahead of an
    /// index segment; scalars or containers of the wrong kind in the way are
    /// replaced. Sequences are padded with `null` up to the index.
    pub fn set(&self, root: &mut JsonValue, value: JsonValue) {
        let target = self
            .segments
            .iter()
            .fold(root, |node, segment| segment.slot(node));
        *target = value;
    }
}

impl FromStr for PropertyPath {
    type Err = Infallible;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(path))
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_keys_and_indices() {
        let path = PropertyPath::parse("items.0.title");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("items".into()),
                Segment::Index(0),
                Segment::Key("title".into()),
            ]
        );
        assert_eq!(path.to_string(), "items.0.title");
        assert_eq!(PropertyPath::parse("a.01").segments()[1], Segment::Key("01".into()));
        assert!(PropertyPath::parse("").is_root());
    }

    #[test]
    fn get_walks_mappings_and_sequences() {
        let root = json!({ "meta": { "tags": ["a", "b"], "1": "one" } });
        assert_eq!(PropertyPath::parse("meta.tags.1").get(&root), Some(&json!("b")));
        assert_eq!(PropertyPath::parse("meta.1").get(&root), Some(&json!("one")));
        assert_eq!(PropertyPath::parse("meta.missing").get(&root), None);
        assert_eq!(PropertyPath::parse("meta.tags.x").get(&root), None);
        assert_eq!(PropertyPath::parse("").get(&root), Some(&root));
    }

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut root = json!({ "path": "a.md" });
        PropertyPath::parse("meta.custom").set(&mut root, json!({ "title": "Hello" }));
        assert_eq!(
            root,
            json!({ "path": "a.md", "meta": { "custom": { "title": "Hello" } } })
        );
    }

    #[test]
    fn set_keeps_siblings() {
        let mut root = json!({ "meta": { "other": 1 } });
        PropertyPath::parse("meta.custom").set(&mut root, json!(2));
        assert_eq!(root, json!({ "meta": { "other": 1, "custom": 2 } }));
    }

    #[test]
    fn set_creates_and_pads_sequences() {
        let mut root = json!({});
        PropertyPath::parse("list.2.name").set(&mut root, json!("x"));
        assert_eq!(root, json!({ "list": [null, null, { "name": "x" }] }));
    }

    #[test]
    fn oversized_numeric_segments_are_keys() {
        let path = PropertyPath::parse("x.18446744073709551615.4000000000");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("x".into()),
                Segment::Key("18446744073709551615".into()),
                Segment::Key("4000000000".into()),
            ]
        );

        let mut root = json!({ "x": [1] });
        path.set(&mut root, json!(true));
        assert_eq!(
            root,
            json!({ "x": { "18446744073709551615": { "4000000000": true } } })
        );
        assert_eq!(path.get(&root), Some(&json!(true)));
    }

    #[test]
    fn explicit_oversized_index_writes_a_key() {
        let path = PropertyPath::new(vec![
            Segment::Key("list".into()),
            Segment::Index(usize::MAX),
        ]);
        let mut root = json!({ "list": [] });
        path.set(&mut root, json!(1));
        let key = usize::MAX.to_string();
        assert_eq!(root, json!({ "list": { key: 1 } }));
        assert_eq!(path.get(&root), Some(&json!(1)));
    }

    #[test]
    fn set_replaces_scalars_in_the_way() {
        let mut root = json!({ "meta": "oops" });
        PropertyPath::parse("meta.custom").set(&mut root, json!(true));
        assert_eq!(root, json!({ "meta": { "custom": true } }));
    }

    #[test]
    fn index_on_mapping_uses_decimal_key() {
        let mut root = json!({ "meta": {} });
        PropertyPath::parse("meta.3").set(&mut root, json!("three"));
        assert_eq!(root, json!({ "meta": { "3": "three" } }));
    }

    #[test]
    fn set_on_root_replaces_value() {
        let mut root = json!({ "a": 1 });
        PropertyPath::parse("").set(&mut root, json!({ "b": 2 }));
        assert_eq!(root, json!({ "b": 2 }));
    }
}
