//! Option normalization.
//!
//! Callers hand over one loosely typed JSON object. The four plugin-level keys
//! (`property`, `remove`, `trim`, `setData`) are validated into typed fields;
//! every other key is copied into the parser options untouched. A value of the
//! wrong kind is replaced by the default, never reported as an error.

use crate::extractor::{DeepMerge, MergeStrategy};
use log::debug;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use xmatter_core::PropertyPath;

const PROPERTY: &str = "property";
const REMOVE: &str = "remove";
const TRIM: &str = "trim";
const SET_DATA: &str = "setData";

const PLUGIN_KEYS: [&str; 4] = [PROPERTY, REMOVE, TRIM, SET_DATA];

/// Default metadata property.
pub const DEFAULT_PROPERTY: &str = "data";

/// A supplied option whose kind does not match the option's default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option `{name}` expects {expected}, got {found}")]
pub struct OptionMismatch {
    /// Option name.
    pub name: &'static str,
    /// Kind the option accepts.
    pub expected: &'static str,
    /// Kind that was supplied.
    pub found: &'static str,
}

impl OptionMismatch {
    fn new(name: &'static str, expected: &'static str, value: &JsonValue) -> Self {
        Self {
            name,
            expected,
            found: kind_of(value),
        }
    }
}

/// Immutable extractor configuration.
#[derive(Clone)]
pub struct ExtractorOptions {
    property: PropertyPath,
    remove: bool,
    trim: bool,
    set_data: Arc<dyn MergeStrategy>,
    parser_options: Map<String, JsonValue>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            property: PropertyPath::parse(DEFAULT_PROPERTY),
            remove: true,
            trim: true,
            set_data: Arc::new(DeepMerge),
            parser_options: Map::new(),
        }
    }
}

impl fmt::Debug for ExtractorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorOptions")
            .field("property", &self.property.to_string())
            .field("remove", &self.remove)
            .field("trim", &self.trim)
            .field("parser_options", &self.parser_options)
            .finish_non_exhaustive()
    }
}

impl ExtractorOptions {
    /// Normalizes a loosely typed options value. Anything that is not a JSON
    /// object counts as an empty one. The input is left untouched.
    pub fn from_value(options: &JsonValue) -> Self {
        let Some(map) = options.as_object() else {
            if !options.is_null() {
                debug!("ignoring {} options value; expected object", kind_of(options));
            }
            return Self::default();
        };

        let defaults = Self::default();
        Self {
            property: pick(map, PROPERTY, validate_property, defaults.property),
            remove: pick(map, REMOVE, validate_bool, defaults.remove),
            trim: pick(map, TRIM, validate_bool, defaults.trim),
            set_data: pick(map, SET_DATA, validate_strategy, defaults.set_data),
            parser_options: map
                .iter()
                .filter(|(key, _)| !PLUGIN_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Sets the metadata property path.
    pub fn with_property(mut self, property: impl Into<PropertyPath>) -> Self {
        self.property = property.into();
        self
    }

    /// Sets whether the header is stripped from the contents.
    pub fn with_remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    /// Sets whether the remaining contents are trimmed.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Replaces the strategy combining stored and extracted metadata.
    pub fn with_set_data<S: MergeStrategy + 'static>(mut self, strategy: S) -> Self {
        self.set_data = Arc::new(strategy);
        self
    }

    /// Adds one parser option. Plugin-level keys are ignored.
    pub fn with_parser_option(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        let key = key.into();
        if PLUGIN_KEYS.contains(&key.as_str()) {
            debug!("`{key}` is a plugin option, not forwarding it to the parser");
        } else {
            self.parser_options.insert(key, value);
        }
        self
    }

    /// Metadata property path.
    pub fn property(&self) -> &PropertyPath {
        &self.property
    }

    /// Whether the header is stripped from the contents.
    pub fn remove(&self) -> bool {
        self.remove
    }

    /// Whether the remaining contents are trimmed.
    pub fn trim(&self) -> bool {
        self.trim
    }

    /// Strategy combining stored and extracted metadata.
    pub fn set_data(&self) -> &dyn MergeStrategy {
        self.set_data.as_ref()
    }

    /// Options forwarded to the front-matter parser.
    pub fn parser_options(&self) -> &Map<String, JsonValue> {
        &self.parser_options
    }
}

fn pick<T>(
    map: &Map<String, JsonValue>,
    name: &'static str,
    validate: fn(&'static str, &JsonValue) -> Result<T, OptionMismatch>,
    default: T,
) -> T {
    match map.get(name) {
        None => default,
        Some(value) => validate(name, value).unwrap_or_else(|mismatch| {
            debug!("{mismatch}; using default");
            default
        }),
    }
}

fn validate_property(
    name: &'static str,
    value: &JsonValue,
) -> Result<PropertyPath, OptionMismatch> {
    value
        .as_str()
        .map(PropertyPath::parse)
        .ok_or_else(|| OptionMismatch::new(name, "string", value))
}

fn validate_bool(name: &'static str, value: &JsonValue) -> Result<bool, OptionMismatch> {
    value
        .as_bool()
        .ok_or_else(|| OptionMismatch::new(name, "boolean", value))
}

/// A JSON value never carries a merge function; strategies are attached with
/// [`ExtractorOptions::with_set_data`].
fn validate_strategy(
    name: &'static str,
    value: &JsonValue,
) -> Result<Arc<dyn MergeStrategy>, OptionMismatch> {
    Err(OptionMismatch::new(name, "merge strategy", value))
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
