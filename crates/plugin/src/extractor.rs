//! The per-file front-matter transform.

use crate::error::{ExtractError, PluginError};
use crate::file::{Contents, SourceFile};
use crate::options::ExtractorOptions;
use log::{debug, trace};
use serde_json::{Map, Value as JsonValue};
use xmatter_core::{Matter, deep_merge, parse_matter};

/// Combines metadata already stored on a file with freshly extracted data.
///
/// Callers must use the returned mapping; implementations may consume and
/// modify either input.
pub trait MergeStrategy: Send + Sync {
    /// Merge `incoming` into `existing`.
    fn merge(
        &self,
        existing: Map<String, JsonValue>,
        incoming: Map<String, JsonValue>,
    ) -> Map<String, JsonValue>;
}

impl<F> MergeStrategy for F
where
    F: Fn(Map<String, JsonValue>, Map<String, JsonValue>) -> Map<String, JsonValue> + Send + Sync,
{
    fn merge(
        &self,
        existing: Map<String, JsonValue>,
        incoming: Map<String, JsonValue>,
    ) -> Map<String, JsonValue> {
        (self)(existing, incoming)
    }
}

/// Default strategy: recursive merge, incoming values win.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepMerge;

impl MergeStrategy for DeepMerge {
    fn merge(
        &self,
        existing: Map<String, JsonValue>,
        incoming: Map<String, JsonValue>,
    ) -> Map<String, JsonValue> {
        deep_merge(existing, incoming)
    }
}

/// What happened to a file that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file had no contents and was passed through untouched.
    Skipped,
    /// Front matter was extracted into the file's metadata.
    Transformed,
}

/// Moves front matter from file contents into file metadata.
#[derive(Debug, Clone, Default)]
pub struct FrontMatterExtractor {
    options: ExtractorOptions,
}

impl FrontMatterExtractor {
    /// Creates an extractor with normalized options.
    pub fn new(options: ExtractorOptions) -> Self {
        Self { options }
    }

    /// Creates an extractor from a loosely typed options value.
    pub fn from_value(options: &JsonValue) -> Self {
        Self::new(ExtractorOptions::from_value(options))
    }

    /// Active configuration.
    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Processes one file in place.
    ///
    /// Files without contents are skipped. Stream contents are rejected.
    /// Parser failures leave the file untouched.
    pub fn transform(&self, file: &mut SourceFile) -> Result<Outcome, PluginError> {
        let matter = match &file.contents {
            Contents::Null => {
                debug!("{}: no contents, passing through", file.path.display());
                return Ok(Outcome::Skipped);
            }
            Contents::Stream(_) => return Err(ExtractError::StreamingNotSupported.into()),
            Contents::Buffer(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                parse_matter(&text, self.options.parser_options())?
            }
        };

        self.apply(file, matter);
        Ok(Outcome::Transformed)
    }

    fn apply(&self, file: &mut SourceFile, matter: Matter) {
        let property = self.options.property();
        let existing = match file.get(property) {
            Some(JsonValue::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        trace!(
            "{}: merging {} extracted key(s) into `{}`",
            file.path.display(),
            matter.data.len(),
            property
        );
        let combined = self.options.set_data().merge(existing, matter.data);
        file.set(property, JsonValue::Object(combined));

        if self.options.remove() {
            let content = if self.options.trim() {
                matter.content.trim().to_string()
            } else {
                matter.content
            };
            file.set_contents(content);
        }
    }
}
