//! File objects handed to the extractor by the host pipeline.

use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use xmatter_core::PropertyPath;

/// Body of a file as supplied by the host.
pub enum Contents {
    /// No contents (directories and other placeholders).
    Null,
    /// Fully materialized bytes.
    Buffer(Vec<u8>),
    /// Incremental contents; not supported by the extractor.
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Null => f.write_str("Null"),
            Contents::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Contents::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// One file flowing through the pipeline.
#[derive(Debug)]
pub struct SourceFile {
    /// Path the host associates with the file.
    pub path: PathBuf,
    /// File body.
    pub contents: Contents,
    /// Nested metadata addressed by property paths. Starts as an empty mapping.
    pub metadata: JsonValue,
}

impl SourceFile {
    /// Creates a file with materialized contents.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self::with_contents(path, Contents::Buffer(contents.into()))
    }

    /// Creates a file without contents.
    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self::with_contents(path, Contents::Null)
    }

    /// Creates a file whose contents are a stream.
    pub fn stream(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        Self::with_contents(path, Contents::Stream(Box::new(reader)))
    }

    fn with_contents(path: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            contents,
            metadata: JsonValue::Object(Default::default()),
        }
    }

    /// Replaces the metadata tree.
    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file carries no contents.
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// True when the contents are a stream.
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    /// Materialized bytes, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Contents decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.bytes().map(String::from_utf8_lossy)
    }

    /// Replaces the contents with materialized bytes.
    pub fn set_contents(&mut self, contents: impl Into<Vec<u8>>) {
        self.contents = Contents::Buffer(contents.into());
    }

    /// Reads metadata at `path`.
    pub fn get(&self, path: &PropertyPath) -> Option<&JsonValue> {
        path.get(&self.metadata)
    }

    /// Writes metadata at `path`, creating intermediate containers.
    pub fn set(&mut self, path: &PropertyPath, value: JsonValue) {
        path.set(&mut self.metadata, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_file_has_empty_metadata() {
        let file = SourceFile::new("a.md", "body");
        assert_eq!(file.metadata, json!({}));
        assert_eq!(file.text().as_deref(), Some("body"));
        assert!(!file.is_null());
        assert!(!file.is_stream());
    }

    #[test]
    fn null_and_stream_have_no_text() {
        assert_eq!(SourceFile::null("dir").text(), None);
        let stream = SourceFile::stream("s.md", std::io::empty());
        assert!(stream.is_stream());
        assert_eq!(stream.bytes(), None);
        assert_eq!(format!("{:?}", stream.contents), "Stream(..)");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let file = SourceFile::new("bin.md", vec![b'o', b'k', 0xff]);
        assert_eq!(file.text().as_deref(), Some("ok\u{fffd}"));
    }

    #[test]
    fn metadata_accessors_use_paths() {
        let mut file = SourceFile::new("a.md", "");
        let path = PropertyPath::parse("meta.title");
        file.set(&path, json!("Hi"));
        assert_eq!(file.get(&path), Some(&json!("Hi")));
        assert_eq!(file.metadata, json!({ "meta": { "title": "Hi" } }));
    }
}
