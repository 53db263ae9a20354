#![deny(missing_docs)]
//! xmatter plugin: a pipeline stage that moves front matter into file metadata.
//!
//! ```
//! use serde_json::json;
//! use xmatter_plugin::{FrontMatterExtractor, Outcome, SourceFile};
//!
//! let extractor = FrontMatterExtractor::from_value(&json!({ "property": "meta" }));
//! let mut file = SourceFile::new("post.md", "---\ntitle: Hello\n---\nBody text.\n");
//!
//! assert_eq!(extractor.transform(&mut file).unwrap(), Outcome::Transformed);
//! assert_eq!(file.text().as_deref(), Some("Body text."));
//! assert_eq!(file.metadata, json!({ "meta": { "title": "Hello" } }));
//! ```

/// Plugin error types.
pub mod error;
/// Per-file transform and merge strategies.
pub mod extractor;
/// File objects supplied by the host pipeline.
pub mod file;
/// Option normalization.
pub mod options;
/// Sequential host pipeline.
pub mod pipeline;

pub use error::{ExtractError, PLUGIN_NAME, PluginError};
pub use extractor::{DeepMerge, FrontMatterExtractor, MergeStrategy, Outcome};
pub use file::{Contents, SourceFile};
pub use options::{DEFAULT_PROPERTY, ExtractorOptions, OptionMismatch};
pub use pipeline::{Pipeline, PipelineError, PipelineRun, RunStats, Stage, StageError};
pub use xmatter_core::{MatterError, PropertyPath};
