#![deny(missing_docs)]
//! xmatter core: front-matter parsing, metadata property paths, and deep merge.

/// Core error types.
pub mod error;
/// Front-matter parsing (YAML, JSON, and TOML engines).
pub mod frontmatter;
/// Recursive mapping merge.
pub mod merge;
/// Property path accessor.
pub mod path;

pub use error::{MatterError, SourceLocation};
pub use frontmatter::{Excerpt, Matter, MatterOptions, parse_matter, parse_matter_with};
pub use merge::deep_merge;
pub use path::{PropertyPath, Segment};
