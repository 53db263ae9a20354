use thiserror::Error;
use xmatter_core::MatterError;

/// Stable identifier attached to every error this plugin reports.
pub const PLUGIN_NAME: &str = "xmatter";

/// Reasons a single file could not be processed.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File contents arrived as an incremental stream.
    #[error("Streaming not supported")]
    StreamingNotSupported,
    /// The front-matter parser rejected the header.
    #[error(transparent)]
    Matter(#[from] MatterError),
}

/// Error reported to the host pipeline, tagged with the plugin identifier.
#[derive(Debug, Error)]
#[error("{plugin}: {kind}")]
pub struct PluginError {
    /// Identifier of the plugin that failed.
    pub plugin: &'static str,
    /// What went wrong.
    #[source]
    pub kind: ExtractError,
}

impl PluginError {
    /// True when the file was rejected for being a stream.
    pub fn is_streaming(&self) -> bool {
        matches!(self.kind, ExtractError::StreamingNotSupported)
    }
}

impl From<ExtractError> for PluginError {
    fn from(kind: ExtractError) -> Self {
        Self {
            plugin: PLUGIN_NAME,
            kind,
        }
    }
}

impl From<MatterError> for PluginError {
    fn from(err: MatterError) -> Self {
        ExtractError::Matter(err).into()
    }
}
