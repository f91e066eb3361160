//! Error types for catalog and settings loading

use thiserror::Error;

/// Construction-time configuration failure.
///
/// The editor cannot style text without its language and color-scheme
/// catalogs, so `load` propagates these to the caller instead of absorbing
/// them. The caller decides whether that means aborting; the core never
/// exits the process itself.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {resource}: {source}")]
    Parse {
        /// Name of the resource that failed to parse.
        resource: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no config directory available")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn parse(resource: impl Into<String>, source: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            resource: resource.into(),
            source,
        }
    }
}
