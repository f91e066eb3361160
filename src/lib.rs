//! Vellum - editor core for language and color-scheme resolution and search
//!
//! This crate provides the algorithmic core of a source-code editor:
//! declarative language definitions with filename matching, color schemes
//! with per-language style bindings, user style overrides, and a
//! directional, wraparound search/replace engine over an abstract text
//! buffer. Window chrome, rendering and file plumbing are the host's
//! business.

pub mod bookmark;
pub mod config_paths;
pub mod error;
pub mod language;
pub mod scheme;
pub mod search;
pub mod settings;
pub mod style;

// Re-export commonly used types
pub use bookmark::BookmarkSet;
pub use error::ConfigError;
pub use language::{LanguageCatalog, LanguageDefinition};
pub use scheme::{ColorScheme, ColorSchemeCatalog};
pub use search::{
    Direction, MemoryBuffer, SearchFlags, SearchOutcome, SearchQuery, SearchTarget,
};
pub use settings::{Settings, SettingsSource};
pub use style::{ResolvedStyles, StyleInfo, StyleResolver};
