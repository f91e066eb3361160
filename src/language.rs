//! Language catalog
//!
//! Loads declarative language definitions from a YAML resource and maps
//! file names to languages via glob patterns.
//!
//! The builtin resource is embedded at compile time; lookups preserve the
//! declaration order of the resource so that the first language whose
//! patterns claim a filename wins deterministically.

use globset::{Glob, GlobMatcher};
use serde::Deserialize;

use crate::error::ConfigError;

/// Embedded language definitions
pub const LANGUAGES_YAML: &str = include_str!("../resources/languages.yaml");

const RESOURCE_NAME: &str = "languages.yaml";

/// Pairs a lexer style id with its human-readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescription {
    /// The lexer's identifier for the style (0-255)
    pub style: u8,
    /// Free-text description shown in configuration UIs
    pub description: String,
}

/// A language the editor knows how to lex and style.
///
/// Immutable once built; owned by the [`LanguageCatalog`] for the life of
/// the process.
#[derive(Debug, Clone)]
pub struct LanguageDefinition {
    id: String,
    name: String,
    lexer: String,
    patterns: String,
    keyword_sets: Vec<String>,
    styles: Vec<StyleDescription>,
    matchers: Vec<GlobMatcher>,
}

impl LanguageDefinition {
    /// Stable identifier (e.g. `"cpp"`), used in settings keys and
    /// color-scheme bindings.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (e.g. `"C/C++"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque grammar token handed to the host's lexer.
    pub fn lexer(&self) -> &str {
        &self.lexer
    }

    /// Space-separated glob patterns (e.g. `"*.c *.h *.cpp"`).
    pub fn patterns(&self) -> &str {
        &self.patterns
    }

    /// Keyword sets in set-id order. Index = set id; gaps in the resource
    /// are backfilled with empty strings, and each set's text is collapsed
    /// to single-space separation.
    pub fn keyword_sets(&self) -> &[String] {
        &self.keyword_sets
    }

    /// Style ids the language's lexer emits, with descriptions.
    pub fn styles(&self) -> &[StyleDescription] {
        &self.styles
    }

    /// True if any of the language's patterns matches the full filename.
    pub fn matches_filename(&self, filename: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(filename))
    }
}

// Raw resource shapes as parsed from YAML.

#[derive(Debug, Deserialize)]
struct LanguageFile {
    languages: Vec<LanguageData>,
}

#[derive(Debug, Deserialize)]
struct LanguageData {
    id: String,
    name: String,
    lexer: String,
    #[serde(default)]
    patterns: String,
    #[serde(default)]
    keyword_sets: Vec<KeywordSetData>,
    #[serde(default)]
    styles: Vec<StyleDescriptionData>,
}

#[derive(Debug, Deserialize)]
struct KeywordSetData {
    id: usize,
    keywords: String,
}

#[derive(Debug, Deserialize)]
struct StyleDescriptionData {
    id: u32,
    description: String,
}

/// All languages the editor supports, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    languages: Vec<LanguageDefinition>,
}

impl LanguageCatalog {
    /// Parse a language resource.
    ///
    /// A missing or structurally invalid resource is a fatal construction
    /// error; the editor cannot present text meaningfully without the
    /// catalog.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let file: LanguageFile =
            serde_yaml::from_str(text).map_err(|e| ConfigError::parse(RESOURCE_NAME, e))?;

        let languages = file.languages.into_iter().map(build_language).collect();
        Ok(Self { languages })
    }

    /// Load the embedded language resource.
    pub fn load_builtin() -> Result<Self, ConfigError> {
        let catalog = Self::from_yaml(LANGUAGES_YAML)?;
        tracing::info!("Loaded {} builtin languages", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// All languages in catalog (declaration) order.
    pub fn all(&self) -> impl Iterator<Item = &LanguageDefinition> {
        self.languages.iter()
    }

    /// Look up a language by its identifier.
    pub fn by_id(&self, id: &str) -> Option<&LanguageDefinition> {
        self.languages.iter().find(|lang| lang.id == id)
    }

    /// Look up the language claiming a filename.
    ///
    /// Languages are tried in catalog order and the first whose pattern
    /// list contains any matching glob wins; catalog order is the tie-break
    /// when several languages could claim the same name. Matching is
    /// case-sensitive and anchored to the whole filename.
    pub fn by_filename(&self, filename: &str) -> Option<&LanguageDefinition> {
        self.languages
            .iter()
            .find(|lang| lang.matches_filename(filename))
    }

    /// Filter string for the host's file-open dialog:
    /// `All files (*);;C/C++ files (*.c *.h ...);;...`
    pub fn filter_string(&self) -> String {
        let mut filter = String::from("All files (*)");
        for lang in &self.languages {
            filter.push_str(";;");
            filter.push_str(&lang.name);
            filter.push_str(" files (");
            filter.push_str(&lang.patterns);
            filter.push(')');
        }
        filter
    }
}

fn build_language(data: LanguageData) -> LanguageDefinition {
    // Keyword sets are keyed by id; missing intermediate ids become empty
    // strings so that set text always lands at index == id. A set whose id
    // goes backwards cannot be placed and is skipped.
    let mut keyword_sets: Vec<String> = Vec::new();
    for set in data.keyword_sets {
        if set.id < keyword_sets.len() {
            tracing::warn!(
                "language {}: keyword set id {} is out of order, skipping",
                data.id,
                set.id
            );
            continue;
        }
        while keyword_sets.len() < set.id {
            keyword_sets.push(String::new());
        }
        keyword_sets.push(collapse_whitespace(&set.keywords));
    }

    let mut styles = Vec::new();
    for style in data.styles {
        match u8::try_from(style.id) {
            Ok(id) => styles.push(StyleDescription {
                style: id,
                description: style.description,
            }),
            Err(_) => {
                tracing::warn!(
                    "language {}: style id {} is out of range, skipping",
                    data.id,
                    style.id
                );
            }
        }
    }

    let matchers = data
        .patterns
        .split_whitespace()
        .filter_map(|pattern| match Glob::new(pattern) {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                tracing::warn!(
                    "language {}: invalid pattern {:?}: {}",
                    data.id,
                    pattern,
                    e
                );
                None
            }
        })
        .collect();

    LanguageDefinition {
        id: data.id,
        name: data.name,
        lexer: data.lexer,
        patterns: data.patterns,
        keyword_sets,
        styles,
        matchers,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
