//! Per-token style attributes and resolution
//!
//! A [`StyleInfo`] bundles the visual attributes a lexer style id can
//! carry. The [`StyleResolver`] merges three layers into the effective
//! attributes for a (language, scheme) pair:
//!
//! 1. scheme-wide defaults (foreground, background, caret, ...)
//! 2. the scheme's per-language bindings
//! 3. per-id user overrides from the settings store, which win outright

use std::collections::HashMap;

use crate::language::LanguageCatalog;
use crate::scheme::{color_from_hex, ColorScheme, ColorSchemeCatalog, COLOR_UNSET};
use crate::settings::{style_key, SettingsSource};

/// Visual attributes for one lexer style id.
///
/// Colors use the packed `(B<<16)|(G<<8)|R` form with `-1` meaning "not
/// set, keep the lexer's default". Freely copyable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleInfo {
    pub foreground: i32,
    pub background: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Fill the rest of the line with the background color of the last
    /// character.
    pub eol_filled: bool,
}

impl Default for StyleInfo {
    fn default() -> Self {
        Self {
            foreground: COLOR_UNSET,
            background: COLOR_UNSET,
            bold: false,
            italic: false,
            underline: false,
            eol_filled: false,
        }
    }
}

impl StyleInfo {
    pub fn has_foreground(&self) -> bool {
        self.foreground >= 0
    }

    pub fn has_background(&self) -> bool {
        self.background >= 0
    }

    /// Parse a user override string.
    ///
    /// Grammar: comma-separated tokens out of `fore:RRGGBB`, `back:RRGGBB`,
    /// `bold`, `italic`, `eolfilled`. Tokens are trimmed, unrecognized
    /// tokens are ignored, and parsing is best-effort: a malformed color
    /// just leaves that field unset. Note that `underline` is not part of
    /// the grammar.
    pub fn from_override(text: &str) -> StyleInfo {
        let mut style = StyleInfo::default();
        for token in text.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token.starts_with("fore:") {
                if let Some(packed) = color_from_hex(last_six(token)) {
                    style.foreground = packed;
                }
            } else if token.starts_with("back:") {
                if let Some(packed) = color_from_hex(last_six(token)) {
                    style.background = packed;
                }
            } else if token == "bold" {
                style.bold = true;
            } else if token == "italic" {
                style.italic = true;
            } else if token == "eolfilled" {
                style.eol_filled = true;
            }
        }
        style
    }
}

/// The last six characters of a token; the color always sits at the tail
/// of a `fore:`/`back:` token.
fn last_six(token: &str) -> &str {
    match token.char_indices().rev().nth(5) {
        Some((idx, _)) => &token[idx..],
        None => token,
    }
}

/// Identifies the (language, scheme) pair a resolution was computed for.
///
/// Compared by value: hosts detect "the language changed" by comparing
/// contexts, not by comparing pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleContext {
    pub language_id: Option<String>,
    pub scheme_name: String,
}

/// The effective styling for one (language, scheme) pair.
///
/// Scalar colors keep the `-1` sentinel: the host leaves its current
/// default alone for unset fields rather than clearing anything. `styles`
/// holds an entry only for ids that have an override from the scheme or
/// the user; ids absent from the map keep the lexer's built-in default.
#[derive(Debug, Clone)]
pub struct ResolvedStyles {
    pub context: StyleContext,
    pub foreground: i32,
    pub background: i32,
    pub caret: i32,
    pub caret_line: i32,
    pub selection: i32,
    pub whitespace_foreground: i32,
    pub styles: HashMap<u8, StyleInfo>,
}

impl ResolvedStyles {
    pub fn style_for(&self, style_id: u8) -> Option<&StyleInfo> {
        self.styles.get(&style_id)
    }
}

/// Composes the two catalogs and the user settings into concrete style
/// attributes.
///
/// Resolution is a pure function of its inputs and always runs in full:
/// callers re-resolve whenever the active language, the active scheme, or
/// a relevant setting changes.
pub struct StyleResolver<'a> {
    languages: &'a LanguageCatalog,
    schemes: &'a ColorSchemeCatalog,
}

impl<'a> StyleResolver<'a> {
    pub fn new(languages: &'a LanguageCatalog, schemes: &'a ColorSchemeCatalog) -> Self {
        Self { languages, schemes }
    }

    /// Resolve effective styles for a language (or none) under a scheme.
    ///
    /// Returns `None` when the scheme name is unknown — the caller falls
    /// back to "no styling". An unknown language id resolves like "no
    /// language": scheme defaults only, no per-id styles.
    pub fn resolve(
        &self,
        language_id: Option<&str>,
        scheme_name: &str,
        settings: &impl SettingsSource,
    ) -> Option<ResolvedStyles> {
        let scheme = self.schemes.by_name(scheme_name)?;
        let language = language_id.and_then(|id| self.languages.by_id(id));

        let mut resolved = ResolvedStyles {
            context: StyleContext {
                language_id: language.map(|lang| lang.id().to_string()),
                scheme_name: scheme.name().to_string(),
            },
            foreground: scheme.foreground(),
            background: scheme.background(),
            caret: scheme.caret(),
            caret_line: scheme.caret_line(),
            selection: scheme.selection(),
            whitespace_foreground: scheme.whitespace_foreground(),
            styles: HashMap::new(),
        };

        if let Some(language) = language {
            for desc in language.styles() {
                let id = desc.style;
                let info = resolve_one(language.id(), id, scheme, settings);
                if let Some(info) = info {
                    resolved.styles.insert(id, info);
                }
            }
        }

        Some(resolved)
    }
}

/// Priority for one style id: a non-empty user setting wins outright,
/// else the scheme's binding, else nothing (lexer default stays).
fn resolve_one(
    language_id: &str,
    style_id: u8,
    scheme: &ColorScheme,
    settings: &impl SettingsSource,
) -> Option<StyleInfo> {
    if let Some(value) = settings.get(&style_key(language_id, style_id)) {
        if !value.is_empty() {
            return Some(StyleInfo::from_override(value));
        }
    }
    scheme.style_for(language_id, style_id)
}
