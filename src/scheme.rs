//! Color schemes
//!
//! Loads named color schemes from YAML resources. A scheme bundles a
//! handful of editor-wide colors with per-language bindings from numeric
//! lexer style ids to named style templates.
//!
//! Scheme loading priority mirrors the builtin/user split used for the
//! rest of the configuration:
//! 1. Builtin: schemes compiled into the binary
//! 2. User: `~/.config/vellum/schemes/*.yaml`, overriding builtins by name

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::style::StyleInfo;

// Embed scheme YAML files at compile time
pub const DEFAULT_SCHEMES_YAML: &str = include_str!("../resources/schemes/default.yaml");
pub const SOLARIZED_SCHEMES_YAML: &str = include_str!("../resources/schemes/solarized.yaml");

/// Registry of all builtin scheme resources; one resource may declare
/// several schemes.
pub const BUILTIN_SCHEMES: &[(&str, &str)] = &[
    ("default.yaml", DEFAULT_SCHEMES_YAML),
    ("solarized.yaml", SOLARIZED_SCHEMES_YAML),
];

/// Sentinel for "color not set, inherit whatever the host's default is".
pub const COLOR_UNSET: i32 = -1;

/// Pack RGB channels into the host-lexer color form `(B<<16)|(G<<8)|R`.
pub fn pack_color(r: u8, g: u8, b: u8) -> i32 {
    (r as i32) | ((g as i32) << 8) | ((b as i32) << 16)
}

/// Split a packed color back into RGB channels.
pub fn unpack_color(color: i32) -> (u8, u8, u8) {
    (
        (color & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        ((color >> 16) & 0xFF) as u8,
    )
}

/// Parse a 6-hex-digit `RRGGBB` string into the packed (byte-swapped)
/// form. `"FF0000"` — pure red — packs to `0x0000FF`.
pub fn color_from_hex(hex: &str) -> Option<i32> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    Some(pack_color(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    ))
}

/// A named collection of editor-wide colors plus per-language style
/// bindings. Immutable after load; owned by the [`ColorSchemeCatalog`].
#[derive(Debug, Clone)]
pub struct ColorScheme {
    name: String,
    foreground: i32,
    background: i32,
    caret: i32,
    caret_line: i32,
    selection: i32,
    whitespace_foreground: i32,
    language_styles: HashMap<String, HashMap<u8, StyleInfo>>,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default text color, or [`COLOR_UNSET`].
    pub fn foreground(&self) -> i32 {
        self.foreground
    }

    /// Default paper color, or [`COLOR_UNSET`].
    pub fn background(&self) -> i32 {
        self.background
    }

    pub fn caret(&self) -> i32 {
        self.caret
    }

    /// Background of the line the caret is on, or [`COLOR_UNSET`].
    pub fn caret_line(&self) -> i32 {
        self.caret_line
    }

    /// Selection background, or [`COLOR_UNSET`].
    pub fn selection(&self) -> i32 {
        self.selection
    }

    /// Foreground of visible whitespace markers.
    pub fn whitespace_foreground(&self) -> i32 {
        self.whitespace_foreground
    }

    /// Binding for one (language, style id) pair, if the scheme declares it.
    pub fn style_for(&self, language_id: &str, style_id: u8) -> Option<StyleInfo> {
        self.language_styles
            .get(language_id)?
            .get(&style_id)
            .copied()
    }

    /// All bindings the scheme declares for a language; empty if none.
    pub fn styles_for_language(&self, language_id: &str) -> HashMap<u8, StyleInfo> {
        self.language_styles
            .get(language_id)
            .cloned()
            .unwrap_or_default()
    }
}

// Raw resource shapes as parsed from YAML.

#[derive(Debug, Deserialize)]
struct SchemeFile {
    schemes: Vec<SchemeData>,
}

#[derive(Debug, Deserialize)]
struct SchemeData {
    name: String,
    #[serde(default)]
    colors: BTreeMap<String, String>,
    #[serde(default)]
    styles: Vec<StyleTemplateData>,
    #[serde(default)]
    languages: Vec<LanguageStylesData>,
}

#[derive(Debug, Deserialize)]
struct StyleTemplateData {
    name: String,
    #[serde(default)]
    foreground: Option<String>,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    bold: Option<bool>,
    #[serde(default)]
    italic: Option<bool>,
    #[serde(default)]
    underline: Option<bool>,
    #[serde(default)]
    eol_filled: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LanguageStylesData {
    id: String,
    #[serde(default)]
    styles: Vec<StyleBindingData>,
}

#[derive(Debug, Deserialize)]
struct StyleBindingData {
    // Kept loose on purpose: a binding whose id is not an integer is
    // dropped silently rather than failing the whole resource.
    id: serde_yaml::Value,
    #[serde(default)]
    style_ref: Option<String>,
}

/// All color schemes available to the editor, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ColorSchemeCatalog {
    schemes: HashMap<String, ColorScheme>,
}

impl ColorSchemeCatalog {
    /// Parse a set of `(resource name, yaml text)` sources.
    ///
    /// Any structurally invalid source fails the whole load; a later
    /// scheme with the name of an earlier one replaces it.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::default();
        for (resource, text) in sources {
            catalog.merge_source(resource, text)?;
        }
        Ok(catalog)
    }

    /// Load the embedded scheme resources.
    pub fn load_builtin() -> Result<Self, ConfigError> {
        let catalog = Self::from_sources(BUILTIN_SCHEMES.iter().copied())?;
        tracing::info!("Loaded {} builtin color schemes", catalog.len());
        Ok(catalog)
    }

    /// Load builtins, then merge user scheme files from `dir`.
    ///
    /// The builtin resources must parse — without them the editor has no
    /// styling at all — but a broken user file only costs that file: it is
    /// logged and skipped, like the rest of the user configuration.
    pub fn load_with_user_schemes(dir: &Path) -> Result<Self, ConfigError> {
        let mut catalog = Self::load_builtin()?;

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(catalog),
        };
        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .collect();
        paths.sort();

        for path in paths {
            let name = path.display().to_string();
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    if let Err(e) = catalog.merge_source(&name, &text) {
                        tracing::warn!("Skipping user scheme file {}: {}", name, e);
                    } else {
                        tracing::info!("Loaded user schemes from {}", name);
                    }
                }
                Err(e) => {
                    tracing::warn!("Cannot read user scheme file {}: {}", name, e);
                }
            }
        }
        Ok(catalog)
    }

    fn merge_source(&mut self, resource: &str, text: &str) -> Result<(), ConfigError> {
        let file: SchemeFile =
            serde_yaml::from_str(text).map_err(|e| ConfigError::parse(resource, e))?;
        for data in file.schemes {
            let scheme = build_scheme(data);
            self.schemes.insert(scheme.name.clone(), scheme);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Look up a scheme by name.
    pub fn by_name(&self, name: &str) -> Option<&ColorScheme> {
        self.schemes.get(name)
    }

    /// Names of all schemes, sorted ascending regardless of load order.
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemes.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Assemble one scheme from its raw data.
///
/// The scheme only becomes visible to the catalog once fully built, so a
/// half-parsed scheme can never be observed through `by_name`.
fn build_scheme(data: SchemeData) -> ColorScheme {
    let mut scheme = ColorScheme {
        name: data.name,
        foreground: COLOR_UNSET,
        background: COLOR_UNSET,
        caret: COLOR_UNSET,
        caret_line: COLOR_UNSET,
        selection: COLOR_UNSET,
        whitespace_foreground: COLOR_UNSET,
        language_styles: HashMap::new(),
    };

    for (kind, hex) in &data.colors {
        let Some(packed) = color_from_hex(hex) else {
            tracing::warn!(
                "scheme {}: invalid {} color {:?}, leaving unset",
                scheme.name,
                kind,
                hex
            );
            continue;
        };
        match kind.as_str() {
            "foreground" => scheme.foreground = packed,
            "background" => scheme.background = packed,
            "caret" => scheme.caret = packed,
            "caret_line" => scheme.caret_line = packed,
            "selection" => scheme.selection = packed,
            "whitespace" => scheme.whitespace_foreground = packed,
            _ => {}
        }
    }

    // Named templates are a parse-time scratch dictionary; only the
    // per-language bindings that resolve against it survive into the
    // finished scheme.
    let mut templates: HashMap<String, StyleInfo> = HashMap::new();
    for template in data.styles {
        let mut info = StyleInfo::default();
        if let Some(packed) = template.foreground.as_deref().and_then(color_from_hex) {
            info.foreground = packed;
        }
        if let Some(packed) = template.background.as_deref().and_then(color_from_hex) {
            info.background = packed;
        }
        info.bold = template.bold.unwrap_or(false);
        info.italic = template.italic.unwrap_or(false);
        info.underline = template.underline.unwrap_or(false);
        info.eol_filled = template.eol_filled.unwrap_or(false);
        templates.insert(template.name, info);
    }

    for section in data.languages {
        let bindings = scheme.language_styles.entry(section.id).or_default();
        for binding in section.styles {
            // Both conditions must hold or the entry is dropped without
            // error: the id parses as an integer style id, and the
            // referenced template exists in this scheme.
            let Some(id) = numeric_style_id(&binding.id) else {
                continue;
            };
            let Some(style_ref) = binding.style_ref.as_deref() else {
                continue;
            };
            let Some(info) = templates.get(style_ref) else {
                continue;
            };
            bindings.insert(id, *info);
        }
    }

    scheme
}

fn numeric_style_id(value: &serde_yaml::Value) -> Option<u8> {
    match value {
        serde_yaml::Value::Number(n) => u8::try_from(n.as_u64()?).ok(),
        serde_yaml::Value::String(s) => s.trim().parse::<u8>().ok(),
        _ => None,
    }
}
