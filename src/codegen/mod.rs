//! Code Generation
//!
//! Emits one source file per exchange definition and target language.
//!
//! Architecture:
//! - ExchangeDefinition: validated manifest, the only input
//! - RenderProfile: per-deployment settings (crate path, C++ include, ...)
//! - Emitters: one module per language, pure functions from definition to text
//!
//! Output is deterministic: no timestamps, no map iteration. The same
//! definition always produces the same bytes, which is what the drift
//! check relies on.

pub mod cpp;
pub mod javascript;
pub mod names;
pub mod rust;
pub mod typescript;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checksum::Checksum;
use crate::error::Result;
use crate::manifest::{ExchangeDefinition, Literal, Vocabulary};

// =============================================================================
// Language
// =============================================================================

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Cpp,
    JavaScript,
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Rust,
        Language::Cpp,
        Language::JavaScript,
        Language::TypeScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Cpp => "cpp",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Language::Rust => "rs",
            Language::Cpp => "h",
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
        }
    }

    /// Line comment used for the generated header
    fn header_prefix(&self) -> &'static str {
        match self {
            Language::Rust => "//!",
            Language::Cpp | Language::JavaScript | Language::TypeScript => "//",
        }
    }

    /// Default file name for a definition's copy in this language
    pub fn file_name(&self, definition: &ExchangeDefinition) -> String {
        format!("{}.{}", definition.id, self.extension())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Language::Rust),
            "cpp" | "c++" | "h" => Ok(Language::Cpp),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            other => Err(format!(
                "unknown language '{}' (expected rust, cpp, javascript or typescript)",
                other
            )),
        }
    }
}

// =============================================================================
// Render Profile
// =============================================================================

/// Deployment-specific rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderProfile {
    /// Path that `ExchangeInfo` / `ExchangeKind` are imported from in Rust copies
    pub rust_crate_path: String,
    /// Header providing the C++ exchange_info type
    pub cpp_include: String,
    /// Fully qualified C++ exchange_info type
    pub cpp_exchange_info: String,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self {
            rust_crate_path: "exchange_definitions".to_string(),
            cpp_include: "bisect/bimo/mq/common.h".to_string(),
            cpp_exchange_info: "bisect::bimo::mq::exchange_info".to_string(),
        }
    }
}

impl RenderProfile {
    /// Profile for copies compiled into this crate
    pub fn in_crate() -> Self {
        Self {
            rust_crate_path: "crate".to_string(),
            ..Self::default()
        }
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// One generated language copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCopy {
    pub definition_id: String,
    pub language: Language,
    pub fingerprint: Checksum,
    pub code: String,
}

impl GeneratedCopy {
    /// Write the copy unless the file already holds exactly this content.
    ///
    /// Returns whether the file was written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if let Ok(existing) = fs::read_to_string(path) {
            if existing == self.code {
                return Ok(false);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.code)?;
        info!(
            definition = %self.definition_id,
            language = %self.language,
            path = %path.display(),
            "wrote generated copy"
        );
        Ok(true)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Generate one language copy of a definition
pub fn generate(definition: &ExchangeDefinition, language: Language, profile: &RenderProfile) -> GeneratedCopy {
    let mut code = header(definition, language);
    code.push('\n');

    let body = match language {
        Language::Rust => rust::emit(definition, profile),
        Language::Cpp => cpp::emit(definition, profile),
        Language::JavaScript => javascript::emit(definition),
        Language::TypeScript => typescript::emit(definition),
    };
    code.push_str(&body);

    GeneratedCopy {
        definition_id: definition.id.clone(),
        language,
        fingerprint: definition.fingerprint(),
        code,
    }
}

/// Generate every language copy of every definition
pub fn generate_all<'a>(
    definitions: impl IntoIterator<Item = &'a ExchangeDefinition>,
    profile: &RenderProfile,
) -> Vec<GeneratedCopy> {
    definitions
        .into_iter()
        .flat_map(|d| Language::ALL.iter().map(move |&lang| generate(d, lang, profile)))
        .collect()
}

fn header(definition: &ExchangeDefinition, language: Language) -> String {
    let prefix = language.header_prefix();
    let lines = [
        format!(
            "Generated from exchange definition `{}` v{} - DO NOT EDIT",
            definition.id, definition.version
        ),
        String::new(),
        format!(
            "Exchange `{}` ({}).",
            definition.exchange.name, definition.exchange.kind
        ),
        format!("Fingerprint: {}", definition.fingerprint()),
        "Regenerate with `exchange-defs generate`.".to_string(),
    ];

    let mut out = String::new();
    for line in lines {
        if line.is_empty() {
            out.push_str(prefix);
        } else {
            out.push_str(prefix);
            out.push(' ');
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

/// Double-quoted string literal, valid in every target language
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Vocabularies grouped under the routing key they belong to, in key order
pub(crate) fn vocabularies_by_key(definition: &ExchangeDefinition) -> Vec<(&Literal, Vec<&Vocabulary>)> {
    definition
        .keys
        .iter()
        .map(|key| {
            let vocabularies = definition
                .vocabularies
                .iter()
                .filter(|v| v.key == key.ident)
                .collect::<Vec<_>>();
            (key, vocabularies)
        })
        .filter(|(_, vocabularies)| !vocabularies.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::exchange::{ExchangeInfo, ExchangeKind};
    use semver::Version;

    pub(crate) fn sample_definition() -> ExchangeDefinition {
        ExchangeDefinition {
            id: "preprocessor_status".to_string(),
            version: Version::new(1, 0, 0),
            namespace: vec![
                "ebu_list".to_string(),
                "definitions".to_string(),
                "exchanges".to_string(),
            ],
            exchange: ExchangeInfo::new(
                "ebu-list.preprocessor.status",
                ExchangeKind::Fanout,
                false,
                false,
                false,
            ),
            keys: vec![Literal::new("announce", "announce")],
            vocabularies: vec![Vocabulary {
                key: "announce".to_string(),
                name: "stream_status".to_string(),
                literals: vec![
                    Literal::new("started", "Started"),
                    Literal::new("stopped", "Stopped"),
                    Literal::new("failed", "Failed"),
                ],
            }],
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("rust".parse::<Language>().unwrap(), Language::Rust);
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("ts".parse::<Language>().unwrap(), Language::TypeScript);
        assert!("python".parse::<Language>().is_err());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let definition = sample_definition();
        let profile = RenderProfile::default();
        for language in Language::ALL {
            let first = generate(&definition, language, &profile);
            let second = generate(&definition, language, &profile);
            assert_eq!(first.code, second.code, "{} output differs between runs", language);
        }
    }

    #[test]
    fn test_header_carries_fingerprint() {
        let definition = sample_definition();
        let copy = generate(&definition, Language::Cpp, &RenderProfile::default());
        assert!(copy.code.starts_with(
            "// Generated from exchange definition `preprocessor_status` v1.0.0 - DO NOT EDIT\n//\n"
        ));
        assert!(copy
            .code
            .contains(&format!("// Fingerprint: {}\n", definition.fingerprint())));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("Started"), "\"Started\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_generate_all_covers_every_language() {
        let definition = sample_definition();
        let copies = generate_all([&definition], &RenderProfile::default());
        assert_eq!(copies.len(), Language::ALL.len());
    }

    #[test]
    fn test_write_to_skips_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/preprocessor_status.h");
        let copy = generate(&sample_definition(), Language::Cpp, &RenderProfile::default());

        assert!(copy.write_to(&path).unwrap());
        assert!(!copy.write_to(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), copy.code);
    }
}
