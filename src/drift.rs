//! Drift detection
//!
//! Compares language copies on disk against what the generators produce
//! from the manifests. A copy is in sync only if it is byte-identical to the
//! generated text; when it is not, the report says which wire literals went
//! missing or appeared, plus a unified diff for review.
//!
//! Hand-maintained copies that were never registered as targets are found
//! by walking a tree for string literals equal to a registered exchange name.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use similar::TextDiff;
use tracing::warn;

use crate::codegen::{generate, Language, RenderProfile};
use crate::error::{DefinitionError, Result};
use crate::registry::ExchangeRegistry;

fn string_literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""((?:[^"\\\r\n]|\\.)*)""#).expect("string literal pattern compiles")
    })
}

/// Every double-quoted string literal in `text`, unescaped
pub fn string_literals(text: &str) -> BTreeSet<String> {
    string_literal_pattern()
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| unescape(m.as_str()))
        .collect()
}

fn tuple_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(?:true|false)\b|\bExchangeKind::[A-Za-z]+").expect("tuple token pattern compiles")
    })
}

/// Flag and `ExchangeKind::` tokens outside string literals, in order.
///
/// C++, JavaScript and TypeScript copies spell the exchange flags as bare
/// booleans and Rust copies name the kind by variant, so neither shows up
/// among the string literals.
pub fn exchange_tuple_tokens(text: &str) -> Vec<String> {
    let code = string_literal_pattern().replace_all(text, "\"\"");
    tuple_token_pattern()
        .find_iter(&code)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A language copy that must stay in sync with one definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub language: Language,
    pub path: PathBuf,
    /// Definition id
    pub definition: String,
    /// Overrides the profile's crate path for Rust copies compiled into
    /// the crate that defines `ExchangeInfo`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rust_crate_path: Option<String>,
}

impl Target {
    pub fn new(language: Language, path: impl Into<PathBuf>, definition: impl Into<String>) -> Self {
        Self {
            language,
            path: path.into(),
            definition: definition.into(),
            rust_crate_path: None,
        }
    }

    /// Profile this target renders with
    pub fn render_profile(&self, base: &RenderProfile) -> RenderProfile {
        match &self.rust_crate_path {
            Some(path) => RenderProfile {
                rust_crate_path: path.clone(),
                ..base.clone()
            },
            None => base.clone(),
        }
    }
}

/// Exchange flags and kind tokens that disagree with the generated copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleDiff {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Semantic difference between a copy and its generated form: string
/// literals plus the exchange tuple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralDiff {
    /// In the generated copy, absent from the file on disk
    pub missing: Vec<String>,
    /// In the file on disk, absent from the generated copy
    pub unexpected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_tuple: Option<TupleDiff>,
}

impl LiteralDiff {
    pub fn between(expected: &str, actual: &str) -> Self {
        let expected_literals = string_literals(expected);
        let actual_literals = string_literals(actual);

        let expected_tokens = exchange_tuple_tokens(expected);
        let actual_tokens = exchange_tuple_tokens(actual);
        let exchange_tuple = (expected_tokens != actual_tokens).then(|| TupleDiff {
            expected: expected_tokens,
            actual: actual_tokens,
        });

        Self {
            missing: expected_literals.difference(&actual_literals).cloned().collect(),
            unexpected: actual_literals.difference(&expected_literals).cloned().collect(),
            exchange_tuple,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.exchange_tuple.is_none()
    }
}

/// State of one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    InSync,
    Missing,
    Drifted { literals: LiteralDiff, diff: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReport {
    #[serde(flatten)]
    pub target: Target,
    #[serde(flatten)]
    pub status: TargetStatus,
}

impl TargetReport {
    pub fn is_in_sync(&self) -> bool {
        matches!(self.status, TargetStatus::InSync)
    }

    /// Drifted in wire literals, not just formatting
    pub fn has_literal_drift(&self) -> bool {
        matches!(&self.status, TargetStatus::Drifted { literals, .. } if !literals.is_empty())
    }
}

/// A file outside the managed targets that mentions a registered exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmanagedCopy {
    pub path: PathBuf,
    pub exchange_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub generated_at: DateTime<Utc>,
    pub registry_fingerprint: String,
    pub targets: Vec<TargetReport>,
    pub unmanaged: Vec<UnmanagedCopy>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        self.targets.iter().any(|t| !t.is_in_sync())
    }

    pub fn has_missing(&self) -> bool {
        self.targets
            .iter()
            .any(|t| matches!(t.status, TargetStatus::Missing))
    }

    pub fn in_sync_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_in_sync()).count()
    }

    pub fn drifted(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets
            .iter()
            .filter(|t| matches!(t.status, TargetStatus::Drifted { .. }))
    }
}

/// Compare one target against its generated form
pub fn check_target(
    registry: &ExchangeRegistry,
    target: &Target,
    profile: &RenderProfile,
) -> Result<TargetReport> {
    let definition = registry.require(&target.definition)?;
    let expected = generate(definition, target.language, &target.render_profile(profile)).code;

    let status = match fs::read_to_string(&target.path) {
        Ok(actual) if actual == expected => TargetStatus::InSync,
        Ok(actual) => {
            let literals = LiteralDiff::between(&expected, &actual);
            let diff = TextDiff::from_lines(&actual, &expected)
                .unified_diff()
                .context_radius(3)
                .header(&target.path.display().to_string(), "generated")
                .to_string();
            warn!(
                path = %target.path.display(),
                missing = literals.missing.len(),
                unexpected = literals.unexpected.len(),
                tuple_changed = literals.exchange_tuple.is_some(),
                "language copy drifted from its definition"
            );
            TargetStatus::Drifted { literals, diff }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %target.path.display(), "language copy is missing");
            TargetStatus::Missing
        }
        Err(e) => return Err(DefinitionError::Io(e)),
    };

    Ok(TargetReport {
        target: target.clone(),
        status,
    })
}

/// Check every target; no unmanaged-copy scan
pub fn check_targets(
    registry: &ExchangeRegistry,
    targets: &[Target],
    profile: &RenderProfile,
) -> Result<DriftReport> {
    let reports = targets
        .iter()
        .map(|t| check_target(registry, t, profile))
        .collect::<Result<Vec<_>>>()?;

    Ok(DriftReport {
        generated_at: Utc::now(),
        registry_fingerprint: registry.fingerprint().to_string(),
        targets: reports,
        unmanaged: Vec::new(),
    })
}

/// Walk `root` for files holding a registered exchange name as a string
/// literal that are not among `managed`.
///
/// `.gitignore` rules apply; `ignore_globs` are extra gitignore-style
/// patterns relative to `root`.
pub fn find_unmanaged_copies(
    root: impl AsRef<Path>,
    registry: &ExchangeRegistry,
    managed: &[PathBuf],
    ignore_globs: &[String],
) -> Result<Vec<UnmanagedCopy>> {
    let root = root.as_ref();
    let managed: HashSet<PathBuf> = managed.iter().map(|p| normalize(p)).collect();
    let names: Vec<&str> = registry.exchange_names().collect();

    let mut overrides = OverrideBuilder::new(root);
    for glob in ignore_globs {
        overrides.add(&format!("!{}", glob))?;
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .filter_entry(|e| e.file_name() != ".git")
        .overrides(overrides.build()?)
        .build();

    let mut copies = Vec::new();
    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || managed.contains(&normalize(path)) {
            continue;
        }

        // Binary or unreadable files cannot hold a copy
        let Ok(text) = fs::read_to_string(path) else {
            continue;
        };
        let literals = string_literals(&text);
        let found: Vec<String> = names
            .iter()
            .filter(|name| literals.contains(**name))
            .map(|name| name.to_string())
            .collect();

        if !found.is_empty() {
            warn!(path = %path.display(), names = ?found, "found unmanaged copy");
            copies.push(UnmanagedCopy {
                path: path.to_path_buf(),
                exchange_names: found,
            });
        }
    }

    copies.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(copies)
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
