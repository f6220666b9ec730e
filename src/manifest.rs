//! Language-neutral definition manifests
//!
//! One TOML file describes one exchange and its literal vocabularies:
//!
//! ```toml
//! id = "preprocessor_status"
//! version = "1.0.0"
//! namespace = ["ebu_list", "definitions", "exchanges"]
//!
//! [exchange]
//! name = "ebu-list.preprocessor.status"
//! kind = "fanout"
//!
//! [[keys]]
//! ident = "announce"
//! value = "announce"
//!
//! [[vocabularies]]
//! key = "announce"
//! name = "stream_status"
//! literals = [{ ident = "started", value = "Started" }]
//! ```
//!
//! Files are checked against `schema/exchange-definition.schema.json` before
//! deserialization, then against the semantic rules in
//! [`ExchangeDefinition::validate`].

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use jsonschema::JSONSchema;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checksum::Checksum;
use crate::error::{DefinitionError, Result};
use crate::exchange::ExchangeInfo;

const DEFINITION_SCHEMA: &str = include_str!("../schema/exchange-definition.schema.json");

/// Keywords of the target languages, plus CommonJS module globals. None of
/// them can name a namespace, module or constant in every emitter.
const RESERVED_WORDS: &[&str] = &[
    // Rust
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
    // C++
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "case",
    "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const_cast", "consteval", "constexpr", "constinit", "co_await", "co_return", "co_yield",
    "decltype", "default", "delete", "double", "dynamic_cast", "explicit", "export", "float",
    "friend", "goto", "inline", "int", "long", "mutable", "namespace", "noexcept", "not",
    "not_eq", "nullptr", "operator", "or", "or_eq", "private", "protected", "public",
    "register", "reinterpret_cast", "requires", "short", "signed", "sizeof", "static_assert",
    "static_cast", "switch", "template", "this", "thread_local", "throw", "typedef", "typeid",
    "typename", "unsigned", "using", "void", "volatile", "wchar_t", "xor", "xor_eq",
    // JavaScript / TypeScript
    "arguments", "debugger", "declare", "eval", "exports", "extends", "finally", "function",
    "implements", "import", "instanceof", "interface", "module", "new", "null", "package",
    "require", "var", "with",
];

/// Names the emitters generate next to manifest identifiers
const SCAFFOLD_NAMES: &[&str] = &["keys", "info"];

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("identifier pattern compiles"))
}

/// A named literal: `ident` names the constant, `value` is what goes on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub ident: String,
    pub value: String,
}

impl Literal {
    pub fn new(ident: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            value: value.into(),
        }
    }
}

/// A closed, ordered set of literals carried under one routing key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Ident of the routing key this vocabulary belongs to
    pub key: String,
    pub name: String,
    pub literals: Vec<Literal>,
}

impl Vocabulary {
    /// `announce.stream_status`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.key, self.name)
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.literals.iter().map(|l| l.value.as_str())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.literals.iter().any(|l| l.value == value)
    }

    /// Decode a received value. Matching is exact: no case folding, no trimming.
    pub fn parse(&self, value: &str) -> Result<&Literal> {
        self.literals
            .iter()
            .find(|l| l.value == value)
            .ok_or_else(|| DefinitionError::UnknownLiteral {
                vocabulary: self.qualified_name(),
                value: value.to_string(),
            })
    }
}

/// One exchange, its routing keys and the vocabularies published under them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeDefinition {
    /// Logical identifier, also the module / namespace name in generated code
    pub id: String,
    pub version: Version,
    /// Enclosing namespace for languages that have one
    #[serde(default)]
    pub namespace: Vec<String>,
    pub exchange: ExchangeInfo,
    pub keys: Vec<Literal>,
    #[serde(default)]
    pub vocabularies: Vec<Vocabulary>,
}

impl ExchangeDefinition {
    /// Parse and validate a manifest. `source_name` is only used in errors.
    pub fn from_toml_str(source_name: &str, text: &str) -> Result<Self> {
        let document: serde_json::Value = toml::from_str(text)?;
        check_structure(source_name, &document)?;

        let definition: ExchangeDefinition =
            serde_json::from_value(document).map_err(|e| DefinitionError::InvalidManifest {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;
        definition.validate()?;

        debug!(
            id = %definition.id,
            exchange = %definition.exchange.name,
            source = source_name,
            "loaded exchange definition"
        );
        Ok(definition)
    }

    /// Read a single manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&path.display().to_string(), &text)
    }

    /// Read every `*.toml` manifest in a directory, in file-name order
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<Self>> {
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        paths.iter().map(Self::from_file).collect()
    }

    /// Semantic checks the JSON Schema cannot express
    pub fn validate(&self) -> Result<()> {
        let scope = format!("exchange definition {}", self.id);

        check_ident(&self.id, &scope)?;
        if self.id == "deep_freeze" {
            return Err(invalid_ident(&self.id, &scope, "clashes with the generated JavaScript helper"));
        }
        for segment in &self.namespace {
            check_ident(segment, &scope)?;
        }

        check_value(self.exchange.name(), &format!("{} exchange name", self.id))?;
        check_literals(&self.keys, &format!("{} keys", self.id))?;

        // Keys carrying vocabularies become modules / objects of their own
        for key in &self.keys {
            let has_vocabulary = self.vocabularies.iter().any(|v| v.key == key.ident);
            if has_vocabulary && SCAFFOLD_NAMES.contains(&key.ident.as_str()) {
                return Err(invalid_ident(
                    &key.ident,
                    &format!("{} keys", self.id),
                    "a key with vocabularies cannot share a name with generated items",
                ));
            }
        }

        let mut vocabulary_names = HashSet::new();
        for vocabulary in &self.vocabularies {
            let vocab_scope = format!("{} vocabulary {}", self.id, vocabulary.qualified_name());
            check_ident(&vocabulary.name, &vocab_scope)?;

            if self.key(&vocabulary.key).is_none() {
                return Err(DefinitionError::DanglingVocabulary {
                    exchange: self.id.clone(),
                    vocabulary: vocabulary.name.clone(),
                    key: vocabulary.key.clone(),
                });
            }
            if !vocabulary_names.insert(vocabulary.qualified_name()) {
                return Err(DefinitionError::Duplicate {
                    what: "vocabulary",
                    value: vocabulary.qualified_name(),
                    scope,
                });
            }
            check_literals(&vocabulary.literals, &vocab_scope)?;
        }

        Ok(())
    }

    /// Routing key by ident
    pub fn key(&self, ident: &str) -> Option<&Literal> {
        self.keys.iter().find(|k| k.ident == ident)
    }

    /// Whether `value` is one of this exchange's routing keys
    pub fn recognizes_key(&self, value: &str) -> bool {
        self.keys.iter().any(|k| k.value == value)
    }

    /// Checked routing-key lookup by value
    pub fn ensure_key(&self, value: &str) -> Result<&Literal> {
        self.keys
            .iter()
            .find(|k| k.value == value)
            .ok_or_else(|| DefinitionError::UnknownRoutingKey {
                exchange: self.exchange.name.to_string(),
                key: value.to_string(),
            })
    }

    /// Vocabulary by key ident and name
    pub fn vocabulary(&self, key: &str, name: &str) -> Option<&Vocabulary> {
        self.vocabularies
            .iter()
            .find(|v| v.key == key && v.name == name)
    }

    /// Every wire literal this definition declares: exchange name, exchange
    /// kind, routing keys and vocabulary values
    pub fn wire_literals(&self) -> Vec<&str> {
        let mut literals = vec![self.exchange.name(), self.exchange.kind.as_str()];
        literals.extend(self.keys.iter().map(|k| k.value.as_str()));
        for vocabulary in &self.vocabularies {
            literals.extend(vocabulary.values());
        }
        literals
    }

    /// Stable text form the fingerprint is computed over
    pub fn canonical_form(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "id={:?}", self.id);
        let _ = writeln!(out, "version={:?}", self.version.to_string());
        let _ = writeln!(out, "namespace={:?}", self.namespace);
        let _ = writeln!(
            out,
            "exchange={:?},{},{},{},{}",
            self.exchange.name,
            self.exchange.kind,
            self.exchange.durable,
            self.exchange.auto_delete,
            self.exchange.internal
        );
        for key in &self.keys {
            let _ = writeln!(out, "key={:?}={:?}", key.ident, key.value);
        }
        for vocabulary in &self.vocabularies {
            let _ = writeln!(out, "vocabulary={:?}", vocabulary.qualified_name());
            for literal in &vocabulary.literals {
                let _ = writeln!(out, "  {:?}={:?}", literal.ident, literal.value);
            }
        }
        out
    }

    pub fn fingerprint(&self) -> Checksum {
        Checksum::of_str(&self.canonical_form())
    }
}

fn check_structure(source_name: &str, document: &serde_json::Value) -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(DEFINITION_SCHEMA)?;
    let compiled = JSONSchema::compile(&schema).map_err(|e| DefinitionError::InvalidManifest {
        source_name: "exchange-definition.schema.json".to_string(),
        reason: e.to_string(),
    })?;

    let problems: Vec<String> = match compiled.validate(document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect(),
    };

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DefinitionError::InvalidManifest {
            source_name: source_name.to_string(),
            reason: problems.join("; "),
        })
    }
}

fn invalid_ident(ident: &str, scope: &str, reason: &'static str) -> DefinitionError {
    DefinitionError::InvalidIdentifier {
        ident: ident.to_string(),
        scope: scope.to_string(),
        reason,
    }
}

fn check_ident(ident: &str, scope: &str) -> Result<()> {
    if !identifier_pattern().is_match(ident) {
        return Err(invalid_ident(ident, scope, "expected lowercase snake_case"));
    }
    if RESERVED_WORDS.contains(&ident) {
        return Err(invalid_ident(ident, scope, "reserved word in a target language"));
    }
    Ok(())
}

/// Wire values are emitted verbatim inside string literals
fn check_value(value: &str, scope: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.chars().any(char::is_control) {
        "must not contain control characters"
    } else {
        return Ok(());
    };
    Err(DefinitionError::InvalidValue {
        value: value.to_string(),
        scope: scope.to_string(),
        reason,
    })
}

fn check_literals(literals: &[Literal], scope: &str) -> Result<()> {
    let mut idents = HashSet::new();
    let mut values = HashSet::new();

    for literal in literals {
        check_ident(&literal.ident, scope)?;
        // Rust copies already define `ALL` in every literal module
        if literal.ident == "all" {
            return Err(invalid_ident(&literal.ident, scope, "clashes with the generated ALL constant"));
        }
        check_value(&literal.value, scope)?;
        if !idents.insert(literal.ident.as_str()) {
            return Err(DefinitionError::Duplicate {
                what: "identifier",
                value: literal.ident.clone(),
                scope: scope.to_string(),
            });
        }
        if !values.insert(literal.value.as_str()) {
            return Err(DefinitionError::Duplicate {
                what: "literal",
                value: literal.value.clone(),
                scope: scope.to_string(),
            });
        }
    }
    Ok(())
}
