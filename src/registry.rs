//! Exchange Registry
//!
//! Read-only catalog of exchange definitions keyed by logical id. The
//! builtin registry is built once from the manifests embedded at compile
//! time; tooling can also build one from a directory of manifests.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use include_dir::{include_dir, Dir};
use tracing::debug;

use crate::checksum::Checksum;
use crate::error::{DefinitionError, Result};
use crate::manifest::ExchangeDefinition;

static EMBEDDED_DEFINITIONS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/definitions");

/// The exchange registry
#[derive(Debug, Clone)]
pub struct ExchangeRegistry {
    /// Definitions by id, ordered for stable iteration
    definitions: BTreeMap<String, ExchangeDefinition>,
    /// Exchange name -> definition id
    by_name: HashMap<String, String>,
}

impl ExchangeRegistry {
    /// Registry built from the manifests compiled into this crate.
    ///
    /// The embedded manifests are validated by this crate's tests, so a
    /// failure here means the crate itself was built from a broken manifest.
    pub fn builtin() -> &'static ExchangeRegistry {
        static BUILTIN: OnceLock<ExchangeRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_embedded().unwrap_or_else(|e| panic!("embedded exchange definitions are invalid: {e}"))
        })
    }

    /// Parse the embedded manifests
    pub fn from_embedded() -> Result<Self> {
        let mut definitions = Vec::new();
        let mut files: Vec<_> = EMBEDDED_DEFINITIONS
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort_by(|a, b| a.path().cmp(b.path()));

        for file in files {
            let source_name = file.path().display().to_string();
            let text = file.contents_utf8().ok_or_else(|| DefinitionError::InvalidManifest {
                source_name: source_name.clone(),
                reason: "not valid UTF-8".to_string(),
            })?;
            definitions.push(ExchangeDefinition::from_toml_str(&source_name, text)?);
        }

        Self::from_definitions(definitions)
    }

    /// Build a registry from every manifest in a directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_definitions(ExchangeDefinition::load_dir(dir)?)
    }

    /// Build a registry from already-parsed definitions.
    ///
    /// Ids and exchange names must be unique across the registry.
    pub fn from_definitions(definitions: impl IntoIterator<Item = ExchangeDefinition>) -> Result<Self> {
        let mut registry = Self {
            definitions: BTreeMap::new(),
            by_name: HashMap::new(),
        };

        for definition in definitions {
            definition.validate()?;

            if registry.definitions.contains_key(&definition.id) {
                return Err(DefinitionError::Duplicate {
                    what: "definition id",
                    value: definition.id,
                    scope: "registry".to_string(),
                });
            }
            let name = definition.exchange.name.to_string();
            if registry.by_name.contains_key(&name) {
                return Err(DefinitionError::Duplicate {
                    what: "exchange name",
                    value: name,
                    scope: "registry".to_string(),
                });
            }

            registry.by_name.insert(name, definition.id.clone());
            registry.definitions.insert(definition.id.clone(), definition);
        }

        debug!(count = registry.definitions.len(), "exchange registry ready");
        Ok(registry)
    }

    /// Merge another registry into this one, applying the same uniqueness rules
    pub fn merge(self, other: ExchangeRegistry) -> Result<Self> {
        Self::from_definitions(
            self.definitions
                .into_values()
                .chain(other.definitions.into_values()),
        )
    }

    /// Definition by logical id
    pub fn get(&self, id: &str) -> Option<&ExchangeDefinition> {
        self.definitions.get(id)
    }

    /// Definition by logical id, or a `NotFound` error
    pub fn require(&self, id: &str) -> Result<&ExchangeDefinition> {
        self.get(id)
            .ok_or_else(|| DefinitionError::NotFound(id.to_string()))
    }

    /// Definition by wire-level exchange name
    pub fn by_exchange_name(&self, name: &str) -> Option<&ExchangeDefinition> {
        self.by_name.get(name).and_then(|id| self.definitions.get(id))
    }

    /// All definitions, ordered by id
    pub fn definitions(&self) -> impl Iterator<Item = &ExchangeDefinition> {
        self.definitions.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Exchange names of every definition
    pub fn exchange_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.values().map(|d| d.exchange.name())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Id of the definition whose id or exchange name best matches `query`,
    /// for "did you mean" hints
    pub fn suggest(&self, query: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default();
        self.definitions
            .values()
            .filter_map(|d| {
                let by_id = matcher.fuzzy_match(&d.id, query);
                let by_name = matcher.fuzzy_match(d.exchange.name(), query);
                by_id.max(by_name).map(|score| (score, d.id.as_str()))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, id)| id)
    }

    /// Fingerprint over every definition, in id order
    pub fn fingerprint(&self) -> Checksum {
        let parts: Vec<Checksum> = self.definitions.values().map(|d| d.fingerprint()).collect();
        Checksum::combine(&parts)
    }
}
