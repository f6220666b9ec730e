//! Cross-Copy Contract Tests
//!
//! Every checked-in language copy must carry exactly the literals of the
//! manifest it was generated from, and the compiled-in Rust constants must
//! agree with the embedded registry.

use std::fs;
use std::path::{Path, PathBuf};

use exchange_definitions::definitions::preprocessor_status;
use exchange_definitions::drift::{check_targets, string_literals, Target};
use exchange_definitions::{
    generate, ClosedVocabulary, DefinitionsConfig, ExchangeDefinition, ExchangeRegistry, Language,
    PreprocessorStatusKey, RenderProfile, StreamStatus,
};

fn root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn definition() -> &'static ExchangeDefinition {
    ExchangeRegistry::builtin().get("preprocessor_status").unwrap()
}

/// Targets from the checked-in exchanges.toml, with absolute paths
fn checked_in_targets() -> (DefinitionsConfig, Vec<Target>) {
    let config = DefinitionsConfig::from_file(root().join("exchanges.toml")).unwrap();
    let targets = config
        .targets
        .iter()
        .map(|t| Target {
            path: root().join(&t.path),
            ..t.clone()
        })
        .collect();
    (config, targets)
}

/// Wire literals expected as string literals in a copy. Rust copies name the
/// exchange kind by enum variant instead.
fn expected_literals(definition: &ExchangeDefinition, language: Language) -> Vec<&str> {
    definition
        .wire_literals()
        .into_iter()
        .filter(|v| language != Language::Rust || *v != definition.exchange.kind.as_str())
        .collect()
}

fn copy_path(language: Language) -> PathBuf {
    let (_, targets) = checked_in_targets();
    targets
        .into_iter()
        .find(|t| t.language == language)
        .map(|t| t.path)
        .unwrap_or_else(|| panic!("no {} target configured", language))
}

// =============================================================================
// Checked-in copies
// =============================================================================

#[test]
fn test_every_language_has_a_target() {
    let (_, targets) = checked_in_targets();
    for language in Language::ALL {
        assert!(
            targets.iter().any(|t| t.language == language),
            "no {} copy is kept in sync",
            language
        );
    }
}

#[test]
fn test_checked_in_copies_match_generated_output() {
    let (config, targets) = checked_in_targets();
    let report = check_targets(ExchangeRegistry::builtin(), &targets, &config.render).unwrap();

    for target in &report.targets {
        assert!(
            target.is_in_sync(),
            "{} drifted: {:?}",
            target.target.path.display(),
            target.status
        );
    }
    assert!(!report.has_drift());
}

#[test]
fn test_every_copy_carries_every_wire_literal() {
    let definition = definition();
    for language in Language::ALL {
        let text = fs::read_to_string(copy_path(language)).unwrap();
        let literals = string_literals(&text);
        for value in expected_literals(definition, language) {
            assert!(
                literals.contains(value),
                "{} copy is missing {:?}",
                language,
                value
            );
        }
    }
}

#[test]
fn test_copies_agree_on_vocabulary_literals() {
    let definition = definition();
    let vocabulary = definition.vocabulary("announce", "stream_status").unwrap();

    let per_language: Vec<_> = Language::ALL
        .iter()
        .map(|&language| {
            let literals = string_literals(&fs::read_to_string(copy_path(language)).unwrap());
            vocabulary
                .values()
                .filter(|v| literals.contains(*v))
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    for found in &per_language {
        assert_eq!(found, &per_language[0]);
    }
    assert_eq!(per_language[0], vec!["Started", "Stopped", "Failed"]);
}

#[test]
fn test_copies_carry_the_definition_fingerprint() {
    let fingerprint = definition().fingerprint();
    for language in Language::ALL {
        let text = fs::read_to_string(copy_path(language)).unwrap();
        assert!(
            text.contains(&format!("Fingerprint: {}", fingerprint)),
            "{} copy was generated from a different definition",
            language
        );
    }
}

#[test]
fn test_every_emitter_keeps_every_literal() {
    let definition = definition();
    let profile = RenderProfile::default();
    for language in Language::ALL {
        let expected: std::collections::BTreeSet<String> = expected_literals(definition, language)
            .into_iter()
            .map(str::to_string)
            .collect();
        let literals = string_literals(&generate(definition, language, &profile).code);
        assert!(literals.is_superset(&expected), "{} emitter dropped a literal", language);
    }
}

// =============================================================================
// Compiled-in constants
// =============================================================================

#[test]
fn test_rust_constants_match_registry() {
    let definition = definition();

    assert_eq!(preprocessor_status::INFO, definition.exchange);
    assert_eq!(preprocessor_status::INFO.name(), "ebu-list.preprocessor.status");
    assert_eq!(
        preprocessor_status::keys::ALL.to_vec(),
        definition.keys.iter().map(|k| k.value.as_str()).collect::<Vec<_>>()
    );
    assert_eq!(
        preprocessor_status::announce::stream_status::ALL.to_vec(),
        definition
            .vocabulary("announce", "stream_status")
            .unwrap()
            .values()
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_typed_vocabularies_match_registry() {
    let definition = definition();
    let statuses: Vec<&str> = StreamStatus::ALL.iter().map(|s| s.as_str()).collect();
    let vocabulary = definition.vocabulary("announce", "stream_status").unwrap();
    assert_eq!(statuses, vocabulary.values().collect::<Vec<_>>());

    for key in PreprocessorStatusKey::ALL {
        assert!(definition.recognizes_key(key.as_str()));
    }
}

#[test]
fn test_producer_keys_are_recognized_by_consumers() {
    // Consumers only see what the registry declares; every key a producer
    // can publish must be among them
    let definition = definition();
    for key in preprocessor_status::keys::ALL {
        assert!(definition.ensure_key(key).is_ok(), "{key:?} is not a declared routing key");
    }
    assert!(definition.ensure_key("Announce").is_err());
}

#[test]
fn test_manifest_on_disk_matches_embedded_registry() {
    let on_disk = ExchangeRegistry::from_dir(root().join("definitions")).unwrap();
    assert_eq!(on_disk.fingerprint(), ExchangeRegistry::builtin().fingerprint());
}
