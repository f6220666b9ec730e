//! Drift Regression Tests
//!
//! Generated copies written to a scratch tree, then edited by hand the way
//! copies drift in practice.

use std::fs;
use std::path::Path;

use exchange_definitions::drift::{check_target, check_targets, find_unmanaged_copies, Target, TargetStatus};
use exchange_definitions::{generate, ExchangeRegistry, Language, RenderProfile};

fn write_all_copies(dir: &Path) -> Vec<Target> {
    let registry = ExchangeRegistry::builtin();
    let definition = registry.get("preprocessor_status").unwrap();
    let profile = RenderProfile::default();

    Language::ALL
        .iter()
        .map(|&language| {
            let path = dir.join(language.as_str()).join(language.file_name(definition));
            generate(definition, language, &profile).write_to(&path).unwrap();
            Target::new(language, path, "preprocessor_status")
        })
        .collect()
}

#[test]
fn test_freshly_generated_tree_is_in_sync() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());

    let report = check_targets(ExchangeRegistry::builtin(), &targets, &RenderProfile::default()).unwrap();
    assert_eq!(report.in_sync_count(), Language::ALL.len());
    assert!(!report.has_drift());
    assert!(!report.has_missing());
}

#[test]
fn test_renamed_literal_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    let cpp = targets.iter().find(|t| t.language == Language::Cpp).unwrap();

    let text = fs::read_to_string(&cpp.path).unwrap();
    fs::write(&cpp.path, text.replace("\"Stopped\"", "\"Halted\"")).unwrap();

    let report = check_targets(ExchangeRegistry::builtin(), &targets, &RenderProfile::default()).unwrap();
    assert!(report.has_drift());
    assert_eq!(report.drifted().count(), 1);

    let drifted = report.drifted().next().unwrap();
    assert_eq!(drifted.target.language, Language::Cpp);
    match &drifted.status {
        TargetStatus::Drifted { literals, diff } => {
            assert_eq!(literals.missing, vec!["Stopped".to_string()]);
            assert_eq!(literals.unexpected, vec!["Halted".to_string()]);
            assert!(diff.contains("-        constexpr auto stopped = \"Halted\";"));
            assert!(diff.contains("+        constexpr auto stopped = \"Stopped\";"));
        }
        other => panic!("expected drift, got {:?}", other),
    }
}

#[test]
fn test_case_change_is_drift() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    let js = targets.iter().find(|t| t.language == Language::JavaScript).unwrap();

    let text = fs::read_to_string(&js.path).unwrap();
    fs::write(&js.path, text.replace("\"Started\"", "\"started\"")).unwrap();

    let report = check_target(ExchangeRegistry::builtin(), js, &RenderProfile::default()).unwrap();
    assert!(report.has_literal_drift());
}

#[test]
fn test_flipped_exchange_flag_is_not_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    let cpp = targets.iter().find(|t| t.language == Language::Cpp).unwrap();

    let text = fs::read_to_string(&cpp.path).unwrap();
    let edited = text.replace("\"fanout\", false, false, false", "\"fanout\", true, false, false");
    assert_ne!(text, edited);
    fs::write(&cpp.path, edited).unwrap();

    let report = check_target(ExchangeRegistry::builtin(), cpp, &RenderProfile::default()).unwrap();
    assert!(report.has_literal_drift());
}

#[test]
fn test_changed_rust_kind_is_not_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    let rust = targets.iter().find(|t| t.language == Language::Rust).unwrap();

    let text = fs::read_to_string(&rust.path).unwrap();
    let edited = text.replace("ExchangeKind::Fanout", "ExchangeKind::Direct");
    assert_ne!(text, edited);
    fs::write(&rust.path, edited).unwrap();

    let report = check_target(ExchangeRegistry::builtin(), rust, &RenderProfile::default()).unwrap();
    assert!(report.has_literal_drift());
}

#[test]
fn test_deleted_copy_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    let ts = targets.iter().find(|t| t.language == Language::TypeScript).unwrap();
    fs::remove_file(&ts.path).unwrap();

    let report = check_targets(ExchangeRegistry::builtin(), &targets, &RenderProfile::default()).unwrap();
    assert!(report.has_missing());
    assert_eq!(report.in_sync_count(), Language::ALL.len() - 1);
}

#[test]
fn test_regenerating_repairs_drift() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    let cpp = targets.iter().find(|t| t.language == Language::Cpp).unwrap();
    fs::write(&cpp.path, "// hand edited\n").unwrap();

    write_all_copies(dir.path());

    let report = check_target(ExchangeRegistry::builtin(), cpp, &RenderProfile::default()).unwrap();
    assert!(report.is_in_sync());
}

#[test]
fn test_hand_maintained_copy_is_found() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_all_copies(dir.path());
    fs::write(
        dir.path().join("legacy_constants.py"),
        "EXCHANGE = \"ebu-list.preprocessor.status\"\nSTARTED = \"Started\"\n",
    )
    .unwrap();

    let managed: Vec<_> = targets.iter().map(|t| t.path.clone()).collect();
    let copies = find_unmanaged_copies(dir.path(), ExchangeRegistry::builtin(), &managed, &[]).unwrap();

    assert_eq!(copies.len(), 1);
    assert!(copies[0].path.ends_with("legacy_constants.py"));
}
