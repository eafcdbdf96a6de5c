mod utils;

use crate::utils::{default_test_engine, init_test_logger, transition_check};
use kanatype::{ConversionEngine, InputMode, KanaTypeError, KeySymbol, RuleMetadata};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CUSTOM_RULE: &str = r#"
[tables]
key_to_latin = "keys.csv"
latin_to_kana = "kana.csv"
key_to_kana_mid = "keys.csv"
kana_mid_to_kana = "kana.csv"

[engine]
latin_mode = false
backspace_enabled = false

[engine.romanized]
geminate_marker = "ッ"
"#;

fn write_custom_rule(latin_to_kana: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("metadata.toml"),
        "[custom]\nname = \"custom\"\ndescription = \"test\"\npath = \"custom\"\n",
    )
    .unwrap();
    let rule_dir = dir.path().join("custom");
    fs::create_dir(&rule_dir).unwrap();
    fs::write(rule_dir.join("rule.toml"), CUSTOM_RULE).unwrap();
    fs::write(
        rule_dir.join("keys.csv"),
        "k,k,0,0\na,a,0,0\nt,t,0,0\ne,e,0,0\n",
    )
    .unwrap();
    fs::write(rule_dir.join("kana.csv"), latin_to_kana).unwrap();
    dir
}

#[test]
fn default_rule_tables() {
    init_test_logger();
    let engine = default_test_engine();
    let tables = engine.tables();
    assert_eq!(Some("shi"), tables.kana_to_latin("し"));
    assert_eq!(Some("chi"), tables.kana_to_latin("ち"));
    assert_eq!(Some("nn"), tables.kana_to_latin("ん"));
    assert_eq!(Some("か゛"), tables.kana_to_kana_mid("が"));
    assert_eq!(4, tables.latin_to_kana().max_source_length());
    assert_eq!(2, tables.kana_mid_to_kana().max_source_length());
    assert_eq!(
        Some(&KeySymbol::from_string_representation("bracketleft").unwrap()),
        tables.key_to_kana_mid().key_for('゛')
    );
}

#[test]
fn default_rule_engine_config() {
    let engine = default_test_engine();
    assert_eq!(InputMode::Romanized, engine.input_mode());
    assert!(engine.is_backspace_enabled());
    assert!(engine.is_caps_lock_affects_case());
}

#[test]
fn custom_rule_directory() {
    let dir = write_custom_rule("ka,カ\nte,テ\n");
    let metadata = RuleMetadata::load_metadata_from_directory(dir.path()).unwrap();
    assert_eq!("custom", metadata.get_rule_list()["custom"].name);
    let rule = metadata.load_rule("custom").unwrap();
    let mut engine = ConversionEngine::from_rule(&rule).unwrap();

    assert!(!engine.is_backspace_enabled());
    transition_check(&mut engine, "k a t t e", "カッテ", "katte");
    transition_check(&mut engine, "BackSpace", "カッテ", "katte");
}

#[test]
fn malformed_table_reports_line() {
    let dir = write_custom_rule("ka,カ\n# comment\nte\n");
    let metadata = RuleMetadata::load_metadata_from_directory(dir.path()).unwrap();
    let rule = metadata.load_rule("custom").unwrap();
    let result = ConversionEngine::from_rule(&rule);
    assert!(matches!(
        result,
        Err(KanaTypeError::TableError { line: 3, .. })
    ));
}

#[test]
fn missing_metadata() {
    let dir = TempDir::new().unwrap();
    let result = RuleMetadata::load_metadata_from_directory(dir.path());
    assert!(matches!(result, Err(KanaTypeError::IoError(_))));
    let result = RuleMetadata::load_metadata_from_directory(Path::new("no/such/dir"));
    assert!(result.is_err());
}
