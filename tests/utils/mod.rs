use kanatype::{ConversionEngine, RuleMetadata};
use std::path::Path;
use std::sync::Once;

pub static INIT_SYNC: Once = Once::new();

#[allow(dead_code)]
pub fn init_test_logger() {
    INIT_SYNC.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

///
/// assets/rules の default ルールのエンジン。
///
#[allow(dead_code)]
pub fn default_test_engine() -> ConversionEngine {
    let metadata = RuleMetadata::load_metadata_from_directory(Path::new("assets/rules")).unwrap();
    let rule = metadata.load_default_rule().unwrap();
    ConversionEngine::from_rule(&rule).unwrap()
}

#[allow(dead_code)]
pub fn transition_check(
    engine: &mut ConversionEngine,
    key_inputs: &str,
    expected_final: &str,
    expected_raw: &str,
) {
    engine.process_key_events_string(key_inputs).unwrap();
    let view = engine.view();
    assert_eq!(
        view.final_text(),
        expected_final,
        "(final == expected) failed for '{}'",
        key_inputs
    );
    assert_eq!(
        view.raw_text(),
        expected_raw,
        "(raw == expected) failed for '{}'",
        key_inputs
    );
    assert_eq!(
        view.committed().len(),
        view.raw().len(),
        "committed and raw out of step for '{}'",
        key_inputs
    );
}
