mod utils;

use crate::utils::{default_test_engine, init_test_logger, transition_check};
use kanatype::{ConversionEngine, InputMode, KeySymbol};
use xkbcommon::xkb::{keysyms, Keysym};

fn latin_engine() -> ConversionEngine {
    let mut engine = default_test_engine();
    engine.set_latin_mode(true);
    engine
}

#[test]
fn latin_commits_each_key() {
    init_test_logger();
    let mut engine = latin_engine();
    assert_eq!(InputMode::Latin, engine.input_mode());
    transition_check(&mut engine, "S-h", "H", "H");
    assert_eq!("", engine.view().pending());
    transition_check(&mut engine, "i", "Hi", "Hi");
    assert_eq!(vec!["H", "i"], engine.view().committed());
}

#[test]
fn caps_lock_inverts_case() {
    let mut engine = latin_engine();
    transition_check(&mut engine, "(capslock h) (capslock shift i)", "Hi", "Hi");
}

#[test]
fn caps_lock_ignored_when_disabled() {
    let mut engine = latin_engine();
    engine.set_caps_lock_affects_case(false);
    transition_check(&mut engine, "(capslock h) (capslock shift i)", "hI", "hI");
}

#[test]
fn capital_keysym_from_host() {
    let mut engine = latin_engine();
    engine.apply_key(&KeySymbol::new(Keysym::from(keysyms::KEY_H), true, false));
    engine.apply_key(&KeySymbol::new(Keysym::from(keysyms::KEY_i), false, false));
    assert_eq!("Hi", engine.final_text());
}

#[test]
fn symbols() {
    let mut engine = latin_engine();
    transition_check(&mut engine, "1 S-1 space comma S-3", "1! ,#", "1! ,#");
    engine.clear();
    transition_check(&mut engine, "apostrophe S-apostrophe minus S-minus", "'\"-_", "'\"-_");
}

#[test]
fn unmapped_key() {
    let mut engine = latin_engine();
    transition_check(&mut engine, "a F1", "a", "a");
    assert_eq!("", engine.last_accepted_char());
    assert_eq!(
        Some(&KeySymbol::from_string_representation("F1").unwrap()),
        engine.last_event()
    );
}

#[test]
fn latin_takes_precedence_over_direct_kana() {
    let mut engine = latin_engine();
    engine.set_direct_kana_mode(true);
    assert_eq!(InputMode::Latin, engine.input_mode());
    transition_check(&mut engine, "t", "t", "t");
}
