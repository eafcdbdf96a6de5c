use crate::rule::RuleMetadata;
use crate::{ConversionEngine, KeySymbol, TableSet};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_uint};
use std::path::Path;
use std::ptr;
use std::sync::Arc;
use xkbcommon::xkb::Keysym;

///
/// 複数のエンジンで共有するテーブル一式。
///
pub struct KanaTypeTableSetFfi {
    tables: Arc<TableSet>,
}

///
/// rule_directory以下のmetadata.tomlからrule_idのルールを探し、そのテーブル一式を読む。
/// rule_directoryがNULLの場合はXDGのデータディレクトリから探す。
/// 失敗時にはNULLを返す。
///
/// # Safety
/// rule_directory (NULLでない場合) と rule_id は\0終端の有効なC文字列でなければならない。
///
/// 返り値はkt_table_set_freeで解放しないとメモリリークする。
///
#[no_mangle]
pub unsafe extern "C" fn kt_table_set_new(
    rule_directory: *const c_char,
    rule_id: *const c_char,
) -> *mut KanaTypeTableSetFfi {
    let maybe_tables = (|| -> anyhow::Result<KanaTypeTableSetFfi> {
        let metadata = if rule_directory.is_null() {
            RuleMetadata::load_metadata()?
        } else {
            let directory = CStr::from_ptr(rule_directory).to_str()?;
            RuleMetadata::load_metadata_from_directory(Path::new(directory))?
        };
        let rule_id = CStr::from_ptr(rule_id).to_str()?;
        let rule = metadata.load_rule(rule_id)?;
        Ok(KanaTypeTableSetFfi {
            tables: Arc::new(TableSet::from_rule(&rule)?),
        })
    })();

    if let Ok(tables) = maybe_tables {
        Box::into_raw(Box::new(tables))
    } else {
        ptr::null_mut()
    }
}

///
/// テーブル一式を解放する。このテーブルで作ったエンジンは引き続き使える。
///
/// # Safety
/// table_set must be a pointer created by kt_table_set_new and not freed yet.
///
#[no_mangle]
pub unsafe extern "C" fn kt_table_set_free(table_set: *mut KanaTypeTableSetFfi) {
    if table_set.is_null() {
        return;
    }
    drop(Box::from_raw(table_set));
}

///
/// 新しいエンジンを作る。
///
/// # Safety
/// table_set must be a valid pointer created by kt_table_set_new.
/// 返り値はkt_engine_freeで解放しないとメモリリークする。
///
#[no_mangle]
pub unsafe extern "C" fn kt_engine_new(table_set: *const KanaTypeTableSetFfi) -> *mut ConversionEngine {
    if table_set.is_null() {
        return ptr::null_mut();
    }
    let tables = Arc::clone(&(*table_set).tables);
    Box::into_raw(Box::new(ConversionEngine::new(tables)))
}

///
/// エンジンを解放する。
///
/// # Safety
/// engine must be a pointer created by kt_engine_new and not freed yet.
///
#[no_mangle]
pub unsafe extern "C" fn kt_engine_free(engine: *mut ConversionEngine) {
    if engine.is_null() {
        return;
    }
    drop(Box::from_raw(engine));
}

///
/// 1打鍵を処理する。keysymはxkbのkeysym。0 (NoSymbol) は無視される。
///
#[no_mangle]
pub extern "C" fn kt_engine_apply_key(
    engine: &mut ConversionEngine,
    keysym: c_uint,
    shift: bool,
    function: bool,
    caps_lock: bool,
) {
    let key = KeySymbol::with_caps_lock(Keysym::from(keysym), shift, function, caps_lock);
    engine.apply_key(&key);
}

/// Only for library test purpose.
/// Returns false when the key string cannot be parsed.
///
/// # Safety
/// key_events must be a valid C string terminated by a NULL.
#[no_mangle]
pub unsafe extern "C" fn kt_engine_process_key_events(
    engine: &mut ConversionEngine,
    key_events: *const c_char,
) -> bool {
    let maybe_result = (|| -> anyhow::Result<()> {
        let key_events = CStr::from_ptr(key_events).to_str()?;
        engine.process_key_events_string(key_events)?;
        Ok(())
    })();

    maybe_result.is_ok()
}

#[no_mangle]
pub extern "C" fn kt_engine_clear(engine: &mut ConversionEngine) {
    engine.clear();
}

///
/// 生成された文字列を返す。
/// 失敗時にはNULLを返す。
///
/// # Safety
/// 返り値はcallerがkt_free_stringしないとメモリリークする。
///
#[no_mangle]
pub extern "C" fn kt_engine_get_final_text(engine: &ConversionEngine) -> *mut c_char {
    into_c_string(engine.final_text())
}

///
/// 生成された、変換される前の文字列を返す。
/// 失敗時にはNULLを返す。
///
/// # Safety
/// 返り値はcallerがkt_free_stringしないとメモリリークする。
///
#[no_mangle]
pub extern "C" fn kt_engine_get_raw_text(engine: &ConversionEngine) -> *mut c_char {
    into_c_string(engine.raw_text())
}

///
/// 前回入力された文字を返す。
///
/// # Safety
/// 返り値はcallerがkt_free_stringしないとメモリリークする。
///
#[no_mangle]
pub extern "C" fn kt_engine_get_last_accepted_char(engine: &ConversionEngine) -> *mut c_char {
    into_c_string(engine.last_accepted_char().to_owned())
}

///
/// 英字入力モードを設定する。
///
#[no_mangle]
pub extern "C" fn kt_engine_set_latin_mode(engine: &mut ConversionEngine, latin_mode: bool) {
    engine.set_latin_mode(latin_mode);
}

///
/// かな入力モードを設定する。
///
#[no_mangle]
pub extern "C" fn kt_engine_set_direct_kana_mode(
    engine: &mut ConversionEngine,
    direct_kana_mode: bool,
) {
    engine.set_direct_kana_mode(direct_kana_mode);
}

#[no_mangle]
pub extern "C" fn kt_engine_set_backspace_enabled(
    engine: &mut ConversionEngine,
    backspace_enabled: bool,
) {
    engine.set_backspace_enabled(backspace_enabled);
}

#[no_mangle]
pub extern "C" fn kt_engine_set_caps_lock_affects_case(
    engine: &mut ConversionEngine,
    caps_lock_affects_case: bool,
) {
    engine.set_caps_lock_affects_case(caps_lock_affects_case);
}

///
/// このライブラリが返したC言語文字列をfreeする。
///
/// # Safety
///
/// このライブラリで返したC言語文字列のポインタ以外を引数に渡してはいけない。
///
#[no_mangle]
pub unsafe extern "C" fn kt_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // Get back ownership in Rust side, then drop.
    drop(CString::from_raw(ptr));
}

fn into_c_string(string: String) -> *mut c_char {
    // 内部に\0を含む文字列はテーブル次第で作れてしまうのでNULLで返す
    let maybe_result = (|| -> anyhow::Result<CString> { Ok(CString::new(string)?) })();

    if let Ok(result) = maybe_result {
        result.into_raw()
    } else {
        ptr::null_mut()
    }
}
