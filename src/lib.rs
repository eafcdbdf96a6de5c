//!
//! キーボードの入力から文字列生成をエミュレートするライブラリ。
//!
//! ホストはキー入力を[KeySymbol]にして1打鍵ごとに[ConversionEngine::apply_key]を呼び、
//! [ConversionEngine::view]で生成された文字列を読む。
//!
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate enum_display_derive;
extern crate sequence_trie;
extern crate xkbcommon;

#[cfg(feature = "capi")]
pub mod capi;
pub mod config;
mod conversion_table;
mod engine_state;
pub mod error;
pub mod input_mode;
mod key_table;
pub mod keyevent;
mod result_view;
pub mod rule;
mod table_loader;
mod table_parser;
mod table_set;

use std::sync::Arc;

use log::{debug, trace};

pub use crate::config::{EngineConfig, RomanizedRules};
pub use crate::conversion_table::ConversionTable;
use crate::engine_state::EngineState;
pub use crate::error::KanaTypeError;
pub use crate::input_mode::InputMode;
pub use crate::key_table::KeyTable;
pub use crate::keyevent::{KeyModifier, KeySymbol};
pub use crate::result_view::ResultView;
pub use crate::rule::{Rule, RuleMetadata, RuleMetadataEntry};
pub use crate::table_loader::{load_conversion_table, load_key_table};
pub use crate::table_set::TableSet;

///
/// 1打鍵ずつ入力を受け取り、確定済み文字列と未確定の入力を管理する。
///
/// 1つの入力セッションに1つ作る。テーブルは複数のエンジンで共有できる。
///
#[derive(Debug)]
pub struct ConversionEngine {
    state: EngineState,
    tables: Arc<TableSet>,
    romanized_rules: RomanizedRules,
}

impl ConversionEngine {
    pub fn new(tables: Arc<TableSet>) -> Self {
        Self::with_config(tables, EngineConfig::default())
    }

    pub fn with_config(tables: Arc<TableSet>, config: EngineConfig) -> Self {
        Self {
            state: EngineState::new(
                config.latin_mode,
                config.direct_kana_mode,
                config.backspace_enabled,
                config.caps_lock_affects_case,
            ),
            tables,
            romanized_rules: config.romanized,
        }
    }

    /// Load the tables of the rule and start with its engine settings.
    pub fn from_rule(rule: &Rule) -> Result<Self, KanaTypeError> {
        let tables = TableSet::from_rule(rule)?;
        Ok(Self::with_config(
            Arc::new(tables),
            rule.engine_config().clone(),
        ))
    }

    ///
    /// 入力された文字列を全てクリアする。モードの設定はそのまま。
    ///
    pub fn clear(&mut self) {
        self.state.clear();
    }

    ///
    /// キー入力を1つ処理する。
    ///
    pub fn apply_key(&mut self, key: &KeySymbol) {
        if key.is_none() {
            // IMEによって1回のキー入力で2回呼ばれるので、2回目は何も更新しない
            return;
        }
        debug!("Apply {:?} in {}", key, self.input_mode());
        self.state.last_event = Some(*key);

        if key.is_backspace() {
            self.undo();
            self.state.last_accepted.clear();
            return;
        }

        match self.input_mode() {
            InputMode::Latin => self.apply_latin(key),
            InputMode::DirectKana => self.apply_direct_kana(key),
            InputMode::Romanized => self.apply_romanized(key),
        }
    }

    ///
    /// space区切りのキー列を順に処理する。テストやC APIから使う。
    ///
    pub fn process_key_events_string(&mut self, key_events: &str) -> Result<(), KanaTypeError> {
        let key_symbols = KeySymbol::deserialize_seq(key_events)?;
        for key_symbol in key_symbols {
            self.apply_key(&key_symbol);
        }
        Ok(())
    }

    ///
    /// BackSpace 1打鍵分を取り消す。backspace_enabledがfalseなら何もしない。
    ///
    pub fn undo(&mut self) {
        self.state.undo();
    }

    fn apply_latin(&mut self, key: &KeySymbol) {
        let caps_lock_affects_case = self.state.caps_lock_affects_case;
        match self.tables.key_to_latin().convert(key, caps_lock_affects_case) {
            None => self.state.last_accepted.clear(),
            Some(latin) => {
                let latin = latin.to_string();
                self.state.commit(&latin, &latin);
                self.state.last_accepted = latin;
            }
        }
    }

    fn apply_direct_kana(&mut self, key: &KeySymbol) {
        // かな入力はCapsLockの影響を受けない
        match self.tables.key_to_kana_mid().convert(key, false) {
            None => self.state.last_accepted.clear(),
            Some(kana_mid) => {
                self.state.pending.push(kana_mid);
                self.state.last_accepted = kana_mid.to_string();
                drain(&mut self.state, self.tables.kana_mid_to_kana());
            }
        }
    }

    fn apply_romanized(&mut self, key: &KeySymbol) {
        let caps_lock_affects_case = self.state.caps_lock_affects_case;
        match self.tables.key_to_latin().convert(key, caps_lock_affects_case) {
            None => self.state.last_accepted.clear(),
            Some(latin) => {
                self.state.pending.push(latin);
                self.state.last_accepted = latin.to_string();
                let table = self.tables.latin_to_kana();
                apply_romanized_rules(&mut self.state, table, &self.romanized_rules);
                drain(&mut self.state, table);
            }
        }
    }

    ///
    /// 英字入力モードを切り替える。
    /// trueにする時、変換途中の入力はそのままの状態で確定し、その文字列を返す。
    ///
    pub fn set_latin_mode(&mut self, latin_mode: bool) -> String {
        self.state.latin_mode = latin_mode;
        if latin_mode {
            let flushed = self.state.flush_pending();
            debug!("Latin mode on. Flushed {flushed:?}");
            flushed
        } else {
            String::new()
        }
    }

    ///
    /// かなを直接入力する方式を使うかを切り替える。
    /// 変換途中の入力はそのままの状態で確定し、その文字列を返す。
    ///
    pub fn set_direct_kana_mode(&mut self, direct_kana_mode: bool) -> String {
        self.state.direct_kana_mode = direct_kana_mode;
        let flushed = self.state.flush_pending();
        debug!("Direct kana mode {direct_kana_mode}. Flushed {flushed:?}");
        flushed
    }

    pub fn set_backspace_enabled(&mut self, backspace_enabled: bool) {
        self.state.backspace_enabled = backspace_enabled;
    }

    pub fn set_caps_lock_affects_case(&mut self, caps_lock_affects_case: bool) {
        self.state.caps_lock_affects_case = caps_lock_affects_case;
    }

    pub fn is_latin_mode(&self) -> bool {
        self.state.latin_mode
    }

    pub fn is_direct_kana_mode(&self) -> bool {
        self.state.direct_kana_mode
    }

    pub fn is_backspace_enabled(&self) -> bool {
        self.state.backspace_enabled
    }

    pub fn is_caps_lock_affects_case(&self) -> bool {
        self.state.caps_lock_affects_case
    }

    pub fn input_mode(&self) -> InputMode {
        InputMode::from_flags(self.state.latin_mode, self.state.direct_kana_mode)
    }

    pub fn tables(&self) -> &Arc<TableSet> {
        &self.tables
    }

    pub fn view(&self) -> ResultView<'_> {
        ResultView::new(&self.state)
    }

    /// 生成された文字列
    pub fn final_text(&self) -> String {
        self.state.final_text()
    }

    /// 生成された、変換される前の文字列
    pub fn raw_text(&self) -> String {
        self.state.raw_text()
    }

    /// 前回入力された文字
    pub fn last_accepted_char(&self) -> &str {
        &self.state.last_accepted
    }

    /// 前回入力時のキー
    pub fn last_event(&self) -> Option<&KeySymbol> {
        self.state.last_event.as_ref()
    }
}

///
/// 未確定の入力をテーブルで確定できるだけ確定する。
///
/// より長いエントリに続けられるうちは待つ。続けられず、全体が変換できればそれを確定する。
/// どちらでもなければ、続きを待っていた変換可能な先頭部分を、それもなければ先頭1文字をそのまま確定して繰り返す。
///
fn drain(state: &mut EngineState, table: &ConversionTable) {
    while !state.pending.is_empty() {
        if table.can_extend(&state.pending) {
            trace!("Waiting for more input on {:?}", state.pending);
            break;
        }
        if let Some(converted) = table.try_convert(&state.pending) {
            trace!("Commit {:?} -> {:?}", state.pending, converted);
            state.commit_pending_as(converted);
            break;
        }
        match longest_convertible_prefix(&state.pending, table) {
            Some((end, converted)) => {
                trace!("Commit prefix {:?} -> {:?}", &state.pending[..end], converted);
                state.commit_pending_prefix(end, converted);
            }
            None => {
                trace!("Commit literally the head of {:?}", state.pending);
                state.commit_first_pending_literally();
            }
        }
    }
}

///
/// (byte end, converted) of the longest proper prefix of pending that converts and was held back
/// only because a longer entry starts with it. e.g. "s" of "sa" when both "s" and "sh" are entries.
///
fn longest_convertible_prefix<'t>(
    pending: &str,
    table: &'t ConversionTable,
) -> Option<(usize, &'t str)> {
    let prefix_ends: Vec<usize> = pending
        .char_indices()
        .skip(1)
        .map(|(end, _)| end)
        .take(table.max_source_length())
        .collect();
    prefix_ends.into_iter().rev().find_map(|end| {
        let prefix = &pending[..end];
        if table.can_extend(prefix) {
            table.try_convert(prefix).map(|converted| (end, converted))
        } else {
            None
        }
    })
}

///
/// ローマ字入力でテーブルの前に見る規則。
/// 同じ子音の連続は促音、続けようのないnは撥音、母音の後の長音キーは長音符として先頭1文字を確定する。
///
fn apply_romanized_rules(state: &mut EngineState, table: &ConversionTable, rules: &RomanizedRules) {
    let mut pending_chars = state.pending.chars();
    if let (Some(first), Some(second)) = (pending_chars.next(), pending_chars.next()) {
        if first == second && rules.is_geminable(first) {
            state.commit_in_place_of_first_pending(&rules.geminate_marker);
        } else if first == rules.syllabic_n_key && !table.can_convert(&state.pending, true) {
            state.commit_in_place_of_first_pending(&rules.syllabic_n);
        }
    }
    if state.pending.starts_with(rules.elongation_key) && follows_vowel(state, rules) {
        state.commit_in_place_of_first_pending(&rules.long_vowel_mark);
    }
}

/// 直前の確定単位の入力が母音で終わっている
fn follows_vowel(state: &EngineState, rules: &RomanizedRules) -> bool {
    state
        .raw
        .last()
        .and_then(|raw| raw.chars().last())
        .map_or(false, |c| rules.is_vowel(c))
}
