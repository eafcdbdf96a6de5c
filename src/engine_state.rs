use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use crate::keyevent::KeySymbol;

///
/// 入力エミュレーションの状態。ConversionEngineだけが書き換え、ResultViewは参照のみ。
///
/// committedとrawは常に同じ長さで、同じindexが1つの確定単位に対応する。
///
#[derive(Clone, PartialEq)]
pub(crate) struct EngineState {
    // 変換確定済みの文字列
    pub(crate) committed: Vec<String>,
    // 確定済みの各単位を生んだ変換前の入力
    pub(crate) raw: Vec<String>,
    // まだ確定していない入力。ローマ字かひらがな中間文字
    pub(crate) pending: String,
    // 直前に受理した入力文字。受理しなかった時やBackSpaceでは空
    pub(crate) last_accepted: String,
    pub(crate) last_event: Option<KeySymbol>,
    pub(crate) latin_mode: bool,
    pub(crate) direct_kana_mode: bool,
    pub(crate) backspace_enabled: bool,
    pub(crate) caps_lock_affects_case: bool,
}

impl EngineState {
    pub(crate) fn new(
        latin_mode: bool,
        direct_kana_mode: bool,
        backspace_enabled: bool,
        caps_lock_affects_case: bool,
    ) -> Self {
        Self {
            committed: vec![],
            raw: vec![],
            pending: String::new(),
            last_accepted: String::new(),
            last_event: None,
            latin_mode,
            direct_kana_mode,
            backspace_enabled,
            caps_lock_affects_case,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.committed.clear();
        self.raw.clear();
        self.pending.clear();
        self.last_accepted.clear();
    }

    pub(crate) fn commit(&mut self, converted: &str, raw: &str) {
        self.committed.push(converted.to_owned());
        self.raw.push(raw.to_owned());
        self.check_invariant();
    }

    /// Commit the first pending char as itself and drop it from pending.
    pub(crate) fn commit_first_pending_literally(&mut self) {
        if let Some(first) = self.pending.chars().next() {
            let literal = first.to_string();
            self.commit(&literal, &literal);
            self.pending.drain(..first.len_utf8());
        }
    }

    /// Commit the given unit in place of the first pending char.
    pub(crate) fn commit_in_place_of_first_pending(&mut self, converted: &str) {
        if let Some(first) = self.pending.chars().next() {
            self.commit(converted, &first.to_string());
            self.pending.drain(..first.len_utf8());
        }
    }

    /// Commit pending[..end] as one unit. `end` must be on a char boundary.
    pub(crate) fn commit_pending_prefix(&mut self, end: usize, converted: &str) {
        let raw: String = self.pending.drain(..end).collect();
        self.commit(converted, &raw);
    }

    /// Commit the whole pending buffer as one unit.
    pub(crate) fn commit_pending_as(&mut self, converted: &str) {
        let raw = std::mem::take(&mut self.pending);
        self.commit(converted, &raw);
    }

    ///
    /// 未確定の入力を1文字ずつそのまま確定する。
    /// 確定した文字列を返す。
    ///
    pub(crate) fn flush_pending(&mut self) -> String {
        let flushed = std::mem::take(&mut self.pending);
        for c in flushed.chars() {
            let literal = c.to_string();
            self.commit(&literal, &literal);
        }
        flushed
    }

    ///
    /// BackSpace 1打鍵分を取り消す。
    ///
    /// 未確定の入力があればその末尾を、なければ最後の確定単位の変換後と変換前それぞれの末尾を1文字消す。
    /// 変換後の文字列が空になったらその確定単位ごと消す。
    ///
    pub(crate) fn undo(&mut self) {
        if !self.backspace_enabled {
            return;
        }
        if self.pending.pop().is_some() {
            return;
        }
        if let (Some(committed), Some(raw)) = (self.committed.last_mut(), self.raw.last_mut()) {
            committed.pop();
            raw.pop();
            if committed.is_empty() {
                self.committed.pop();
                self.raw.pop();
            }
        }
        self.check_invariant();
    }

    pub(crate) fn final_text(&self) -> String {
        let mut text = self.committed.concat();
        text.push_str(&self.pending);
        text
    }

    pub(crate) fn raw_text(&self) -> String {
        let mut text = self.raw.concat();
        text.push_str(&self.pending);
        text
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.committed.len(),
            self.raw.len(),
            "committed and raw went out of step: {self:?}"
        );
    }
}

impl Debug for EngineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineState")
            .field("committed", &self.committed)
            .field("raw", &self.raw)
            .field("pending", &self.pending)
            .field("last_accepted", &self.last_accepted)
            .field("last_event", &self.last_event)
            .field("latin_mode", &self.latin_mode)
            .field("direct_kana_mode", &self.direct_kana_mode)
            .finish()
    }
}

impl Display for EngineState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "  committed: {}", self.committed.join("|"))?;
        writeln!(f, "  raw:       {}", self.raw.join("|"))?;
        writeln!(f, "  pending:   {}", self.pending)?;
        writeln!(f, "}}")
    }
}

#[cfg(test)]
impl EngineState {
    pub(crate) fn new_test_state(committed: &[&str], raw: &[&str], pending: &str) -> Self {
        let mut state = EngineState::new(false, false, true, true);
        state.committed = committed.iter().map(|s| s.to_string()).collect();
        state.raw = raw.iter().map(|s| s.to_string()).collect();
        state.pending = pending.to_string();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_pending_first() {
        let mut state = EngineState::new_test_state(&["か"], &["ka"], "ky");
        state.undo();
        assert_eq!("k", state.pending);
        assert_eq!(vec!["か"], state.committed);
    }

    #[test]
    fn undo_removes_single_char_unit() {
        let mut state = EngineState::new_test_state(&["ka"], &["ka"], "");
        state.undo();
        assert_eq!(vec!["k"], state.committed);
        assert_eq!(vec!["k"], state.raw);
        state.undo();
        assert!(state.committed.is_empty());
        assert!(state.raw.is_empty());
    }

    #[test]
    fn undo_truncates_in_lock_step() {
        let mut state = EngineState::new_test_state(&["あ", "きゃ"], &["a", "kya"], "");
        state.undo();
        assert_eq!(vec!["あ", "き"], state.committed);
        assert_eq!(vec!["a", "ky"], state.raw);
        state.undo();
        assert_eq!(vec!["あ"], state.committed);
        assert_eq!(vec!["a"], state.raw);
    }

    #[test]
    fn undo_disabled() {
        let mut state = EngineState::new_test_state(&["か"], &["ka"], "k");
        state.backspace_enabled = false;
        state.undo();
        assert_eq!("k", state.pending);
        assert_eq!(vec!["か"], state.committed);
    }

    #[test]
    fn undo_on_empty() {
        let mut state = EngineState::new_test_state(&[], &[], "");
        state.undo();
        assert_eq!(EngineState::new_test_state(&[], &[], ""), state);
    }

    #[test]
    fn flush_pending_commits_each_char() {
        let mut state = EngineState::new_test_state(&["か"], &["ka"], "ky");
        let flushed = state.flush_pending();
        assert_eq!("ky", flushed);
        assert_eq!(vec!["か", "k", "y"], state.committed);
        assert_eq!(vec!["ka", "k", "y"], state.raw);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn commit_first_pending_multibyte() {
        let mut state = EngineState::new_test_state(&[], &[], "かた");
        state.commit_first_pending_literally();
        assert_eq!(vec!["か"], state.committed);
        assert_eq!("た", state.pending);
    }

    #[test]
    fn texts() {
        let state = EngineState::new_test_state(&["っ", "て"], &["t", "te"], "k");
        assert_eq!("ってk", state.final_text());
        assert_eq!("ttek", state.raw_text());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut state = EngineState::new_test_state(&["っ", "て"], &["t", "te"], "k");
        state.clear();
        let once = state.clone();
        state.clear();
        assert_eq!(once, state);
        assert_eq!("", state.final_text());
    }
}
