use std::collections::HashMap;

use crate::keyevent::{KeyIdentity, KeySymbol};

///
/// キー入力から1文字への変換テーブル。
/// キー→英字(ローマ字)、キー→ひらがな中間文字 の2種類で使う。
///
#[derive(Clone, Debug, Default)]
pub struct KeyTable {
    forward: HashMap<KeyIdentity, char>,
    reverse: HashMap<char, KeySymbol>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from ordered (target, key) records.
    /// Later records for the same key overwrite, the reverse lookup keeps the first key for a char.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (char, KeySymbol)>,
    {
        let mut table = Self::new();
        for (target, key) in entries {
            table.forward.insert(key.identity(), target);
            table.reverse.entry(target).or_insert(key);
        }
        table
    }

    ///
    /// キーを文字に変換する。割り当てのないキーはNone。
    ///
    /// apply_caps_lockがtrueでCapsLock中のキーなら、英字の大文字小文字を反転する。
    ///
    pub fn convert(&self, key: &KeySymbol, apply_caps_lock: bool) -> Option<char> {
        let converted = *self.forward.get(&key.identity())?;
        if apply_caps_lock && key.is_caps_lock() {
            Some(invert_case(converted))
        } else {
            Some(converted)
        }
    }

    /// Which key types this char.
    pub fn key_for(&self, target: char) -> Option<&KeySymbol> {
        self.reverse.get(&target)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

fn invert_case(c: char) -> char {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else {
        c
    }
}
