use crate::error::KanaTypeError;
use serde_with::DeserializeFromStr;
use std::fmt;
use std::fmt::Formatter;
use std::fmt::{Debug, Display};
use std::str::FromStr;
use xkbcommon::xkb;
use xkbcommon::xkb::{keysym_from_name, keysym_get_name, keysyms, Keysym};

bitflags! {
    ///
    /// キー入力時の修飾状態。
    ///
    /// SHIFTとFUNCTIONはテーブル検索のキーの一部になる。
    /// CAPS_LOCKは検索には使わず、英字の大文字小文字の反転にのみ使う。
    ///
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct KeyModifier: u32 {
        const NONE = 0;
        const SHIFT = 1;
        const CAPS_LOCK = 1 << 1;
        const FUNCTION = 1 << 2;

        /// Bits that take part in a table lookup
        const LOOKUP_MASK = Self::SHIFT.bits() | Self::FUNCTION.bits();
    }
}

pub type KeySymbolSeq = Vec<KeySymbol>;

///
/// One decoded key press as handed over by the host.
///
/// String representation of a key symbol is a paren enclosed list of LongModifiers and a single KeyName,
/// or the ShortModifier "S-" and a KeyName joined, or just a KeyName.
/// LongModifier := "shift" | "function" | "capslock"
/// KeyName := ↓
/// https://github.com/xkbcommon/libxkbcommon/blob/master/include/xkbcommon/xkbcommon-keysyms.h
///
/// "NoSymbol" is accepted and means the key press that must be ignored.
///
/// e.g.
/// "a" "S-a" "(shift a)" "(capslock shift h)" "BackSpace" "minus"
///
#[derive(Clone, Copy, Hash, PartialEq, Eq, DeserializeFromStr)]
pub struct KeySymbol {
    symbol: xkb::Keysym,
    modifiers: KeyModifier,
}

///
/// Lookup key for key tables.
/// Caps lock is dropped and capital latin keysyms are folded to their lowercase key.
///
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub(crate) struct KeyIdentity {
    symbol: xkb::Keysym,
    modifiers: KeyModifier,
}

impl KeySymbol {
    pub fn new(keysym: xkb::Keysym, shift: bool, function: bool) -> Self {
        Self::with_caps_lock(keysym, shift, function, false)
    }

    pub fn with_caps_lock(keysym: xkb::Keysym, shift: bool, function: bool, caps_lock: bool) -> Self {
        let mut modifiers = KeyModifier::NONE;
        modifiers.set(KeyModifier::SHIFT, shift);
        modifiers.set(KeyModifier::FUNCTION, function);
        modifiers.set(KeyModifier::CAPS_LOCK, caps_lock);

        Self {
            symbol: keysym,
            modifiers,
        }
    }

    /// The key that resolved to nothing. The engine ignores it.
    pub fn none() -> Self {
        Self {
            symbol: Keysym::NoSymbol,
            modifiers: KeyModifier::NONE,
        }
    }

    pub fn backspace() -> Self {
        Self::new(Keysym::from(keysyms::KEY_BackSpace), false, false)
    }

    pub fn is_none(&self) -> bool {
        self.symbol == Keysym::NoSymbol
    }

    pub fn is_backspace(&self) -> bool {
        self.symbol.raw() == keysyms::KEY_BackSpace
    }

    pub fn is_shift(&self) -> bool {
        self.modifiers.contains(KeyModifier::SHIFT)
    }

    pub fn is_function(&self) -> bool {
        self.modifiers.contains(KeyModifier::FUNCTION)
    }

    pub fn is_caps_lock(&self) -> bool {
        self.modifiers.contains(KeyModifier::CAPS_LOCK)
    }

    pub fn get_symbol(&self) -> xkb::Keysym {
        self.symbol
    }

    pub fn get_modifier(&self) -> KeyModifier {
        self.modifiers
    }

    ///
    /// いわゆるAsciiの大文字。
    ///
    fn is_upper(&self) -> bool {
        matches!(self.symbol.raw(), keysyms::KEY_A..=keysyms::KEY_Z)
    }

    pub(crate) fn identity(&self) -> KeyIdentity {
        // ホストによってはShift+aをKEY_Aで渡してくるので、物理キーとしてのaに寄せる。
        let symbol = if self.is_upper() {
            Keysym::from(self.symbol.raw() + 0x0020)
        } else {
            self.symbol
        };
        KeyIdentity {
            symbol,
            modifiers: self.modifiers & KeyModifier::LOOKUP_MASK,
        }
    }

    ///
    /// Testing purpose mostly. Hosts should use `new` or `with_caps_lock`.
    ///
    pub fn from_string_representation(key: &str) -> Result<KeySymbol, KanaTypeError> {
        Self::from_str(key)
    }

    ///
    /// Parse space separated key symbols.
    ///
    pub fn deserialize_seq(from: &str) -> Result<KeySymbolSeq, KanaTypeError> {
        KeySymbol::deserialize_seq_inner(from, Vec::new())
    }

    fn deserialize_seq_inner(
        keys: &str,
        mut current: Vec<KeySymbol>,
    ) -> Result<KeySymbolSeq, KanaTypeError> {
        let keys = keys.trim();
        if keys.is_empty() {
            return Ok(current);
        }
        match KeySymbol::next_tok(keys) {
            Some(tok) => {
                let left = &keys[tok.len()..];
                let key_symbol = KeySymbol::from_string_representation(tok)?;
                current.push(key_symbol);
                KeySymbol::deserialize_seq_inner(left, current)
            }
            _ => Err(KanaTypeError::ParseError(format!(
                "Syntax error. keys: {keys}"
            ))),
        }
    }

    /// '''
    /// let str = "(shift a) other string"
    /// let result = KeySymbol::next_tok(str)
    /// assert_eq!(result, Some("(shift a)"))
    /// '''
    fn next_tok(keys: &str) -> Option<&str> {
        if keys.starts_with('(') {
            let len = keys.find(')');
            len.map(|x| &keys[0..=x])
        } else {
            match keys.find(' ') {
                Some(x) => Some(&keys[0..x]),
                _ => Some(keys),
            }
        }
    }

    ///
    /// Keysym column of a key table file.
    /// Either a keysym name such as "a", "minus", "bracketleft", or a raw keysym value like "0x2d".
    ///
    pub(crate) fn keysym_from_table_field(field: &str) -> Result<xkb::Keysym, KanaTypeError> {
        let field = field.trim();
        if let Some(hex) = field.strip_prefix("0x") {
            let raw = u32::from_str_radix(hex, 16)
                .map_err(|e| KanaTypeError::ParseError(format!("{field}: {e}")))?;
            return Ok(Keysym::from(raw));
        }
        let keysym = keysym_from_name(field, xkb::KEYSYM_NO_FLAGS);
        if keysym == Keysym::NoSymbol {
            Err(KanaTypeError::ParseError(format!(
                "Not a key symbol: {field}"
            )))
        } else {
            Ok(keysym)
        }
    }
}

impl FromStr for KeySymbol {
    type Err = KanaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifier = KeyModifier::NONE;
        let mut keysym = Keysym::VoidSymbol;
        let key = s.trim();
        if key == "NoSymbol" {
            return Ok(KeySymbol::none());
        }
        if key.starts_with('(') && key.ends_with(')') {
            let words = key.trim_start_matches('(').trim_end_matches(')').split(' ');
            for word in words {
                match word {
                    "" => {}
                    "shift" => {
                        modifier.set(KeyModifier::SHIFT, true);
                    }
                    "function" => {
                        modifier.set(KeyModifier::FUNCTION, true);
                    }
                    "capslock" => {
                        modifier.set(KeyModifier::CAPS_LOCK, true);
                    }
                    _ => {
                        keysym = keysym_from_name(word, xkb::KEYSYM_NO_FLAGS);
                    }
                }
            }
        } else {
            let keyname: &str = if key.len() > 2 && key.starts_with("S-") {
                modifier.set(KeyModifier::SHIFT, true);
                &key[2..]
            } else {
                key
            };
            keysym = keysym_from_name(keyname, xkb::KEYSYM_NO_FLAGS);
        }

        if keysym == Keysym::VoidSymbol {
            Err(KanaTypeError::ParseError(format!("No key name in: {s}")))
        } else if keysym == Keysym::NoSymbol {
            Err(KanaTypeError::ParseError(format!("Not a key symbol: {s}")))
        } else {
            Ok(KeySymbol {
                symbol: keysym,
                modifiers: modifier,
            })
        }
    }
}

impl Display for KeySymbol {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "{}",
            xkb::keysym_to_utf8(self.symbol).trim_end_matches('\u{0}')
        )
    }
}

impl Debug for KeySymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = keysym_get_name(self.symbol);
        f.debug_struct("KeySymbol")
            .field("symbol", &self.symbol)
            .field("key_name", &name)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_symbol_from_str() {
        let a = KeySymbol::from_string_representation("a").unwrap();
        assert_eq!(a.symbol, Keysym::from(keysyms::KEY_a), "equals small a");
        assert_eq!(a.modifiers, KeyModifier::NONE, "No modifier for a");

        let shift_a = KeySymbol::from_string_representation("S-a").unwrap();
        assert_eq!(shift_a.symbol, Keysym::from(keysyms::KEY_a));
        assert!(shift_a.is_shift());

        let long_form = KeySymbol::from_string_representation("(capslock shift h)").unwrap();
        assert_eq!(long_form.symbol, Keysym::from(keysyms::KEY_h));
        assert!(long_form.is_shift());
        assert!(long_form.is_caps_lock());
        assert!(!long_form.is_function());

        let function_left = KeySymbol::from_string_representation("(function Left)").unwrap();
        assert_eq!(function_left.symbol, Keysym::from(keysyms::KEY_Left));
        assert!(function_left.is_function());

        let minus = KeySymbol::from_string_representation("minus").unwrap();
        assert_eq!(minus.symbol, Keysym::from(keysyms::KEY_minus));

        let backspace = KeySymbol::from_string_representation("BackSpace").unwrap();
        assert!(backspace.is_backspace());
    }

    #[test]
    fn unknown_key_name_is_error() {
        let result = KeySymbol::from_string_representation("LATIN SMALL LETTER U WITH ACUTE");
        assert!(result.is_err());
        let result = KeySymbol::from_string_representation("(shift)");
        assert!(result.is_err());
    }

    #[test]
    fn no_symbol() {
        let none = KeySymbol::from_string_representation("NoSymbol").unwrap();
        assert!(none.is_none());
        assert_eq!(none, KeySymbol::none());
    }

    #[test]
    fn deserialize_seq() {
        let result = KeySymbol::deserialize_seq("a (shift b) c").unwrap();
        assert_eq!(3, result.len());
        assert_eq!(result[0], KeySymbol::from_string_representation("a").unwrap());
        assert_eq!(result[1], KeySymbol::from_string_representation("S-b").unwrap());
        assert_eq!(result[2], KeySymbol::from_string_representation("c").unwrap());
    }

    #[test]
    fn identity_ignores_caps_lock_and_case() {
        let plain = KeySymbol::new(Keysym::from(keysyms::KEY_a), true, false);
        let capital = KeySymbol::new(Keysym::from(keysyms::KEY_A), true, false);
        let caps = KeySymbol::with_caps_lock(Keysym::from(keysyms::KEY_a), true, false, true);
        assert_eq!(plain.identity(), capital.identity());
        assert_eq!(plain.identity(), caps.identity());

        let unshifted = KeySymbol::new(Keysym::from(keysyms::KEY_a), false, false);
        assert_ne!(plain.identity(), unshifted.identity());
    }

    #[test]
    fn keysym_from_table_field() {
        assert_eq!(
            Keysym::from(keysyms::KEY_minus),
            KeySymbol::keysym_from_table_field("minus").unwrap()
        );
        assert_eq!(
            Keysym::from(keysyms::KEY_1),
            KeySymbol::keysym_from_table_field("0x31").unwrap()
        );
        assert!(KeySymbol::keysym_from_table_field("no_such_key").is_err());
    }

    #[test]
    fn key_symbol_to_string() {
        let a = KeySymbol::from_string_representation("a").unwrap();
        assert_eq!("a", a.to_string());
    }
}
