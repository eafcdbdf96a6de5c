use crate::error::KanaTypeError;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

///
/// 入力方式。
/// latin_modeとdirect_kana_modeの2つのフラグから決まり、latin_modeが優先される。
///
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Deserialize, Serialize, Display)]
#[repr(C)]
pub enum InputMode {
    // 英字をそのまま確定
    Latin,
    // ローマ字入力
    Romanized,
    // JISかな入力など、かなを直接入力する方式
    DirectKana,
}

impl InputMode {
    pub fn from_flags(latin_mode: bool, direct_kana_mode: bool) -> Self {
        if latin_mode {
            InputMode::Latin
        } else if direct_kana_mode {
            InputMode::DirectKana
        } else {
            InputMode::Romanized
        }
    }
}

impl FromStr for InputMode {
    type Err = KanaTypeError;

    fn from_str(s: &str) -> Result<InputMode, KanaTypeError> {
        match s {
            "Latin" => Ok(InputMode::Latin),
            "Romanized" => Ok(InputMode::Romanized),
            "DirectKana" => Ok(InputMode::DirectKana),
            s => Err(KanaTypeError::ParseError(s.to_string())),
        }
    }
}
