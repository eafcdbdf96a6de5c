///
/// エンジンの初期状態。rule.tomlの[engine]から読める。
///
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub latin_mode: bool,
    pub direct_kana_mode: bool,
    pub backspace_enabled: bool,
    pub caps_lock_affects_case: bool,
    pub romanized: RomanizedRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            latin_mode: false,
            direct_kana_mode: false,
            backspace_enabled: true,
            caps_lock_affects_case: true,
            romanized: RomanizedRules::default(),
        }
    }
}

///
/// ローマ字入力でテーブルとは別に扱う特別な単位。
///
/// - 同じ子音の連続 (tt, kk...) → 促音
/// - テーブルで続けようのない n → 撥音
/// - 母音の後の長音キー → 長音符
///
/// vowelsは促音にしない文字と、長音符を付けられる直前の入力の判定に使う。
///
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RomanizedRules {
    pub geminate_marker: String,
    pub syllabic_n: String,
    pub syllabic_n_key: char,
    pub long_vowel_mark: String,
    pub elongation_key: char,
    pub vowels: String,
}

impl Default for RomanizedRules {
    fn default() -> Self {
        Self {
            geminate_marker: "っ".to_string(),
            syllabic_n: "ん".to_string(),
            syllabic_n_key: 'n',
            long_vowel_mark: "ー".to_string(),
            elongation_key: '-',
            vowels: "aiueo".to_string(),
        }
    }
}

impl RomanizedRules {
    pub(crate) fn is_vowel(&self, c: char) -> bool {
        self.vowels.contains(c.to_ascii_lowercase())
    }

    /// 促音にできる子音
    pub(crate) fn is_geminable(&self, c: char) -> bool {
        c.is_ascii_alphabetic() && !self.is_vowel(c) && c != self.syllabic_n_key
    }
}
