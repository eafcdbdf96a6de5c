use crate::conversion_table::ConversionTable;
use crate::error::KanaTypeError;
use crate::key_table::KeyTable;
use crate::rule::Rule;
use crate::table_loader::{load_conversion_table, load_key_table};

///
/// 文字列生成時に使う変換テーブル一式。
/// 一度作ったら変更せず、Arcで複数のエンジンから共有する。
///
#[derive(Clone, Debug, Default)]
pub struct TableSet {
    key_to_latin: KeyTable,
    latin_to_kana: ConversionTable,
    key_to_kana_mid: KeyTable,
    kana_mid_to_kana: ConversionTable,
}

impl TableSet {
    pub fn new(
        key_to_latin: KeyTable,
        latin_to_kana: ConversionTable,
        key_to_kana_mid: KeyTable,
        kana_mid_to_kana: ConversionTable,
    ) -> Self {
        Self {
            key_to_latin,
            latin_to_kana,
            key_to_kana_mid,
            kana_mid_to_kana,
        }
    }

    /// ruleの指すテーブルファイルをすべて読む。
    pub fn from_rule(rule: &Rule) -> Result<Self, KanaTypeError> {
        let encoding = rule.encoding();
        Ok(Self {
            key_to_latin: load_key_table(&rule.key_to_latin_path(), encoding)?,
            latin_to_kana: load_conversion_table(&rule.latin_to_kana_path(), encoding)?,
            key_to_kana_mid: load_key_table(&rule.key_to_kana_mid_path(), encoding)?,
            kana_mid_to_kana: load_conversion_table(&rule.kana_mid_to_kana_path(), encoding)?,
        })
    }

    /// キーの入力から英字(ローマ字)への変換テーブル
    pub fn key_to_latin(&self) -> &KeyTable {
        &self.key_to_latin
    }

    /// ローマ字列からひらがな文字列への変換テーブル
    pub fn latin_to_kana(&self) -> &ConversionTable {
        &self.latin_to_kana
    }

    /// キーの入力からひらがな中間文字への変換テーブル
    pub fn key_to_kana_mid(&self) -> &KeyTable {
        &self.key_to_kana_mid
    }

    /// ひらがな中間文字列からひらがな文字列への変換テーブル
    pub fn kana_mid_to_kana(&self) -> &ConversionTable {
        &self.kana_mid_to_kana
    }

    /// ひらがな文字列からローマ字列への逆引き
    pub fn kana_to_latin(&self, kana: &str) -> Option<&str> {
        self.latin_to_kana.reverse(kana)
    }

    /// ひらがな文字列からひらがな中間文字列への逆引き
    pub fn kana_to_kana_mid(&self, kana: &str) -> Option<&str> {
        self.kana_mid_to_kana.reverse(kana)
    }
}
