use std::collections::HashMap;

use sequence_trie::SequenceTrie;

///
/// 文字列から文字列への変換テーブル。
/// ローマ字列→ひらがな、ひらがな中間文字列→ひらがな など。
///
/// 前方(source→target)は後から来たエントリで上書き、逆方向(target→source)は最初のエントリのみ保持する。
///
#[derive(Clone, Debug)]
pub struct ConversionTable {
    forward: SequenceTrie<char, String>,
    reverse: HashMap<String, String>,
    max_source_length: usize,
    len: usize,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self {
            forward: SequenceTrie::new(),
            reverse: HashMap::new(),
            max_source_length: 0,
            len: 0,
        }
    }

    /// Build the table from ordered (source, target) records.
    pub fn from_entries<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table = Self::new();
        for (source, target) in entries {
            table.insert(source.as_ref(), target.as_ref());
        }
        table
    }

    fn insert(&mut self, source: &str, target: &str) {
        let key: Vec<char> = source.chars().collect();
        if self.forward.insert(&key, target.to_owned()).is_none() {
            self.len += 1;
        }
        self.max_source_length = self.max_source_length.max(key.len());
        self.reverse
            .entry(target.to_owned())
            .or_insert_with(|| source.to_owned());
    }

    ///
    /// sourceが変換可能ならtrue。
    /// allow_possibilityがtrueの時は、sourceに続けて入力することで変換可能になるエントリがある場合もtrue。
    ///
    pub fn can_convert(&self, source: &str, allow_possibility: bool) -> bool {
        let key: Vec<char> = source.chars().collect();
        match self.forward.get_node(&key) {
            None => false,
            Some(node) => node.value().is_some() || (allow_possibility && !node.is_leaf()),
        }
    }

    ///
    /// sourceより長く、sourceで始まるエントリがあればtrue。
    /// sourceそのものが変換可能かどうかは問わない。
    ///
    pub fn can_extend(&self, source: &str) -> bool {
        if source.chars().count() >= self.max_source_length {
            return false;
        }
        let key: Vec<char> = source.chars().collect();
        self.forward
            .get_node(&key)
            .map_or(false, |node| !node.is_leaf())
    }

    pub fn try_convert(&self, source: &str) -> Option<&str> {
        let key: Vec<char> = source.chars().collect();
        self.forward.get(&key).map(String::as_str)
    }

    ///
    /// Convert a source known to be in the table.
    ///
    /// # Panics
    /// When the source is not in the table. Callers check with `can_convert` first.
    ///
    pub fn convert(&self, source: &str) -> &str {
        match self.try_convert(source) {
            Some(target) => target,
            None => panic!(
                "No conversion for {:?}. can_convert must be checked before convert.",
                source
            ),
        }
    }

    /// target→sourceの逆引き。同じtargetが複数ある場合は最初に登録されたsource。
    pub fn reverse(&self, target: &str) -> Option<&str> {
        self.reverse.get(target).map(String::as_str)
    }

    /// Longest source in chars.
    pub fn max_source_length(&self) -> usize {
        self.max_source_length
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::new()
    }
}
