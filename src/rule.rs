use crate::config::EngineConfig;
use crate::error::KanaTypeError;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

///
/// rule.toml 1つ分。変換テーブルのファイル名とエンジンの初期設定。
///
/// ```toml
/// [tables]
/// key_to_latin = "qwerty.csv"
/// latin_to_kana = "roma.csv"
/// key_to_kana_mid = "jis_kana_keys.csv"
/// kana_mid_to_kana = "jis_kana.csv"
/// encoding = "utf-8"
///
/// [engine]
/// backspace_enabled = true
///
/// [engine.romanized]
/// long_vowel_mark = "ー"
/// ```
///
#[derive(Deserialize, Debug)]
pub struct Rule {
    tables: RuleTables,
    #[serde(default)]
    engine: EngineConfig,
    // rule.tomlのあるディレクトリ。テーブルファイルはここからの相対パス
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Deserialize, Debug)]
struct RuleTables {
    key_to_latin: String,
    latin_to_kana: String,
    key_to_kana_mid: String,
    kana_mid_to_kana: String,
    #[serde(default = "default_encoding")]
    encoding: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

// metadata.toml
pub struct RuleMetadata {
    base_dir: PathBuf,
    rules: BTreeMap<String, RuleMetadataEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RuleMetadataEntry {
    pub name: String,
    pub description: String,
    // path directory of actual rule.toml
    path: String,
}

impl Rule {
    pub fn load_rule_file(filepath: &Path) -> Result<Self, KanaTypeError> {
        let mut file = File::open(filepath)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let mut result = toml::from_str::<Rule>(&contents)?;
        result.base_dir = filepath
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        info!("Loaded rule {}", filepath.display());
        Ok(result)
    }

    pub fn key_to_latin_path(&self) -> PathBuf {
        self.base_dir.join(&self.tables.key_to_latin)
    }

    pub fn latin_to_kana_path(&self) -> PathBuf {
        self.base_dir.join(&self.tables.latin_to_kana)
    }

    pub fn key_to_kana_mid_path(&self) -> PathBuf {
        self.base_dir.join(&self.tables.key_to_kana_mid)
    }

    pub fn kana_mid_to_kana_path(&self) -> PathBuf {
        self.base_dir.join(&self.tables.kana_mid_to_kana)
    }

    pub fn encoding(&self) -> &str {
        &self.tables.encoding
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }
}

impl RuleMetadata {
    /// Find which rules directory to use and load the metadata only.
    pub fn load_metadata() -> Result<Self, KanaTypeError> {
        let base_directory = xdg::BaseDirectories::new()?;
        if let Some(rule_directory) = base_directory.find_data_file("kanatype/rules") {
            Self::load_metadata_from_path(&rule_directory)
        } else {
            Err(KanaTypeError::RuleError("No rule metadata file".to_string()))
        }
    }

    /// ignore xdg directory spec and load metadata from specified directory
    /// Use [load_metadata] for your usecase.
    pub fn load_metadata_from_directory(directory: &Path) -> Result<Self, KanaTypeError> {
        Self::load_metadata_from_path(directory)
    }

    fn load_metadata_from_path(rule_directory: &Path) -> Result<Self, KanaTypeError> {
        let metadata_file = rule_directory.join("metadata.toml");
        let mut file = File::open(metadata_file)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let result = toml::from_str::<BTreeMap<String, RuleMetadataEntry>>(&contents)?;
        Ok(RuleMetadata {
            base_dir: rule_directory.to_path_buf(),
            rules: result,
        })
    }

    /// Load the rule named "default"
    pub fn load_default_rule(&self) -> Result<Rule, KanaTypeError> {
        self.load_rule("default")
    }

    ///
    /// 引数ruleのidのrule.tomlファイルを読み出す。
    ///
    pub fn load_rule(&self, rule: &str) -> Result<Rule, KanaTypeError> {
        if let Some(entry) = self.rules.get(rule) {
            let file_path = self.base_dir.join(&entry.path).join("rule.toml");
            Rule::load_rule_file(&file_path)
        } else {
            warn!("Unknown rule {rule}");
            Err(KanaTypeError::RuleError(format!("Unknown rule specified: {rule}")))
        }
    }

    /// 使えるルールの(キー、名称、説明)を返す
    pub fn get_rule_list(&self) -> &BTreeMap<String, RuleMetadataEntry> {
        &self.rules
    }
}
