use thiserror::Error;

// Errors only come from building tables and loading rules.
// Key processing itself never fails.
#[derive(Error, Debug)]
pub enum KanaTypeError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Table error at line {line}: {reason}")]
    TableError { line: usize, reason: String },
    #[error("Rule error: {0}")]
    RuleError(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    TomlError(#[from] toml::de::Error),
    #[error(transparent)]
    XdgError(#[from] xdg::BaseDirectoriesError),
}
