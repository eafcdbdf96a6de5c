use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use log::info;

use crate::conversion_table::ConversionTable;
use crate::error::KanaTypeError;
use crate::key_table::KeyTable;
use crate::table_parser::{parse_conversion_table, parse_key_table};

///
/// キー→文字テーブルをファイルから読む。
///
/// encode: label of encoding that encoding_rs can recognize. "utf-8", "euc-jp", "shift_jis" etc.
///
pub fn load_key_table(file_path: &Path, encode: &str) -> Result<KeyTable, KanaTypeError> {
    let contents = read_to_string(file_path, encode)?;
    let table = parse_key_table(&contents)?;
    info!("Loaded {} keys from {}", table.len(), file_path.display());
    Ok(table)
}

///
/// 文字列→文字列テーブルをファイルから読む。
///
/// encode: label of encoding that encoding_rs can recognize.
///
pub fn load_conversion_table(
    file_path: &Path,
    encode: &str,
) -> Result<ConversionTable, KanaTypeError> {
    let contents = read_to_string(file_path, encode)?;
    let table = parse_conversion_table(&contents)?;
    info!(
        "Loaded {} entries from {}",
        table.len(),
        file_path.display()
    );
    Ok(table)
}

fn read_to_string(file_path: &Path, encode: &str) -> Result<String, KanaTypeError> {
    let enc = Encoding::for_label_no_replacement(encode.as_bytes())
        .ok_or_else(|| KanaTypeError::RuleError(format!("Unknown encoding: {encode}")))?;
    let file = File::open(file_path)?;
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(enc))
        .build(file);
    let mut contents = String::new();
    decoder.read_to_string(&mut contents)?;
    Ok(contents)
}
