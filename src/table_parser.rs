use nom::branch::alt;
use nom::bytes::complete::take_till;
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::multi::separated_list1;
use nom::sequence::delimited;
use nom::{IResult, Parser};

use crate::conversion_table::ConversionTable;
use crate::error::KanaTypeError;
use crate::key_table::KeyTable;
use crate::keyevent::KeySymbol;

const KEY_RECORD_FIELDS: usize = 4;
const STRING_RECORD_FIELDS: usize = 2;

///
/// キーテーブルを読む。
/// 1行1レコードで `変換先文字,keysym,shift,function`
/// e.g.
/// `A,a,1,0`
/// `ぬ,1,0,0`
/// `",",comma,0,0`
///
pub(crate) fn parse_key_table(contents: &str) -> Result<KeyTable, KanaTypeError> {
    let mut records = vec![];
    for (line_no, line) in record_lines(contents) {
        records.push(key_record(line, line_no)?);
    }
    Ok(KeyTable::from_entries(records))
}

///
/// 文字列テーブルを読む。
/// 1行1レコードで `変換元文字列,変換先文字列`
/// e.g.
/// `shi,し`
/// `か゛,が`
///
pub(crate) fn parse_conversion_table(contents: &str) -> Result<ConversionTable, KanaTypeError> {
    let mut records = vec![];
    for (line_no, line) in record_lines(contents) {
        records.push(string_record(line, line_no)?);
    }
    Ok(ConversionTable::from_entries(records))
}

/// Lines holding records, with 1-origin line numbers. Blank lines and '#' comments are skipped.
fn record_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
}

fn key_record(line: &str, line_no: usize) -> Result<(char, KeySymbol), KanaTypeError> {
    let fields = record_fields(line, line_no, KEY_RECORD_FIELDS)?;
    let mut target_chars = fields[0].chars();
    let target = match (target_chars.next(), target_chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(table_error(
                line_no,
                format!("Key target must be one char: {:?}", fields[0]),
            ))
        }
    };
    let keysym = KeySymbol::keysym_from_table_field(fields[1])
        .map_err(|e| table_error(line_no, e.to_string()))?;
    let shift = flag(fields[2], line_no)?;
    let function = flag(fields[3], line_no)?;

    Ok((target, KeySymbol::new(keysym, shift, function)))
}

fn string_record(line: &str, line_no: usize) -> Result<(String, String), KanaTypeError> {
    let fields = record_fields(line, line_no, STRING_RECORD_FIELDS)?;
    if fields[0].is_empty() {
        return Err(table_error(line_no, "Empty source".to_string()));
    }
    if fields[1].is_empty() {
        return Err(table_error(line_no, "Empty target".to_string()));
    }
    Ok((fields[0].to_owned(), fields[1].to_owned()))
}

fn record_fields(line: &str, line_no: usize, expected: usize) -> Result<Vec<&str>, KanaTypeError> {
    let (_, fields) = fields(line).map_err(|e| table_error(line_no, format!("{e}")))?;
    if fields.len() != expected {
        return Err(table_error(
            line_no,
            format!("Expected {expected} fields but found {}", fields.len()),
        ));
    }
    Ok(fields)
}

fn flag(field: &str, line_no: usize) -> Result<bool, KanaTypeError> {
    match field {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(table_error(line_no, format!("Flag must be 0 or 1: {field:?}"))),
    }
}

fn table_error(line: usize, reason: String) -> KanaTypeError {
    KanaTypeError::TableError { line, reason }
}

fn fields(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char(','), field)).parse(input)
}

/// '"'で囲われていればその中身をそのまま、そうでなければ前後の空白を除いたもの
fn field(input: &str) -> IResult<&str, &str> {
    alt((quoted_field, bare_field)).parse(input)
}

fn quoted_field(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c: char| c == '"'), char('"')).parse(input)
}

fn bare_field(input: &str) -> IResult<&str, &str> {
    let (i, taken) = take_till(|c: char| c == ',').parse(input)?;
    Ok((i, taken.trim()))
}
