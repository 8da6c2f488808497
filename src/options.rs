use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

/// One value from an options block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Number(f64),
    Boolean(bool),
    StringArray(Vec<String>),
    /// Two-number bracketed value, e.g. a map center `[51.3, 0.49]`.
    NumberPair([f64; 2]),
    /// Any other valid bracketed array, kept as parsed.
    List(Vec<JsonValue>),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<[f64; 2]> {
        match self {
            Self::NumberPair(p) => Some(*p),
            _ => None,
        }
    }

    /// A single string is treated as a one-element list.
    pub fn as_string_list(&self) -> Option<Vec<&str>> {
        match self {
            Self::String(s) => Some(vec![s.as_str()]),
            Self::StringArray(items) => Some(items.iter().map(String::as_str).collect()),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::StringArray(_) => "string list",
            Self::NumberPair(_) => "number pair",
            Self::List(_) => "list",
        }
    }
}

/// A non-blank, non-comment line that was not a `key: value` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IgnoredLine {
    /// 1-based line number within the block.
    pub line: usize,
    pub text: String,
}

/// Result of reading an options block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedOptions {
    pub values: BTreeMap<String, OptionValue>,
    pub ignored: Vec<IgnoredLine>,
}

impl ParsedOptions {
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn into_values(self) -> BTreeMap<String, OptionValue> {
        self.values
    }
}

/// Read an options block. Never fails: lines that are not entries are
/// recorded in `ignored` and otherwise have no effect.
pub fn parse_options(text: &str) -> ParsedOptions {
    let lines: Vec<&str> = text.lines().collect();
    let mut parsed = ParsedOptions::default();
    let mut cursor = 0;

    while cursor < lines.len() {
        let line = lines[cursor];
        cursor += 1;

        let content = line.trim_start();
        if content.trim_end().is_empty() || content.starts_with('#') {
            continue;
        }

        let Some((key, value)) = split_entry(content) else {
            parsed.ignored.push(IgnoredLine {
                line: cursor,
                text: line.to_string(),
            });
            continue;
        };

        let value = if value.is_empty() {
            let items: Vec<String> = lines[cursor..]
                .iter()
                .map_while(|l| list_item(l))
                .map(str::to_string)
                .collect();
            cursor += items.len();
            if items.is_empty() {
                OptionValue::String(String::new())
            } else {
                OptionValue::StringArray(items)
            }
        } else {
            parse_scalar(value)
        };

        parsed.values.insert(key.to_string(), value);
    }

    parsed
}

/// Split `key: value`. Keys are ASCII alphanumerics, `_` and `-`.
fn split_entry(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once(':')?;
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then(|| (key, value.trim()))
}

/// Indented `- item`. Returns the trimmed item.
fn list_item(line: &str) -> Option<&str> {
    if !line.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = line.trim_start().strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

fn parse_scalar(value: &str) -> OptionValue {
    if value.starts_with('[') && value.ends_with(']') {
        return parse_bracketed(value).unwrap_or_else(|| OptionValue::String(value.to_string()));
    }

    match value {
        "true" => return OptionValue::Boolean(true),
        "false" => return OptionValue::Boolean(false),
        _ => {}
    }

    match parse_number(value) {
        Some(n) => OptionValue::Number(n),
        None => OptionValue::String(value.to_string()),
    }
}

/// JSON array literal, accepting single-quoted strings.
fn parse_bracketed(value: &str) -> Option<OptionValue> {
    let items: Vec<JsonValue> = serde_json::from_str(&value.replace('\'', "\"")).ok()?;

    if let [a, b] = items.as_slice() {
        if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
            return Some(OptionValue::NumberPair([a, b]));
        }
    }

    if items.iter().all(JsonValue::is_string) {
        let strings = items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        return Some(OptionValue::StringArray(strings));
    }

    Some(OptionValue::List(items))
}

/// Whole-string finite number. `nan`, `inf` and stray signs are not numbers.
fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
