//! Packed option lists: how an [`OptionSet`] travels inside one text field.
//!
//! A packed list is a run of `key=value` records joined by `,` and sorted
//! by key. The empty set packs as `-`. Values are written per type:
//!
//! | Type | Packed | Example |
//! |------|--------|---------|
//! | Bool | `t` or `f` | `RD=t` |
//! | Int, Enum | decimal | `PL=6`, `DC=2` |
//! | IntBool, EnumBool | toggle then decimal | `N7=t3` |
//! | Str, StrHide | raw text | `DS=friendly game` |
//!
//! Options this build doesn't know are carried with their value text
//! exactly as received.

use crate::{
    GameOption, OptionError, OptionKey, OptionRegistry, OptionSet, OptionType,
    OptionValue,
};

/// Packed form of an empty option set.
pub const EMPTY_PACKED: &str = "-";

/// Packs `set` into its wire text.
pub fn pack(set: &OptionSet) -> String {
    if set.is_empty() {
        return EMPTY_PACKED.to_owned();
    }
    let mut options: Vec<&GameOption> = set.iter().collect();
    options.sort_by(|a, b| a.key().cmp(b.key()));

    let records: Vec<String> = options
        .into_iter()
        .map(|op| format!("{}={}", op.key(), pack_value(op)))
        .collect();
    records.join(",")
}

fn pack_value(option: &GameOption) -> String {
    let flag = |b: bool| if b { 't' } else { 'f' };
    match option.value() {
        Some(OptionValue::Bool(b)) => flag(*b).to_string(),
        Some(OptionValue::Int(v) | OptionValue::Enum(v)) => v.to_string(),
        Some(
            OptionValue::IntBool { value, enabled }
            | OptionValue::EnumBool { value, enabled },
        ) => format!("{}{value}", flag(*enabled)),
        Some(OptionValue::Text(s)) => s.clone(),
        None => option.unknown_raw().unwrap_or_default().to_owned(),
    }
}

/// Parses wire text into an option set, looking keys up in `registry`.
///
/// Parsing is all-or-nothing: the first bad record fails the whole list
/// and no partial set is returned. `""` and `-` both mean the empty set.
///
/// # Errors
/// - [`OptionError::Malformed`] for a record without `=` or with a bad key
/// - [`OptionError::Duplicate`] for a key that appears twice
/// - [`OptionError::InvalidValue`] for a value that doesn't parse for
///   its type
/// - [`OptionError::OutOfRange`] or [`OptionError::InvalidText`] for a
///   value its option rejects
pub fn parse(registry: &OptionRegistry, packed: &str) -> Result<OptionSet, OptionError> {
    let mut set = OptionSet::new();
    if packed.is_empty() || packed == EMPTY_PACKED {
        return Ok(set);
    }

    for record in packed.split(',') {
        let (key, raw) = record
            .split_once('=')
            .ok_or_else(|| OptionError::Malformed(format!("record {record:?} has no '='")))?;
        let key = OptionKey::new(key)
            .map_err(|_| OptionError::Malformed(format!("bad option key {key:?}")))?;
        if set.contains_key(key.as_str()) {
            return Err(OptionError::Duplicate(key));
        }

        let option = match registry.option(key.as_str()) {
            Some(mut option) => {
                parse_value(&mut option, raw)?;
                option
            }
            None => {
                tracing::debug!(%key, "carrying unknown option");
                GameOption::unknown(key, raw)
            }
        };
        set.insert(option);
    }
    Ok(set)
}

fn parse_value(option: &mut GameOption, raw: &str) -> Result<(), OptionError> {
    let invalid = |option: &GameOption| OptionError::InvalidValue {
        key: option.key().clone(),
        value: raw.to_owned(),
    };
    let Some(option_type) = option.definition().map(|d| d.option_type()) else {
        return Err(invalid(option));
    };

    match option_type {
        OptionType::Bool => {
            let b = parse_flag(raw).ok_or_else(|| invalid(option))?;
            option.set_bool_value(b)
        }
        OptionType::Int | OptionType::Enum => {
            let v = parse_int(raw).ok_or_else(|| invalid(option))?;
            option.set_int_value(v)
        }
        OptionType::IntBool | OptionType::EnumBool => {
            let (flag, number) = raw.split_at_checked(1).ok_or_else(|| invalid(option))?;
            let b = parse_flag(flag).ok_or_else(|| invalid(option))?;
            let v = parse_int(number).ok_or_else(|| invalid(option))?;
            option.set_int_value(v)?;
            option.set_bool_value(b)
        }
        OptionType::Str | OptionType::StrHide => option.set_string_value(raw),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "t" => Some(true),
        "f" => Some(false),
        _ => None,
    }
}

/// Plain decimal with an optional leading `-`.
fn parse_int(raw: &str) -> Option<i32> {
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}
