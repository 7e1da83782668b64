//! Raw per-option edits, as a UI hands them over, and how each one is
//! validated against its option.

use hexforge_options::{OptionError, OptionKey, OptionSet, OptionType};

/// Shown when a string edit holds a line break or a reserved character.
pub const MSG_SINGLE_LINE: &str = "Please use only a single line of text here.";

/// Shown when a number field holds something other than a number.
pub const MSG_DIGITS_ONLY: &str = "Please use only digits here.";

/// Shown when a pick-list has nothing selected.
pub const MSG_CHOOSE_VALUE: &str = "Please choose a value.";

/// What the person did to one option's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditInput {
    /// A checkbox state: a `Bool`, or the toggle of an `IntBool`/`EnumBool`.
    Toggle(bool),
    /// Text typed into a field: a string option, or a number typed into
    /// a wide integer field.
    Text(String),
    /// A pick-list selection, `None` when nothing is selected.
    Choice(Option<usize>),
}

/// One raw edit to one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEdit {
    pub key: OptionKey,
    pub input: EditInput,
}

impl OptionEdit {
    pub fn new(key: OptionKey, input: EditInput) -> Self {
        Self { key, input }
    }
}

/// An edit that didn't validate: which option, and what to tell the person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFailure {
    pub key: OptionKey,
    pub message: String,
}

/// Applies one edit to `set`. On failure the option keeps its value.
pub(crate) fn apply_edit(set: &mut OptionSet, edit: &OptionEdit) -> Result<(), EditFailure> {
    let fail = |message: String| EditFailure {
        key: edit.key.clone(),
        message,
    };
    let option = set
        .get_mut(edit.key.as_str())
        .ok_or_else(|| fail(OptionError::UnknownOption(edit.key.clone()).to_string()))?;
    let Some(definition) = option.definition() else {
        return Err(fail(OptionError::UnknownOption(edit.key.clone()).to_string()));
    };
    let option_type = definition.option_type();
    let bounds = definition.kind().int_bounds();

    let result = match (&edit.input, option_type) {
        (EditInput::Toggle(b), _) => option.set_bool_value(*b),
        (EditInput::Text(text), OptionType::Str | OptionType::StrHide) => option
            .set_string_value(text.trim())
            .map_err(|_| OptionError::InvalidText {
                key: edit.key.clone(),
            }),
        (EditInput::Text(text), _) if bounds.is_some() => {
            let Ok(v) = text.trim().parse::<i64>() else {
                return Err(fail(MSG_DIGITS_ONLY.to_owned()));
            };
            match i32::try_from(v) {
                Ok(v) => option.set_int_value(v),
                Err(_) => Err(out_of_range(&edit.key, v, bounds)),
            }
        }
        (EditInput::Choice(None), _) => return Err(fail(MSG_CHOOSE_VALUE.to_owned())),
        (EditInput::Choice(Some(i)), _) => option.select_index(*i),
        (EditInput::Text(_), _) => Err(OptionError::TypeMismatch {
            key: edit.key.clone(),
            expected: "text or number",
        }),
    };

    result.map_err(|e| {
        tracing::debug!(key = %edit.key, error = %e, "option edit rejected");
        fail(failure_message(&e))
    })
}

fn out_of_range(key: &OptionKey, value: i64, bounds: Option<(i32, i32)>) -> OptionError {
    let (min, max) = bounds.unwrap_or((0, 0));
    OptionError::OutOfRange {
        key: key.clone(),
        value,
        min,
        max,
    }
}

/// The text shown next to a rejected field.
fn failure_message(error: &OptionError) -> String {
    match error {
        OptionError::OutOfRange { min, max, .. } => {
            format!("Out of range: Should be {min} to {max}")
        }
        OptionError::InvalidText { .. } => MSG_SINGLE_LINE.to_owned(),
        other => other.to_string(),
    }
}
