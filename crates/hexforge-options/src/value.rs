//! Option values: one game's current setting for one option.
//!
//! A [`GameOption`] is either *known* (its key is in the local registry,
//! so it has a definition and a typed value) or *unknown* (a newer peer
//! sent a key this build doesn't define). Unknown options keep their raw
//! wire text so they can be carried without being corrupted, but they
//! can't be edited, validated, or counted toward a minimum version.
//!
//! Every setter either applies the write completely or leaves the value
//! exactly as it was and returns an error.

use std::sync::Arc;

use hexforge_protocol::is_single_line_and_safe;

use crate::{OptionDefinition, OptionError, OptionKey, OptionKind};

/// A typed option value.
///
/// Enum values are 1-based indexes into the definition's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    IntBool { value: i32, enabled: bool },
    Enum(i32),
    EnumBool { value: i32, enabled: bool },
    /// Both `Str` and `StrHide` options hold plain text.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Known {
        definition: Arc<OptionDefinition>,
        value: OptionValue,
    },
    Unknown {
        raw: String,
    },
}

/// One option in one game's option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOption {
    key: OptionKey,
    slot: Slot,
}

impl GameOption {
    /// A known option at its default value.
    pub fn new(definition: Arc<OptionDefinition>) -> Self {
        let value = definition.default_value();
        Self {
            key: definition.key().clone(),
            slot: Slot::Known { definition, value },
        }
    }

    /// An option whose key this build doesn't define. `raw` is the value
    /// text exactly as it arrived.
    pub fn unknown(key: OptionKey, raw: impl Into<String>) -> Self {
        Self {
            key,
            slot: Slot::Unknown { raw: raw.into() },
        }
    }

    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    /// The definition, or `None` for an unknown option.
    pub fn definition(&self) -> Option<&OptionDefinition> {
        match &self.slot {
            Slot::Known { definition, .. } => Some(definition.as_ref()),
            Slot::Unknown { .. } => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.slot, Slot::Unknown { .. })
    }

    /// The typed value, or `None` for an unknown option.
    pub fn value(&self) -> Option<&OptionValue> {
        match &self.slot {
            Slot::Known { value, .. } => Some(value),
            Slot::Unknown { .. } => None,
        }
    }

    /// The untouched wire text of an unknown option.
    pub fn unknown_raw(&self) -> Option<&str> {
        match &self.slot {
            Slot::Unknown { raw } => Some(raw),
            Slot::Known { .. } => None,
        }
    }

    /// Boolean value of a `Bool`, or the toggle of an `IntBool`/`EnumBool`.
    /// `false` for every other type.
    pub fn bool_value(&self) -> bool {
        match self.value() {
            Some(OptionValue::Bool(b)) => *b,
            Some(
                OptionValue::IntBool { enabled, .. }
                | OptionValue::EnumBool { enabled, .. },
            ) => *enabled,
            _ => false,
        }
    }

    /// Integer value of an `Int*`/`Enum*` option.
    pub fn int_value(&self) -> Option<i32> {
        match self.value()? {
            OptionValue::Int(v)
            | OptionValue::Enum(v)
            | OptionValue::IntBool { value: v, .. }
            | OptionValue::EnumBool { value: v, .. } => Some(*v),
            _ => None,
        }
    }

    /// Text of a `Str`/`StrHide` option.
    pub fn string_value(&self) -> Option<&str> {
        match self.value()? {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `true` if the value differs from the definition's default.
    /// Unknown options are never "changed": nothing here can judge them.
    pub fn is_changed(&self) -> bool {
        match &self.slot {
            Slot::Known { definition, value } => {
                *value != definition.default_value()
            }
            Slot::Unknown { .. } => false,
        }
    }

    /// `true` if the option is in effect for game rules: a true `Bool`,
    /// an enabled `IntBool`/`EnumBool`, a changed `Int`/`Enum`, or a
    /// non-empty string.
    pub fn is_set(&self) -> bool {
        match self.value() {
            Some(OptionValue::Bool(b)) => *b,
            Some(
                OptionValue::IntBool { enabled, .. }
                | OptionValue::EnumBool { enabled, .. },
            ) => *enabled,
            Some(OptionValue::Int(_) | OptionValue::Enum(_)) => self.is_changed(),
            Some(OptionValue::Text(s)) => !s.is_empty(),
            None => false,
        }
    }

    /// Index of the current value in the option's pick-list: `value - min`
    /// for integers, `value - 1` for enums.
    pub fn choice_index(&self) -> Option<usize> {
        let (min, _) = self.definition()?.kind().int_bounds()?;
        let value = self.int_value()?;
        usize::try_from(i64::from(value) - i64::from(min)).ok()
    }

    // -- Setters ----------------------------------------------------------

    /// Sets a `Bool` value, or the toggle of an `IntBool`/`EnumBool`.
    ///
    /// # Errors
    /// [`OptionError::UnknownOption`] or [`OptionError::TypeMismatch`].
    pub fn set_bool_value(&mut self, b: bool) -> Result<(), OptionError> {
        let key = self.key.clone();
        match self.value_mut()? {
            OptionValue::Bool(v) => *v = b,
            OptionValue::IntBool { enabled, .. }
            | OptionValue::EnumBool { enabled, .. } => *enabled = b,
            _ => {
                return Err(OptionError::TypeMismatch {
                    key,
                    expected: "boolean",
                });
            }
        }
        Ok(())
    }

    /// Sets the number of an `Int*` option, or the 1-based index of an
    /// `Enum*` option.
    ///
    /// A value outside the bounds is rejected and the old value stays;
    /// nothing is clamped.
    ///
    /// # Errors
    /// [`OptionError::OutOfRange`], [`OptionError::UnknownOption`] or
    /// [`OptionError::TypeMismatch`].
    pub fn set_int_value(&mut self, v: i32) -> Result<(), OptionError> {
        self.set_int_checked(i64::from(v))
    }

    /// Selects entry `index` (0-based) of the option's pick-list: stores
    /// `min + index` for integers and `index + 1` for enums.
    ///
    /// # Errors
    /// Same as [`set_int_value`](Self::set_int_value).
    pub fn select_index(&mut self, index: usize) -> Result<(), OptionError> {
        let min = self
            .definition()
            .and_then(|d| d.kind().int_bounds())
            .map_or(0, |(min, _)| min);
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        self.set_int_checked(i64::from(min).saturating_add(index))
    }

    fn set_int_checked(&mut self, v: i64) -> Result<(), OptionError> {
        let key = self.key.clone();
        let Slot::Known { definition, value } = &mut self.slot else {
            return Err(OptionError::UnknownOption(key));
        };
        let Some((min, max)) = definition.kind().int_bounds() else {
            return Err(OptionError::TypeMismatch {
                key,
                expected: "integer or enum",
            });
        };
        if v < i64::from(min) || v > i64::from(max) {
            tracing::debug!(%key, value = v, min, max, "option value out of range, unchanged");
            return Err(OptionError::OutOfRange {
                key,
                value: v,
                min,
                max,
            });
        }
        let v = i32::try_from(v).map_err(|_| OptionError::OutOfRange {
            key: key.clone(),
            value: v,
            min,
            max,
        })?;
        match value {
            OptionValue::Int(n)
            | OptionValue::Enum(n)
            | OptionValue::IntBool { value: n, .. }
            | OptionValue::EnumBool { value: n, .. } => *n = v,
            OptionValue::Bool(_) | OptionValue::Text(_) => {
                return Err(OptionError::TypeMismatch {
                    key,
                    expected: "integer or enum",
                });
            }
        }
        Ok(())
    }

    /// Sets the text of a `Str`/`StrHide` option.
    ///
    /// Text longer than the option's `max_len` is cut to `max_len`
    /// characters. `StrHide` stores the real text.
    ///
    /// # Errors
    /// [`OptionError::InvalidText`] if `v` holds a line break, a control
    /// character, `|` or `,`; [`OptionError::UnknownOption`] or
    /// [`OptionError::TypeMismatch`] otherwise.
    pub fn set_string_value(&mut self, v: &str) -> Result<(), OptionError> {
        let key = self.key.clone();
        let Slot::Known { definition, value } = &mut self.slot else {
            return Err(OptionError::UnknownOption(key));
        };
        let (OptionKind::Str { max_len, .. } | OptionKind::StrHide { max_len }) =
            definition.kind()
        else {
            return Err(OptionError::TypeMismatch {
                key,
                expected: "string",
            });
        };
        if !is_single_line_and_safe(v) {
            tracing::debug!(%key, "option text rejected, unchanged");
            return Err(OptionError::InvalidText { key });
        }
        *value = OptionValue::Text(v.chars().take(*max_len).collect());
        Ok(())
    }

    fn value_mut(&mut self) -> Result<&mut OptionValue, OptionError> {
        match &mut self.slot {
            Slot::Known { value, .. } => Ok(value),
            Slot::Unknown { .. } => Err(OptionError::UnknownOption(self.key.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(key: &str, kind: OptionKind) -> GameOption {
        GameOption::new(Arc::new(
            OptionDefinition::new(key, kind, "Test option #").unwrap(),
        ))
    }

    fn int_option(min: i32, max: i32, default: i32) -> GameOption {
        option("PL", OptionKind::Int { min, max, default })
    }

    fn enum_option() -> GameOption {
        option(
            "DC",
            OptionKind::Enum {
                values: vec!["Standard".into(), "Reduced".into(), "None".into()],
                default: 1,
            },
        )
    }

    fn text_option(max_len: usize) -> GameOption {
        option(
            "DS",
            OptionKind::Str {
                max_len,
                default: String::new(),
            },
        )
    }

    // =====================================================================
    // set_int_value()
    // =====================================================================

    #[test]
    fn test_set_int_value_inside_range_sets_value() {
        let mut op = int_option(2, 6, 4);
        for v in 2..=6 {
            op.set_int_value(v).unwrap();
            assert_eq!(op.int_value(), Some(v));
        }
    }

    #[test]
    fn test_set_int_value_outside_range_is_noop() {
        let mut op = int_option(2, 6, 4);
        op.set_int_value(5).unwrap();
        for v in [i32::MIN, -1, 0, 1, 7, 100, i32::MAX] {
            let err = op.set_int_value(v).unwrap_err();
            assert!(matches!(err, OptionError::OutOfRange { .. }));
            assert_eq!(op.int_value(), Some(5), "value changed by {v}");
        }
    }

    #[test]
    fn test_set_int_value_on_bool_is_type_mismatch() {
        let mut op = option("RD", OptionKind::Bool { default: false });
        assert!(matches!(
            op.set_int_value(1),
            Err(OptionError::TypeMismatch { .. })
        ));
        assert!(!op.bool_value());
    }

    #[test]
    fn test_set_int_value_enum_zero_is_rejected() {
        let mut op = enum_option();
        op.set_int_value(3).unwrap();
        assert!(op.set_int_value(0).is_err());
        assert!(op.set_int_value(4).is_err());
        assert_eq!(op.int_value(), Some(3));
    }

    #[test]
    fn test_int_bool_keeps_toggle_and_number_separately() {
        let mut op = option(
            "N7",
            OptionKind::IntBool {
                min: 1,
                max: 8,
                default: 7,
                default_enabled: false,
            },
        );
        op.set_int_value(3).unwrap();
        assert!(!op.bool_value());
        op.set_bool_value(true).unwrap();
        assert_eq!(
            op.value(),
            Some(&OptionValue::IntBool {
                value: 3,
                enabled: true
            })
        );
    }

    // =====================================================================
    // select_index()
    // =====================================================================

    #[test]
    fn test_select_index_enum_stores_one_based() {
        let mut op = enum_option();
        for i in 0..3 {
            op.select_index(i).unwrap();
            assert_eq!(op.int_value(), Some(i as i32 + 1));
            assert_eq!(op.choice_index(), Some(i));
        }
        assert!(op.select_index(3).is_err());
        assert_eq!(op.int_value(), Some(3));
    }

    #[test]
    fn test_select_index_int_offsets_by_min() {
        let mut op = int_option(2, 6, 4);
        op.select_index(0).unwrap();
        assert_eq!(op.int_value(), Some(2));
        op.select_index(4).unwrap();
        assert_eq!(op.int_value(), Some(6));
        assert!(op.select_index(usize::MAX).is_err());
        assert_eq!(op.int_value(), Some(6));
    }

    // =====================================================================
    // set_string_value()
    // =====================================================================

    #[test]
    fn test_select_index_beyond_i32_is_out_of_range() {
        let mut op = int_option(0, i32::MAX, 0);
        let top = usize::try_from(i32::MAX).unwrap();
        op.select_index(top).unwrap();
        assert_eq!(op.int_value(), Some(i32::MAX));

        for index in [top + 1, usize::MAX] {
            let err = op.select_index(index).unwrap_err();
            assert!(matches!(err, OptionError::OutOfRange { .. }));
            assert_eq!(op.int_value(), Some(i32::MAX));
        }
    }

    #[test]
    fn test_set_string_value_rejects_newline_and_separator() {
        let mut op = text_option(20);
        op.set_string_value("fine").unwrap();
        for bad in ["two\nlines", "pi|pe", "com,ma", "cr\r"] {
            assert_eq!(
                op.set_string_value(bad),
                Err(OptionError::InvalidText {
                    key: OptionKey::new("DS").unwrap()
                })
            );
            assert_eq!(op.string_value(), Some("fine"));
        }
    }

    #[test]
    fn test_set_string_value_truncates_at_max_len() {
        let mut op = text_option(5);
        op.set_string_value("Settlers").unwrap();
        assert_eq!(op.string_value(), Some("Settl"));
        // Multi-byte characters count as one.
        op.set_string_value("\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}").unwrap();
        assert_eq!(op.string_value().map(|s| s.chars().count()), Some(5));
    }

    #[test]
    fn test_str_hide_stores_plaintext() {
        let mut op = option("PW", OptionKind::StrHide { max_len: 12 });
        op.set_string_value("hunter2").unwrap();
        assert_eq!(op.string_value(), Some("hunter2"));
    }

    // =====================================================================
    // Unknown options
    // =====================================================================

    #[test]
    fn test_unknown_option_rejects_every_setter() {
        let key = OptionKey::new("ZZ").unwrap();
        let mut op = GameOption::unknown(key.clone(), "t5");
        assert_eq!(
            op.set_bool_value(true),
            Err(OptionError::UnknownOption(key.clone()))
        );
        assert_eq!(op.set_int_value(1), Err(OptionError::UnknownOption(key.clone())));
        assert_eq!(
            op.set_string_value("x"),
            Err(OptionError::UnknownOption(key))
        );
        assert_eq!(op.unknown_raw(), Some("t5"));
        assert!(!op.is_changed());
        assert!(!op.is_set());
    }

    // =====================================================================
    // is_changed() / is_set()
    // =====================================================================

    #[test]
    fn test_is_changed_compares_with_default() {
        let mut op = int_option(3, 4, 4);
        assert!(!op.is_changed());
        op.set_int_value(3).unwrap();
        assert!(op.is_changed());
        op.set_int_value(4).unwrap();
        assert!(!op.is_changed());
    }

    #[test]
    fn test_is_set_by_type() {
        let mut b = option("NT", OptionKind::Bool { default: false });
        assert!(!b.is_set());
        b.set_bool_value(true).unwrap();
        assert!(b.is_set());

        let mut i = int_option(2, 6, 4);
        assert!(!i.is_set());
        i.set_int_value(6).unwrap();
        assert!(i.is_set());

        let mut s = text_option(10);
        assert!(!s.is_set());
        s.set_string_value("x").unwrap();
        assert!(s.is_set());
    }
}
