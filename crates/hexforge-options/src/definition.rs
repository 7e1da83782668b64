//! Option definitions: what an option is, before anyone sets it.
//!
//! A definition pairs an [`OptionKey`] with an [`OptionKind`], the single
//! tagged variant that holds the option's type together with its
//! constraints and default. Code that needs to behave differently per
//! type matches on the kind; nothing dispatches on widget classes or
//! other presentation objects.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use hexforge_protocol::is_single_line_and_safe;
use serde::{Deserialize, Serialize};

use crate::{OptionError, OptionValue, Version};

/// Longest allowed option key.
pub const MAX_KEY_LEN: usize = 8;

/// Widest integer range still edited as a pick-list of every value.
/// Wider ranges are edited as free text.
pub const INT_CHOICE_MAX_RANGE: i64 = 21;

/// Text fields for string options are never drawn wider than this.
pub const MAX_TEXT_FIELD_WIDTH: usize = 20;

/// Marks where an option's current value goes in its description.
pub const PLACEHOLDER: char = '#';

// ---------------------------------------------------------------------------
// OptionKey
// ---------------------------------------------------------------------------

/// Short, case-sensitive identifier of an option, such as `PL` or
/// `_SC_PIRI`.
///
/// Keys are 1 to [`MAX_KEY_LEN`] characters from `A-Z a-z 0-9 _`. That
/// keeps them safe inside packed option lists, where `=` and `,` are
/// structural.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct OptionKey(String);

impl OptionKey {
    /// Validates and wraps a key.
    ///
    /// # Errors
    /// Returns [`OptionError::InvalidKey`] for empty, overlong, or
    /// non-identifier keys.
    pub fn new(key: impl Into<String>) -> Result<Self, OptionError> {
        let key = key.into();
        let valid = !key.is_empty()
            && key.len() <= MAX_KEY_LEN
            && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if valid {
            Ok(Self(key))
        } else {
            Err(OptionError::InvalidKey(key))
        }
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets maps keyed by `OptionKey` be queried with a plain `&str`.
impl Borrow<str> for OptionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for OptionKey {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OptionKey {
    type Error = OptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionKey> for String {
    fn from(key: OptionKey) -> Self {
        key.0
    }
}

// ---------------------------------------------------------------------------
// OptionType / OptionKind
// ---------------------------------------------------------------------------

/// The bare type tag of an option, without its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Bool,
    Int,
    IntBool,
    Enum,
    EnumBool,
    Str,
    StrHide,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::IntBool => "IntBool",
            Self::Enum => "Enum",
            Self::EnumBool => "EnumBool",
            Self::Str => "Str",
            Self::StrHide => "StrHide",
        };
        f.write_str(name)
    }
}

/// An option's type, constraints and default value.
///
/// Enum defaults are 1-based indexes into `values`. `IntBool` and
/// `EnumBool` carry a number plus an on/off toggle.
///
/// In JSON the variant is internally tagged:
/// `{ "type": "Int", "min": 2, "max": 6, "default": 4 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OptionKind {
    Bool {
        default: bool,
    },
    Int {
        min: i32,
        max: i32,
        default: i32,
    },
    IntBool {
        min: i32,
        max: i32,
        default: i32,
        default_enabled: bool,
    },
    Enum {
        values: Vec<String>,
        default: i32,
    },
    EnumBool {
        values: Vec<String>,
        default: i32,
        default_enabled: bool,
    },
    Str {
        max_len: usize,
        #[serde(default)]
        default: String,
    },
    /// A string whose value UIs should mask (a password, say). The real
    /// text is stored; masking is up to whoever draws it.
    StrHide {
        max_len: usize,
    },
}

impl OptionKind {
    /// The bare type tag.
    pub fn option_type(&self) -> OptionType {
        match self {
            Self::Bool { .. } => OptionType::Bool,
            Self::Int { .. } => OptionType::Int,
            Self::IntBool { .. } => OptionType::IntBool,
            Self::Enum { .. } => OptionType::Enum,
            Self::EnumBool { .. } => OptionType::EnumBool,
            Self::Str { .. } => OptionType::Str,
            Self::StrHide { .. } => OptionType::StrHide,
        }
    }

    /// Inclusive integer bounds. Enums are bounded by `1..=values.len()`.
    pub fn int_bounds(&self) -> Option<(i32, i32)> {
        match self {
            Self::Int { min, max, .. } | Self::IntBool { min, max, .. } => {
                Some((*min, *max))
            }
            Self::Enum { values, .. } | Self::EnumBool { values, .. } => {
                let n = i32::try_from(values.len()).unwrap_or(i32::MAX);
                Some((1, n))
            }
            _ => None,
        }
    }

    /// `true` for the two types that carry an on/off toggle next to
    /// their number.
    pub fn has_toggle(&self) -> bool {
        matches!(self, Self::IntBool { .. } | Self::EnumBool { .. })
    }

    /// Longest accepted string, for the string types.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Self::Str { max_len, .. } | Self::StrHide { max_len } => {
                Some(*max_len)
            }
            _ => None,
        }
    }

    /// The value an option of this kind starts with.
    pub fn default_value(&self) -> OptionValue {
        match self {
            Self::Bool { default } => OptionValue::Bool(*default),
            Self::Int { default, .. } => OptionValue::Int(*default),
            Self::IntBool {
                default,
                default_enabled,
                ..
            } => OptionValue::IntBool {
                value: *default,
                enabled: *default_enabled,
            },
            Self::Enum { default, .. } => OptionValue::Enum(*default),
            Self::EnumBool {
                default,
                default_enabled,
                ..
            } => OptionValue::EnumBool {
                value: *default,
                enabled: *default_enabled,
            },
            Self::Str { default, .. } => OptionValue::Text(default.clone()),
            Self::StrHide { .. } => OptionValue::Text(String::new()),
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            Self::Bool { .. } => Ok(()),
            Self::Int { min, max, default }
            | Self::IntBool {
                min, max, default, ..
            } => {
                if min > max {
                    Err(format!("min {min} is greater than max {max}"))
                } else if default < min || default > max {
                    Err(format!("default {default} is outside {min}..={max}"))
                } else {
                    Ok(())
                }
            }
            Self::Enum { values, default }
            | Self::EnumBool {
                values, default, ..
            } => {
                if values.is_empty() {
                    return Err("enum has no values".into());
                }
                if i32::try_from(values.len()).is_err() {
                    return Err("enum has too many values".into());
                }
                let n = values.len() as i64;
                if i64::from(*default) < 1 || i64::from(*default) > n {
                    return Err(format!("default {default} is outside 1..={n}"));
                }
                Ok(())
            }
            Self::Str { max_len, default } => {
                if *max_len == 0 {
                    return Err("max_len must be at least 1".into());
                }
                if default.chars().count() > *max_len {
                    return Err(format!("default is longer than {max_len}"));
                }
                if !is_single_line_and_safe(default) {
                    return Err("default contains a reserved character".into());
                }
                Ok(())
            }
            Self::StrHide { max_len } => {
                if *max_len == 0 {
                    Err("max_len must be at least 1".into())
                } else {
                    Ok(())
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// EditorHint
// ---------------------------------------------------------------------------

/// How a UI should let someone edit an option.
///
/// Input widgets and validators on the other side of the boundary rely
/// on this, so it is a pure function of the definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorHint<'a> {
    /// An on/off checkbox.
    Toggle,
    /// A pick-list holding every integer in `min..=max`.
    IntChoice { min: i32, max: i32 },
    /// A free-text integer field this many characters wide.
    IntField { width: usize },
    /// A pick-list of the enum's labels.
    EnumChoice { labels: &'a [String] },
    /// A text field; `masked` fields hide what is typed.
    TextField { width: usize, masked: bool },
}

/// Width of the free-text field used for a wide integer range:
/// `1 + ceil(log10(max(|min|, |max|)))`, never less than 3.
///
/// Computed with integer arithmetic, so exact powers of ten are never
/// rounded up: a magnitude of 1000 gives width 4, 1001 gives width 5.
pub fn int_field_width(min: i32, max: i32) -> usize {
    let magnitude = i64::from(min).abs().max(i64::from(max).abs());
    let width = 1 + ceil_log10(magnitude);
    width.max(3)
}

/// `ceil(log10(n))` for `n >= 1`; 0 for `n <= 1`.
fn ceil_log10(n: i64) -> usize {
    if n <= 1 {
        return 0;
    }
    // ceil(log10(n)) is the digit count of n - 1 for n >= 2.
    let mut rest = n - 1;
    let mut digits = 0;
    while rest > 0 {
        rest /= 10;
        digits += 1;
    }
    digits
}

// ---------------------------------------------------------------------------
// OptionDefinition
// ---------------------------------------------------------------------------

/// A known game option.
///
/// Definitions are validated when built, so every definition in a
/// registry has a consistent kind and default.
///
/// ```rust
/// use hexforge_options::{OptionDefinition, OptionKind, Version};
///
/// let bc = OptionDefinition::new(
///     "BC",
///     OptionKind::Int { min: 3, max: 4, default: 4 },
///     "Break up clumps of # or more same-type hexes",
/// )
/// .unwrap()
/// .with_min_version(Version(1107));
///
/// assert_eq!(bc.min_version(), Some(Version(1107)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    key: OptionKey,
    kind: OptionKind,
    /// Oldest version that understands this option at a non-default
    /// value. `None` means every version does.
    #[serde(default)]
    min_version: Option<Version>,
    /// Display template. A `#` marks where the value goes.
    description: String,
}

impl OptionDefinition {
    /// Builds and validates a definition.
    ///
    /// # Errors
    /// - [`OptionError::InvalidKey`] for a bad key
    /// - [`OptionError::InvalidDefinition`] for inconsistent bounds or
    ///   defaults, or a multi-line description
    pub fn new(
        key: &str,
        kind: OptionKind,
        description: impl Into<String>,
    ) -> Result<Self, OptionError> {
        let definition = Self {
            key: OptionKey::new(key)?,
            kind,
            min_version: None,
            description: description.into(),
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Sets the version needed when the option is changed from its default.
    pub fn with_min_version(mut self, version: Version) -> Self {
        self.min_version = Some(version);
        self
    }

    /// Re-checks the definition. Deserialized definitions go through
    /// this before they reach a registry.
    pub fn validate(&self) -> Result<(), OptionError> {
        let invalid = |reason: String| OptionError::InvalidDefinition {
            key: self.key.clone(),
            reason,
        };
        if self.description.contains(['\n', '\r']) {
            return Err(invalid("description must be a single line".into()));
        }
        self.kind.check().map_err(invalid)
    }

    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    pub fn option_type(&self) -> OptionType {
        self.kind.option_type()
    }

    pub fn min_version(&self) -> Option<Version> {
        self.min_version
    }

    /// The raw description template, placeholder included. Turning it
    /// into display text is the localization layer's job.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Byte offset of the value placeholder in the description.
    ///
    /// Only numeric and enum options show their value inline, so string
    /// and boolean options always return `None`.
    pub fn placeholder_offset(&self) -> Option<usize> {
        if self.kind.int_bounds().is_none() {
            return None;
        }
        self.description.find(PLACEHOLDER)
    }

    /// Splits the description around the placeholder: the text before it
    /// (without trailing spaces) and the text after it.
    ///
    /// Without a placeholder the whole description comes back as the
    /// first part.
    pub fn description_parts(&self) -> (&str, &str) {
        match self.placeholder_offset() {
            Some(at) => (
                self.description[..at].trim_end(),
                &self.description[at + PLACEHOLDER.len_utf8()..],
            ),
            None => (&self.description, ""),
        }
    }

    /// How this option should be edited.
    pub fn editor(&self) -> EditorHint<'_> {
        match &self.kind {
            OptionKind::Bool { .. } => EditorHint::Toggle,
            OptionKind::Int { min, max, .. }
            | OptionKind::IntBool { min, max, .. } => {
                let range = i64::from(*max) - i64::from(*min);
                if (0..=INT_CHOICE_MAX_RANGE).contains(&range) {
                    EditorHint::IntChoice {
                        min: *min,
                        max: *max,
                    }
                } else {
                    EditorHint::IntField {
                        width: int_field_width(*min, *max),
                    }
                }
            }
            OptionKind::Enum { values, .. }
            | OptionKind::EnumBool { values, .. } => {
                EditorHint::EnumChoice { labels: values }
            }
            OptionKind::Str { max_len, .. } => EditorHint::TextField {
                width: (*max_len).min(MAX_TEXT_FIELD_WIDTH),
                masked: false,
            },
            OptionKind::StrHide { max_len } => EditorHint::TextField {
                width: (*max_len).min(MAX_TEXT_FIELD_WIDTH),
                masked: true,
            },
        }
    }

    /// The value a fresh option of this definition holds.
    pub fn default_value(&self) -> OptionValue {
        self.kind.default_value()
    }
}
