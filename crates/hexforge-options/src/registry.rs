//! The option registry: every option definition this build knows.
//!
//! A registry is built once at startup and then only read. Sessions
//! clone their starting [`OptionSet`] out of it with
//! [`OptionRegistry::default_set`].

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::{
    GameOption, OptionDefinition, OptionError, OptionKey, OptionKind, OptionSet,
    Version,
};

/// Key of the "Pirate Islands" scenario option, which changes some card
/// names.
pub const SC_PIRI: &str = "_SC_PIRI";

/// Known option definitions, keyed and ordered by [`OptionKey`].
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    definitions: BTreeMap<OptionKey, Arc<OptionDefinition>>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition after validating it.
    ///
    /// # Errors
    /// [`OptionError::Duplicate`] if the key is already registered, or the
    /// definition's own validation error.
    pub fn register(&mut self, definition: OptionDefinition) -> Result<(), OptionError> {
        definition.validate()?;
        if self.definitions.contains_key(definition.key()) {
            return Err(OptionError::Duplicate(definition.key().clone()));
        }
        self.definitions
            .insert(definition.key().clone(), Arc::new(definition));
        Ok(())
    }

    /// Builds a registry from a list of definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = OptionDefinition>,
    ) -> Result<Self, OptionError> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Builds a registry from a JSON array of definitions.
    ///
    /// ```rust
    /// use hexforge_options::OptionRegistry;
    ///
    /// let registry = OptionRegistry::from_json(r#"[
    ///     { "key": "RD", "kind": { "type": "Bool", "default": false },
    ///       "description": "Robber can't return to the desert" }
    /// ]"#).unwrap();
    /// assert!(registry.contains("RD"));
    /// ```
    ///
    /// # Errors
    /// [`OptionError::Json`] if the text doesn't deserialize, otherwise
    /// the first validation error of any definition.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, OptionError> {
        let definitions: Vec<OptionDefinition> =
            serde_json::from_str(json).map_err(|e| OptionError::Json(e.to_string()))?;
        Self::from_definitions(definitions)
    }

    /// The definitions shipped with this build.
    pub fn builtin() -> &'static OptionRegistry {
        static BUILTIN: LazyLock<OptionRegistry> = LazyLock::new(|| {
            OptionRegistry::from_definitions(builtin_definitions())
                .expect("built-in option definitions are valid")
        });
        &BUILTIN
    }

    pub fn get(&self, key: &str) -> Option<&Arc<OptionDefinition>> {
        self.definitions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<OptionDefinition>> {
        self.definitions.values()
    }

    /// A fresh option set holding every registered option at its default.
    pub fn default_set(&self) -> OptionSet {
        self.iter().cloned().map(GameOption::new).collect()
    }

    /// A fresh option `key` at its default, if registered.
    pub fn option(&self, key: &str) -> Option<GameOption> {
        self.get(key).cloned().map(GameOption::new)
    }
}

fn builtin_definitions() -> Vec<OptionDefinition> {
    let defs: [(&str, OptionKind, &str, Option<u32>); 11] = [
        (
            "PL",
            OptionKind::Int {
                min: 2,
                max: 6,
                default: 4,
            },
            "Maximum # players",
            Some(1108),
        ),
        (
            "RD",
            OptionKind::Bool { default: false },
            "Robber can't return to the desert",
            None,
        ),
        (
            "N7",
            OptionKind::IntBool {
                min: 1,
                max: 8,
                default: 7,
                default_enabled: false,
            },
            "Roll no 7s during first # rounds",
            Some(1107),
        ),
        (
            "BC",
            OptionKind::IntBool {
                min: 3,
                max: 9,
                default: 4,
                default_enabled: true,
            },
            "Break up clumps of # or more same-type hexes/ports",
            Some(1107),
        ),
        (
            "NT",
            OptionKind::Bool { default: false },
            "No trading allowed between players",
            Some(1107),
        ),
        (
            "VP",
            OptionKind::IntBool {
                min: 10,
                max: 20,
                default: 10,
                default_enabled: false,
            },
            "Victory points to win: #",
            Some(1114),
        ),
        (
            "DC",
            OptionKind::Enum {
                values: vec!["Standard".into(), "Reduced".into(), "None".into()],
                default: 1,
            },
            "Development card deck: #",
            Some(1112),
        ),
        (
            "SC",
            OptionKind::EnumBool {
                values: vec![
                    "Sea board".into(),
                    "Fog islands".into(),
                    "Through the desert".into(),
                ],
                default: 1,
                default_enabled: false,
            },
            "Use scenario: #",
            Some(2000),
        ),
        (
            "DS",
            OptionKind::Str {
                max_len: 24,
                default: String::new(),
            },
            "Game description",
            Some(1113),
        ),
        (
            "PW",
            OptionKind::StrHide { max_len: 12 },
            "Game password",
            Some(1113),
        ),
        (
            SC_PIRI,
            OptionKind::Bool { default: false },
            "Scenarios: Pirate Islands and fortresses",
            Some(2000),
        ),
    ];

    defs.into_iter()
        .filter_map(|(key, kind, description, min_version)| {
            let definition = match OptionDefinition::new(key, kind, description) {
                Ok(definition) => definition,
                Err(e) => {
                    tracing::error!(key, error = %e, "bad built-in option definition");
                    return None;
                }
            };
            Some(match min_version {
                Some(v) => definition.with_min_version(Version(v)),
                None => definition,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionType;

    #[test]
    fn test_builtin_has_every_definition() {
        let registry = OptionRegistry::builtin();
        assert_eq!(registry.len(), 11);
        for key in ["PL", "RD", "N7", "BC", "NT", "VP", "DC", "SC", "DS", "PW", SC_PIRI] {
            assert!(registry.contains(key), "{key}");
        }
        assert_eq!(registry.get("PW").unwrap().option_type(), OptionType::StrHide);
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = OptionRegistry::new();
        let def =
            OptionDefinition::new("RD", OptionKind::Bool { default: false }, "r").unwrap();
        registry.register(def.clone()).unwrap();
        assert_eq!(
            registry.register(def),
            Err(OptionError::Duplicate(OptionKey::new("RD").unwrap()))
        );
    }

    #[test]
    fn test_default_set_is_unchanged() {
        let set = OptionRegistry::builtin().default_set();
        assert_eq!(set.len(), 11);
        assert!(set.iter().all(|op| !op.is_changed()));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_validates_definitions() {
        let err = OptionRegistry::from_json(
            r#"[{ "key": "PL",
                  "kind": { "type": "Int", "min": 6, "max": 2, "default": 4 },
                  "description": "x" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, OptionError::InvalidDefinition { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_rejects_bad_key() {
        let err = OptionRegistry::from_json(
            r#"[{ "key": "TOO LONG KEY",
                  "kind": { "type": "Bool", "default": true },
                  "description": "x" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, OptionError::Json(_)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_reads_min_version() {
        let registry = OptionRegistry::from_json(
            r#"[{ "key": "BC",
                  "kind": { "type": "Int", "min": 3, "max": 4, "default": 4 },
                  "min_version": 1107,
                  "description": "Break up clumps of #" }]"#,
        )
        .unwrap();
        assert_eq!(registry.get("BC").unwrap().min_version(), Some(Version(1107)));
    }
}
