//! A game's option set: every option the game was created with, keyed by
//! [`OptionKey`].

use std::collections::HashMap;
use std::collections::hash_map;

use crate::{GameOption, OptionKey};

/// The options of one game.
///
/// Keys are unique. Known and unknown options live side by side so an
/// older peer can forward a newer peer's list untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: HashMap<OptionKey, GameOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `option`, replacing and returning any option with the same key.
    pub fn insert(&mut self, option: GameOption) -> Option<GameOption> {
        self.options.insert(option.key().clone(), option)
    }

    pub fn get(&self, key: &str) -> Option<&GameOption> {
        self.options.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut GameOption> {
        self.options.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<GameOption> {
        self.options.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates in no particular order.
    pub fn iter(&self) -> hash_map::Values<'_, OptionKey, GameOption> {
        self.options.values()
    }

    /// Options in the order a list of them should be shown: by description,
    /// then key. Unknown options have no description and come last.
    pub fn sorted_for_display(&self) -> Vec<&GameOption> {
        let mut sorted: Vec<&GameOption> = self.options.values().collect();
        sorted.sort_by(|a, b| {
            let da = a.definition().map(|d| d.description());
            let db = b.definition().map(|d| d.description());
            // `None` sorts before `Some`, so compare flipped presence first.
            db.is_some()
                .cmp(&da.is_some())
                .then_with(|| da.cmp(&db))
                .then_with(|| a.key().cmp(b.key()))
        });
        sorted
    }

    /// Drops every option this build doesn't know and returns their keys,
    /// sorted. Running it again removes nothing.
    pub fn remove_unknown(&mut self) -> Vec<OptionKey> {
        let mut removed: Vec<OptionKey> = self
            .options
            .values()
            .filter(|op| op.is_unknown())
            .map(|op| op.key().clone())
            .collect();
        removed.sort();
        for key in &removed {
            self.options.remove(key);
        }
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "removed unknown options");
        }
        removed
    }

    /// `true` if the option `key` exists and [is set](GameOption::is_set).
    pub fn is_option_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(GameOption::is_set)
    }

    /// The option's integer value, if present and numeric.
    pub fn int_value(&self, key: &str) -> Option<i32> {
        self.get(key)?.int_value()
    }
}

impl FromIterator<GameOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = GameOption>>(iter: I) -> Self {
        let mut set = Self::new();
        for option in iter {
            set.insert(option);
        }
        set
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a GameOption;
    type IntoIter = hash_map::Values<'a, OptionKey, GameOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
