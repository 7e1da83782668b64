//! Development card types and their localization keys.
//!
//! Some option settings rename cards: with the Pirate Islands scenario
//! option set, the knight is a warship.

use hexforge_options::{OptionSet, SC_PIRI};

/// A development card type, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DevCard {
    Unknown = 0,
    RoadBuilding = 1,
    YearOfPlenty = 2,
    Monopoly = 3,
    Capitol = 4,
    Market = 5,
    University = 6,
    Temple = 7,
    Chapel = 8,
    Knight = 9,
}

impl DevCard {
    pub const ALL: [DevCard; 10] = [
        Self::Unknown,
        Self::RoadBuilding,
        Self::YearOfPlenty,
        Self::Monopoly,
        Self::Capitol,
        Self::Market,
        Self::University,
        Self::Temple,
        Self::Chapel,
        Self::Knight,
    ];

    /// The card for a wire code. Codes outside the known range are
    /// [`DevCard::Unknown`].
    pub fn from_code(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::Unknown)
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// `true` for the cards worth one victory point.
    pub fn is_victory_point(self) -> bool {
        (Self::Capitol.code()..=Self::Chapel.code()).contains(&self.code())
    }

    /// Localization key of the card's name. `with_article` picks the
    /// "a Market" form over "Market".
    pub fn name_key(self, options: Option<&OptionSet>, with_article: bool) -> &'static str {
        if self == Self::Knight && options.is_some_and(|set| set.is_option_set(SC_PIRI)) {
            return if with_article {
                "spec.dcards.aknightsoldier.warship"
            } else {
                "spec.dcards.knightsoldier.warship"
            };
        }

        let (plain, article) = match self {
            Self::Unknown => ("spec.dcards.unknown", "spec.dcards.aunknown"),
            Self::RoadBuilding => ("spec.dcards.roadbuilding", "spec.dcards.aroadbuilding"),
            Self::YearOfPlenty => ("spec.dcards.discoveryplenty", "spec.dcards.adiscoveryplenty"),
            Self::Monopoly => ("spec.dcards.monopoly", "spec.dcards.amonopoly"),
            Self::Capitol => ("spec.dcards.capgovhouse", "spec.dcards.acapgovhouse"),
            Self::Market => ("spec.dcards.libmarket", "spec.dcards.alibmarket"),
            Self::University => ("spec.dcards.university", "spec.dcards.auniversity"),
            Self::Temple => ("spec.dcards.temple", "spec.dcards.atemple"),
            Self::Chapel => ("spec.dcards.towerchapel", "spec.dcards.atowerchapel"),
            Self::Knight => ("spec.dcards.knightsoldier", "spec.dcards.aknightsoldier"),
        };
        if with_article { article } else { plain }
    }
}

/// Localization key for the card with wire code `card`.
///
/// Unknown codes give the unknown-card key.
pub fn card_name_key(card: i32, options: Option<&OptionSet>, with_article: bool) -> &'static str {
    DevCard::from_code(card).name_key(options, with_article)
}
