//! Version negotiation: which software versions can play with a given set
//! of options.
//!
//! Every option definition may name the oldest version that understands
//! it. An option still at its default never restricts anyone, so the
//! floor a game needs is the newest `min_version` among its *changed*
//! options.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{OptionSet, VersionError};

/// A software version as a single number: `1107` is version 1.1.07.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u32);

impl Version {
    /// The version of this build.
    pub const CURRENT: Version = Version(2000);

    /// The oldest version this build still talks to.
    pub const OLDEST: Version = Version(1000);

    /// Wire form of an optional minimum: `-1` means no restriction.
    pub fn to_wire(version: Option<Version>) -> i32 {
        version.map_or(-1, |v| i32::try_from(v.0).unwrap_or(i32::MAX))
    }

    /// Reads a wire minimum. Negative numbers mean no restriction.
    pub fn from_wire(value: i32) -> Option<Version> {
        u32::try_from(value).ok().map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / 1000;
        let minor = (self.0 / 100) % 10;
        let patch = self.0 % 100;
        write!(f, "{major}.{minor}.{patch:02}")
    }
}

/// The oldest version that can honor `set`, or `None` if any version can.
///
/// Only known options that differ from their default and whose
/// definition declares a minimum version count.
pub fn minimum_version(set: &OptionSet) -> Option<Version> {
    set.iter()
        .filter(|op| op.is_changed())
        .filter_map(|op| op.definition()?.min_version())
        .max()
}

/// Checks whether a participant at `version` can join a game with `set`.
///
/// # Errors
/// [`VersionError::VersionTooOld`] if `version` is below the set's
/// minimum.
pub fn check_participant(set: &OptionSet, version: Version) -> Result<(), VersionError> {
    match minimum_version(set) {
        Some(required) if version < required => Err(VersionError::VersionTooOld {
            required,
            actual: version,
        }),
        _ => Ok(()),
    }
}

/// How game creation treats options that need a newer version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Versions at or above this need no warning. Usually the oldest
    /// version expected to connect.
    pub baseline: Version,
    /// Require an explicit confirmation when the options need more than
    /// `baseline`. Off for local games, which nobody else joins.
    pub confirm_minimum: bool,
}

impl NegotiationConfig {
    /// Settings for a game other clients may join.
    pub fn networked(baseline: Version) -> Self {
        Self {
            baseline,
            confirm_minimum: true,
        }
    }

    /// Settings for a local practice game: never asks for confirmation.
    pub fn local() -> Self {
        Self {
            baseline: Version::CURRENT,
            confirm_minimum: false,
        }
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self::networked(Version::OLDEST)
    }
}

/// Computes a game's minimum version at creation time.
#[derive(Debug, Clone, Default)]
pub struct VersionNegotiator {
    config: NegotiationConfig,
}

impl VersionNegotiator {
    pub fn new(config: NegotiationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Returns the minimum version `set` needs.
    ///
    /// `confirmed` is the requester's explicit go-ahead after being told
    /// that older clients won't be able to join.
    ///
    /// # Errors
    /// [`VersionError::VersionTooOld`] when the minimum is above the
    /// baseline, confirmation is required, and `confirmed` is false.
    pub fn negotiate(
        &self,
        set: &OptionSet,
        confirmed: bool,
    ) -> Result<Option<Version>, VersionError> {
        let minimum = minimum_version(set);
        let needs_confirmation = self.config.confirm_minimum && !confirmed;
        match minimum {
            Some(required) if required > self.config.baseline && needs_confirmation => {
                tracing::debug!(
                    %required,
                    baseline = %self.config.baseline,
                    "minimum version needs confirmation"
                );
                Err(VersionError::VersionTooOld {
                    required,
                    actual: self.config.baseline,
                })
            }
            _ => Ok(minimum),
        }
    }
}
