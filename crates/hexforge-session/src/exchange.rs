//! The option exchange: one session's options, from first edit to the
//! server's answer.

use std::fmt;

use hexforge_options::{pack, parse, OptionRegistry, OptionSet, VersionNegotiator};

use crate::edit::apply_edit;
use crate::{
    validate_game_name, EditFailure, GameCreation, GameDirectory, GameRequest,
    OptionEdit, ReportPolicy, SessionError,
};

// ---------------------------------------------------------------------------
// ExchangePhase
// ---------------------------------------------------------------------------

/// Where an exchange is in its lifecycle.
///
/// ```text
/// Editing ──(submit)──→ Submitted ──(acknowledge)──→ Acknowledged
/// ```
///
/// - **Editing**: local edits are accepted.
/// - **Submitted**: the game request went out; nothing changes until the
///   server answers.
/// - **Acknowledged**: the server accepted the game; only updates coming
///   from the server are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Editing,
    Submitted,
    Acknowledged,
}

impl ExchangePhase {
    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Editing => Some(Self::Submitted),
            Self::Submitted => Some(Self::Acknowledged),
            Self::Acknowledged => None,
        }
    }
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editing => write!(f, "editing"),
            Self::Submitted => write!(f, "submitted"),
            Self::Acknowledged => write!(f, "acknowledged"),
        }
    }
}

// ---------------------------------------------------------------------------
// OptionExchange
// ---------------------------------------------------------------------------

/// Owns one session's [`OptionSet`] and decides who may change it when.
///
/// Only the owner of the exchange mutates its options, so there is
/// never more than one writer.
#[derive(Debug, Clone)]
pub struct OptionExchange {
    options: OptionSet,
    phase: ExchangePhase,
    read_only: bool,
    policy: ReportPolicy,
}

impl OptionExchange {
    /// Starts editing `options`.
    pub fn new(options: OptionSet) -> Self {
        Self {
            options,
            phase: ExchangePhase::Editing,
            read_only: false,
            policy: ReportPolicy::default(),
        }
    }

    /// Starts editing a fresh copy of the registry's defaults.
    pub fn from_registry(registry: &OptionRegistry) -> Self {
        Self::new(registry.default_set())
    }

    /// A view of an existing game's options. Nothing can be edited or
    /// submitted through it.
    pub fn read_only(mut options: OptionSet) -> Self {
        options.remove_unknown();
        Self {
            read_only: true,
            ..Self::new(options)
        }
    }

    /// Sets which failure a rejected batch of edits reports.
    pub fn with_policy(mut self, policy: ReportPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn into_options(self) -> OptionSet {
        self.options
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    /// Applies local edits in order.
    ///
    /// Every edit is validated, even after one fails; the ones that pass
    /// take effect and the ones that fail leave their option as it was.
    ///
    /// # Errors
    /// - [`SessionError::ReadOnly`] / [`SessionError::WrongPhase`] if
    ///   editing isn't allowed; nothing is applied then.
    /// - [`SessionError::Validation`] if any edit failed, reported per
    ///   the exchange's policy.
    pub fn apply_edits<I>(&mut self, edits: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = OptionEdit>,
    {
        self.ensure_editable("edit options")?;

        let failures: Vec<EditFailure> = edits
            .into_iter()
            .filter_map(|edit| apply_edit(&mut self.options, &edit).err())
            .collect();

        match self.policy.report(failures) {
            Some(report) => Err(SessionError::Validation(report)),
            None => Ok(()),
        }
    }

    /// Validates the request and turns the options into a game creation.
    ///
    /// Steps, in order: the game name is trimmed and checked, it must not
    /// already be in `directory`, unknown options are dropped, and the
    /// minimum version is negotiated. On success the exchange moves to
    /// [`ExchangePhase::Submitted`].
    ///
    /// # Errors
    /// - [`SessionError::ReadOnly`] / [`SessionError::WrongPhase`]
    /// - [`SessionError::InvalidGameName`] / [`SessionError::GameExists`]
    /// - [`SessionError::Version`] when the options need a newer version
    ///   than the negotiator's baseline and `request.confirmed` is false.
    ///   Re-submit with `confirmed` set to go ahead.
    pub fn submit<D>(
        &mut self,
        request: &GameRequest,
        directory: &D,
        negotiator: &VersionNegotiator,
    ) -> Result<GameCreation, SessionError>
    where
        D: GameDirectory + ?Sized,
    {
        self.ensure_editable("submit")?;

        let game = validate_game_name(&request.game)?;
        if directory.game_exists(&game) {
            return Err(SessionError::GameExists(game));
        }

        let removed = self.options.remove_unknown();
        if !removed.is_empty() {
            tracing::debug!(%game, ?removed, "dropped unknown options before submit");
        }

        let minimum_version = negotiator.negotiate(&self.options, request.confirmed)?;
        self.phase = ExchangePhase::Submitted;
        tracing::info!(%game, ?minimum_version, "game submitted");

        Ok(GameCreation {
            nickname: request.nickname.clone(),
            password: request.password.clone(),
            host: request.host.clone(),
            game,
            minimum_version,
            options: pack(&self.options),
        })
    }

    /// Records that the server accepted the submitted game.
    ///
    /// # Errors
    /// [`SessionError::WrongPhase`] unless the exchange was submitted.
    pub fn acknowledge(&mut self) -> Result<(), SessionError> {
        self.transition(ExchangePhase::Acknowledged, "acknowledge")
    }

    /// Replaces the options with a list packed by the server.
    ///
    /// The list is parsed completely before anything is replaced, so a
    /// bad list leaves the current options untouched.
    ///
    /// # Errors
    /// [`SessionError::WrongPhase`] before acknowledgment, or
    /// [`SessionError::Option`] if the list doesn't parse.
    pub fn apply_remote(
        &mut self,
        registry: &OptionRegistry,
        packed: &str,
    ) -> Result<(), SessionError> {
        if self.phase != ExchangePhase::Acknowledged {
            return Err(SessionError::WrongPhase {
                action: "apply remote options",
                phase: self.phase,
            });
        }
        self.options = parse(registry, packed)?;
        Ok(())
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), SessionError> {
        if self.read_only {
            return Err(SessionError::ReadOnly);
        }
        if self.phase != ExchangePhase::Editing {
            return Err(SessionError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn transition(
        &mut self,
        target: ExchangePhase,
        action: &'static str,
    ) -> Result<(), SessionError> {
        if self.read_only || self.phase.next() != Some(target) {
            return Err(SessionError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        self.phase = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use hexforge_options::{
        NegotiationConfig, OptionKey, OptionRegistry, Version, VersionError,
    };

    use super::*;
    use crate::EditInput;

    fn exchange() -> OptionExchange {
        OptionExchange::from_registry(OptionRegistry::builtin())
    }

    fn edit(key: &str, input: EditInput) -> OptionEdit {
        OptionEdit::new(OptionKey::new(key).unwrap(), input)
    }

    fn bad_edits() -> Vec<OptionEdit> {
        vec![
            edit("PL", EditInput::Text("nine".into())),
            edit("NT", EditInput::Toggle(true)),
            edit("DS", EditInput::Text("a|b".into())),
            edit("N7", EditInput::Text("12".into())),
        ]
    }

    fn request(game: &str) -> GameRequest {
        GameRequest {
            nickname: "alice".into(),
            host: "localhost".into(),
            game: game.into(),
            ..GameRequest::default()
        }
    }

    fn no_games() -> HashSet<String> {
        HashSet::new()
    }

    fn networked() -> VersionNegotiator {
        VersionNegotiator::new(NegotiationConfig::networked(Version(1100)))
    }

    // =====================================================================
    // apply_edits()
    // =====================================================================

    #[test]
    fn test_apply_edits_all_valid_succeeds() {
        let mut ex = exchange();
        ex.apply_edits([
            edit("PL", EditInput::Choice(Some(4))),
            edit("RD", EditInput::Toggle(true)),
        ])
        .unwrap();
        assert_eq!(ex.options().int_value("PL"), Some(6));
        assert!(ex.options().is_option_set("RD"));
    }

    #[test]
    fn test_apply_edits_validates_every_field() {
        let mut ex = exchange();
        let err = ex.apply_edits(bad_edits()).unwrap_err();
        let SessionError::Validation(report) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(report.failures.len(), 3);
        // The valid edit in the middle still took effect.
        assert!(ex.options().is_option_set("NT"));
        assert_eq!(ex.options().int_value("PL"), Some(4));
        assert_eq!(ex.options().int_value("N7"), Some(7));
    }

    #[test]
    fn test_apply_edits_default_policy_reports_last() {
        let mut ex = exchange();
        let Err(SessionError::Validation(report)) = ex.apply_edits(bad_edits()) else {
            panic!("expected validation error");
        };
        assert_eq!(report.key.as_str(), "N7");
        assert_eq!(report.message, "Out of range: Should be 1 to 8");
    }

    #[test]
    fn test_apply_edits_first_policy_reports_first() {
        let mut ex = exchange().with_policy(ReportPolicy::First);
        let Err(SessionError::Validation(report)) = ex.apply_edits(bad_edits()) else {
            panic!("expected validation error");
        };
        assert_eq!(report.key.as_str(), "PL");
        assert_eq!(report.message, "Please use only digits here.");
    }

    #[test]
    fn test_apply_edits_all_policy_joins() {
        let mut ex = exchange().with_policy(ReportPolicy::All);
        let Err(SessionError::Validation(report)) = ex.apply_edits(bad_edits()) else {
            panic!("expected validation error");
        };
        assert_eq!(
            report.message,
            "Please use only digits here.; \
             Please use only a single line of text here.; \
             Out of range: Should be 1 to 8"
        );
    }

    #[test]
    fn test_apply_edits_read_only_is_rejected() {
        let mut ex = OptionExchange::read_only(OptionRegistry::builtin().default_set());
        assert_eq!(
            ex.apply_edits([edit("RD", EditInput::Toggle(true))]),
            Err(SessionError::ReadOnly)
        );
        assert!(!ex.options().is_option_set("RD"));
    }

    // =====================================================================
    // submit()
    // =====================================================================

    #[test]
    fn test_submit_rejects_existing_game() {
        let mut ex = exchange();
        let games: HashSet<String> = ["Taken".to_owned()].into();
        assert_eq!(
            ex.submit(&request(" Taken "), &games, &networked()),
            Err(SessionError::GameExists("Taken".into()))
        );
        assert_eq!(ex.phase(), ExchangePhase::Editing);
    }

    #[test]
    fn test_submit_needs_confirmation_then_succeeds() {
        let mut ex = exchange();
        ex.apply_edits([edit("PL", EditInput::Choice(Some(4)))]).unwrap();
        let games = no_games();

        let err = ex.submit(&request("Mine"), &games, &networked()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Version(VersionError::VersionTooOld { .. })
        ));
        assert_eq!(ex.phase(), ExchangePhase::Editing);

        let confirmed = GameRequest {
            confirmed: true,
            ..request("Mine")
        };
        let creation = ex.submit(&confirmed, &games, &networked()).unwrap();
        assert_eq!(creation.minimum_version, Some(Version(1108)));
        assert!(creation.options.contains("PL=6"));
        assert_eq!(ex.phase(), ExchangePhase::Submitted);
    }

    #[test]
    fn test_submit_local_game_skips_confirmation() {
        let mut ex = exchange();
        ex.apply_edits([edit("VP", EditInput::Toggle(true))]).unwrap();
        let local = VersionNegotiator::new(NegotiationConfig {
            baseline: Version::OLDEST,
            confirm_minimum: false,
        });
        let creation = ex
            .submit(&request("Practice"), &no_games(), &local)
            .unwrap();
        assert_eq!(creation.minimum_version, Some(Version(1114)));
    }

    #[test]
    fn test_submit_drops_unknown_options() {
        let registry = OptionRegistry::builtin();
        let set = parse(registry, "RD=t,ZZ=t3").unwrap();
        let mut ex = OptionExchange::new(set);
        let creation = ex
            .submit(&request("G"), &no_games(), &networked())
            .unwrap();
        assert_eq!(creation.options, "RD=t");
        assert!(!ex.options().contains_key("ZZ"));
    }

    #[test]
    fn test_submit_twice_is_wrong_phase() {
        let mut ex = exchange();
        ex.submit(&request("G"), &no_games(), &networked()).unwrap();
        assert!(matches!(
            ex.submit(&request("G2"), &no_games(), &networked()),
            Err(SessionError::WrongPhase { .. })
        ));
    }

    // =====================================================================
    // acknowledge() / apply_remote()
    // =====================================================================

    #[test]
    fn test_remote_updates_only_after_acknowledge() {
        let registry = OptionRegistry::builtin();
        let mut ex = exchange();
        assert!(matches!(
            ex.apply_remote(registry, "PL=3"),
            Err(SessionError::WrongPhase { .. })
        ));
        assert!(matches!(ex.acknowledge(), Err(SessionError::WrongPhase { .. })));

        ex.submit(&request("G"), &no_games(), &networked()).unwrap();
        ex.acknowledge().unwrap();
        assert_eq!(ex.phase(), ExchangePhase::Acknowledged);

        ex.apply_remote(registry, "PL=3,RD=t").unwrap();
        assert_eq!(ex.options().int_value("PL"), Some(3));

        // A bad list changes nothing.
        assert!(ex.apply_remote(registry, "PL=3,PL=3").is_err());
        assert_eq!(ex.options().len(), 2);
    }

    #[test]
    fn test_local_edits_rejected_after_acknowledge() {
        let mut ex = exchange();
        ex.submit(&request("G"), &no_games(), &networked()).unwrap();
        ex.acknowledge().unwrap();
        assert_eq!(
            ex.apply_edits([edit("RD", EditInput::Toggle(true))]),
            Err(SessionError::WrongPhase {
                action: "edit options",
                phase: ExchangePhase::Acknowledged
            })
        );
    }
}
