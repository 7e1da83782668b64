//! The lobby: the server's in-memory list of games and their options.
//!
//! The lobby answers one decoded message at a time and returns the
//! replies for the sender. It never talks to the network itself and
//! keeps nothing once the process exits.

use std::collections::{BTreeMap, BTreeSet};

use hexforge_options::{
    check_participant, minimum_version, pack, parse, OptionRegistry, OptionSet, Version,
};
use hexforge_protocol::Message;
use hexforge_session::{validate_game_name, GameDirectory};
use serde::{Deserialize, Serialize};

use crate::LobbyError;

// ---------------------------------------------------------------------------
// LobbyConfig
// ---------------------------------------------------------------------------

/// Server-side lobby settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Version this server runs.
    pub server_version: Version,

    /// Most games hosted at once.
    pub max_games: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            server_version: Version::CURRENT,
            max_games: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// GameRecord
// ---------------------------------------------------------------------------

/// One hosted game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    options: OptionSet,
    minimum_version: Option<Version>,
    members: BTreeSet<String>,
    turns: u64,
}

impl GameRecord {
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Oldest client version that may join, `None` if any may.
    pub fn minimum_version(&self) -> Option<Version> {
        self.minimum_version
    }

    /// Nicknames currently in the game.
    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    /// How many times a turn has ended.
    pub fn turns(&self) -> u64 {
        self.turns
    }
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// All games on one server.
#[derive(Debug, Clone)]
pub struct Lobby {
    config: LobbyConfig,
    registry: OptionRegistry,
    games: BTreeMap<String, GameRecord>,
}

impl Lobby {
    /// A lobby using the built-in option definitions.
    pub fn new(config: LobbyConfig) -> Self {
        Self::with_registry(config, OptionRegistry::builtin().clone())
    }

    pub fn with_registry(config: LobbyConfig, registry: OptionRegistry) -> Self {
        Self {
            config,
            registry,
            games: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn game(&self, name: &str) -> Option<&GameRecord> {
        self.games.get(name)
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Game names in order.
    pub fn game_names(&self) -> impl Iterator<Item = &str> {
        self.games.keys().map(String::as_str)
    }

    /// Handles one message from a client and returns the replies to send
    /// back to it.
    ///
    /// # Errors
    /// A [`LobbyError`] when the request is rejected. Nothing changes in
    /// the lobby then; [`LobbyError::status_code`] gives the code to
    /// answer with.
    pub fn handle(&mut self, message: Message) -> Result<Vec<Message>, LobbyError> {
        match message {
            Message::GameOptionGetDefaults { .. } => Ok(vec![Message::GameOptionGetDefaults {
                options: pack(&self.registry.default_set()),
            }]),
            Message::NewGameWithOptionsRequest {
                nickname,
                game,
                options,
                ..
            } => self.create_game(nickname, &game, &options).map(|m| vec![m]),
            Message::JoinGame {
                nickname,
                game,
                version,
            } => self.join_game(nickname, &game, Version(version)).map(|m| vec![m]),
            Message::LeaveGame { nickname, game } => {
                self.leave_game(&nickname, &game)?;
                Ok(Vec::new())
            }
            Message::EndTurn { game } => {
                self.end_turn(&game)?;
                Ok(Vec::new())
            }
            other @ (Message::Status { .. } | Message::NewGameWithOptions { .. }) => {
                Err(LobbyError::Unexpected(other.message_type().name))
            }
        }
    }

    fn create_game(
        &mut self,
        nickname: String,
        game: &str,
        packed: &str,
    ) -> Result<Message, LobbyError> {
        let game = validate_game_name(game)
            .map_err(|_| LobbyError::InvalidGameName(game.to_owned()))?;
        if self.game_exists(&game) {
            return Err(LobbyError::GameExists(game));
        }
        if self.games.len() >= self.config.max_games {
            return Err(LobbyError::Full(self.config.max_games));
        }

        let mut options = parse(&self.registry, packed)?;
        let removed = options.remove_unknown();
        if !removed.is_empty() {
            tracing::debug!(%game, ?removed, "dropped options unknown to this server");
        }
        let minimum_version = minimum_version(&options);
        if let Some(required) = minimum_version {
            check_participant(&options, self.config.server_version).map_err(|e| {
                tracing::info!(%game, %required, "options need a newer server");
                e
            })?;
        }
        let reply = Message::NewGameWithOptions {
            game: game.clone(),
            minimum_version: Version::to_wire(minimum_version),
            options: pack(&options),
        };

        tracing::info!(%game, %nickname, ?minimum_version, "game created");
        self.games.insert(
            game,
            GameRecord {
                options,
                minimum_version,
                members: BTreeSet::from([nickname]),
                turns: 0,
            },
        );
        Ok(reply)
    }

    fn join_game(
        &mut self,
        nickname: String,
        game: &str,
        version: Version,
    ) -> Result<Message, LobbyError> {
        let record = self
            .games
            .get_mut(game)
            .ok_or_else(|| LobbyError::NoSuchGame(game.to_owned()))?;

        if let Err(e) = check_participant(&record.options, version) {
            tracing::info!(%game, %nickname, %version, "client too old to join");
            return Err(e.into());
        }

        tracing::info!(%game, %nickname, "player joined");
        record.members.insert(nickname);
        Ok(Message::NewGameWithOptions {
            game: game.to_owned(),
            minimum_version: Version::to_wire(record.minimum_version),
            options: pack(&record.options),
        })
    }

    fn leave_game(&mut self, nickname: &str, game: &str) -> Result<(), LobbyError> {
        let record = self
            .games
            .get_mut(game)
            .ok_or_else(|| LobbyError::NoSuchGame(game.to_owned()))?;
        if !record.members.remove(nickname) {
            return Err(LobbyError::NotAMember {
                nickname: nickname.to_owned(),
                game: game.to_owned(),
            });
        }
        tracing::info!(%game, %nickname, "player left");

        if record.members.is_empty() {
            self.games.remove(game);
            tracing::info!(%game, "game removed, no members left");
        }
        Ok(())
    }

    fn end_turn(&mut self, game: &str) -> Result<(), LobbyError> {
        let record = self
            .games
            .get_mut(game)
            .ok_or_else(|| LobbyError::NoSuchGame(game.to_owned()))?;
        record.turns += 1;
        tracing::info!(%game, turns = record.turns, "turn ended");
        Ok(())
    }
}

impl GameDirectory for Lobby {
    fn game_exists(&self, name: &str) -> bool {
        self.games.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use hexforge_options::VersionError;

    use super::*;

    fn create(nickname: &str, game: &str, options: &str) -> Message {
        Message::NewGameWithOptionsRequest {
            nickname: nickname.into(),
            password: String::new(),
            host: "localhost".into(),
            game: game.into(),
            options: options.into(),
        }
    }

    fn join(nickname: &str, game: &str, version: u32) -> Message {
        Message::JoinGame {
            nickname: nickname.into(),
            game: game.into(),
            version,
        }
    }

    // =====================================================================
    // GameOptionGetDefaults
    // =====================================================================

    #[test]
    fn test_get_defaults_replies_with_packed_defaults() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        let replies = lobby
            .handle(Message::GameOptionGetDefaults {
                options: "-".into(),
            })
            .unwrap();
        let [Message::GameOptionGetDefaults { options }] = replies.as_slice() else {
            panic!("unexpected replies {replies:?}");
        };
        let set = parse(OptionRegistry::builtin(), options).unwrap();
        assert_eq!(set.len(), OptionRegistry::builtin().len());
    }

    // =====================================================================
    // NewGameWithOptionsRequest
    // =====================================================================

    #[test]
    fn test_create_game_records_minimum_version() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        let replies = lobby.handle(create("alice", " Game 1 ", "PL=6,ZZ=t")).unwrap();
        assert_eq!(
            replies,
            vec![Message::NewGameWithOptions {
                game: "Game 1".into(),
                minimum_version: 1108,
                options: "PL=6".into(),
            }]
        );
        let record = lobby.game("Game 1").unwrap();
        assert_eq!(record.minimum_version(), Some(Version(1108)));
        assert!(record.members().contains("alice"));
    }

    #[test]
    fn test_create_game_default_options_have_no_minimum() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        let replies = lobby.handle(create("alice", "G", "-")).unwrap();
        assert!(matches!(
            replies.as_slice(),
            [Message::NewGameWithOptions {
                minimum_version: -1,
                ..
            }]
        ));
    }

    #[test]
    fn test_create_game_rejects_duplicates_and_bad_input() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        lobby.handle(create("alice", "G", "-")).unwrap();
        assert_eq!(
            lobby.handle(create("bob", "G", "-")),
            Err(LobbyError::GameExists("G".into()))
        );
        assert_eq!(
            lobby.handle(create("bob", "  ", "-")),
            Err(LobbyError::InvalidGameName("  ".into()))
        );
        assert!(matches!(
            lobby.handle(create("bob", "H", "PL=3,PL=4")),
            Err(LobbyError::Option(_))
        ));
        assert_eq!(lobby.game_count(), 1);
    }

    #[test]
    fn test_create_game_respects_max_games() {
        let mut lobby = Lobby::new(LobbyConfig {
            max_games: 1,
            ..LobbyConfig::default()
        });
        lobby.handle(create("alice", "A", "-")).unwrap();
        assert_eq!(lobby.handle(create("bob", "B", "-")), Err(LobbyError::Full(1)));
    }

    // =====================================================================
    // JoinGame / LeaveGame / EndTurn
    // =====================================================================

    #[test]
    fn test_join_rejects_old_client() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        lobby.handle(create("alice", "G", "VP=t12")).unwrap();

        let err = lobby.handle(join("bob", "G", 1113)).unwrap_err();
        assert_eq!(
            err,
            LobbyError::Version(VersionError::VersionTooOld {
                required: Version(1114),
                actual: Version(1113),
            })
        );
        assert!(!lobby.game("G").unwrap().members().contains("bob"));

        lobby.handle(join("bob", "G", 1114)).unwrap();
        assert!(lobby.game("G").unwrap().members().contains("bob"));
    }

    #[test]
    fn test_join_missing_game_fails() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        assert_eq!(
            lobby.handle(join("bob", "nope", 2000)),
            Err(LobbyError::NoSuchGame("nope".into()))
        );
    }

    #[test]
    fn test_last_member_leaving_removes_game() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        lobby.handle(create("alice", "G", "-")).unwrap();
        lobby.handle(join("bob", "G", 2000)).unwrap();

        let leave = |nickname: &str| Message::LeaveGame {
            nickname: nickname.into(),
            game: "G".into(),
        };
        assert!(lobby.handle(leave("alice")).unwrap().is_empty());
        assert!(matches!(
            lobby.handle(leave("alice")),
            Err(LobbyError::NotAMember { .. })
        ));
        lobby.handle(leave("bob")).unwrap();
        assert!(lobby.game("G").is_none());
    }

    #[test]
    fn test_end_turn_counts_turns() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        lobby.handle(create("alice", "G", "-")).unwrap();
        for _ in 0..3 {
            lobby.handle(Message::EndTurn { game: "G".into() }).unwrap();
        }
        assert_eq!(lobby.game("G").unwrap().turns(), 3);
    }

    #[test]
    fn test_server_only_messages_are_unexpected() {
        let mut lobby = Lobby::new(LobbyConfig::default());
        assert_eq!(
            lobby.handle(Message::Status {
                status: 0,
                text: "hi".into()
            }),
            Err(LobbyError::Unexpected("Status"))
        );
    }

    #[test]
    fn test_lobby_config_json_defaults() {
        let config: LobbyConfig = serde_json::from_str(r#"{ "max_games": 3 }"#).unwrap();
        assert_eq!(config.max_games, 3);
        assert_eq!(config.server_version, Version::CURRENT);
    }
}
