//! Command handler context and core types.
//!
//! Defines the `CommandContext<'a>` passed to every handler and middleware
//! hook, plus the small value types describing who issued a command and
//! from where.

use crate::engine::Engine;
use crate::localization;
use std::fmt;
use std::str::FromStr;

/// The surface a command arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    Chat,
    Console,
    Rcon,
}

impl Environment {
    /// Every environment, in declaration order.
    pub const ALL: [Environment; 3] = [Environment::Chat, Environment::Console, Environment::Rcon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Console => "Console",
            Self::Rcon => "Rcon",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    /// Environment names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// A user identified by their platform id.
    User { id: u64, name: String },
    /// A remote-admin connection.
    Rcon { remote: String },
}

impl Caller {
    pub fn user(id: u64, name: impl Into<String>) -> Self {
        Self::User {
            id,
            name: name.into(),
        }
    }

    pub fn rcon(remote: impl Into<String>) -> Self {
        Self::Rcon {
            remote: remote.into(),
        }
    }

    /// Platform id used for localization. Non-user callers map to `0`.
    pub fn user_id(&self) -> u64 {
        match self {
            Self::User { id, .. } => *id,
            Self::Rcon { .. } => 0,
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { id, name } => write!(f, "{}({})", name, id),
            Self::Rcon { remote } => write!(f, "rcon@{}", remote),
        }
    }
}

/// Final state of one execution, as seen by `after` observers and hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded,
    Failed,
    Denied,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Handler context passed to each command handler and middleware hook.
pub struct CommandContext<'a> {
    /// The engine running the command. Handlers may read or even modify its
    /// registries; no lock is held while they run.
    pub engine: &'a Engine,
    /// Who issued the command.
    pub caller: &'a Caller,
    /// Surface the command arrived from.
    pub environment: Environment,
    /// Namespace of the command being executed.
    pub namespace: &'a str,
    /// Id of the command being executed.
    pub command_id: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        engine: &'a Engine,
        caller: &'a Caller,
        environment: Environment,
        namespace: &'a str,
        command_id: &'a str,
    ) -> Self {
        Self {
            engine,
            caller,
            environment,
            namespace,
            command_id,
        }
    }

    pub fn user_id(&self) -> u64 {
        self.caller.user_id()
    }

    /// Look up a message in the engine's own namespace.
    pub fn localize(&self, key: &str) -> String {
        self.engine
            .localizer()
            .get(self.user_id(), localization::CORE_NAMESPACE, key)
    }

    /// Look up a message and substitute placeholders.
    pub fn localize_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        localization::substitute(&self.localize(key), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("chat".parse::<Environment>(), Ok(Environment::Chat));
        assert_eq!(" RCON ".parse::<Environment>(), Ok(Environment::Rcon));
        assert_eq!("Console".parse::<Environment>(), Ok(Environment::Console));
        assert!("web".parse::<Environment>().is_err());
    }

    #[test]
    fn test_caller_user_id() {
        assert_eq!(Caller::user(42, "alice").user_id(), 42);
        assert_eq!(Caller::rcon("10.0.0.1:25575").user_id(), 0);
    }

    #[test]
    fn test_caller_display() {
        assert_eq!(Caller::user(42, "alice").to_string(), "alice(42)");
        assert_eq!(Caller::rcon("host").to_string(), "rcon@host");
    }
}
