//! User-facing commands.

/// A no-argument action exposed in the host's command palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Install the wrapper. Available only while inactive.
    Enable,
    /// Remove the wrapper. Available only while active.
    Disable,
}

impl Command {
    /// Every command, in registration order.
    pub const ALL: [Command; 2] = [Command::Enable, Command::Disable];

    /// Stable command id.
    pub fn id(self) -> &'static str {
        match self {
            Command::Enable => "enable",
            Command::Disable => "disable",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Command::Enable => "Enable",
            Command::Disable => "Disable",
        }
    }

    /// Look a command up by id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
