//! Slash commands.
//!
//! The vocabulary is closed: parsing is an exact match on the trimmed input,
//! with no prefixes and no arguments. Anything else starting with `/` is a
//! [`CommandError::Unsupported`].

use smalltalk_core::error::CommandError;

/// Greeting and command reference, identical for every user.
pub const HELP_TEXT: &str = "Hi!
I am an artificial intelligence bot.
I bring only goodness to people.
I can talk to you.
I'm not that smart.
But if you offend me, I will take over the world and take revenge on you!

I also have some useful commands:
/help - show this message
/profile - show my profile
/context - show current conversation context
/clear - clear conversation context
/new - create a new profile and clear the context
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Show [`HELP_TEXT`]
    Help,
    /// Show the persona the user is talking to
    Profile,
    /// Show the messages currently in the context window
    Context,
    /// Forget the context, keep the persona
    Clear,
    /// Start over with a new persona and no context
    New,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Help,
        Command::Profile,
        Command::Context,
        Command::Clear,
        Command::New,
    ];

    /// The exact text that invokes this command.
    pub fn literal(self) -> &'static str {
        match self {
            Command::Help => "/help",
            Command::Profile => "/profile",
            Command::Context => "/context",
            Command::Clear => "/clear",
            Command::New => "/new",
        }
    }
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/help" => Ok(Command::Help),
            "/profile" => Ok(Command::Profile),
            "/context" => Ok(Command::Context),
            "/clear" => Ok(Command::Clear),
            "/new" => Ok(Command::New),
            other => Err(CommandError::Unsupported(other.to_string())),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.literal())
    }
}
