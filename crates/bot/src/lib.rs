//! The SmallTalk bot - one entry point for every inbound turn.
//!
//! A turn is routed by its first character after trimming:
//!
//! 1. **`/...`** - parsed into a [`Command`] and executed against the
//!    user's dialog (help, profile, context, clear, new)
//! 2. **anything else** - a conversation turn: the message joins the context
//!    window, the reply generator answers, the reply joins the window, and
//!    the dialog is saved
//!
//! Unsupported commands fail with `CommandError`; collaborator failures are
//! returned unchanged.

pub mod chatbot;
pub mod command;

pub use chatbot::{ChatBot, DEFAULT_MAX_CONTEXT_LEN};
pub use command::{Command, HELP_TEXT};
