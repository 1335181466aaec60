//! Reply generator trait - the abstraction over whatever produces the bot's
//! next line.
//!
//! A generator sees the dialog's profile and its current context window and
//! returns a single reply. It may be slow (model inference) and
//! nondeterministic; callers must not hold any storage lock across it.
//!
//! Implementations: echo, OpenAI-compatible endpoints.

use async_trait::async_trait;

use crate::error::ReplyError;

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// The generator name (e.g., "echo", "openai_compat").
    fn name(&self) -> &str;

    /// Produce the next reply. `messages` is ordered oldest first and its
    /// last element is the user's latest message.
    async fn reply(&self, profile: &str, messages: &[String]) -> std::result::Result<String, ReplyError>;
}
