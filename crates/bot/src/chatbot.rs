//! The bot: command execution and conversation turns over shared storage.

use std::sync::Arc;

use smalltalk_core::context::append_and_truncate;
use smalltalk_core::dialog::{Dialog, UserId};
use smalltalk_core::error::Result;
use smalltalk_core::profile::ProfileGenerator;
use smalltalk_core::reply::ReplyGenerator;
use smalltalk_core::storage::DialogStorage;
use tracing::{debug, warn};

use crate::command::{Command, HELP_TEXT};

pub const DEFAULT_MAX_CONTEXT_LEN: usize = 5;

const EMPTY_CONTEXT: &str = "Context is empty.";
const CLEARED: &str = "Do we know each other?";
const FAREWELL: &str = "Goodbye forever my dear friend :(";

/// Answers turns for any number of users.
///
/// Cheap to share behind an `Arc`; every method takes `&self` and all
/// per-user state lives in the storage backend.
pub struct ChatBot {
    reply: Arc<dyn ReplyGenerator>,
    profiles: Arc<dyn ProfileGenerator>,
    storage: Arc<dyn DialogStorage>,
    max_context_len: usize,
}

impl ChatBot {
    pub fn new(
        reply: Arc<dyn ReplyGenerator>,
        profiles: Arc<dyn ProfileGenerator>,
        storage: Arc<dyn DialogStorage>,
    ) -> Self {
        Self {
            reply,
            profiles,
            storage,
            max_context_len: DEFAULT_MAX_CONTEXT_LEN,
        }
    }

    /// Set how many messages (user and bot together) a dialog keeps.
    pub fn with_max_context_len(mut self, max: usize) -> Self {
        self.max_context_len = max;
        self
    }

    pub fn max_context_len(&self) -> usize {
        self.max_context_len
    }

    pub fn help(&self) -> &'static str {
        HELP_TEXT
    }

    /// Handle one inbound turn from `user_id`.
    pub async fn respond(&self, user_id: &UserId, text: &str) -> Result<String> {
        let text = text.trim();
        if text.starts_with('/') {
            let command = text.parse::<Command>().inspect_err(|e| {
                debug!(user_id = %user_id, error = %e, "Rejected command");
            })?;
            self.execute(user_id, command).await
        } else {
            self.converse(user_id, text).await
        }
    }

    /// Run an already parsed command for `user_id`.
    pub async fn execute(&self, user_id: &UserId, command: Command) -> Result<String> {
        debug!(user_id = %user_id, command = %command, "Executing command");
        match command {
            Command::Help => Ok(HELP_TEXT.to_string()),
            Command::Profile => Ok(self.dialog(user_id).await?.profile),
            Command::Context => {
                let dialog = self.dialog(user_id).await?;
                if dialog.messages.is_empty() {
                    Ok(EMPTY_CONTEXT.to_string())
                } else {
                    Ok(dialog.messages.join("\n"))
                }
            }
            Command::Clear => {
                let mut dialog = self.dialog(user_id).await?;
                if !dialog.messages.is_empty() {
                    dialog.messages.clear();
                    self.storage.set(user_id, dialog).await;
                }
                Ok(CLEARED.to_string())
            }
            Command::New => {
                let dialog = self.new_dialog()?;
                self.storage.set(user_id, dialog).await;
                Ok(FAREWELL.to_string())
            }
        }
    }

    /// A conversation turn. The dialog is written back once, after the reply
    /// succeeds; on failure the stored dialog is left as it was.
    async fn converse(&self, user_id: &UserId, message: &str) -> Result<String> {
        let mut dialog = self.dialog(user_id).await?;
        append_and_truncate(&mut dialog.messages, message.to_string(), self.max_context_len);

        // No storage lock is held here; generation may take a while.
        let reply = self
            .reply
            .reply(&dialog.profile, &dialog.messages)
            .await
            .inspect_err(|e| {
                warn!(user_id = %user_id, generator = self.reply.name(), error = %e, "Reply generation failed");
            })?;

        append_and_truncate(&mut dialog.messages, reply.clone(), self.max_context_len);
        self.storage.set(user_id, dialog).await;

        debug!(user_id = %user_id, reply_len = reply.len(), "Turn complete");
        Ok(reply)
    }

    async fn dialog(&self, user_id: &UserId) -> Result<Dialog> {
        let factory = || self.new_dialog();
        self.storage.get(user_id, &factory).await
    }

    fn new_dialog(&self) -> Result<Dialog> {
        Ok(Dialog::new(self.profiles.generate()?))
    }
}
