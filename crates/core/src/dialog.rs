//! Dialog and UserId domain types.
//!
//! A [`Dialog`] is the whole per-user state: the bot persona the user is
//! talking to and the bounded window of recent turns.

/// Opaque identifier of the caller a dialog belongs to.
///
/// Issued by the transport layer (a session cookie, a CLI flag). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

/// Returned when an empty string is offered as a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must not be empty")]
pub struct InvalidUserId;

impl UserId {
    pub fn new(id: impl Into<String>) -> std::result::Result<Self, InvalidUserId> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidUserId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user conversational state.
///
/// `Clone` is the isolation boundary: storage hands out clones and takes
/// dialogs by value, so a caller never aliases the stored entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialog {
    /// Persona text the reply generator conditions on
    pub profile: String,

    /// Recent turns, oldest first: user messages and replies interleaved
    pub messages: Vec<String>,
}

impl Dialog {
    /// A fresh dialog with the given profile and no history.
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
