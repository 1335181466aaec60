//! # SmallTalk Core
//!
//! Domain types, traits, and error definitions for the SmallTalk
//! conversation engine. This crate has **no framework dependencies** - it
//! defines the model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is a trait here. Implementations live in their
//! respective crates:
//! - [`DialogStorage`] - `smalltalk-memory`
//! - [`ReplyGenerator`] and [`ProfileGenerator`] - `smalltalk-providers`
//!
//! Tests swap any of them for small mock structs.

pub mod context;
pub mod dialog;
pub mod error;
pub mod profile;
pub mod reply;
pub mod storage;

// Re-export key types at crate root for ergonomics
pub use context::append_and_truncate;
pub use dialog::{Dialog, InvalidUserId, UserId};
pub use error::{CommandError, Error, ProfileError, ReplyError, Result};
pub use profile::ProfileGenerator;
pub use reply::ReplyGenerator;
pub use storage::{DialogFactory, DialogStorage};
