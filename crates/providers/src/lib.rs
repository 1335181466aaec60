//! Reply and profile generator implementations for SmallTalk.
//!
//! Reply generators implement `smalltalk_core::ReplyGenerator`; profile
//! generators implement `smalltalk_core::ProfileGenerator`. The factory
//! functions pick one of each based on configuration.

pub mod echo;
pub mod factory;
pub mod openai_compat;
pub mod random_profile;
pub mod static_profiles;

pub use echo::EchoReply;
pub use factory::{build_profile_generator, build_reply_generator};
pub use openai_compat::OpenAiCompatReply;
pub use random_profile::RandomProfile;
pub use static_profiles::{ProfilePool, StaticProfiles};
