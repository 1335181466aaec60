//! Dialog storage implementations for SmallTalk.

pub mod lru_store;

pub use lru_store::LruDialogStorage;
