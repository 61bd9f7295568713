//! Storage backends for the GuildLink connector.

mod file_store;

pub use file_store::FileSessionStore;
