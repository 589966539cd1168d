//! Durable storage backends.
//!
//! `local` is the on-device key-value store that is always available;
//! `remote` is the optional network-backed record store. The key layout for
//! the local store is fixed and shared with earlier versions of the app.

pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::{HttpRemote, Lookup, RemoteError, RemoteRecords, UserRecord};

/// Key holding the last-authenticated user, for session restore on restart.
pub const SESSION_KEY: &str = "session:current";

/// Key holding the credential secret for `username`.
pub fn auth_key(username: &str) -> String {
    format!("auth:{}", username)
}

/// Key holding the serialized event collection for `username`.
pub fn data_key(username: &str) -> String {
    format!("data:{}", username)
}
