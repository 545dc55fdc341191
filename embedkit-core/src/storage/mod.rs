//! Persistence of the user's last selected account.
//!
//! Backends implement [`PreferenceStore`]. The session never talks to a backend
//! directly; it goes through [`Preferences`], which turns the one recognised
//! failure (access denied by the embedding context) into a terminal degraded
//! mode instead of an error.

mod error;
mod memory;
mod preferences;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryPreferenceStore;
pub use preferences::{Persisted, Preference, Preferences};
pub use traits::PreferenceStore;

/// Key under which the last selected account id is stored.
pub const SELECTED_ACCOUNT_KEY: &str = "accountId";
