//! The host platform bridge as the session consumes it.
//!
//! The transport behind a bridge is opaque: a browser page wires it to window
//! messages, a native host to its own RPC layer. The session only needs the
//! three calls below.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Account, BridgeResult};

mod mock;
pub use mock::MockBridge;

/// Options passed to the host's account picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    /// Currencies the user may pick an account from.
    pub currencies: Vec<String>,
    /// Whether the host may offer to create a new account.
    pub allow_add_account: bool,
}

/// Client of the host platform.
///
/// Calls are not required to be `Send`; a session runs on a single logical
/// task.
#[async_trait(?Send)]
pub trait HostBridge {
    /// Opens the channel to the host. Fire and forget: the session does not
    /// wait for the channel to be established.
    fn connect(&self);

    /// Lists every account the host exposes, in host order.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be reached or refuses the call.
    async fn list_accounts(&self) -> BridgeResult<Vec<Account>>;

    /// Prompts the host's own UI to pick or create an account.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Cancelled`](crate::BridgeError::Cancelled) when
    /// the user dismisses the prompt, or another error if the call fails.
    async fn request_account(&self, request: AccountRequest) -> BridgeResult<Account>;
}
