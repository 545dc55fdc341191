use serde::Serialize;
use strum::Display;

use crate::{Account, BridgeError};

/// Connection to the host, as far as rendering is concerned.
///
/// `Connected` means the bridge was opened *and* the first account listing
/// resolved, so views never flash an empty account list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ConnectionPhase {
    /// Not started, or torn down.
    #[default]
    Disconnected,
    /// `connect` issued; first listing pending.
    Connecting,
    /// First listing resolved.
    Connected,
}

/// Everything the session knows. Owned by the controller and published to
/// readers as whole snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Connection progress.
    pub connection_phase: ConnectionPhase,
    /// Accounts in allowed currencies, in host order.
    pub accounts: Vec<Account>,
    /// Account the embedded app operates on.
    pub selected_account: Option<Account>,
    /// `true` only while a listing is in flight.
    pub accounts_loading: bool,
    /// Set once preference storage was denied; never cleared.
    pub storage_degraded: bool,
    /// Set once the embedded frame reported it loaded the current URL.
    pub app_loaded: bool,
    /// Last failure of the start-up listing, cleared once it succeeds.
    pub bridge_failure: Option<BridgeError>,
}
