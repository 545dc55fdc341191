use serde::Serialize;
use strum::Display;

use super::{ConnectionPhase, SessionState};
use crate::Account;

/// Single status shown to the user, in progress order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SessionStatus {
    /// The host connection is not established yet.
    Connecting,
    /// Accounts are being listed.
    LoadingAccounts,
    /// No account matches the allow-list.
    NoAccounts,
    /// Waiting for the embedded frame to load.
    LoadingApp,
    /// The embedded app is displayed.
    Ready,
}

impl SessionStatus {
    /// Derives the status from a state snapshot.
    #[must_use]
    pub fn derive(state: &SessionState) -> Self {
        if state.connection_phase != ConnectionPhase::Connected {
            Self::Connecting
        } else if state.accounts_loading {
            Self::LoadingAccounts
        } else if state.accounts.is_empty() {
            Self::NoAccounts
        } else if state.app_loaded {
            Self::Ready
        } else {
            Self::LoadingApp
        }
    }

    /// Text for the loading overlay. Empty once the app is ready.
    #[must_use]
    pub fn message(self, web_app_name: &str) -> String {
        match self {
            Self::Connecting => "Connecting ...".to_string(),
            Self::LoadingAccounts => "Loading accounts ...".to_string(),
            Self::NoAccounts => "You don't have any accounts".to_string(),
            Self::LoadingApp => format!("Loading {web_app_name} ..."),
            Self::Ready => String::new(),
        }
    }
}

/// What a view renders, derived from [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Current status.
    pub status: SessionStatus,
    /// Overlay text for `status`.
    pub status_message: String,
    /// URL for the embedded frame; empty while the frame must not be mounted.
    pub embedded_url: String,
    /// Selectable accounts.
    pub accounts: Vec<Account>,
    /// Selected account.
    pub selected_account: Option<Account>,
    /// Show the "third-party storage blocked" screen instead of the app.
    pub cookies_blocked: bool,
    /// Show the account bar under the frame.
    pub show_account_bar: bool,
}

impl SessionView {
    /// Builds the view for `state`. `embedded_url` is the URL computed for the
    /// current selection; it is withheld until the session is connected.
    #[must_use]
    pub fn new(state: &SessionState, web_app_name: &str, embedded_url: String) -> Self {
        let status = SessionStatus::derive(state);
        let embedded_url = if state.connection_phase == ConnectionPhase::Connected {
            embedded_url
        } else {
            String::new()
        };
        Self {
            status,
            status_message: status.message(web_app_name),
            embedded_url,
            accounts: state.accounts.clone(),
            selected_account: state.selected_account.clone(),
            cookies_blocked: state.storage_degraded,
            show_account_bar: !state.accounts.is_empty(),
        }
    }
}
