//! The account session state machine.
//!
//! A [`SessionController`] moves through `Disconnected -> Connecting ->
//! Connected` exactly once. The only suspension points are the bridge calls
//! `list_accounts` and `request_account`; the hosting view may tear the session
//! down while either is pending, after which every mutation is a no-op and late
//! results are discarded.

use std::cell::Cell;
use std::rc::Rc;

use tokio::sync::watch;

use crate::bridge::{AccountRequest, HostBridge};
use crate::storage::{Persisted, PreferenceStore, Preferences, SELECTED_ACCOUNT_KEY};
use crate::{
    embedded_url, filter_accounts, resolve_selection, Account, BridgeError, SessionConfig,
    SessionError,
};

mod state;
mod view;

pub use state::{ConnectionPhase, SessionState};
pub use view::{SessionStatus, SessionView};

/// Result of [`SessionController::request_account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRequestOutcome {
    /// The host returned an account and it is now selected.
    Selected(Account),
    /// The request was cancelled or failed; state is unchanged. The host's own
    /// prompt already told the user what happened.
    Ignored(BridgeError),
    /// The session was torn down before the host answered.
    Discarded,
}

/// Coordinates the host bridge, preference storage and account selection for
/// one embedded app session.
pub struct SessionController {
    config: SessionConfig,
    bridge: Rc<dyn HostBridge>,
    preferences: Preferences,
    state: watch::Sender<SessionState>,
    starting: Cell<bool>,
    torn_down: Cell<bool>,
    // Bumped by every explicit selection; a listing that started under an
    // older generation must not replace the selection.
    selection_generation: Cell<u64>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .field("torn_down", &self.torn_down.get())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Creates a disconnected session. Nothing is sent to the host until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new(
        config: SessionConfig,
        bridge: Rc<dyn HostBridge>,
        store: Rc<dyn PreferenceStore>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            config,
            bridge,
            preferences: Preferences::new(store),
            state,
            starting: Cell::new(false),
            torn_down: Cell::new(false),
            selection_generation: Cell::new(0),
        }
    }

    /// The validated launch configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes. Each published value is a complete
    /// snapshot; readers never observe a partially applied operation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Whether [`teardown`](Self::teardown) was called.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    /// Opens the bridge, lists accounts and marks the session connected.
    ///
    /// Calling it again while a start is pending, or once connected, does
    /// nothing. After a failed listing it may be called again to retry; the
    /// bridge is not reconnected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TornDown`] after teardown, and propagates
    /// listing and storage failures. A bridge failure is also recorded in
    /// [`SessionState::bridge_failure`] while the status stays `connecting`.
    pub async fn start(&self) -> Result<(), SessionError> {
        if self.is_torn_down() {
            return Err(SessionError::TornDown);
        }
        let phase = self.state.borrow().connection_phase;
        if phase == ConnectionPhase::Connected || self.starting.replace(true) {
            return Ok(());
        }

        if phase == ConnectionPhase::Disconnected {
            log::info!("connecting to host for {}", self.config.web_app_name);
            self.bridge.connect();
            self.update(|state| state.connection_phase = ConnectionPhase::Connecting);
        }

        let result = self.fetch_accounts().await;
        self.starting.set(false);

        match result {
            Ok(()) => {
                self.update(|state| {
                    state.connection_phase = ConnectionPhase::Connected;
                    state.bridge_failure = None;
                });
                log::debug!("session connected");
                Ok(())
            }
            Err(err) => {
                if let SessionError::Bridge(bridge_error) = &err {
                    log::warn!("listing accounts failed during start: {bridge_error}");
                    let failure = bridge_error.clone();
                    self.update(|state| state.bridge_failure = Some(failure));
                }
                Err(err)
            }
        }
    }

    /// Lists accounts from the host, keeps those in allowed currencies and
    /// selects one.
    ///
    /// Selection priority is the launch account id, then the stored
    /// preference, then the first account. The account list, selection and
    /// loading flag are published together. Does nothing before
    /// [`start`](Self::start) opened the bridge.
    ///
    /// # Errors
    ///
    /// Propagates bridge failures and storage failures other than denied
    /// access. The loading flag is cleared either way.
    pub async fn fetch_accounts(&self) -> Result<(), SessionError> {
        if self.is_torn_down() {
            return Ok(());
        }
        if self.state.borrow().connection_phase == ConnectionPhase::Disconnected {
            log::debug!("not listing accounts before the bridge is opened");
            return Ok(());
        }
        let generation = self.selection_generation.get();
        self.update(|state| state.accounts_loading = true);

        let result = self.load_accounts().await;
        let (accounts, selected) = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                self.update(|state| state.accounts_loading = false);
                return Err(err);
            }
        };

        let keep_explicit = self.selection_generation.get() != generation;
        if keep_explicit {
            log::debug!("keeping selection made while accounts were loading");
        }
        let degraded = self.preferences.is_degraded();
        log::debug!("listed {} allowed accounts", accounts.len());
        self.update(|state| {
            state.accounts = accounts;
            if !keep_explicit {
                state.selected_account = selected;
            }
            state.accounts_loading = false;
            state.storage_degraded |= degraded;
        });
        Ok(())
    }

    async fn load_accounts(&self) -> Result<(Vec<Account>, Option<Account>), SessionError> {
        let listed = self.bridge.list_accounts().await?;
        let accounts = filter_accounts(listed, &self.config.currencies);
        if self.is_torn_down() {
            return Ok((accounts, None));
        }

        let stored = self.preferences.get(SELECTED_ACCOUNT_KEY)?.into_value();
        let selected = resolve_selection(
            &accounts,
            self.config.initial_account_id.as_deref(),
            stored.as_deref(),
        );
        Ok((accounts, selected))
    }

    /// Selects `account` and remembers it for the next session.
    ///
    /// The selection applies immediately. Persisting is best effort: denied
    /// storage switches the session to degraded mode and the choice is kept in
    /// memory only.
    ///
    /// Callers should pass an account from [`SessionState::accounts`] or one
    /// returned by [`request_account`](Self::request_account); any other
    /// account is still selected but logged.
    ///
    /// # Errors
    ///
    /// Propagates storage failures other than denied access.
    pub fn select_account(&self, account: Option<Account>) -> Result<(), SessionError> {
        if self.is_torn_down() {
            return Ok(());
        }
        self.selection_generation
            .set(self.selection_generation.get().wrapping_add(1));

        if let Some(account) = &account {
            if !self.state.borrow().accounts.contains(account) {
                log::debug!(
                    "selecting account {} which is not in the listed accounts",
                    account.id
                );
            }
        }
        let id = account.as_ref().map(|account| account.id.clone());
        self.update(|state| state.selected_account = account);

        if let Some(id) = id {
            log::info!("selected account {id}");
            if self.preferences.set(SELECTED_ACCOUNT_KEY, &id)? == Persisted::Degraded {
                self.update(|state| state.storage_degraded = true);
            }
        }
        Ok(())
    }

    /// Asks the host to pick or create an account in an allowed currency and
    /// selects the result.
    ///
    /// # Errors
    ///
    /// Only storage failures from persisting the selection are returned; a
    /// cancelled or failed host call yields [`AccountRequestOutcome::Ignored`].
    pub async fn request_account(&self) -> Result<AccountRequestOutcome, SessionError> {
        if self.is_torn_down() {
            return Ok(AccountRequestOutcome::Discarded);
        }
        let request = AccountRequest {
            currencies: self.config.currencies.clone(),
            allow_add_account: true,
        };
        match self.bridge.request_account(request).await {
            Ok(account) => {
                if self.is_torn_down() {
                    return Ok(AccountRequestOutcome::Discarded);
                }
                self.select_account(Some(account.clone()))?;
                Ok(AccountRequestOutcome::Selected(account))
            }
            Err(err) => {
                log::debug!("account request ignored: {err}");
                Ok(AccountRequestOutcome::Ignored(err))
            }
        }
    }

    /// URL for the embedded frame, or an empty string when nothing is
    /// selected.
    #[must_use]
    pub fn embedded_url(&self) -> String {
        embedded_url(
            &self.config.url_template,
            self.state.borrow().selected_account.as_ref(),
        )
    }

    /// Records that the embedded frame finished loading `url`. Loads of any
    /// URL other than the current one are ignored.
    pub fn content_loaded(&self, url: &str) {
        let current = self.embedded_url();
        if current.is_empty() || current != url {
            log::debug!("ignoring load of stale frame url");
            return;
        }
        self.update(|state| state.app_loaded = true);
    }

    /// The rendered contract for the view layer.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let url = self.embedded_url();
        SessionView::new(&self.state.borrow(), &self.config.web_app_name, url)
    }

    /// Ends the session. Pending bridge calls may still resolve, but their
    /// results are dropped and nothing is persisted any more.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        self.state
            .send_modify(|state| state.connection_phase = ConnectionPhase::Disconnected);
        log::debug!("session torn down");
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        if self.is_torn_down() {
            return;
        }
        self.state.send_modify(apply);
    }
}
