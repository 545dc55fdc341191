//! WebAssembly bindings for `embedkit_core`.
//!
//! The page shell passes its host bridge object and the raw launch query
//! values to [`AccountSession`], then renders whatever [`AccountSession::view`]
//! returns. Preferences are kept in `window.localStorage`.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use embedkit_core::{
    Account, AccountRequestOutcome, SessionConfig, SessionController, SessionError,
};

mod bridge;
mod logger;
mod storage;

pub use bridge::JsHostBridge;
pub use storage::LocalStorageStore;

/// Account session bound to a JS host bridge.
#[wasm_bindgen]
pub struct AccountSession(Rc<SessionController>);

#[wasm_bindgen]
impl AccountSession {
    /// Creates a session from the page's launch query.
    ///
    /// `bridge` must expose `connect()`, `listAccounts()` and
    /// `requestAccount(options)`; the latter two return Promises.
    ///
    /// # Errors
    /// Throws when the launch parameters are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(
        bridge: JsValue,
        params_json: Option<String>,
        account_id: Option<String>,
    ) -> Result<Self, JsValue> {
        let config = SessionConfig::from_query(params_json.as_deref(), account_id.as_deref())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let controller = SessionController::new(
            config,
            Rc::new(JsHostBridge::new(bridge)),
            Rc::new(LocalStorageStore),
        );
        Ok(Self(Rc::new(controller)))
    }

    /// Connects to the host and loads accounts.
    ///
    /// # Errors
    /// Returns a rejected promise if listing accounts fails.
    pub fn start(&self) -> Promise {
        let controller = Rc::clone(&self.0);
        future_to_promise(async move {
            controller
                .start()
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(|err| session_error_to_jsvalue(&err))
        })
    }

    /// Asks the host for an account. Resolves to `true` when one was selected.
    ///
    /// # Errors
    /// Returns a rejected promise if persisting the selection fails.
    #[wasm_bindgen(js_name = requestAccount)]
    pub fn request_account(&self) -> Promise {
        let controller = Rc::clone(&self.0);
        future_to_promise(async move {
            match controller.request_account().await {
                Ok(AccountRequestOutcome::Selected(_)) => Ok(JsValue::TRUE),
                Ok(AccountRequestOutcome::Ignored(_) | AccountRequestOutcome::Discarded) => {
                    Ok(JsValue::FALSE)
                }
                Err(err) => Err(session_error_to_jsvalue(&err)),
            }
        })
    }

    /// Selects `account` (or clears the selection with `undefined`).
    ///
    /// # Errors
    /// Throws if `account` is not an account object or persisting fails.
    #[wasm_bindgen(js_name = selectAccount)]
    pub fn select_account(&self, account: JsValue) -> Result<(), JsValue> {
        let account: Option<Account> = serde_wasm_bindgen::from_value(account)?;
        self.0
            .select_account(account)
            .map_err(|err| session_error_to_jsvalue(&err))
    }

    /// Reports that the embedded frame finished loading `url`.
    #[wasm_bindgen(js_name = contentLoaded)]
    pub fn content_loaded(&self, url: &str) {
        self.0.content_loaded(url);
    }

    /// URL for the embedded frame; empty when no account is selected.
    #[wasm_bindgen(js_name = embeddedUrl)]
    #[must_use]
    pub fn embedded_url(&self) -> String {
        self.0.embedded_url()
    }

    /// Snapshot of the rendered state.
    ///
    /// # Errors
    /// Throws if the view cannot be converted to a JS object.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.0.view())?)
    }

    /// Ends the session; late host answers are ignored.
    pub fn teardown(&self) {
        self.0.teardown();
    }
}

/// Routes session logs to the browser console.
#[wasm_bindgen(js_name = installConsoleLogger)]
pub fn install_console_logger() {
    embedkit_core::logger::set_logger(std::sync::Arc::new(logger::ConsoleLogger));
}

fn session_error_to_jsvalue(error: &SessionError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen(typescript_custom_section)]
const TYPESCRIPT_DEFS: &str = r#"
export interface Account {
    id: string;
    name?: string;
    currency: string;
    address: string;
}

export interface HostBridge {
    connect(): void;
    listAccounts(): Promise<Account[]>;
    requestAccount(options: { currencies: string[]; allowAddAccount: boolean }): Promise<Account>;
}

export interface SessionView {
    status: "connecting" | "loadingAccounts" | "noAccounts" | "loadingApp" | "ready";
    statusMessage: string;
    embeddedUrl: string;
    accounts: Account[];
    selectedAccount?: Account;
    cookiesBlocked: boolean;
    showAccountBar: boolean;
}
"#;
