use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use embedkit_core::bridge::{AccountRequest, HostBridge};
use embedkit_core::{Account, BridgeError, BridgeResult};

/// Host bridge backed by a JS object provided by the page.
pub struct JsHostBridge {
    inner: JsValue,
}

impl JsHostBridge {
    /// Wraps a JS object exposing `connect`, `listAccounts` and
    /// `requestAccount`.
    #[must_use]
    pub const fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    fn method(&self, name: &str) -> BridgeResult<Function> {
        Reflect::get(&self.inner, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| BridgeError::Unavailable(format!("host bridge has no {name}()")))
    }

    async fn settle(value: Result<JsValue, JsValue>) -> BridgeResult<JsValue> {
        let value = value.map_err(js_error)?;
        JsFuture::from(Promise::resolve(&value))
            .await
            .map_err(js_error)
    }
}

#[async_trait(?Send)]
impl HostBridge for JsHostBridge {
    fn connect(&self) {
        let result = self
            .method("connect")
            .and_then(|connect| connect.call0(&self.inner).map_err(js_error));
        if let Err(err) = result {
            log::warn!("connect failed: {err}");
        }
    }

    async fn list_accounts(&self) -> BridgeResult<Vec<Account>> {
        let list = self.method("listAccounts")?;
        let value = Self::settle(list.call0(&self.inner)).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| BridgeError::Rejected(format!("malformed account list: {e}")))
    }

    async fn request_account(&self, request: AccountRequest) -> BridgeResult<Account> {
        let request_fn = self.method("requestAccount")?;
        let options = serde_wasm_bindgen::to_value(&request)
            .map_err(|e| BridgeError::Rejected(e.to_string()))?;
        let value = Self::settle(request_fn.call1(&self.inner, &options)).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| BridgeError::Rejected(format!("malformed account: {e}")))
    }
}

fn js_error(value: JsValue) -> BridgeError {
    let message = value.dyn_ref::<js_sys::Error>().map_or_else(
        || value.as_string().unwrap_or_else(|| format!("{value:?}")),
        |err| String::from(err.message()),
    );
    BridgeError::Rejected(message)
}
