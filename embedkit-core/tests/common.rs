//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use embedkit_core::bridge::{HostBridge, MockBridge};
use embedkit_core::storage::{MemoryPreferenceStore, PreferenceStore, SELECTED_ACCOUNT_KEY};
use embedkit_core::{Account, SessionConfig, SessionController};

pub const TEMPLATE: &str = "https://app.example/x?addr={account.address}";

pub struct Harness {
    pub controller: SessionController,
    pub bridge: Rc<MockBridge>,
    pub store: Rc<MemoryPreferenceStore>,
}

pub fn config(currencies: &[&str], initial_account_id: Option<&str>) -> SessionConfig {
    SessionConfig {
        web_app_name: "Swap".to_string(),
        url_template: TEMPLATE.to_string(),
        currencies: currencies.iter().map(ToString::to_string).collect(),
        initial_account_id: initial_account_id.map(ToString::to_string),
    }
}

pub fn btc(id: &str) -> Account {
    Account::new(id, "BTC", format!("bc1-{id}"))
}

pub fn eth(id: &str) -> Account {
    Account::new(id, "ETH", format!("0x-{id}"))
}

pub fn harness(config: SessionConfig, accounts: Vec<Account>) -> Harness {
    harness_with_store(config, accounts, MemoryPreferenceStore::new())
}

pub fn harness_with_stored_id(
    config: SessionConfig,
    accounts: Vec<Account>,
    stored_id: &str,
) -> Harness {
    harness_with_store(
        config,
        accounts,
        MemoryPreferenceStore::with_value(SELECTED_ACCOUNT_KEY, stored_id),
    )
}

pub fn harness_with_store(
    config: SessionConfig,
    accounts: Vec<Account>,
    store: MemoryPreferenceStore,
) -> Harness {
    let bridge = Rc::new(MockBridge::new(accounts));
    let store = Rc::new(store);
    let host: Rc<dyn HostBridge> = bridge.clone();
    let prefs: Rc<dyn PreferenceStore> = store.clone();
    Harness {
        controller: SessionController::new(config, host, prefs),
        bridge,
        store,
    }
}

pub fn selected_id(harness: &Harness) -> Option<String> {
    harness.controller.state().selected_account.map(|account| account.id)
}
