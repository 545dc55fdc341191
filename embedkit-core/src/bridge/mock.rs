//! In-process stand-in for the host platform.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{AccountRequest, HostBridge};
use crate::{Account, BridgeError, BridgeResult};

/// Host bridge serving a fixed account list.
///
/// `request_account` replays scripted responses first; once the script is
/// exhausted it picks the first listed account in an allowed currency, or
/// reports a cancellation when there is none. `list_accounts` can be held
/// open with [`MockBridge::hold_list_accounts`] to interleave other calls.
#[derive(Debug, Default)]
pub struct MockBridge {
    accounts: Mutex<Vec<Account>>,
    list_failure: Mutex<Option<BridgeError>>,
    responses: Mutex<VecDeque<BridgeResult<Account>>>,
    last_request: Mutex<Option<AccountRequest>>,
    list_gate: Mutex<Option<Arc<Notify>>>,
    connects: AtomicUsize,
    lists: AtomicUsize,
    requests: AtomicUsize,
}

impl MockBridge {
    /// Creates a bridge serving `accounts`.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Self::default()
        }
    }

    /// Creates a bridge with a handful of demo accounts in BTC and ETH.
    #[must_use]
    pub fn with_sample_accounts() -> Self {
        Self::new(vec![
            Account::new("mock:1:bitcoin:savings", "BTC", "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq")
                .with_name("Bitcoin 1"),
            Account::new("mock:1:ethereum:main", "ETH", "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c")
                .with_name("Ethereum 1"),
            Account::new("mock:2:bitcoin:spending", "BTC", "bc1q9vza2e8x573nczrlzms0wvx3gsqjx7vavgkx0l")
                .with_name("Bitcoin 2"),
        ])
    }

    /// Replaces the account list served by `list_accounts`.
    pub fn set_accounts(&self, accounts: Vec<Account>) {
        *lock(&self.accounts) = accounts;
    }

    /// Makes every following `list_accounts` call fail with `error`, or
    /// succeed again with `None`.
    pub fn fail_list_accounts(&self, error: Option<BridgeError>) {
        *lock(&self.list_failure) = error;
    }

    /// Queues the result of the next unscripted `request_account` call.
    pub fn push_request_response(&self, response: BridgeResult<Account>) {
        lock(&self.responses).push_back(response);
    }

    /// Holds every following `list_accounts` call until the returned handle
    /// is notified once per call.
    #[must_use]
    pub fn hold_list_accounts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *lock(&self.list_gate) = Some(Arc::clone(&gate));
        gate
    }

    /// Options of the most recent `request_account` call.
    #[must_use]
    pub fn last_request(&self) -> Option<AccountRequest> {
        lock(&self.last_request).clone()
    }

    /// Number of `connect` calls.
    #[must_use]
    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of `list_accounts` calls.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Number of `request_account` calls.
    #[must_use]
    pub fn request_calls(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl HostBridge for MockBridge {
    fn connect(&self) {
        self.connects.fetch_add(1, Ordering::SeqCst);
    }

    async fn list_accounts(&self) -> BridgeResult<Vec<Account>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let gate = lock(&self.list_gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(error) = lock(&self.list_failure).clone() {
            return Err(error);
        }
        Ok(lock(&self.accounts).clone())
    }

    async fn request_account(&self, request: AccountRequest) -> BridgeResult<Account> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_request) = Some(request.clone());

        if let Some(response) = lock(&self.responses).pop_front() {
            return response;
        }
        lock(&self.accounts)
            .iter()
            .find(|account| request.currencies.contains(&account.currency))
            .cloned()
            .ok_or(BridgeError::Cancelled)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(currencies: &[&str]) -> AccountRequest {
        AccountRequest {
            currencies: currencies.iter().map(ToString::to_string).collect(),
            allow_add_account: true,
        }
    }

    #[tokio::test]
    async fn test_request_account_picks_allowed_currency() {
        let bridge = MockBridge::with_sample_accounts();
        let account = bridge.request_account(request(&["ETH"])).await.unwrap();
        assert_eq!(account.currency, "ETH");
        assert_eq!(bridge.last_request(), Some(request(&["ETH"])));
    }

    #[tokio::test]
    async fn test_request_account_without_match_is_cancelled() {
        let bridge = MockBridge::with_sample_accounts();
        let result = bridge.request_account(request(&["DOGE"])).await;
        assert_eq!(result, Err(BridgeError::Cancelled));
    }

    #[tokio::test]
    async fn test_scripted_responses_come_first() {
        let bridge = MockBridge::with_sample_accounts();
        bridge.push_request_response(Err(BridgeError::Rejected("busy".to_string())));
        let result = bridge.request_account(request(&["BTC"])).await;
        assert_eq!(result, Err(BridgeError::Rejected("busy".to_string())));
        assert!(bridge.request_account(request(&["BTC"])).await.is_ok());
        assert_eq!(bridge.request_calls(), 2);
    }

    #[tokio::test]
    async fn test_list_failure() {
        let bridge = MockBridge::with_sample_accounts();
        bridge.fail_list_accounts(Some(BridgeError::Unavailable("offline".to_string())));
        assert!(bridge.list_accounts().await.is_err());
        bridge.fail_list_accounts(None);
        assert_eq!(bridge.list_accounts().await.unwrap().len(), 3);
        assert_eq!(bridge.list_calls(), 2);
    }
}
