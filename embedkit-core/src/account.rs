use serde::{Deserialize, Serialize};

/// An account owned by the host platform.
///
/// Accounts are immutable from the session's point of view; the host is the
/// only party that creates or changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque identifier, stable across sessions and unique within one listing.
    pub id: String,
    /// Display name chosen by the user in the host wallet.
    #[serde(default)]
    pub name: String,
    /// Currency ticker used for allow-list filtering.
    pub currency: String,
    /// Chain address substituted into the embedded app URL.
    pub address: String,
}

impl Account {
    /// Creates an account with an empty display name.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        currency: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            currency: currency.into(),
            address: address.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Keeps the accounts whose currency is in `currencies`, preserving host order.
///
/// Matching is exact and case-sensitive.
#[must_use]
pub fn filter_accounts(accounts: Vec<Account>, currencies: &[String]) -> Vec<Account> {
    accounts
        .into_iter()
        .filter(|account| currencies.iter().any(|c| *c == account.currency))
        .collect()
}

/// Picks the account to select from an already filtered list.
///
/// Priority: the launch account id, then the stored preference, then the
/// first account. Ids that are not in `accounts` are skipped.
#[must_use]
pub fn resolve_selection(
    accounts: &[Account],
    initial_account_id: Option<&str>,
    stored_account_id: Option<&str>,
) -> Option<Account> {
    let find = |id: Option<&str>| {
        id.and_then(|id| accounts.iter().find(|account| account.id == id))
    };

    find(initial_account_id)
        .or_else(|| find(stored_account_id))
        .or_else(|| accounts.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn accounts() -> Vec<Account> {
        vec![
            Account::new("1", "BTC", "bc1-one"),
            Account::new("2", "ETH", "0x-two"),
            Account::new("3", "BTC", "bc1-three"),
        ]
    }

    fn currencies(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_filter_keeps_host_order() {
        let filtered = filter_accounts(accounts(), &currencies(&["BTC"]));
        let ids: Vec<_> = filtered.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let filtered = filter_accounts(accounts(), &currencies(&["btc"]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_with_no_match_is_empty() {
        let filtered = filter_accounts(accounts(), &currencies(&["DOGE"]));
        assert!(filtered.is_empty());
    }

    #[test_case(Some("3"), Some("2") => Some("3".to_string()); "initial id wins")]
    #[test_case(None, Some("2") => Some("2".to_string()); "stored id beats first")]
    #[test_case(Some("9"), Some("2") => Some("2".to_string()); "unknown initial falls through")]
    #[test_case(Some("9"), Some("8") => Some("1".to_string()); "unknown ids fall back to first")]
    #[test_case(None, None => Some("1".to_string()); "first by default")]
    fn test_resolve_selection(initial: Option<&str>, stored: Option<&str>) -> Option<String> {
        resolve_selection(&accounts(), initial, stored).map(|a| a.id)
    }

    #[test]
    fn test_resolve_selection_on_empty_list() {
        assert_eq!(resolve_selection(&[], Some("1"), Some("2")), None);
    }

    #[test]
    fn test_deserialize_without_name() {
        let account: Account =
            serde_json::from_str(r#"{"id":"a","currency":"ETH","address":"0xabc"}"#)
                .unwrap();
        assert_eq!(account, Account::new("a", "ETH", "0xabc"));
    }
}
