use crate::Account;

/// Placeholder replaced by the selected account's address.
pub const ACCOUNT_ADDRESS_TOKEN: &str = "{account.address}";

/// Builds the embedded app URL for `account`.
///
/// Only the first occurrence of [`ACCOUNT_ADDRESS_TOKEN`] is substituted and no
/// other tokens are recognised. A template without the token is returned as is.
#[must_use]
pub fn render_url(template: &str, account: &Account) -> String {
    template.replacen(ACCOUNT_ADDRESS_TOKEN, &account.address, 1)
}

/// Like [`render_url`], but yields an empty string when nothing is selected.
#[must_use]
pub fn embedded_url(template: &str, selected: Option<&Account>) -> String {
    selected.map_or_else(String::new, |account| render_url(template, account))
}

/// Builds the embedded app URL for an optional selection. Exported for hosts
/// that render the frame themselves.
#[cfg_attr(feature = "ffi", uniffi::export)]
#[allow(clippy::needless_pass_by_value)]
#[must_use]
pub fn account_url(template: String, account: Option<Account>) -> String {
    embedded_url(&template, account.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("1", "BTC", "bc1qxyz")
    }

    #[test]
    fn test_substitutes_address() {
        let url = render_url("https://app.example/x?addr={account.address}", &account());
        assert_eq!(url, "https://app.example/x?addr=bc1qxyz");
    }

    #[test]
    fn test_template_without_token_is_unchanged() {
        let url = render_url("https://app.example/static", &account());
        assert_eq!(url, "https://app.example/static");
    }

    #[test]
    fn test_other_tokens_are_left_alone() {
        let url = render_url(
            "https://app.example/{account.id}/{account.address}",
            &account(),
        );
        assert_eq!(url, "https://app.example/{account.id}/bc1qxyz");
    }

    #[test]
    fn test_only_first_token_is_replaced() {
        let url = render_url("{account.address}/{account.address}", &account());
        assert_eq!(url, "bc1qxyz/{account.address}");
    }

    #[test]
    fn test_no_selection_is_empty() {
        assert_eq!(embedded_url("https://app.example/{account.address}", None), "");
    }

    #[test]
    fn test_account_url() {
        let template = "https://app.example/{account.address}".to_string();
        assert_eq!(
            account_url(template.clone(), Some(account())),
            "https://app.example/bc1qxyz"
        );
        assert_eq!(account_url(template, None), "");
    }

    #[test]
    fn test_embedded_url_is_idempotent() {
        let selected = account();
        let template = "https://app.example/{account.address}";
        assert_eq!(
            embedded_url(template, Some(&selected)),
            embedded_url(template, Some(&selected))
        );
    }
}
