use serde::Deserialize;
use thiserror::Error;

use crate::ACCOUNT_ADDRESS_TOKEN;

/// App name shown while the embedded app loads when the launcher gives none.
pub const DEFAULT_WEB_APP_NAME: &str = "WebApp";

/// Errors raised while validating launch parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "ffi", derive(uniffi::Error))]
#[cfg_attr(feature = "ffi", uniffi(flat_error))]
pub enum ConfigError {
    /// The `params` value is not a JSON object of the expected shape.
    #[error("malformed_params: {0}")]
    MalformedParams(String),
    /// No `webUrl` template was provided.
    #[error("missing_url_template")]
    MissingUrlTemplate,
    /// The currency allow-list is missing or empty.
    #[error("empty_allow_list")]
    EmptyAllowList,
}

/// Launch parameters as the host page passes them, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchParams {
    /// Human readable name of the embedded app.
    #[serde(default)]
    pub web_app_name: Option<String>,
    /// URL template containing [`ACCOUNT_ADDRESS_TOKEN`].
    #[serde(default)]
    pub web_url: Option<String>,
    /// Currency allow-list.
    #[serde(default)]
    pub currencies: Option<Vec<String>>,
}

impl LaunchParams {
    /// Parses the JSON `params` launch value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedParams`] if the JSON cannot be decoded.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::MalformedParams(e.to_string()))
    }

    /// Validates the parameters into a [`SessionConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL template is missing or the allow-list is
    /// empty.
    pub fn validate(
        self,
        initial_account_id: Option<String>,
    ) -> Result<SessionConfig, ConfigError> {
        let web_app_name = non_blank(self.web_app_name)
            .unwrap_or_else(|| DEFAULT_WEB_APP_NAME.to_string());

        let url_template = non_blank(self.web_url).ok_or(ConfigError::MissingUrlTemplate)?;
        if !url_template.contains(ACCOUNT_ADDRESS_TOKEN) {
            log::warn!("url template has no {ACCOUNT_ADDRESS_TOKEN} placeholder");
        }

        let mut currencies: Vec<String> = Vec::new();
        for currency in self.currencies.unwrap_or_default() {
            if !currency.is_empty() && !currencies.contains(&currency) {
                currencies.push(currency);
            }
        }
        if currencies.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }

        Ok(SessionConfig {
            web_app_name,
            url_template,
            currencies,
            initial_account_id: non_blank(initial_account_id),
        })
    }
}

/// Validated configuration of one embedding session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SessionConfig {
    /// Name of the embedded app, used in status text.
    pub web_app_name: String,
    /// URL template for the embedded frame.
    pub url_template: String,
    /// Non-empty, de-duplicated currency allow-list.
    pub currencies: Vec<String>,
    /// Account the launcher asked to open with, if any.
    pub initial_account_id: Option<String>,
}

impl SessionConfig {
    /// Builds the configuration from the raw `params` and `accountId` query
    /// values. An absent `params` value is treated as an empty object.
    ///
    /// # Errors
    ///
    /// See [`LaunchParams::from_json`] and [`LaunchParams::validate`].
    pub fn from_query(
        params_json: Option<&str>,
        account_id: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let params = match params_json {
            Some(raw) => LaunchParams::from_json(raw)?,
            None => LaunchParams::default(),
        };
        params.validate(account_id.map(ToString::to_string))
    }
}

/// Builds a [`SessionConfig`] from the raw launch query values.
///
/// # Errors
///
/// See [`SessionConfig::from_query`].
#[cfg_attr(feature = "ffi", uniffi::export)]
#[allow(clippy::needless_pass_by_value)]
pub fn launch_config(
    params_json: Option<String>,
    account_id: Option<String>,
) -> Result<SessionConfig, ConfigError> {
    SessionConfig::from_query(params_json.as_deref(), account_id.as_deref())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &str = r#"{
        "webAppName": "Swap",
        "webUrl": "https://app.example/x?addr={account.address}",
        "currencies": ["BTC", "ETH", "BTC"]
    }"#;

    #[test]
    fn test_from_query() {
        let config = SessionConfig::from_query(Some(PARAMS), Some("acc-1")).unwrap();
        assert_eq!(config.web_app_name, "Swap");
        assert_eq!(config.url_template, "https://app.example/x?addr={account.address}");
        assert_eq!(config.currencies, ["BTC", "ETH"]);
        assert_eq!(config.initial_account_id.as_deref(), Some("acc-1"));
    }

    #[test]
    fn test_default_app_name() {
        let config = SessionConfig::from_query(
            Some(r#"{"webUrl":"https://a/{account.address}","currencies":["BTC"],"webAppName":" "}"#),
            None,
        )
        .unwrap();
        assert_eq!(config.web_app_name, DEFAULT_WEB_APP_NAME);
        assert_eq!(config.initial_account_id, None);
    }

    #[test]
    fn test_blank_account_id_is_absent() {
        let config = SessionConfig::from_query(Some(PARAMS), Some("")).unwrap();
        assert_eq!(config.initial_account_id, None);
    }

    #[test]
    fn test_missing_url_template() {
        let err = SessionConfig::from_query(Some(r#"{"currencies":["BTC"]}"#), None).unwrap_err();
        assert_eq!(err, ConfigError::MissingUrlTemplate);

        let err = SessionConfig::from_query(None, None).unwrap_err();
        assert_eq!(err, ConfigError::MissingUrlTemplate);
    }

    #[test]
    fn test_empty_allow_list_is_rejected() {
        let err = SessionConfig::from_query(
            Some(r#"{"webUrl":"https://a/{account.address}","currencies":[]}"#),
            None,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyAllowList);

        let err =
            SessionConfig::from_query(Some(r#"{"webUrl":"https://a/{account.address}"}"#), None)
                .unwrap_err();
        assert_eq!(err, ConfigError::EmptyAllowList);
    }

    #[test]
    fn test_launch_config_matches_from_query() {
        let config = launch_config(Some(PARAMS.to_string()), Some("acc-1".to_string())).unwrap();
        assert_eq!(
            config,
            SessionConfig::from_query(Some(PARAMS), Some("acc-1")).unwrap()
        );
        assert_eq!(launch_config(None, None).unwrap_err(), ConfigError::MissingUrlTemplate);
    }

    #[test]
    fn test_malformed_params() {
        let err = SessionConfig::from_query(Some("{not json"), None).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedParams(_)));

        let err = SessionConfig::from_query(Some(r#"{"currencies":"BTC"}"#), None).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedParams(_)));
    }
}
