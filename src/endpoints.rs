//! Endpoint URLs
//!
//! Builds the URLs the page clients request or navigate to, and reads the
//! active reporting period back out of the page's query string.

use crate::config::ClientConfig;
use crate::protocol::{ExpenseId, ExportFormat, Period};

/// Resolved endpoint URLs for one server
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    login: String,
    logout: String,
    reset_password: String,
    delete_expense: String,
    export: String,
    reports: String,
    default_period: Period,
}

impl Endpoints {
    pub fn from_config(config: &ClientConfig) -> Self {
        let paths = &config.endpoints;
        Self {
            base_url: config.server.base_url.trim_end_matches('/').to_string(),
            login: paths.login.clone(),
            logout: paths.logout.clone(),
            reset_password: paths.reset_password.clone(),
            delete_expense: paths.delete_expense.trim_end_matches('/').to_string(),
            export: paths.export.clone(),
            reports: paths.reports.clone(),
            default_period: Period::new(config.reports.default_period.clone()),
        }
    }

    /// Same-origin endpoints with the stock paths
    pub fn same_origin() -> Self {
        Self::from_config(&ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn login(&self) -> String {
        self.url(&self.login)
    }

    pub fn logout(&self) -> String {
        self.url(&self.logout)
    }

    pub fn reset_password(&self) -> String {
        self.url(&self.reset_password)
    }

    pub fn delete_expense(&self, id: &ExpenseId) -> String {
        format!(
            "{}/{}",
            self.url(&self.delete_expense),
            urlencoding::encode(id.as_str())
        )
    }

    pub fn export(&self, format: &ExportFormat, period: &Period) -> String {
        format!(
            "{}?format={}&period={}",
            self.url(&self.export),
            urlencoding::encode(format.as_str()),
            urlencoding::encode(period.as_str())
        )
    }

    pub fn reports(&self, period: &Period) -> String {
        format!(
            "{}?period={}",
            self.url(&self.reports),
            urlencoding::encode(period.as_str())
        )
    }

    /// Period named by `query` (a location search string), else the default
    pub fn current_period(&self, query: &str) -> Period {
        period_from_query(query).unwrap_or_else(|| self.default_period.clone())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::same_origin()
    }
}

/// The `period` parameter of a query string such as `?period=year&x=1`.
///
/// Empty values count as absent. The first occurrence wins.
pub fn period_from_query(query: &str) -> Option<Period> {
    query_param(query, "period")
        .filter(|value| !value.is_empty())
        .map(Period::new)
}

/// Value of the first `name` parameter in a query string
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode_component(key) == name)
        .map(|(_, value)| decode_component(value))
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}
