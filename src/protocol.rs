//! Wire Types
//!
//! Request payloads sent to the server and the response shapes read back.
//! Every value here lives for a single request.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClientError, ClientResult};

/// Login or registration payload for `/login`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_registration: bool,
}

impl Credentials {
    pub fn sign_in(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            is_registration: false,
        }
    }

    pub fn registration(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            is_registration: true,
            ..Self::sign_in(email, password)
        }
    }
}

/// Payload for `/reset-password`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Uniform response of every mutating endpoint.
///
/// The server sends this body with error status codes too, so it is parsed
/// regardless of the HTTP status. A missing `success` reads as a failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerResponse {
    /// The server's error text, or `fallback` when it sent none
    pub fn error_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.error.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => fallback,
        }
    }
}

/// Pre-serialized `{data, layout}` pair embedded by the server.
///
/// Both halves are forwarded to the charting library untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub layout: serde_json::Value,
}

impl ChartPayload {
    /// Parse the JSON string the server injected into the page
    pub fn parse(raw: &str) -> ClientResult<Self> {
        serde_json::from_str(raw).map_err(|e| ClientError::ChartPayload(e.to_string()))
    }
}

/// Identifier of an expense, as carried by `data-expense-id`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reporting time window (`month`, `year`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period(String);

impl Period {
    pub const DEFAULT: &'static str = "month";

    pub fn new(period: impl Into<String>) -> Self {
        Self(period.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Export file format (`csv`, `pdf`, ...), as carried by `data-export-format`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportFormat(String);

impl ExportFormat {
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
