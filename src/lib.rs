//! # Tally
//!
//! Page controllers for a personal expense tracker: sign-in and registration,
//! the dashboard's delete confirmation, the expense form's client-side checks,
//! and the reports page's charts and export links.
//!
//! ## Modules
//!
//! - [`ports`]: the page capabilities controllers are written against
//! - [`auth`], [`dashboard`], [`expense_form`], [`reports`], [`index_page`]:
//!   one controller per page
//! - [`protocol`]: request and response bodies of the server endpoints
//! - [`endpoints`]: URL building and query-string reading
//! - [`headless`]: an in-memory page for drivers without a browser
//! - [`transport`]: `reqwest` transport (`native` feature)
//!
//! The browser build lives in the `tally-web` crate and implements the same
//! ports over the DOM.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tally::{AuthClient, ClientConfig, Endpoints, HeadlessBrowser, ReqwestTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ClientConfig::from_env();
//!     config.server.base_url = "http://localhost:5000".to_string();
//!
//!     let auth = AuthClient::new(
//!         HeadlessBrowser::new(),
//!         ReqwestTransport::new(&config.server)?,
//!         Endpoints::from_config(&config),
//!     );
//!
//!     let outcome = auth.sign_in("me@example.com", "secret").await;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod expense_form;
pub mod feedback;
pub mod headless;
pub mod index_page;
pub mod panels;
pub mod ports;
pub mod protocol;
pub mod reports;

#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod transport;

#[cfg(test)]
mod test_support;

// Re-export top-level types for convenience
pub use auth::{AuthClient, AuthOutcome};
pub use charts::{ChartBoard, ChartRegion, CATEGORY_CHART, TREND_CHART};
pub use config::{ClientConfig, LoggingConfig, ServerConfig};
pub use dashboard::{DashboardClient, DeleteOutcome};
pub use endpoints::{period_from_query, Endpoints};
pub use error::{ClientError, ClientResult};
pub use expense_form::{
    format_currency, parse_amount, validate, ExpenseFields, ExpenseFormClient, Field, FieldError,
    ValidationReport,
};
pub use feedback::{report_error, ErrorChannel};
pub use headless::{HeadlessBrowser, HeadlessCharts, HeadlessModal};
pub use index_page::IndexPageClient;
pub use panels::Panel;
pub use ports::{
    Browser, ChartRenderer, Clock, Event, EventHub, EventKind, Handler, HttpRequest, HttpResponse,
    HttpTransport, LocalClock, Method, Modal, Navigator, Notifier, Page, Target,
};
pub use protocol::{
    ChartPayload, Credentials, ExpenseId, ExportFormat, PasswordResetRequest, Period,
    ServerResponse,
};
pub use reports::ReportsClient;

#[cfg(feature = "native")]
pub use config::ConfigError;
#[cfg(feature = "native")]
pub use transport::ReqwestTransport;
