//! Page Capabilities
//!
//! The traits the page controllers are written against. The browser build
//! implements them over `web-sys`, the headless driver over in-memory state,
//! and tests over recording fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::future::LocalBoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use crate::error::ClientResult;
use crate::protocol::ChartPayload;

// ============ HTTP ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request as issued by a page controller
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body; `None` still sends `Content-Type: application/json` on POST
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post_json<B: Serialize>(url: impl Into<String>, body: &B) -> ClientResult<Self> {
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn post_empty(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: None,
        }
    }
}

/// A completed response; non-2xx statuses are not errors at this level
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// True when the final response was reached through an HTTP redirect
    pub redirected: bool,
    /// Final URL after redirects
    pub url: String,
    pub body: String,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response transport (browser fetch, reqwest, or a fake)
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

// ============ Page ============

/// DOM facade, addressed by element id.
///
/// Operations on missing elements are no-ops; reads return `None`.
pub trait Page {
    fn exists(&self, id: &str) -> bool;

    /// Number of elements matching a CSS selector
    fn count(&self, selector: &str) -> usize;

    /// Current value of a form field
    fn value(&self, id: &str) -> Option<String>;

    fn set_value(&self, id: &str, value: &str);

    fn set_visible(&self, id: &str, visible: bool);

    fn set_text(&self, id: &str, text: &str);

    /// Mark a field invalid and put `message` directly below it,
    /// replacing any message already there
    fn show_field_error(&self, id: &str, message: &str);

    fn clear_field_error(&self, id: &str);

    /// Rendered `(width, height)` in pixels
    fn size(&self, id: &str) -> Option<(f64, f64)>;

    /// A string the server embedded in the page as a global, e.g. `trendChartData`
    fn embedded(&self, name: &str) -> Option<String>;
}

/// Browser location
pub trait Navigator {
    fn navigate(&self, url: &str);

    fn reload(&self);

    /// Current location search string, e.g. `?period=year`
    fn query(&self) -> String;
}

/// User-facing messages
pub trait Notifier {
    /// Show a non-blocking toast. Returns false when the page has no toast widget.
    fn toast(&self, message: &str) -> bool;

    /// Blocking alert
    fn alert(&self, message: &str);

    /// Console output for failures
    fn log_error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Everything a controller needs from the page it runs in
pub trait Browser: Page + Navigator + Notifier {}

impl<T: Page + Navigator + Notifier + ?Sized> Browser for T {}

/// Confirmation dialog provided by the UI framework
pub trait Modal {
    fn show(&self);
    fn hide(&self);
}

/// External charting library
pub trait ChartRenderer {
    fn new_plot(&self, element_id: &str, payload: &ChartPayload) -> ClientResult<()>;

    fn relayout(&self, element_id: &str, width: f64, height: f64) -> ClientResult<()>;
}

/// Source of the local calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

// ============ Events ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
    Resize,
}

/// What a handler listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The element with this id
    Element(&'static str),
    /// The first element matching a CSS selector
    First(&'static str),
    /// Every element matching `selector`; events carry its `attribute` value
    Each {
        selector: &'static str,
        attribute: &'static str,
    },
    Window,
}

/// A dispatched DOM event
#[derive(Debug, Default)]
pub struct Event {
    data: Option<String>,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event raised on a `Target::Each` element carrying `data`
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            default_prevented: Cell::new(false),
        }
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Handler = Rc<dyn Fn(&Event)>;

/// Event handler registration plus a local task spawner
pub trait EventHub {
    fn on(&self, target: Target, kind: EventKind, handler: Handler);

    /// Run `task` to completion in the background
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Register an asynchronous handler.
///
/// `action` runs synchronously inside the event (so it may call
/// `prevent_default`) and the future it returns is spawned on `hub`.
pub fn spawn_on<H, F, Fut>(hub: &Rc<H>, target: Target, kind: EventKind, action: F)
where
    H: EventHub + 'static,
    F: Fn(&Event) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let spawner = Rc::clone(hub);
    hub.on(
        target,
        kind,
        Rc::new(move |event: &Event| {
            let task = action(event);
            spawner.spawn(Box::pin(task));
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_serializes_body() {
        let body = serde_json::json!({"email": "a@b.c"});
        let request = HttpRequest::post_json("/reset-password", &body).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(serde_json::json!({"email": "a@b.c"})));
    }

    #[test]
    fn test_response_json_ignores_status() {
        let response = HttpResponse {
            status: 401,
            redirected: false,
            url: "/login".to_string(),
            body: r#"{"success": false, "error": "Invalid email or password"}"#.to_string(),
        };
        assert!(!response.is_success());
        let parsed: crate::protocol::ServerResponse = response.json().unwrap();
        assert_eq!(parsed.error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn test_event_prevent_default() {
        let event = Event::with_data("42");
        assert_eq!(event.data(), Some("42"));
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
