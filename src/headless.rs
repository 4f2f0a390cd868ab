//! Headless Browser
//!
//! In-memory page used by the `tally` CLI and by tests. It holds form field
//! values, visibility and inline errors by element id, and records every
//! navigation, reload, alert, toast and console line instead of acting on it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ClientResult;
use crate::ports::{ChartRenderer, Modal, Navigator, Notifier, Page};
use crate::protocol::ChartPayload;

#[derive(Debug, Clone)]
struct Element {
    value: String,
    visible: bool,
    text: String,
    field_error: Option<String>,
    size: Option<(f64, f64)>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            value: String::new(),
            visible: true,
            text: String::new(),
            field_error: None,
            size: None,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    elements: HashMap<String, Element>,
    selector_counts: HashMap<String, usize>,
    embedded: HashMap<String, String>,
    query: String,
    toast_widget: bool,
    navigations: Vec<String>,
    reloads: usize,
    alerts: Vec<String>,
    toasts: Vec<String>,
    console: Vec<String>,
}

/// In-memory `Page + Navigator + Notifier`.
///
/// Clones share state, so a test can keep a handle while a controller owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBrowser {
    state: Rc<RefCell<State>>,
}

impl HeadlessBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the page a toast widget, so errors skip the alert fallback
    pub fn with_toast(self) -> Self {
        self.state.borrow_mut().toast_widget = true;
        self
    }

    pub fn with_element(self, id: &str) -> Self {
        self.state
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_default();
        self
    }

    pub fn with_field(self, id: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_default()
            .value = value.to_string();
        self
    }

    pub fn with_hidden(self, id: &str) -> Self {
        self.state
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_default()
            .visible = false;
        self
    }

    pub fn with_size(self, id: &str, width: f64, height: f64) -> Self {
        self.state
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_default()
            .size = Some((width, height));
        self
    }

    /// Declare `count` elements matching a non-id selector
    pub fn with_matches(self, selector: &str, count: usize) -> Self {
        self.state
            .borrow_mut()
            .selector_counts
            .insert(selector.to_string(), count);
        self
    }

    /// Embed a page global such as `categoryChartData`
    pub fn with_embedded(self, name: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .embedded
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_query(self, query: &str) -> Self {
        self.state.borrow_mut().query = query.to_string();
        self
    }

    /// Fill a form field, creating it if needed
    pub fn fill(&self, id: &str, value: &str) {
        self.state
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_default()
            .value = value.to_string();
    }

    /// Resize an element, as the window would on resize
    pub fn resize(&self, id: &str, width: f64, height: f64) {
        if let Some(element) = self.state.borrow_mut().elements.get_mut(id) {
            element.size = Some((width, height));
        }
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.state.borrow().elements.get(id).map(|e| e.visible)
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.state.borrow().elements.get(id).map(|e| e.text.clone())
    }

    pub fn field_error(&self, id: &str) -> Option<String> {
        self.state
            .borrow()
            .elements
            .get(id)
            .and_then(|e| e.field_error.clone())
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.borrow().navigations.clone()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.state.borrow().navigations.last().cloned()
    }

    pub fn reloads(&self) -> usize {
        self.state.borrow().reloads
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.state.borrow().toasts.clone()
    }

    pub fn console(&self) -> Vec<String> {
        self.state.borrow().console.clone()
    }
}

impl Page for HeadlessBrowser {
    fn exists(&self, id: &str) -> bool {
        self.state.borrow().elements.contains_key(id)
    }

    fn count(&self, selector: &str) -> usize {
        match selector.strip_prefix('#') {
            Some(id) => usize::from(self.exists(id)),
            None => self
                .state
                .borrow()
                .selector_counts
                .get(selector)
                .copied()
                .unwrap_or(0),
        }
    }

    fn value(&self, id: &str) -> Option<String> {
        self.state.borrow().elements.get(id).map(|e| e.value.clone())
    }

    fn set_value(&self, id: &str, value: &str) {
        if let Some(element) = self.state.borrow_mut().elements.get_mut(id) {
            element.value = value.to_string();
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(element) = self.state.borrow_mut().elements.get_mut(id) {
            element.visible = visible;
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.state.borrow_mut().elements.get_mut(id) {
            element.text = text.to_string();
        }
    }

    fn show_field_error(&self, id: &str, message: &str) {
        if let Some(element) = self.state.borrow_mut().elements.get_mut(id) {
            element.field_error = Some(message.to_string());
        }
    }

    fn clear_field_error(&self, id: &str) {
        if let Some(element) = self.state.borrow_mut().elements.get_mut(id) {
            element.field_error = None;
        }
    }

    fn size(&self, id: &str) -> Option<(f64, f64)> {
        self.state.borrow().elements.get(id).and_then(|e| e.size)
    }

    fn embedded(&self, name: &str) -> Option<String> {
        self.state.borrow().embedded.get(name).cloned()
    }
}

impl Navigator for HeadlessBrowser {
    fn navigate(&self, url: &str) {
        tracing::debug!(url, "navigate");
        self.state.borrow_mut().navigations.push(url.to_string());
    }

    fn reload(&self) {
        tracing::debug!("reload");
        self.state.borrow_mut().reloads += 1;
    }

    fn query(&self) -> String {
        self.state.borrow().query.clone()
    }
}

impl Notifier for HeadlessBrowser {
    fn toast(&self, message: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if state.toast_widget {
            state.toasts.push(message.to_string());
        }
        state.toast_widget
    }

    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }

    fn log_error(&self, message: &str) {
        tracing::error!("{}", message);
        self.state.borrow_mut().console.push(message.to_string());
    }
}

/// Modal that only tracks whether it is open
#[derive(Debug, Clone, Default)]
pub struct HeadlessModal {
    open: Rc<Cell<bool>>,
}

impl HeadlessModal {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }
}

impl Modal for HeadlessModal {
    fn show(&self) {
        self.open.set(true);
    }

    fn hide(&self) {
        self.open.set(false);
    }
}

/// Renderer for pages without a display; charts are accepted and dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessCharts;

impl ChartRenderer for HeadlessCharts {
    fn new_plot(&self, element_id: &str, _payload: &ChartPayload) -> ClientResult<()> {
        tracing::debug!(element_id, "chart skipped");
        Ok(())
    }

    fn relayout(&self, _element_id: &str, _width: f64, _height: f64) -> ClientResult<()> {
        Ok(())
    }
}
