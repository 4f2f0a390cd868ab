//! DOM Page
//!
//! `Page`, `Navigator` and `Notifier` over the live document. Panels are
//! shown and hidden with Bootstrap's `d-none` class; inline field errors use
//! `is-invalid` plus an `.invalid-feedback` element next to the field.

use tally::{Navigator, Notifier, Page};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    Window,
};

use crate::bridge;

const HIDDEN_CLASS: &str = "d-none";
const INVALID_CLASS: &str = "is-invalid";
const FEEDBACK_CLASS: &str = "invalid-feedback";

pub const TOAST: &str = "errorToast";
pub const TOAST_MESSAGE: &str = "toastMessage";

/// The current browser page
#[derive(Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    /// `None` outside a browser window
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl Page for DomPage {
    fn exists(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn count(&self, selector: &str) -> usize {
        self.document
            .query_selector_all(selector)
            .map(|nodes| nodes.length() as usize)
            .unwrap_or(0)
    }

    fn value(&self, id: &str) -> Option<String> {
        let element = self.element(id)?;
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(input.value()),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlSelectElement>() {
            Ok(select) => return Some(select.value()),
            Err(element) => element,
        };
        element
            .dyn_into::<HtmlTextAreaElement>()
            .ok()
            .map(|area| area.value())
    }

    fn set_value(&self, id: &str, value: &str) {
        let Some(element) = self.element(id) else {
            return;
        };
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(element) = self.element(id) {
            let classes = element.class_list();
            let _ = if visible {
                classes.remove_1(HIDDEN_CLASS)
            } else {
                classes.add_1(HIDDEN_CLASS)
            };
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn show_field_error(&self, id: &str, message: &str) {
        self.clear_field_error(id);
        let Some(field) = self.element(id) else {
            return;
        };
        let _ = field.class_list().add_1(INVALID_CLASS);

        let Some(parent) = field.parent_element() else {
            return;
        };
        if let Ok(feedback) = self.document.create_element("div") {
            feedback.set_class_name(FEEDBACK_CLASS);
            feedback.set_text_content(Some(message));
            let _ = parent.append_child(&feedback);
        }
    }

    fn clear_field_error(&self, id: &str) {
        let Some(field) = self.element(id) else {
            return;
        };
        let _ = field.class_list().remove_1(INVALID_CLASS);

        let selector = format!(".{}", FEEDBACK_CLASS);
        if let Some(Ok(Some(feedback))) = field
            .parent_element()
            .map(|parent| parent.query_selector(&selector))
        {
            feedback.remove();
        }
    }

    fn size(&self, id: &str) -> Option<(f64, f64)> {
        let element = self.element(id)?.dyn_into::<HtmlElement>().ok()?;
        Some((element.offset_width() as f64, element.offset_height() as f64))
    }

    fn embedded(&self, name: &str) -> Option<String> {
        js_sys::Reflect::get(&self.window, &name.into())
            .ok()
            .and_then(|value| value.as_string())
    }
}

impl Navigator for DomPage {
    fn navigate(&self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            self.log_error(&format!("Navigation to {} failed: {:?}", url, e));
        }
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            self.log_error(&format!("Reload failed: {:?}", e));
        }
    }

    fn query(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }
}

impl Notifier for DomPage {
    fn toast(&self, message: &str) -> bool {
        let (Some(text), Some(toast)) = (self.element(TOAST_MESSAGE), self.element(TOAST)) else {
            return false;
        };
        text.set_text_content(Some(message));
        match bridge::show_toast(&self.window, &toast) {
            Ok(()) => true,
            Err(e) => {
                self.log_error(&format!("Toast unavailable: {:?}", e));
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn log_error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
    }
}
