//! Landing page: switching between the sign-in and registration panels, and
//! the inline error banner.

use std::rc::Rc;

use crate::panels::{self, Panel, AUTH_ERROR};
use crate::ports::{Browser, EventHub};

pub struct IndexPageClient<B> {
    browser: B,
}

impl<B: Browser> IndexPageClient<B> {
    pub fn new(browser: B) -> Self {
        Self { browser }
    }

    pub fn show_panel(&self, panel: Panel) {
        panels::show_panel(&self.browser, panel);
    }

    /// Put `message` in the error banner, or log and alert when the page has none
    pub fn show_error(&self, message: &str) {
        if self.browser.exists(AUTH_ERROR) {
            self.browser.set_text(AUTH_ERROR, message);
            self.browser.set_visible(AUTH_ERROR, true);
        } else {
            self.browser.log_error(&format!("Error: {}", message));
            self.browser.alert(message);
        }
    }
}

impl<B: Browser + 'static> IndexPageClient<B> {
    pub fn bind<H: EventHub + 'static>(self: &Rc<Self>, hub: &Rc<H>) {
        let this = Rc::clone(self);
        panels::bind_toggles(&self.browser, hub, move |panel| this.show_panel(panel));
    }
}
