//! Sign-in / registration panel switching used by the landing and auth pages.

use std::rc::Rc;

use crate::ports::{Event, EventHub, EventKind, Page, Target};

pub const SIGN_IN_PANEL: &str = "emailSignInForm";
pub const REGISTER_PANEL: &str = "registerForm";
pub const AUTH_ERROR: &str = "auth-error";

/// Controls that switch panels
pub const SHOW_SIGN_IN_BUTTON: &str = "emailSignIn";
pub const REGISTER_LINK: &str = "registerLink";
pub const LOGIN_LINK: &str = "loginLink";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    SignIn,
    Register,
}

impl Panel {
    pub fn element_id(self) -> &'static str {
        match self {
            Panel::SignIn => SIGN_IN_PANEL,
            Panel::Register => REGISTER_PANEL,
        }
    }

    pub fn other(self) -> Panel {
        match self {
            Panel::SignIn => Panel::Register,
            Panel::Register => Panel::SignIn,
        }
    }
}

/// Show `panel`, hide the other one and hide any previous error banner
pub fn show_panel<P: Page + ?Sized>(page: &P, panel: Panel) {
    page.set_visible(panel.other().element_id(), false);
    page.set_visible(panel.element_id(), true);
    page.set_visible(AUTH_ERROR, false);
}

/// Wire the panel switching controls the page has. Links suppress their
/// default navigation; the sign-in button does not.
pub fn bind_toggles<P, H, F>(page: &P, hub: &Rc<H>, show: F)
where
    P: Page + ?Sized,
    H: EventHub + 'static,
    F: Fn(Panel) + Clone + 'static,
{
    let toggles = [
        (SHOW_SIGN_IN_BUTTON, Panel::SignIn, false),
        (REGISTER_LINK, Panel::Register, true),
        (LOGIN_LINK, Panel::SignIn, true),
    ];

    for (control, panel, is_link) in toggles {
        if !page.exists(control) {
            continue;
        }
        let show = show.clone();
        hub.on(
            Target::Element(control),
            EventKind::Click,
            Rc::new(move |event: &Event| {
                if is_link {
                    event.prevent_default();
                }
                show(panel);
            }),
        );
    }
}
