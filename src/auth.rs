//! Authentication Client
//!
//! Sign-in, registration, sign-out and password reset against the session
//! endpoints, plus the form and panel wiring of the auth pages.
//!
//! ## Error display
//!
//! Server failures (`success: false`) and transport failures take the same
//! path: the page's toast when it has one, otherwise a console line and a
//! blocking alert. Password reset always answers with a blocking alert.

use std::rc::Rc;

use crate::endpoints::Endpoints;
use crate::error::ClientResult;
use crate::feedback::report_error;
use crate::panels::{self, Panel};
use crate::ports::{
    spawn_on, Browser, EventHub, EventKind, HttpRequest, HttpTransport, Target,
};
use crate::protocol::{Credentials, PasswordResetRequest, ServerResponse};

pub const LOGIN_FORM: &str = "email-login-form";
pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

pub const REGISTER_FORM: &str = "email-register-form";
pub const REGISTER_EMAIL_FIELD: &str = "register-email";
pub const REGISTER_PASSWORD_FIELD: &str = "register-password";
pub const CONFIRM_PASSWORD_FIELD: &str = "confirm-password";

pub const SIGN_OUT_BUTTON: &str = "sign-out-btn";
pub const FORGOT_PASSWORD_LINK: &str = "forgotPasswordLink";

pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const RESET_NEEDS_EMAIL: &str = "Please enter your email address first";
pub const RESET_SENT: &str = "Password reset instructions have been sent to your email";
pub const RESET_FAILED: &str = "Failed to send reset instructions";

/// What an auth action ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The browser was sent to this URL
    Navigated(String),
    /// Success without a target; the page was reloaded
    Reloaded,
    /// An informational alert was shown
    Notified(String),
    /// An error was shown to the user
    Failed(String),
    /// Rejected before any request was sent; the message was shown
    Rejected(String),
    /// A failure that only went to the console
    Logged(String),
    /// Nothing to do
    Quiet,
}

/// Auth page controller
pub struct AuthClient<B, T> {
    browser: B,
    transport: T,
    endpoints: Endpoints,
}

impl<B, T> AuthClient<B, T>
where
    B: Browser,
    T: HttpTransport,
{
    pub fn new(browser: B, transport: T, endpoints: Endpoints) -> Self {
        Self {
            browser,
            transport,
            endpoints,
        }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthOutcome {
        self.submit_credentials(Credentials::sign_in(email, password), "Login")
            .await
    }

    /// Create an account; same endpoint and response shape as sign-in
    pub async fn register(&self, email: &str, password: &str) -> AuthOutcome {
        self.submit_credentials(Credentials::registration(email, password), "Registration")
            .await
    }

    async fn submit_credentials(&self, credentials: Credentials, action: &str) -> AuthOutcome {
        tracing::info!(
            registration = credentials.is_registration,
            "Submitting credentials"
        );

        let response = match HttpRequest::post_json(self.endpoints.login(), &credentials) {
            Ok(request) => self.exchange(request).await,
            Err(e) => Err(e),
        };

        match response {
            Ok(data) if data.success => match data.redirect {
                Some(target) => {
                    tracing::info!(redirect = %target, "{} succeeded", action);
                    self.browser.navigate(&target);
                    AuthOutcome::Navigated(target)
                }
                None => {
                    tracing::info!("{} succeeded without redirect, reloading", action);
                    self.browser.reload();
                    AuthOutcome::Reloaded
                }
            },
            Ok(data) => {
                let fallback = format!("{} failed", action);
                let message = data.error_or(&fallback).to_string();
                tracing::warn!(error = %message, "{} rejected by server", action);
                report_error(&self.browser, &message);
                AuthOutcome::Failed(message)
            }
            Err(e) => {
                let message = format!("{} error: {}", action, e);
                report_error(&self.browser, &message);
                AuthOutcome::Failed(message)
            }
        }
    }

    /// End the session.
    ///
    /// A redirected response is followed; a JSON failure is shown; transport
    /// and decode failures only reach the console.
    pub async fn sign_out(&self) -> AuthOutcome {
        let response = match self
            .transport
            .send(HttpRequest::get(self.endpoints.logout()))
            .await
        {
            Ok(response) => response,
            Err(e) => return self.log_only(format!("Logout error: {}", e)),
        };

        if response.redirected {
            tracing::info!(url = %response.url, "Logout redirected");
            self.browser.navigate(&response.url);
            return AuthOutcome::Navigated(response.url);
        }

        match response.json::<ServerResponse>() {
            Ok(data) if data.success => AuthOutcome::Quiet,
            Ok(data) => {
                let message = data.error_or("Logout failed").to_string();
                report_error(&self.browser, &message);
                AuthOutcome::Failed(message)
            }
            Err(e) => self.log_only(format!("Logout error: {}", e)),
        }
    }

    /// Ask the server to send reset instructions to `email`
    pub async fn request_password_reset(&self, email: &str) -> AuthOutcome {
        if email.is_empty() {
            self.browser.alert(RESET_NEEDS_EMAIL);
            return AuthOutcome::Rejected(RESET_NEEDS_EMAIL.to_string());
        }

        let request = HttpRequest::post_json(
            self.endpoints.reset_password(),
            &PasswordResetRequest {
                email: email.to_string(),
            },
        );
        let response = match request {
            Ok(request) => self.exchange(request).await,
            Err(e) => Err(e),
        };

        match response {
            Ok(data) if data.success => {
                self.browser.alert(RESET_SENT);
                AuthOutcome::Notified(RESET_SENT.to_string())
            }
            Ok(data) => {
                let message = data.error_or(RESET_FAILED).to_string();
                self.browser.alert(&message);
                AuthOutcome::Failed(message)
            }
            Err(e) => {
                self.browser
                    .log_error(&format!("Password reset error: {}", e));
                self.browser.alert(RESET_FAILED);
                AuthOutcome::Failed(RESET_FAILED.to_string())
            }
        }
    }

    /// Login form submit: read the fields and sign in
    pub async fn submit_login(&self) -> AuthOutcome {
        let email = self.field(EMAIL_FIELD);
        let password = self.field(PASSWORD_FIELD);
        self.sign_in(&email, &password).await
    }

    /// Registration form submit: passwords must match before anything is sent
    pub async fn submit_registration(&self) -> AuthOutcome {
        let email = self.field(REGISTER_EMAIL_FIELD);
        let password = self.field(REGISTER_PASSWORD_FIELD);
        let confirm = self.field(CONFIRM_PASSWORD_FIELD);

        if password != confirm {
            report_error(&self.browser, PASSWORDS_DIFFER);
            return AuthOutcome::Rejected(PASSWORDS_DIFFER.to_string());
        }

        self.register(&email, &password).await
    }

    /// Forgot-password link: reset for whatever is in the login email field
    pub async fn forgot_password(&self) -> AuthOutcome {
        let email = self.field(EMAIL_FIELD);
        self.request_password_reset(&email).await
    }

    pub fn show_panel(&self, panel: Panel) {
        panels::show_panel(&self.browser, panel);
    }

    fn field(&self, id: &str) -> String {
        self.browser.value(id).unwrap_or_default()
    }

    async fn exchange(&self, request: HttpRequest) -> ClientResult<ServerResponse> {
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, url = %response.url, "Auth response");
        response.json()
    }

    fn log_only(&self, message: String) -> AuthOutcome {
        self.browser.log_error(&message);
        AuthOutcome::Logged(message)
    }
}

impl<B, T> AuthClient<B, T>
where
    B: Browser + 'static,
    T: HttpTransport + 'static,
{
    /// Register handlers for whichever auth controls the page has
    pub fn bind<H: EventHub + 'static>(self: &Rc<Self>, hub: &Rc<H>) {
        if self.browser.exists(LOGIN_FORM) {
            let this = Rc::clone(self);
            spawn_on(hub, Target::Element(LOGIN_FORM), EventKind::Submit, move |event| {
                event.prevent_default();
                let this = Rc::clone(&this);
                async move {
                    this.submit_login().await;
                }
            });
        }

        if self.browser.exists(REGISTER_FORM) {
            let this = Rc::clone(self);
            spawn_on(hub, Target::Element(REGISTER_FORM), EventKind::Submit, move |event| {
                event.prevent_default();
                let this = Rc::clone(&this);
                async move {
                    this.submit_registration().await;
                }
            });
        }

        let this = Rc::clone(self);
        panels::bind_toggles(&self.browser, hub, move |panel| this.show_panel(panel));

        if self.browser.exists(SIGN_OUT_BUTTON) {
            let this = Rc::clone(self);
            spawn_on(hub, Target::Element(SIGN_OUT_BUTTON), EventKind::Click, move |event| {
                event.prevent_default();
                let this = Rc::clone(&this);
                async move {
                    this.sign_out().await;
                }
            });
        }

        if self.browser.exists(FORGOT_PASSWORD_LINK) {
            let this = Rc::clone(self);
            spawn_on(
                hub,
                Target::Element(FORGOT_PASSWORD_LINK),
                EventKind::Click,
                move |event| {
                    event.prevent_default();
                    let this = Rc::clone(&this);
                    async move {
                        this.forgot_password().await;
                    }
                },
            );
        }
    }
}
