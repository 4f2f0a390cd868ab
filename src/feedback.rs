//! Error display path shared by the page controllers.

use crate::ports::Notifier;

/// Where an error message ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorChannel {
    Toast,
    Alert,
}

/// Show `message` in the page's toast, or log it and raise a blocking alert
/// when the page has no toast widget.
pub fn report_error<N: Notifier + ?Sized>(notifier: &N, message: &str) -> ErrorChannel {
    if notifier.toast(message) {
        tracing::debug!(message, "error shown in toast");
        ErrorChannel::Toast
    } else {
        notifier.log_error(&format!("Error: {}", message));
        notifier.alert(message);
        ErrorChannel::Alert
    }
}
