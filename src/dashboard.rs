//! Dashboard Client
//!
//! Expense deletion behind a confirmation modal, plus the category chart.

use std::cell::RefCell;
use std::rc::Rc;

use crate::charts::{ChartBoard, CATEGORY_CHART};
use crate::endpoints::Endpoints;
use crate::error::ClientResult;
use crate::ports::{
    spawn_on, Browser, ChartRenderer, Event, EventHub, EventKind, HttpRequest, HttpTransport,
    Modal, Target,
};
use crate::protocol::{ExpenseId, ServerResponse};

pub const DELETE_TRIGGER: &str = ".delete-expense";
pub const EXPENSE_ID_ATTRIBUTE: &str = "data-expense-id";
pub const CONFIRM_DELETE: &str = "confirmDelete";
pub const DELETE_MODAL: &str = "deleteExpenseModal";

pub const DELETE_REQUEST_FAILED: &str = "An error occurred while deleting the expense.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deleted; the modal was closed and the page reloaded
    Reloaded,
    /// The server refused; the alert text is attached
    Rejected(String),
    /// The request itself failed
    Failed(String),
    /// Confirm was pressed with nothing selected
    NothingPending,
}

pub struct DashboardClient<B, T, M, R> {
    browser: B,
    transport: T,
    modal: M,
    endpoints: Endpoints,
    charts: ChartBoard<R>,
    pending: RefCell<Option<ExpenseId>>,
}

impl<B, T, M, R> DashboardClient<B, T, M, R>
where
    B: Browser,
    T: HttpTransport,
    M: Modal,
    R: ChartRenderer,
{
    pub fn new(browser: B, transport: T, modal: M, renderer: R, endpoints: Endpoints) -> Self {
        Self {
            browser,
            transport,
            modal,
            endpoints,
            charts: ChartBoard::new(renderer),
            pending: RefCell::new(None),
        }
    }

    /// Deletion is wired only when the page has triggers, a confirm button and the modal
    pub fn deletion_available(&self) -> bool {
        self.browser.count(DELETE_TRIGGER) > 0
            && self.browser.exists(CONFIRM_DELETE)
            && self.browser.exists(DELETE_MODAL)
    }

    /// A delete trigger was clicked; the last click wins.
    ///
    /// A trigger without an id (missing or empty attribute) still opens the
    /// modal but leaves nothing to confirm.
    pub fn on_delete_click(&self, id: Option<ExpenseId>) {
        let id = id.filter(|id| !id.as_str().is_empty());
        match &id {
            Some(id) => tracing::debug!(expense_id = %id, "Delete requested, awaiting confirm"),
            None => tracing::debug!("Delete trigger carries no expense id"),
        }
        *self.pending.borrow_mut() = id;
        self.modal.show();
    }

    pub fn pending(&self) -> Option<ExpenseId> {
        self.pending.borrow().clone()
    }

    /// Confirm button: delete the pending expense.
    ///
    /// On refusal the modal and the pending id stay as they are so the user
    /// can retry.
    pub async fn confirm_delete(&self) -> DeleteOutcome {
        let Some(id) = self.pending() else {
            return DeleteOutcome::NothingPending;
        };

        match self.delete(&id).await {
            Ok(data) if data.success => {
                tracing::info!(expense_id = %id, "Expense deleted");
                self.modal.hide();
                self.browser.reload();
                DeleteOutcome::Reloaded
            }
            Ok(data) => {
                let message = format!("Error deleting expense: {}", data.error_or("Unknown error"));
                tracing::warn!(expense_id = %id, "Delete refused");
                self.browser.alert(&message);
                DeleteOutcome::Rejected(message)
            }
            Err(e) => {
                self.browser.log_error(&format!("Error: {}", e));
                self.browser.alert(DELETE_REQUEST_FAILED);
                DeleteOutcome::Failed(e.to_string())
            }
        }
    }

    async fn delete(&self, id: &ExpenseId) -> ClientResult<ServerResponse> {
        let url = self.endpoints.delete_expense(id);
        let response = self.transport.send(HttpRequest::post_empty(url)).await?;
        response.json()
    }

    /// Draw the category chart if the page carries one
    pub fn render_charts(&self) -> usize {
        self.charts.render_all(&self.browser, &[CATEGORY_CHART])
    }

    pub fn on_resize(&self) {
        self.charts.relayout(&self.browser);
    }

    pub fn charts(&self) -> &ChartBoard<R> {
        &self.charts
    }
}

impl<B, T, M, R> DashboardClient<B, T, M, R>
where
    B: Browser + 'static,
    T: HttpTransport + 'static,
    M: Modal + 'static,
    R: ChartRenderer + 'static,
{
    pub fn bind<H: EventHub + 'static>(self: &Rc<Self>, hub: &Rc<H>) {
        if self.deletion_available() {
            let this = Rc::clone(self);
            hub.on(
                Target::Each {
                    selector: DELETE_TRIGGER,
                    attribute: EXPENSE_ID_ATTRIBUTE,
                },
                EventKind::Click,
                Rc::new(move |event: &Event| {
                    this.on_delete_click(event.data().map(ExpenseId::new));
                }),
            );

            let this = Rc::clone(self);
            spawn_on(hub, Target::Element(CONFIRM_DELETE), EventKind::Click, move |_| {
                let this = Rc::clone(&this);
                async move {
                    this.confirm_delete().await;
                }
            });
        }

        if self.render_charts() > 0 {
            let this = Rc::clone(self);
            hub.on(
                Target::Window,
                EventKind::Resize,
                Rc::new(move |_: &Event| this.on_resize()),
            );
        }
    }
}
