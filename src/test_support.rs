//! Recording fakes for the page ports, used by the unit tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;

use crate::error::{ClientError, ClientResult};
use crate::ports::{
    ChartRenderer, Event, EventHub, EventKind, Handler, HttpRequest, HttpResponse,
    HttpTransport, Modal, Target,
};
use crate::protocol::ChartPayload;

/// Transport that answers from a queue of canned replies and records every request.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Result<HttpResponse, String>>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            redirected: false,
            url: String::new(),
            body: body.to_string(),
        }));
        self
    }

    pub(crate) fn reply_text(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            redirected: false,
            url: String::new(),
            body: body.to_string(),
        }));
        self
    }

    pub(crate) fn reply_redirected(self, final_url: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status: 200,
            redirected: true,
            url: final_url.to_string(),
            body: "<html></html>".to_string(),
        }));
        self
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());
        let mut response = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply".to_string()))
            .map_err(ClientError::Transport)?;
        if response.url.is_empty() {
            response.url = request.url;
        }
        Ok(response)
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingModal {
    open: Rc<Cell<bool>>,
    shown: Rc<Cell<usize>>,
}

impl RecordingModal {
    pub(crate) fn is_open(&self) -> bool {
        self.open.get()
    }

    pub(crate) fn times_shown(&self) -> usize {
        self.shown.get()
    }
}

impl Modal for RecordingModal {
    fn show(&self) {
        self.open.set(true);
        self.shown.set(self.shown.get() + 1);
    }

    fn hide(&self) {
        self.open.set(false);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChartCall {
    NewPlot { element_id: String, payload: ChartPayload },
    Relayout { element_id: String, width: f64, height: f64 },
}

#[derive(Clone, Default)]
pub(crate) struct RecordingRenderer {
    calls: Rc<RefCell<Vec<ChartCall>>>,
}

impl RecordingRenderer {
    pub(crate) fn calls(&self) -> Vec<ChartCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn new_plots(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                ChartCall::NewPlot { element_id, .. } => Some(element_id.clone()),
                ChartCall::Relayout { .. } => None,
            })
            .collect()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn new_plot(&self, element_id: &str, payload: &ChartPayload) -> ClientResult<()> {
        self.calls.borrow_mut().push(ChartCall::NewPlot {
            element_id: element_id.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }

    fn relayout(&self, element_id: &str, width: f64, height: f64) -> ClientResult<()> {
        self.calls.borrow_mut().push(ChartCall::Relayout {
            element_id: element_id.to_string(),
            width,
            height,
        });
        Ok(())
    }
}

/// Hub that keeps registered handlers so tests can fire events, and queues
/// spawned tasks until the test drives them.
#[derive(Default)]
pub(crate) struct TestHub {
    handlers: RefCell<Vec<(Target, EventKind, Handler)>>,
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl TestHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_bound(&self, target: Target, kind: EventKind) -> bool {
        self.handlers
            .borrow()
            .iter()
            .any(|(t, k, _)| *t == target && *k == kind)
    }

    pub(crate) fn bound_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Dispatch an event to every matching handler and return it for inspection.
    pub(crate) fn fire(&self, target: Target, kind: EventKind, event: Event) -> Event {
        let matching: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(t, k, _)| *t == target && *k == kind)
            .map(|(_, _, h)| Rc::clone(h))
            .collect();
        for handler in matching {
            handler(&event);
        }
        event
    }

    pub(crate) async fn run_tasks(&self) {
        loop {
            let pending: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
            if pending.is_empty() {
                break;
            }
            for task in pending {
                task.await;
            }
        }
    }
}

impl EventHub for TestHub {
    fn on(&self, target: Target, kind: EventKind, handler: Handler) {
        self.handlers.borrow_mut().push((target, kind, handler));
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push(task);
    }
}
