//! Tally Web
//!
//! Browser entry point for the expense tracker pages (WASM).
//!
//! # Architecture
//!
//! The page controllers live in the `tally` crate and are written against
//! its page ports. This crate implements those ports over the live DOM
//! (`web-sys`), fetch (`gloo-net`) and the page's Bootstrap and Plotly
//! globals, then starts every controller whose elements are present.

use std::rc::Rc;

use tally::dashboard::DELETE_MODAL;
use tally::expense_form::{AMOUNT_FIELD, DATE_FIELD};
use tally::reports::EXPORT_CONTROL;
use tally::{
    AuthClient, DashboardClient, Endpoints, ExpenseFormClient, IndexPageClient, LocalClock, Page,
    Period, ReportsClient, TREND_CHART,
};
use wasm_bindgen::prelude::*;

mod bridge;
mod dom;
mod http;
mod hub;

pub use bridge::{BootstrapModal, PlotlyRenderer};
pub use dom::DomPage;
pub use http::GlooTransport;
pub use hub::DomHub;

#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    match DomPage::from_window() {
        Some(page) => boot(page),
        None => web_sys::console::error_1(&"Tally: no browser window".into()),
    }
}

/// Start the controllers relevant to the current page
pub fn boot(page: DomPage) {
    let hub = Rc::new(DomHub::new(page.clone()));
    let endpoints = Endpoints::same_origin();

    Rc::new(AuthClient::new(page.clone(), GlooTransport, endpoints.clone())).bind(&hub);
    Rc::new(IndexPageClient::new(page.clone())).bind(&hub);

    // Both pages draw #categoryChart; the reports page owns it when present.
    if is_reports_page(&page) {
        Rc::new(reports_client(&page, endpoints)).bind(&hub);
    } else {
        Rc::new(DashboardClient::new(
            page.clone(),
            GlooTransport,
            BootstrapModal::new(page.window().clone(), DELETE_MODAL),
            PlotlyRenderer::new(page.window().clone()),
            endpoints,
        ))
        .bind(&hub);
    }

    if page.exists(AMOUNT_FIELD) || page.exists(DATE_FIELD) {
        Rc::new(ExpenseFormClient::new(page, LocalClock)).bind(&hub);
    }
}

fn is_reports_page(page: &DomPage) -> bool {
    page.exists(TREND_CHART.element_id) || page.count(EXPORT_CONTROL) > 0
}

fn reports_client(page: &DomPage, endpoints: Endpoints) -> ReportsClient<DomPage, PlotlyRenderer> {
    ReportsClient::new(
        page.clone(),
        PlotlyRenderer::new(page.window().clone()),
        endpoints,
    )
}

/// Period switcher for inline `onclick="switchPeriod('year')"` handlers
#[wasm_bindgen(js_name = switchPeriod)]
pub fn switch_period(period: &str) {
    if let Some(page) = DomPage::from_window() {
        reports_client(&page, Endpoints::same_origin()).switch_period(&Period::new(period));
    }
}
