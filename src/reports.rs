//! Reports Client
//!
//! Category and trend charts, export links and the period switcher.

use std::rc::Rc;

use crate::charts::{ChartBoard, CATEGORY_CHART, TREND_CHART};
use crate::endpoints::Endpoints;
use crate::ports::{Browser, ChartRenderer, Event, EventHub, EventKind, Target};
use crate::protocol::{ExportFormat, Period};

pub const EXPORT_CONTROL: &str = "[data-export-format]";
pub const EXPORT_FORMAT_ATTRIBUTE: &str = "data-export-format";

pub struct ReportsClient<B, R> {
    browser: B,
    endpoints: Endpoints,
    charts: ChartBoard<R>,
}

impl<B: Browser, R: ChartRenderer> ReportsClient<B, R> {
    pub fn new(browser: B, renderer: R, endpoints: Endpoints) -> Self {
        Self {
            browser,
            endpoints,
            charts: ChartBoard::new(renderer),
        }
    }

    pub fn render_charts(&self) -> usize {
        self.charts.render_all(&self.browser, &[CATEGORY_CHART, TREND_CHART])
    }

    pub fn on_resize(&self) {
        self.charts.relayout(&self.browser);
    }

    /// Period named in the page URL, or the default
    pub fn current_period(&self) -> Period {
        self.endpoints.current_period(&self.browser.query())
    }

    /// URL that exports the current period in `format`
    pub fn export_url(&self, format: &ExportFormat) -> String {
        self.endpoints.export(format, &self.current_period())
    }

    /// Navigate to the export of the current period; returns the URL
    pub fn export(&self, format: &ExportFormat) -> String {
        let url = self.export_url(format);
        tracing::info!(format = %format, url = %url, "Exporting report");
        self.browser.navigate(&url);
        url
    }

    /// Reload the reports page for another period; returns the URL
    pub fn switch_period(&self, period: &Period) -> String {
        let url = self.endpoints.reports(period);
        self.browser.navigate(&url);
        url
    }

    pub fn charts(&self) -> &ChartBoard<R> {
        &self.charts
    }
}

impl<B, R> ReportsClient<B, R>
where
    B: Browser + 'static,
    R: ChartRenderer + 'static,
{
    /// Draw the charts and wire export controls and resizing
    pub fn bind<H: EventHub + 'static>(self: &Rc<Self>, hub: &Rc<H>) {
        if self.render_charts() > 0 {
            let this = Rc::clone(self);
            hub.on(
                Target::Window,
                EventKind::Resize,
                Rc::new(move |_: &Event| this.on_resize()),
            );
        }

        if self.browser.count(EXPORT_CONTROL) > 0 {
            let this = Rc::clone(self);
            hub.on(
                Target::Each {
                    selector: EXPORT_CONTROL,
                    attribute: EXPORT_FORMAT_ATTRIBUTE,
                },
                EventKind::Click,
                Rc::new(move |event: &Event| {
                    if let Some(format) = event.data() {
                        this.export(&ExportFormat::new(format));
                    }
                }),
            );
        }
    }
}
