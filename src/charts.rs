//! Chart regions shared by the dashboard and reports pages.
//!
//! A region pairs a container element with the page global holding its
//! `{data, layout}` payload. Regions are drawn once on load and re-laid-out
//! to their container size when the window resizes.

use std::cell::RefCell;

use crate::ports::{Browser, ChartRenderer, Page};
use crate::protocol::ChartPayload;

/// A chart container and the global its payload is embedded under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRegion {
    pub element_id: &'static str,
    pub payload_global: &'static str,
}

pub const CATEGORY_CHART: ChartRegion = ChartRegion {
    element_id: "categoryChart",
    payload_global: "categoryChartData",
};

pub const TREND_CHART: ChartRegion = ChartRegion {
    element_id: "trendChart",
    payload_global: "trendChartData",
};

/// Renders chart regions and remembers which ones were drawn
pub struct ChartBoard<R> {
    renderer: R,
    rendered: RefCell<Vec<&'static str>>,
}

impl<R: ChartRenderer> ChartBoard<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            rendered: RefCell::new(Vec::new()),
        }
    }

    /// Draw every region that has both its element and its payload.
    /// Returns how many regions are now drawn.
    pub fn render_all<B: Browser + ?Sized>(&self, page: &B, regions: &[ChartRegion]) -> usize {
        for region in regions {
            self.render(page, region);
        }
        self.rendered.borrow().len()
    }

    /// Draw one region. A region is drawn at most once; a bad payload is
    /// logged and the region skipped.
    pub fn render<B: Browser + ?Sized>(&self, page: &B, region: &ChartRegion) -> bool {
        if self.is_rendered(region.element_id) || !page.exists(region.element_id) {
            return false;
        }
        let Some(raw) = page.embedded(region.payload_global) else {
            return false;
        };

        let drawn = ChartPayload::parse(&raw)
            .and_then(|payload| self.renderer.new_plot(region.element_id, &payload));
        match drawn {
            Ok(()) => {
                tracing::debug!(chart = region.element_id, "Chart rendered");
                self.rendered.borrow_mut().push(region.element_id);
                true
            }
            Err(e) => {
                page.log_error(&format!("{} not rendered: {}", region.element_id, e));
                false
            }
        }
    }

    /// Fit every drawn chart to its container's current size
    pub fn relayout<P: Page + ?Sized>(&self, page: &P) {
        for element_id in self.rendered.borrow().iter() {
            let Some((width, height)) = page.size(element_id) else {
                continue;
            };
            if let Err(e) = self.renderer.relayout(element_id, width, height) {
                tracing::warn!(chart = *element_id, error = %e, "Relayout failed");
            }
        }
    }

    pub fn is_rendered(&self, element_id: &str) -> bool {
        self.rendered.borrow().iter().any(|id| *id == element_id)
    }

    pub fn rendered(&self) -> Vec<&'static str> {
        self.rendered.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBrowser;
    use crate::test_support::{ChartCall, RecordingRenderer};

    const PAYLOAD: &str = r#"{"data": [{"type": "pie", "values": [1, 2]}], "layout": {"title": "By category"}}"#;

    #[test]
    fn test_renders_only_complete_regions() {
        let page = HeadlessBrowser::new()
            .with_element("categoryChart")
            .with_embedded("categoryChartData", PAYLOAD)
            .with_embedded("trendChartData", PAYLOAD);
        let renderer = RecordingRenderer::default();
        let board = ChartBoard::new(renderer.clone());

        assert_eq!(board.render_all(&page, &[CATEGORY_CHART, TREND_CHART]), 1);
        assert_eq!(renderer.new_plots(), vec!["categoryChart".to_string()]);

        match &renderer.calls()[0] {
            ChartCall::NewPlot { payload, .. } => {
                assert_eq!(payload.layout["title"], "By category");
                assert_eq!(payload.data[0]["type"], "pie");
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_region_is_drawn_once() {
        let page = HeadlessBrowser::new()
            .with_element("trendChart")
            .with_embedded("trendChartData", PAYLOAD);
        let renderer = RecordingRenderer::default();
        let board = ChartBoard::new(renderer.clone());

        assert!(board.render(&page, &TREND_CHART));
        assert!(!board.render(&page, &TREND_CHART));
        assert_eq!(renderer.new_plots().len(), 1);
    }

    #[test]
    fn test_bad_payload_is_logged_and_skipped() {
        let page = HeadlessBrowser::new()
            .with_element("categoryChart")
            .with_embedded("categoryChartData", "{not json")
            .with_element("trendChart")
            .with_embedded("trendChartData", PAYLOAD);
        let renderer = RecordingRenderer::default();
        let board = ChartBoard::new(renderer.clone());

        assert_eq!(board.render_all(&page, &[CATEGORY_CHART, TREND_CHART]), 1);
        assert_eq!(board.rendered(), vec!["trendChart"]);
        assert_eq!(page.console().len(), 1);
        assert!(page.console()[0].starts_with("categoryChart not rendered: Invalid chart payload"));
        assert!(page.alerts().is_empty());
    }

    #[test]
    fn test_relayout_uses_current_container_size() {
        let page = HeadlessBrowser::new()
            .with_size("categoryChart", 640.0, 480.0)
            .with_embedded("categoryChartData", PAYLOAD);
        let renderer = RecordingRenderer::default();
        let board = ChartBoard::new(renderer.clone());
        board.render_all(&page, &[CATEGORY_CHART, TREND_CHART]);

        page.resize("categoryChart", 320.0, 240.0);
        board.relayout(&page);

        assert_eq!(
            renderer.calls().last(),
            Some(&ChartCall::Relayout {
                element_id: "categoryChart".to_string(),
                width: 320.0,
                height: 240.0,
            })
        );
        // The trend region was never drawn, so it is never re-laid-out.
        assert_eq!(renderer.calls().len(), 2);
    }
}
