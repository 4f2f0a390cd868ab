//! DOM event registration.
//!
//! Listeners stay attached for the life of the page, so their closures are
//! leaked with `forget` once registered.

use futures_util::future::LocalBoxFuture;
use tally::{Event, EventHub, EventKind, Handler, Target};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

use crate::dom::DomPage;

fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Click => "click",
        EventKind::Submit => "submit",
        EventKind::Resize => "resize",
    }
}

/// Registers handlers on the live document and spawns tasks on the
/// browser's microtask queue
pub struct DomHub {
    page: DomPage,
}

impl DomHub {
    pub fn new(page: DomPage) -> Self {
        Self { page }
    }

    fn listen(
        &self,
        target: &EventTarget,
        kind: EventKind,
        handler: Handler,
        data: Option<String>,
    ) {
        let on_event = Closure::wrap(Box::new(move |dom_event: web_sys::Event| {
            let event = match &data {
                Some(value) => Event::with_data(value.clone()),
                None => Event::new(),
            };
            handler(&event);
            if event.default_prevented() {
                dom_event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let callback = on_event.as_ref().unchecked_ref();
        if let Err(e) = target.add_event_listener_with_callback(event_name(kind), callback) {
            web_sys::console::error_1(&e);
        }
        on_event.forget();
    }

    fn matching(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.page.document().query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl EventHub for DomHub {
    fn on(&self, target: Target, kind: EventKind, handler: Handler) {
        match target {
            Target::Element(id) => {
                if let Some(element) = self.page.document().get_element_by_id(id) {
                    self.listen(&element, kind, handler, None);
                }
            }
            Target::First(selector) => {
                if let Ok(Some(element)) = self.page.document().query_selector(selector) {
                    self.listen(&element, kind, handler, None);
                }
            }
            Target::Each {
                selector,
                attribute,
            } => {
                for element in self.matching(selector) {
                    let data = element.get_attribute(attribute);
                    self.listen(&element, kind, handler.clone(), data);
                }
            }
            Target::Window => {
                self.listen(self.page.window(), kind, handler, None);
            }
        }
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_each_target_passes_attribute_value() {
        let page = DomPage::from_window().unwrap();
        let host = page.document().create_element("div").unwrap();
        host.set_inner_html(
            r#"<button class="delete-expense-t" data-expense-id="41"></button>
               <button class="delete-expense-t" data-expense-id="42"></button>"#,
        );
        page.document().body().unwrap().append_child(&host).unwrap();

        let seen = Rc::new(Cell::new(0));
        let hub = DomHub::new(page.clone());
        let sink = Rc::clone(&seen);
        hub.on(
            Target::Each {
                selector: ".delete-expense-t",
                attribute: "data-expense-id",
            },
            EventKind::Click,
            Rc::new(move |event: &Event| {
                let id: u32 = event.data().unwrap().parse().unwrap();
                sink.set(id);
            }),
        );

        let second = page
            .document()
            .query_selector_all(".delete-expense-t")
            .unwrap()
            .item(1)
            .unwrap()
            .dyn_into::<web_sys::HtmlElement>()
            .unwrap();
        second.click();

        assert_eq!(seen.get(), 42);
    }
}
