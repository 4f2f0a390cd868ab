//! Bootstrap and Plotly Bridge
//!
//! The page loads Bootstrap and Plotly as globals; these wrappers reach them
//! through `js_sys::Reflect` instead of generated bindings.

use js_sys::{Array, Function, Object, Reflect, JSON};
use tally::{ChartPayload, ChartRenderer, ClientError, ClientResult, Modal};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Window};

fn global(window: &Window, path: &[&str]) -> Result<JsValue, JsValue> {
    let mut value: JsValue = window.clone().into();
    for name in path {
        value = Reflect::get(&value, &JsValue::from_str(name))?;
        if value.is_undefined() {
            return Err(JsValue::from_str(&format!("{} is not loaded", path.join("."))));
        }
    }
    Ok(value)
}

fn call(target: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    Reflect::apply(&function, target, args)
}

/// `new bootstrap.Toast(element).show()`
pub fn show_toast(window: &Window, element: &Element) -> Result<(), JsValue> {
    let constructor: Function = global(window, &["bootstrap", "Toast"])?.dyn_into()?;
    let toast = Reflect::construct(&constructor, &Array::of1(element))?;
    call(&toast, "show", &Array::new()).map(|_| ())
}

/// Bootstrap modal looked up by element id on each use
pub struct BootstrapModal {
    window: Window,
    element_id: &'static str,
}

impl BootstrapModal {
    pub fn new(window: Window, element_id: &'static str) -> Self {
        Self { window, element_id }
    }

    fn invoke(&self, method: &str) -> Result<(), JsValue> {
        let element = self
            .window
            .document()
            .and_then(|document| document.get_element_by_id(self.element_id))
            .ok_or_else(|| JsValue::from_str(&format!("#{} not found", self.element_id)))?;
        let modal_class = global(&self.window, &["bootstrap", "Modal"])?;
        let instance = call(&modal_class, "getOrCreateInstance", &Array::of1(&element))?;
        call(&instance, method, &Array::new()).map(|_| ())
    }
}

impl Modal for BootstrapModal {
    fn show(&self) {
        if let Err(e) = self.invoke("show") {
            web_sys::console::error_1(&e);
        }
    }

    fn hide(&self) {
        if let Err(e) = self.invoke("hide") {
            web_sys::console::error_1(&e);
        }
    }
}

/// Charts drawn by the page's Plotly global
pub struct PlotlyRenderer {
    window: Window,
}

impl PlotlyRenderer {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn plotly(&self) -> ClientResult<JsValue> {
        global(&self.window, &["Plotly"]).map_err(chart_error)
    }
}

fn chart_error(e: JsValue) -> ClientError {
    ClientError::Chart(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn to_js(value: &serde_json::Value) -> ClientResult<JsValue> {
    JSON::parse(&serde_json::to_string(value)?).map_err(chart_error)
}

impl ChartRenderer for PlotlyRenderer {
    fn new_plot(&self, element_id: &str, payload: &ChartPayload) -> ClientResult<()> {
        let args = Array::of3(
            &JsValue::from_str(element_id),
            &to_js(&payload.data)?,
            &to_js(&payload.layout)?,
        );
        call(&self.plotly()?, "newPlot", &args)
            .map(|_| ())
            .map_err(chart_error)
    }

    fn relayout(&self, element_id: &str, width: f64, height: f64) -> ClientResult<()> {
        let size = Object::new();
        Reflect::set(&size, &"width".into(), &width.into()).map_err(chart_error)?;
        Reflect::set(&size, &"height".into(), &height.into()).map_err(chart_error)?;

        let args = Array::of2(&JsValue::from_str(element_id), &size);
        call(&self.plotly()?, "relayout", &args)
            .map(|_| ())
            .map_err(chart_error)
    }
}
