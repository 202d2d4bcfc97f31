//! DOM side of the upload form
//!
//! Builds row elements, attaches listeners and finds the pieces of a row
//! from an event target. Listeners report back through a [`Dispatch`]
//! callback tagged with the row's [`RowId`].

use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Uint8Array;
use thumbnail_form::{FormConfig, RowDescriptor, RowHost, RowId, SelectedFile};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, File, HtmlCanvasElement, HtmlInputElement,
};

use crate::pdfjs::describe_js_error;

/// Something the user did to a row
pub enum RowEvent {
    /// The row's remove button was clicked
    Remove(RowId),
    /// The row's file input changed
    FileSelected(RowId, Event),
}

pub type Dispatch = Rc<dyn Fn(RowEvent)>;

/// CSS class selector, e.g. `.fileInputRow`
pub fn class_selector(class: &str) -> String {
    format!(".{}", class)
}

/// An event listener that is removed from its target when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach<F>(
        target: &EventTarget,
        event: &'static str,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// [`RowHost`] over real elements in `#fileInputsContainer`
pub struct DomHost {
    document: Document,
    container: Element,
    config: FormConfig,
    dispatch: Dispatch,
    /// Listeners of each live row, dropped when the row is detached
    listeners: HashMap<RowId, Vec<Listener>>,
}

impl DomHost {
    pub fn new(
        document: Document,
        container: Element,
        config: FormConfig,
        dispatch: Dispatch,
    ) -> Self {
        Self {
            document,
            container,
            config,
            dispatch,
            listeners: HashMap::new(),
        }
    }

    /// Number of row listeners currently attached
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Describe the rows already in the container.
    ///
    /// Rows without a file input are still adopted; they just never get a
    /// change listener.
    pub fn describe_rows(&self) -> Result<Vec<RowDescriptor<Element>>, JsValue> {
        let rows = self
            .container
            .query_selector_all(&class_selector(&self.config.row_class))?;

        let mut descriptors = Vec::with_capacity(rows.length() as usize);
        for index in 0..rows.length() {
            let Some(row) = rows.item(index).and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };

            descriptors.push(RowDescriptor {
                has_file_input: self.file_input(&row)?.is_some(),
                has_canvas: row
                    .query_selector(&class_selector(&self.config.canvas_class))?
                    .is_some(),
                has_remove_button: row
                    .query_selector(&class_selector(&self.config.remove_button_class))?
                    .is_some(),
                row,
            });
        }

        Ok(descriptors)
    }

    fn file_input(&self, row: &Element) -> Result<Option<Element>, JsValue> {
        row.query_selector(&class_selector(&self.config.file_input_class))
    }

    fn listen(
        &mut self,
        target: &Element,
        event: &'static str,
        id: RowId,
        make: fn(RowId, Event) -> RowEvent,
    ) -> Result<(), JsValue> {
        let dispatch = Rc::clone(&self.dispatch);
        let listener = Listener::attach(target, event, move |event: Event| {
            dispatch(make(id, event));
        })?;
        self.listeners.entry(id).or_default().push(listener);
        Ok(())
    }

    fn create_row_element(&self) -> Result<Element, JsValue> {
        let row = self.document.create_element("div")?;
        row.set_class_name(&self.config.row_class);

        let input = self
            .document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        input.set_type("file");
        input.set_name(&self.config.input_name);
        input.set_class_name(&self.config.file_input_class);
        if let Some(accept) = &self.config.accept {
            input.set_accept(accept);
        }

        row.append_child(&input)?;
        Ok(row)
    }

    fn create_canvas(&self) -> Result<HtmlCanvasElement, JsValue> {
        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_class_name(&self.config.canvas_class);
        canvas.set_width(self.config.thumbnail_width);
        canvas.set_height(self.config.thumbnail_height);
        Ok(canvas)
    }
}

fn js_to_host(err: JsValue) -> String {
    describe_js_error(&err)
}

impl RowHost for DomHost {
    type Row = Element;

    fn create_row(&mut self, _id: RowId) -> Result<Element, String> {
        self.create_row_element().map_err(js_to_host)
    }

    fn add_canvas(&mut self, row: &Element) -> Result<(), String> {
        let canvas = self.create_canvas().map_err(js_to_host)?;
        row.append_child(&canvas).map_err(js_to_host)?;
        Ok(())
    }

    fn add_remove_button(&mut self, row: &Element, id: RowId) -> Result<(), String> {
        let button = self.document.create_element("button").map_err(js_to_host)?;
        button.set_attribute("type", "button").map_err(js_to_host)?;
        button.set_class_name(&self.config.remove_button_class);
        button.set_text_content(Some(&self.config.remove_button_label));

        self.listen(&button, "click", id, |id, _| RowEvent::Remove(id))
            .map_err(js_to_host)?;
        row.append_child(&button).map_err(js_to_host)?;
        Ok(())
    }

    fn bind_change_listener(&mut self, row: &Element, id: RowId) -> Result<(), String> {
        let input = self
            .file_input(row)
            .map_err(js_to_host)?
            .ok_or_else(|| format!("{} has no .{} input", id, self.config.file_input_class))?;

        self.listen(&input, "change", id, RowEvent::FileSelected)
            .map_err(js_to_host)
    }

    fn append_row(&mut self, row: &Element) -> Result<(), String> {
        self.container.append_child(row).map_err(js_to_host)?;
        Ok(())
    }

    fn detach_row(&mut self, row: &Element, id: RowId) -> Result<(), String> {
        row.remove();
        // May drop the closure that is dispatching this very click; the
        // bindings defer freeing it until the call returns.
        self.listeners.remove(&id);
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("{}", message);
            return;
        };
        if let Err(err) = window.alert_with_message(message) {
            tracing::warn!("alert failed: {}", describe_js_error(&err));
        }
    }
}

/// Canvas of the row containing `input`, if both exist
pub fn row_canvas(input: &Element, config: &FormConfig) -> Option<HtmlCanvasElement> {
    let row = input
        .closest(&class_selector(&config.row_class))
        .ok()
        .flatten()?;
    row.query_selector(&class_selector(&config.canvas_class))
        .ok()
        .flatten()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

/// A browser `File` picked in a row
pub struct DomFile(pub File);

impl DomFile {
    /// First file of the input's selection
    pub fn from_input(input: &HtmlInputElement) -> Option<Self> {
        input.files().and_then(|files| files.get(0)).map(DomFile)
    }
}

impl SelectedFile for DomFile {
    fn mime_type(&self) -> String {
        self.0.type_()
    }

    fn name(&self) -> String {
        self.0.name()
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, String> {
        let buffer = JsFuture::from(self.0.array_buffer())
            .await
            .map_err(|e| describe_js_error(&e))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}
