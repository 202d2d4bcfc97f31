//! WASM bindings for the PDF merge upload form
//!
//! Adds and removes file-input rows and draws a first-page thumbnail for
//! every selected PDF. Row bookkeeping and the thumbnail pipeline live in
//! `thumbnail-form`; this crate supplies the DOM and PDF.js behind them.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { initForm } from './pkg/pdfmerge_wasm.js';
//!
//! await init();
//!
//! // pdf.js must be loaded first; it is passed in, not looked up on window
//! const form = initForm(pdfjsLib, { workerSrc: './lib/pdfjs/pdf.worker.js' });
//! console.log(form.rowCount());
//! ```
//!
//! Keep the returned handle alive for as long as the form is on the page;
//! freeing it detaches the "Add" button and silences the row listeners.

pub mod dom;
pub mod form;
pub mod logging;
pub mod pdfjs;

use std::rc::Rc;

use thumbnail_form::{FormConfig, RowId, SetupError, ThumbnailState};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

use dom::Listener;
pub use form::FormState;
pub use pdfjs::PdfJs;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Parse the optional configuration object passed from JavaScript
pub fn parse_config(config: JsValue) -> Result<FormConfig, SetupError> {
    let config = if config.is_undefined() || config.is_null() {
        FormConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|e| SetupError::Config(e.to_string()))?
    };
    config.validate()?;
    Ok(config)
}

/// Wire the upload form.
///
/// `pdfjs_lib` is the PDF.js namespace object. Setup is aborted (and the
/// reason logged) when it is missing or when the rows container is absent.
#[wasm_bindgen(js_name = initForm)]
pub fn init_form(pdfjs_lib: JsValue, config: JsValue) -> Result<FormHandle, JsValue> {
    let result = match parse_config(config) {
        Ok(config) => {
            logging::init_logging(&config.log_level);
            setup(pdfjs_lib, config)
        }
        Err(err) => {
            // No usable log level yet
            logging::init_logging(&FormConfig::default().log_level);
            Err(err)
        }
    };

    result.map_err(|err| {
        tracing::error!("{}", err);
        JsValue::from_str(&err.to_string())
    })
}

fn setup(pdfjs_lib: JsValue, config: FormConfig) -> Result<FormHandle, SetupError> {
    let engine = PdfJs::from_js(pdfjs_lib, &config.worker_src)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| SetupError::Host("No document object available".to_string()))?;
    let container = document
        .get_element_by_id(&config.container_id)
        .ok_or_else(|| SetupError::ElementMissing(config.container_id.clone()))?;
    let add_button = document.get_element_by_id(&config.add_button_id);

    let state = FormState::new(document, container, engine, config.clone());
    state.initialize()?;

    let add_listener = match add_button {
        Some(button) => Some(add_listener(&button, &state)?),
        None => {
            tracing::warn!(
                id = %config.add_button_id,
                "Add button not found; rows cannot be added"
            );
            None
        }
    };

    tracing::info!(rows = state.row_count(), "Upload form ready");
    Ok(FormHandle {
        state,
        add_listener,
    })
}

/// Click listener on the "Add" button, removed when the handle is dropped
fn add_listener(button: &Element, state: &Rc<FormState>) -> Result<Listener, SetupError> {
    let weak = Rc::downgrade(state);
    Listener::attach(button, "click", move |_event: Event| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        if let Err(err) = state.add_row() {
            tracing::error!("Failed to add row: {}", err);
        }
    })
    .map_err(|e| SetupError::Host(pdfjs::describe_js_error(&e)))
}

/// Handle to a wired upload form
#[wasm_bindgen]
pub struct FormHandle {
    state: Rc<FormState>,
    #[allow(dead_code)]
    add_listener: Option<Listener>,
}

#[wasm_bindgen]
impl FormHandle {
    /// Number of rows currently in the form
    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.state.row_count()
    }

    /// Row ids in container order
    #[wasm_bindgen(js_name = rowIds)]
    pub fn row_ids(&self) -> Vec<u32> {
        self.state.row_ids().iter().map(RowId::get).collect()
    }

    /// Same as clicking "Add"; returns the new row's id
    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&self) -> Result<u32, JsValue> {
        self.state
            .add_row()
            .map(|id| id.get())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Thumbnail state of a row: "empty", "loading", "rendered" or "failed"
    #[wasm_bindgen(js_name = thumbnailState)]
    pub fn thumbnail_state(&self, row_id: u32) -> Option<String> {
        let id = self
            .state
            .row_ids()
            .into_iter()
            .find(|id| id.get() == row_id)?;
        self.state.thumbnail_state(id).map(|state| state_name(state).to_string())
    }
}

fn state_name(state: ThumbnailState) -> &'static str {
    match state {
        ThumbnailState::Empty => "empty",
        ThumbnailState::Loading => "loading",
        ThumbnailState::Rendered => "rendered",
        ThumbnailState::Failed(_) => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbnail_form::Stage;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(state_name(ThumbnailState::Empty), "empty");
        assert_eq!(state_name(ThumbnailState::Loading), "loading");
        assert_eq!(state_name(ThumbnailState::Rendered), "rendered");
        assert_eq!(state_name(ThumbnailState::Failed(Stage::Render)), "failed");
    }
}
