//! Upload form controller
//!
//! Owns the row manager and the thumbnail renderer, and turns DOM events
//! into calls on them. Everything lives on the UI thread behind `Rc`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thumbnail_form::{
    FormConfig, FormRowManager, RowError, RowId, SetupError, ThumbnailRenderer, ThumbnailState,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};

use crate::dom::{row_canvas, DomFile, DomHost, RowEvent};
use crate::pdfjs::{describe_js_error, CanvasSurface, PdfJs};

pub struct FormState {
    pub(crate) manager: RefCell<FormRowManager<DomHost>>,
    renderer: ThumbnailRenderer<PdfJs>,
    config: FormConfig,
}

impl FormState {
    /// Build the controller. DOM listeners hold only a weak reference, so
    /// they go quiet once the returned `Rc` is dropped.
    pub fn new(
        document: web_sys::Document,
        container: Element,
        engine: PdfJs,
        config: FormConfig,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<FormState>| {
            let weak = weak.clone();
            let dispatch = Rc::new(move |event: RowEvent| {
                if let Some(state) = weak.upgrade() {
                    handle_event(&state, event);
                }
            });

            let host = DomHost::new(document, container, config.clone(), dispatch);
            FormState {
                manager: RefCell::new(FormRowManager::new(host, &config)),
                renderer: ThumbnailRenderer::new(engine),
                config,
            }
        })
    }

    /// Wire the rows already on the page
    pub fn initialize(&self) -> Result<Vec<RowId>, SetupError> {
        let mut manager = self.manager.borrow_mut();
        let descriptors = manager
            .host()
            .describe_rows()
            .map_err(|e| SetupError::Host(describe_js_error(&e)))?;
        Ok(manager.initialize(descriptors)?)
    }

    pub fn add_row(&self) -> Result<RowId, RowError> {
        self.manager.borrow_mut().add_row()
    }

    pub fn row_count(&self) -> usize {
        self.manager.borrow().row_count()
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.manager.borrow().row_ids()
    }

    pub fn thumbnail_state(&self, id: RowId) -> Option<ThumbnailState> {
        self.manager.borrow().thumbnail_state(id)
    }

    /// Click and change listeners held for the live rows
    pub fn listener_count(&self) -> usize {
        self.manager.borrow().host().listener_count()
    }
}

fn handle_event(state: &Rc<FormState>, event: RowEvent) {
    match event {
        RowEvent::Remove(id) => remove_row(state, id),
        RowEvent::FileSelected(id, event) => file_selected(state, id, event),
    }
}

fn remove_row(state: &FormState, id: RowId) {
    let result = state.manager.borrow_mut().remove_row(id);
    match result {
        Ok(()) => tracing::debug!(
            %id,
            listeners = state.listener_count(),
            "Row listeners released"
        ),
        Err(RowError::LastRow) => tracing::debug!(%id, "Refused to remove the last row"),
        Err(err) => tracing::error!(%id, "Failed to remove row: {}", err),
    }
}

fn file_selected(state: &Rc<FormState>, id: RowId, event: Event) {
    let Some(input) = event
        .target()
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let Some(canvas) = row_canvas(&input, &state.config) else {
        return;
    };
    let surface = match CanvasSurface::new(canvas) {
        Ok(surface) => surface,
        Err(err) => {
            tracing::error!(%id, "No drawing context: {:?}", err);
            return;
        }
    };
    let file = DomFile::from_input(&input);

    // Not cancelled by a later selection: whichever render finishes last wins.
    let state = Rc::clone(state);
    wasm_bindgen_futures::spawn_local(async move {
        state
            .renderer
            .handle_selection_observed(file.as_ref(), &surface, |thumbnail| {
                if let Ok(mut manager) = state.manager.try_borrow_mut() {
                    manager.set_thumbnail_state(id, thumbnail);
                }
            })
            .await;
    });
}
