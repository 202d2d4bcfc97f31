//! PDF.js engine over an injected `pdfjsLib` object
//!
//! The library is passed in by the page instead of being looked up on
//! `window`, then driven through its promise API:
//! `getDocument({data}).promise → getPage(n) → getViewport({scale}) →
//! render({canvasContext, viewport}).promise`.

use js_sys::{Object, Reflect, Uint8Array};
use thumbnail_form::{CanvasSize, PageSize, PdfEngine, SetupError, ThumbnailSurface, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[wasm_bindgen]
extern "C" {
    /// The `pdfjsLib` namespace
    pub type PdfJsLib;

    #[wasm_bindgen(method, catch, js_name = getDocument)]
    fn get_document(this: &PdfJsLib, src: &JsValue) -> Result<PdfLoadingTask, JsValue>;

    pub type PdfLoadingTask;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &PdfLoadingTask) -> js_sys::Promise;

    /// `PDFDocumentProxy`
    pub type PdfDocument;

    #[wasm_bindgen(method, catch, js_name = getPage)]
    fn get_page(this: &PdfDocument, page_number: u32) -> Result<js_sys::Promise, JsValue>;

    /// `PDFPageProxy`
    pub type PdfPage;

    #[wasm_bindgen(method, catch, js_name = getViewport)]
    fn get_viewport(this: &PdfPage, params: &JsValue) -> Result<PdfViewport, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn render(this: &PdfPage, params: &JsValue) -> Result<PdfRenderTask, JsValue>;

    pub type PdfRenderTask;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &PdfRenderTask) -> js_sys::Promise;

    /// `PageViewport`
    #[derive(Clone)]
    pub type PdfViewport;

    #[wasm_bindgen(method, getter)]
    pub fn width(this: &PdfViewport) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn height(this: &PdfViewport) -> f64;

    #[wasm_bindgen(method, getter = scale)]
    pub fn viewport_scale(this: &PdfViewport) -> f64;
}

impl Viewport for PdfViewport {
    fn scale(&self) -> f64 {
        self.viewport_scale()
    }

    fn size(&self) -> PageSize {
        PageSize::new(self.width(), self.height())
    }
}

/// Readable message for a rejected promise or thrown value
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.to_string());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// A thumbnail canvas with its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }
}

impl ThumbnailSurface for CanvasSurface {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas.width(), self.canvas.height())
    }

    fn clear(&self) {
        let size = self.size();
        self.context
            .clear_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    }
}

/// PDF.js behind the [`PdfEngine`] trait
pub struct PdfJs {
    lib: PdfJsLib,
}

impl PdfJs {
    /// Check the injected library and point it at its worker script.
    ///
    /// Fails when `lib` is missing or does not look like `pdfjsLib`.
    pub fn from_js(lib: JsValue, worker_src: &str) -> Result<Self, SetupError> {
        if lib.is_undefined() || lib.is_null() {
            return Err(SetupError::EngineMissing(
                "pdfjsLib is undefined; include pdf.js before initializing the form".to_string(),
            ));
        }

        let get_document = Reflect::get(&lib, &JsValue::from_str("getDocument"))
            .map_err(|e| SetupError::EngineMissing(describe_js_error(&e)))?;
        if !get_document.is_function() {
            return Err(SetupError::EngineMissing(
                "pdfjsLib.getDocument is not a function".to_string(),
            ));
        }

        let options = Reflect::get(&lib, &JsValue::from_str("GlobalWorkerOptions"))
            .map_err(|e| SetupError::EngineMissing(describe_js_error(&e)))?;
        if !options.is_object() {
            return Err(SetupError::EngineMissing(
                "pdfjsLib.GlobalWorkerOptions is missing".to_string(),
            ));
        }
        Reflect::set(
            &options,
            &JsValue::from_str("workerSrc"),
            &JsValue::from_str(worker_src),
        )
        .map_err(|e| SetupError::EngineMissing(describe_js_error(&e)))?;

        Ok(Self {
            lib: lib.unchecked_into(),
        })
    }
}

impl PdfEngine for PdfJs {
    type Document = PdfDocument;
    type Page = PdfPage;
    type Viewport = PdfViewport;
    type Canvas = CanvasSurface;

    async fn load_document(&self, data: Vec<u8>) -> Result<PdfDocument, String> {
        let src = Object::new();
        let bytes = Uint8Array::from(data.as_slice());
        Reflect::set(&src, &"data".into(), &bytes).map_err(|e| describe_js_error(&e))?;

        let task = self
            .lib
            .get_document(&src)
            .map_err(|e| describe_js_error(&e))?;
        let document = JsFuture::from(task.promise())
            .await
            .map_err(|e| describe_js_error(&e))?;

        Ok(document.unchecked_into())
    }

    async fn get_page(&self, document: &PdfDocument, page_num: u32) -> Result<PdfPage, String> {
        let promise = document
            .get_page(page_num)
            .map_err(|e| describe_js_error(&e))?;
        let page = JsFuture::from(promise)
            .await
            .map_err(|e| describe_js_error(&e))?;

        Ok(page.unchecked_into())
    }

    fn viewport(&self, page: &PdfPage, scale: f64) -> Result<PdfViewport, String> {
        let params = Object::new();
        Reflect::set(&params, &"scale".into(), &JsValue::from_f64(scale))
            .map_err(|e| describe_js_error(&e))?;

        page.get_viewport(&params).map_err(|e| describe_js_error(&e))
    }

    async fn render(
        &self,
        page: &PdfPage,
        canvas: &CanvasSurface,
        viewport: &PdfViewport,
    ) -> Result<(), String> {
        let params = Object::new();
        Reflect::set(&params, &"canvasContext".into(), &canvas.context)
            .map_err(|e| describe_js_error(&e))?;
        Reflect::set(&params, &"viewport".into(), viewport)
            .map_err(|e| describe_js_error(&e))?;

        let task = page.render(&params).map_err(|e| describe_js_error(&e))?;
        JsFuture::from(task.promise())
            .await
            .map_err(|e| describe_js_error(&e))?;

        Ok(())
    }
}
