//! In-memory host, engine and files for exercising the form without a browser

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use thumbnail_form::{
    CanvasSize, PageSize, PdfEngine, RowDescriptor, RowHost, RowId, SelectedFile,
    ThumbnailSurface, Viewport,
};
use tracing_subscriber::fmt::MakeWriter;

// ============================================================
// Row host
// ============================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FakeRow {
    pub id: Option<RowId>,
    pub inputs: usize,
    pub canvases: usize,
    pub remove_buttons: usize,
    pub listeners: usize,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    next_handle: usize,
    /// Every row ever built or adopted, by handle
    pub rows: BTreeMap<usize, FakeRow>,
    /// Handles currently attached to the container, in order
    pub container: Vec<usize>,
    pub alerts: Vec<String>,
    /// Ids whose listeners were released by `detach_row`
    pub released: Vec<RowId>,
    pub fail_create: bool,
    pub fail_remove_button: bool,
}

impl FakeHost {
    /// Put a row on the "page" before the manager runs
    pub fn preexisting(
        &mut self,
        has_canvas: bool,
        has_remove_button: bool,
    ) -> RowDescriptor<usize> {
        self.preexisting_with(true, has_canvas, has_remove_button)
    }

    pub fn preexisting_with(
        &mut self,
        has_file_input: bool,
        has_canvas: bool,
        has_remove_button: bool,
    ) -> RowDescriptor<usize> {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.rows.insert(
            handle,
            FakeRow {
                id: None,
                inputs: usize::from(has_file_input),
                canvases: usize::from(has_canvas),
                remove_buttons: usize::from(has_remove_button),
                listeners: 0,
            },
        );
        self.container.push(handle);
        RowDescriptor {
            row: handle,
            has_file_input,
            has_canvas,
            has_remove_button,
        }
    }

    pub fn row(&self, handle: usize) -> &FakeRow {
        &self.rows[&handle]
    }

    pub fn attached_rows(&self) -> Vec<&FakeRow> {
        self.container.iter().map(|handle| &self.rows[handle]).collect()
    }
}

impl RowHost for FakeHost {
    type Row = usize;

    fn create_row(&mut self, id: RowId) -> Result<usize, String> {
        if self.fail_create {
            return Err("createElement failed".to_string());
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.rows.insert(
            handle,
            FakeRow {
                id: Some(id),
                inputs: 1,
                ..FakeRow::default()
            },
        );
        Ok(handle)
    }

    fn add_canvas(&mut self, row: &usize) -> Result<(), String> {
        self.rows.get_mut(row).ok_or("no such row")?.canvases += 1;
        Ok(())
    }

    fn add_remove_button(&mut self, row: &usize, id: RowId) -> Result<(), String> {
        if self.fail_remove_button {
            return Err("button creation failed".to_string());
        }
        let entry = self.rows.get_mut(row).ok_or("no such row")?;
        entry.remove_buttons += 1;
        entry.id = Some(id);
        Ok(())
    }

    fn bind_change_listener(&mut self, row: &usize, id: RowId) -> Result<(), String> {
        let entry = self.rows.get_mut(row).ok_or("no such row")?;
        entry.listeners += 1;
        entry.id = Some(id);
        Ok(())
    }

    fn append_row(&mut self, row: &usize) -> Result<(), String> {
        self.container.push(*row);
        Ok(())
    }

    fn detach_row(&mut self, row: &usize, id: RowId) -> Result<(), String> {
        let before = self.container.len();
        self.container.retain(|handle| handle != row);
        if self.container.len() == before {
            return Err("row not attached".to_string());
        }
        if let Some(entry) = self.rows.get_mut(row) {
            entry.listeners = 0;
        }
        self.released.push(id);
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

// ============================================================
// PDF engine
// ============================================================

#[derive(Debug, Default)]
pub struct FakeCanvas {
    pub size: Option<CanvasSize>,
    pub clears: Cell<usize>,
    /// Scale of the page currently drawn, if any
    pub drawn: Cell<Option<f64>>,
}

impl FakeCanvas {
    pub fn thumbnail() -> Self {
        Self {
            size: Some(CanvasSize::new(50, 70)),
            ..Self::default()
        }
    }
}

impl ThumbnailSurface for FakeCanvas {
    fn size(&self) -> CanvasSize {
        self.size.unwrap_or(CanvasSize::new(50, 70))
    }

    fn clear(&self) {
        self.clears.set(self.clears.get() + 1);
        self.drawn.set(None);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeViewport {
    pub scale: f64,
    pub size: PageSize,
}

impl Viewport for FakeViewport {
    fn scale(&self) -> f64 {
        self.scale
    }

    fn size(&self) -> PageSize {
        self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakePage {
    pub number: u32,
    pub size: PageSize,
}

#[derive(Debug)]
pub struct FakeEngine {
    pub page_size: PageSize,
    pub fail_load: bool,
    pub fail_page: bool,
    pub fail_render: bool,
    /// Engine operations in call order
    pub calls: RefCell<Vec<String>>,
    /// Viewports handed to `render`
    pub rendered: RefCell<Vec<FakeViewport>>,
}

impl FakeEngine {
    pub fn with_page(page_size: PageSize) -> Self {
        Self {
            page_size,
            fail_load: false,
            fail_page: false,
            fail_render: false,
            calls: RefCell::new(Vec::new()),
            rendered: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PdfEngine for FakeEngine {
    type Document = usize;
    type Page = FakePage;
    type Viewport = FakeViewport;
    type Canvas = FakeCanvas;

    async fn load_document(&self, data: Vec<u8>) -> Result<usize, String> {
        self.calls.borrow_mut().push("getDocument".to_string());
        if self.fail_load || !data.starts_with(b"%PDF-") {
            return Err("InvalidPDFException: Invalid PDF structure.".to_string());
        }
        Ok(data.len())
    }

    async fn get_page(&self, _document: &usize, page_num: u32) -> Result<FakePage, String> {
        self.calls.borrow_mut().push(format!("getPage({})", page_num));
        if self.fail_page {
            return Err("Invalid page request.".to_string());
        }
        Ok(FakePage {
            number: page_num,
            size: self.page_size,
        })
    }

    fn viewport(&self, page: &FakePage, scale: f64) -> Result<FakeViewport, String> {
        self.calls.borrow_mut().push(format!("getViewport({})", scale));
        Ok(FakeViewport {
            scale,
            size: page.size.scaled(scale),
        })
    }

    async fn render(
        &self,
        _page: &FakePage,
        canvas: &FakeCanvas,
        viewport: &FakeViewport,
    ) -> Result<(), String> {
        self.calls.borrow_mut().push("render".to_string());
        if self.fail_render {
            return Err("RenderingCancelledException".to_string());
        }
        self.rendered.borrow_mut().push(*viewport);
        canvas.drawn.set(Some(viewport.scale));
        Ok(())
    }
}

// ============================================================
// Files
// ============================================================

pub struct FakeFile {
    pub name: String,
    pub mime_type: String,
    pub contents: Result<Vec<u8>, String>,
}

impl FakeFile {
    pub fn pdf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            contents: Ok(b"%PDF-1.7\n%minimal\n".to_vec()),
        }
    }

    pub fn other(name: &str, mime_type: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            contents: Ok(b"hello".to_vec()),
        }
    }
}

impl SelectedFile for FakeFile {
    fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, String> {
        self.contents.clone()
    }
}

// ============================================================
// Log capture
// ============================================================

/// Collects formatted tracing output for assertions
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's tracing output into a buffer until the guard drops
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (tracing::subscriber::set_default(subscriber), buffer)
}
