//! Form configuration
//!
//! Every DOM name the form relies on, plus thumbnail geometry and the PDF.js
//! worker location. Defaults match the markup served with the merge page.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::scale::CanvasSize;

pub const DEFAULT_WORKER_SRC: &str = "./lib/pdfjs/pdf.worker.js";
pub const DEFAULT_LAST_ROW_MESSAGE: &str = "At least one file input must remain.";

/// MIME type a selection must carry to be previewed
pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    /// Id of the element holding the rows
    pub container_id: String,
    /// Id of the "Add" button
    pub add_button_id: String,
    pub row_class: String,
    pub file_input_class: String,
    pub canvas_class: String,
    pub remove_button_class: String,
    pub remove_button_label: String,
    /// `name` of every file input; the merge endpoint reads this field
    pub input_name: String,
    /// Optional `accept` hint, e.g. ".pdf"
    pub accept: Option<String>,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub worker_src: String,
    pub last_row_message: String,
    /// Tracing level filter for the browser console
    pub log_level: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            container_id: "fileInputsContainer".to_string(),
            add_button_id: "addFileButton".to_string(),
            row_class: "fileInputRow".to_string(),
            file_input_class: "pdfFile".to_string(),
            canvas_class: "thumbnailCanvas".to_string(),
            remove_button_class: "removeFileButton".to_string(),
            remove_button_label: "Remove".to_string(),
            input_name: "files".to_string(),
            accept: None,
            thumbnail_width: 50,
            thumbnail_height: 70,
            worker_src: DEFAULT_WORKER_SRC.to_string(),
            last_row_message: DEFAULT_LAST_ROW_MESSAGE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl FormConfig {
    /// Canvas size used for newly created thumbnails
    pub fn thumbnail_size(&self) -> CanvasSize {
        CanvasSize::new(self.thumbnail_width, self.thumbnail_height)
    }

    /// Reject configurations the form cannot run with
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(SetupError::Config(format!(
                "thumbnail size must be non-zero, got {}x{}",
                self.thumbnail_width, self.thumbnail_height
            )));
        }

        let names = [
            ("containerId", &self.container_id),
            ("addButtonId", &self.add_button_id),
            ("rowClass", &self.row_class),
            ("fileInputClass", &self.file_input_class),
            ("canvasClass", &self.canvas_class),
            ("removeButtonClass", &self.remove_button_class),
            ("inputName", &self.input_name),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(SetupError::Config(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }
}
