//! File-input row bookkeeping
//!
//! The manager owns the list of rows and is the only thing that adds or
//! removes them, so wiring happens exactly once per row without marker
//! attributes on the DOM.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::FormConfig;
use crate::error::RowError;
use crate::thumbnail::ThumbnailState;

/// Stable identifier of a row, allocated by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u32);

impl RowId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// What the setup pass found in a row that was already on the page
#[derive(Debug, Clone, PartialEq)]
pub struct RowDescriptor<R> {
    pub row: R,
    /// Rows without a file input are kept but never previewed
    pub has_file_input: bool,
    pub has_canvas: bool,
    pub has_remove_button: bool,
}

impl<R> RowDescriptor<R> {
    /// A row that only has its file input
    pub fn bare(row: R) -> Self {
        Self {
            row,
            has_file_input: true,
            has_canvas: false,
            has_remove_button: false,
        }
    }

    /// A row that already carries every element
    pub fn complete(row: R) -> Self {
        Self {
            row,
            has_file_input: true,
            has_canvas: true,
            has_remove_button: true,
        }
    }
}

/// The container rows live in.
///
/// Implemented over the DOM in the browser crate. Listeners registered by
/// `add_remove_button` and `bind_change_listener` report back with the
/// given [`RowId`].
pub trait RowHost {
    type Row: Clone + PartialEq;

    /// Build a detached row holding only its file input
    fn create_row(&mut self, id: RowId) -> Result<Self::Row, String>;

    /// Add a thumbnail canvas to the row
    fn add_canvas(&mut self, row: &Self::Row) -> Result<(), String>;

    /// Add a remove button whose click reports `id`
    fn add_remove_button(&mut self, row: &Self::Row, id: RowId) -> Result<(), String>;

    /// Listen for file selection on the row's input
    fn bind_change_listener(&mut self, row: &Self::Row, id: RowId) -> Result<(), String>;

    /// Append a detached row to the container
    fn append_row(&mut self, row: &Self::Row) -> Result<(), String>;

    /// Remove the row from the container and release the listeners
    /// registered for `id`
    fn detach_row(&mut self, row: &Self::Row, id: RowId) -> Result<(), String>;

    /// Show a blocking message to the user
    fn alert(&mut self, message: &str);
}

struct RowEntry<R> {
    id: RowId,
    row: R,
    thumbnail: ThumbnailState,
}

/// Maintains the form's rows; never lets the count drop below one
pub struct FormRowManager<H: RowHost> {
    host: H,
    rows: Vec<RowEntry<H::Row>>,
    next_id: u32,
    last_row_message: String,
}

impl<H: RowHost> FormRowManager<H> {
    pub fn new(host: H, config: &FormConfig) -> Self {
        Self {
            host,
            rows: Vec::new(),
            next_id: 0,
            last_row_message: config.last_row_message.clone(),
        }
    }

    /// Wire rows that were already on the page.
    ///
    /// Rows the manager already tracks are skipped, so calling this again
    /// with the same descriptors binds nothing twice. If the form ends up
    /// empty a fresh row is added.
    pub fn initialize<I>(&mut self, descriptors: I) -> Result<Vec<RowId>, RowError>
    where
        I: IntoIterator<Item = RowDescriptor<H::Row>>,
    {
        let mut adopted = Vec::new();

        for descriptor in descriptors {
            if self.rows.iter().any(|entry| entry.row == descriptor.row) {
                debug!("Row already wired, skipping");
                continue;
            }

            let id = self.allocate_id();
            if !descriptor.has_canvas {
                self.host.add_canvas(&descriptor.row).map_err(RowError::Host)?;
            }
            if !descriptor.has_remove_button {
                self.host
                    .add_remove_button(&descriptor.row, id)
                    .map_err(RowError::Host)?;
            }
            // Bound last: a row that failed earlier is not tracked and is
            // retried by the next pass, which must not find a listener.
            if descriptor.has_file_input {
                self.host
                    .bind_change_listener(&descriptor.row, id)
                    .map_err(RowError::Host)?;
            } else {
                warn!(%id, "Row has no file input, it will not be previewed");
            }

            self.track(id, descriptor.row);
            adopted.push(id);
        }

        if self.rows.is_empty() {
            warn!("Form has no file input rows, adding one");
            adopted.push(self.add_row()?);
        }

        info!(rows = self.rows.len(), adopted = adopted.len(), "File input rows ready");
        Ok(adopted)
    }

    /// Build, wire and append a new row
    pub fn add_row(&mut self) -> Result<RowId, RowError> {
        let id = self.allocate_id();

        let row = self.host.create_row(id).map_err(RowError::Host)?;
        self.host.add_canvas(&row).map_err(RowError::Host)?;
        self.host.add_remove_button(&row, id).map_err(RowError::Host)?;
        self.host.bind_change_listener(&row, id).map_err(RowError::Host)?;
        self.host.append_row(&row).map_err(RowError::Host)?;

        self.track(id, row);
        debug!(%id, rows = self.rows.len(), "Row added");
        Ok(id)
    }

    /// Remove a row unless it is the last one.
    ///
    /// Refusing alerts the user and leaves every row in place.
    pub fn remove_row(&mut self, id: RowId) -> Result<(), RowError> {
        let index = self.index_of(id).ok_or(RowError::UnknownRow(id.get()))?;

        if self.rows.len() <= 1 {
            self.host.alert(&self.last_row_message);
            return Err(RowError::LastRow);
        }

        self.host
            .detach_row(&self.rows[index].row, id)
            .map_err(RowError::Host)?;
        self.rows.remove(index);

        debug!(%id, rows = self.rows.len(), "Row removed");
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Ids in container order
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|entry| entry.id).collect()
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.index_of(id).is_some()
    }

    /// Last recorded thumbnail state of a row
    pub fn thumbnail_state(&self, id: RowId) -> Option<ThumbnailState> {
        self.index_of(id).map(|index| self.rows[index].thumbnail)
    }

    /// Record a thumbnail transition; ignored for rows removed meanwhile
    pub fn set_thumbnail_state(&mut self, id: RowId, state: ThumbnailState) {
        if let Some(index) = self.index_of(id) {
            self.rows[index].thumbnail = state;
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn track(&mut self, id: RowId, row: H::Row) {
        self.rows.push(RowEntry {
            id,
            row,
            thumbnail: ThumbnailState::Empty,
        });
    }

    fn index_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|entry| entry.id == id)
    }
}
