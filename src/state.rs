use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::data::export::export_rows;
use crate::data::model::{Dataset, ElectricityRecord};
use crate::dispatch::{Dispatcher, TableView, UiEvent};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Selection and latest outputs of every handler.
    pub dispatcher: Dispatcher,

    /// Events raised by widgets during the current frame.
    pub pending: Vec<UiEvent>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dispatcher: Dispatcher::new(dataset),
            pending: Vec::new(),
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        self.dispatcher.dataset()
    }

    /// Queue an event; it is dispatched at the end of the frame.
    pub fn emit(&mut self, event: UiEvent) {
        self.pending.push(event);
    }

    /// Dispatch every queued event in arrival order.
    pub fn flush_events(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            self.dispatcher.dispatch(event);
        }
    }

    /// Write the rows currently shown in the detail table.
    pub fn export_table(&self, path: &Path) -> Result<usize> {
        let rows: Vec<&ElectricityRecord> = match self.dispatcher.table() {
            TableView::Idle => bail!("Click a state on the map first"),
            TableView::Showing { rows, .. } => rows.iter().collect(),
        };
        export_rows(path, &self.dataset().columns, &rows)?;
        Ok(rows.len())
    }
}
