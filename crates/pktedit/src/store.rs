//! In-memory record list and the current selection.
//!
//! The store is the single owner of both. Edits never reach into a stored
//! record: they run on a copy of one layer, and the whole record is replaced
//! at its index only when the edit succeeds.

use log::{debug, info, warn};
use pktedit_json_edit::{Edit, InsertOptions};
use thiserror::Error;

use crate::error::LayerError;
use crate::layer::{IndexedRecord, Layer, Record};
use crate::layer_edit::{edit_bytes, edit_tree, BytesTarget, FieldDraft, TreeTarget};
use crate::resolve::RecordRow;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("record {index} out of range ({len} records)")]
    RecordOutOfRange { index: usize, len: usize },
    #[error("layer {layer} out of range in record {index} ({len} layers)")]
    LayerOutOfRange {
        index: usize,
        layer: usize,
        len: usize,
    },
    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Options for edits routed through a [`RecordStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Passed to tree inserts as [`InsertOptions::create_missing`].
    pub create_missing: bool,
}

impl StoreOptions {
    pub fn insert_options(&self) -> InsertOptions {
        InsertOptions {
            create_missing: self.create_missing,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    selected: Option<IndexedRecord>,
    options: StoreOptions,
}

impl RecordStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Replaces the whole list, as after an import. Clears the selection.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        info!("loaded {} records", records.len());
        self.records = records;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.selected = None;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn select(&mut self, index: usize) -> Result<IndexedRecord, StoreError> {
        let record = self.record(index)?.clone();
        let indexed = IndexedRecord { index, record };
        self.selected = Some(indexed.clone());
        Ok(indexed)
    }

    pub fn selected(&self) -> Option<&IndexedRecord> {
        self.selected.as_ref()
    }

    fn record(&self, index: usize) -> Result<&Record, StoreError> {
        self.records.get(index).ok_or(StoreError::RecordOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn layer(&self, index: usize, layer_index: usize) -> Result<&Layer, StoreError> {
        let record = self.record(index)?;
        record
            .layers
            .get(layer_index)
            .ok_or(StoreError::LayerOutOfRange {
                index,
                layer: layer_index,
                len: record.layers.len(),
            })
    }

    /// Replaces one layer of the record at `index` and publishes the new
    /// record, updating the selection if it points at the same record.
    pub fn commit_layer(
        &mut self,
        index: usize,
        layer_index: usize,
        layer: Layer,
    ) -> Result<IndexedRecord, StoreError> {
        let current = self.record(index)?;
        let len = current.layers.len();
        let record = current
            .with_layer(layer_index, layer)
            .ok_or(StoreError::LayerOutOfRange {
                index,
                layer: layer_index,
                len,
            })?;
        self.records[index] = record.clone();
        let indexed = IndexedRecord { index, record };
        if self.selected.as_ref().map(|s| s.index) == Some(index) {
            self.selected = Some(indexed.clone());
        }
        debug!("record {index} layer {layer_index} replaced");
        Ok(indexed)
    }

    /// Runs `edit` against the layer and commits its result. Nothing changes
    /// when the edit fails.
    pub fn apply<F>(
        &mut self,
        index: usize,
        layer_index: usize,
        edit: F,
    ) -> Result<IndexedRecord, StoreError>
    where
        F: FnOnce(&Layer) -> Result<Layer, LayerError>,
    {
        let layer = self.layer(index, layer_index)?;
        let updated = edit(layer).inspect_err(|err| {
            warn!("edit of record {index} layer {layer_index} rejected: {err}");
        })?;
        self.commit_layer(index, layer_index, updated)
    }

    pub fn apply_tree_edit(
        &mut self,
        index: usize,
        layer_index: usize,
        target: TreeTarget,
        edit: &Edit,
    ) -> Result<IndexedRecord, StoreError> {
        let options = self.options.insert_options();
        self.apply(index, layer_index, |layer| {
            edit_tree(layer, target, edit, options)
        })
    }

    pub fn apply_hex_edit(
        &mut self,
        index: usize,
        layer_index: usize,
        target: BytesTarget,
        hex_text: &str,
    ) -> Result<IndexedRecord, StoreError> {
        self.apply(index, layer_index, |layer| {
            edit_bytes(layer, target, hex_text)
        })
    }

    pub fn apply_field_draft(
        &mut self,
        index: usize,
        layer_index: usize,
        draft: &FieldDraft,
    ) -> Result<IndexedRecord, StoreError> {
        self.apply(index, layer_index, |layer| draft.commit_onto(layer))
    }

    /// Table rows for every record.
    pub fn rows(&self) -> Vec<RecordRow> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                RecordRow::from_indexed(&IndexedRecord {
                    index,
                    record: record.clone(),
                })
            })
            .collect()
    }
}
