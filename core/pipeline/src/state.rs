//! FILENAME: core/pipeline/src/state.rs
//! PURPOSE: The pipeline state machine: Idle -> Loading -> Loaded | Error.
//! CONTEXT: Exactly one `PipelineState` is live at a time and only the
//! owning `PipelineStore` mutates it. Starting a new load replaces the
//! previous one wholesale; a completion or failure from a replaced load is
//! discarded via the generation check on `LoadTicket`, never applied.

use engine::Table;
use formats::FormatTag;
use log::debug;
use serde::{Deserialize, Serialize};

/// Seed query installed on every load (the table is exposed to the
/// transform stage under the name `source`).
pub const DEFAULT_QUERY: &str = "SELECT * FROM source LIMIT 100;";

/// Opaque handle for the loaded file: name and byte size only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// The single live state value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub source: Option<SourceFile>,
    pub format: FormatTag,
    pub headers: Vec<String>,
    /// The table as originally parsed, fixed for the life of one load.
    pub preview: Table,
    /// The table currently displayed/exported; starts identical to
    /// `preview` and is re-derived by the transform stage.
    pub transformed: Table,
    pub status: LoadStatus,
    pub error: Option<String>,
    pub query: String,
}

impl PipelineState {
    /// The exact Idle shape. `clear()` must return to this bit for bit.
    pub fn initial() -> Self {
        PipelineState {
            source: None,
            format: FormatTag::Unknown,
            headers: Vec::new(),
            preview: Table::new(),
            transformed: Table::new(),
            status: LoadStatus::Idle,
            error: None,
            query: DEFAULT_QUERY.to_string(),
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Proof that a `complete_load`/`fail_load` belongs to the load that
/// initiated it. Tickets from a replaced load no longer match the store's
/// generation and their effects are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Exclusive owner of the live `PipelineState`.
#[derive(Debug, Default)]
pub struct PipelineStore {
    state: PipelineState,
    generation: u64,
}

impl PipelineStore {
    pub fn new() -> Self {
        PipelineStore {
            state: PipelineState::initial(),
            generation: 0,
        }
    }

    /// Read access to the live state. Mutation only happens through the
    /// transition methods below.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Begins a load: resets to the Idle shape, then moves to `Loading`
    /// with fresh file metadata and the detected format. Any in-flight
    /// load is replaced; its eventual completion will not apply.
    pub fn start_load(&mut self, file_name: &str, size: u64) -> LoadTicket {
        self.generation += 1;
        self.state = PipelineState::initial();
        self.state.format = FormatTag::from_file_name(file_name);
        self.state.source = Some(SourceFile {
            name: file_name.to_string(),
            size,
        });
        self.state.status = LoadStatus::Loading;
        debug!("load started: {} ({} bytes)", file_name, size);
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Publishes a parse result. Returns false (and changes nothing) when
    /// the ticket belongs to a replaced load.
    pub fn complete_load(&mut self, ticket: LoadTicket, table: Table) -> bool {
        if !self.ticket_is_live(ticket) {
            debug!("stale load completion discarded");
            return false;
        }
        self.state.headers = table.headers.clone();
        self.state.preview = table.clone();
        self.state.transformed = table;
        self.state.status = LoadStatus::Loaded;
        self.state.error = None;
        true
    }

    /// Records a parse failure, preserving file metadata for diagnosis.
    /// Same staleness rule as `complete_load`.
    pub fn fail_load(&mut self, ticket: LoadTicket, message: impl Into<String>) -> bool {
        if !self.ticket_is_live(ticket) {
            debug!("stale load failure discarded");
            return false;
        }
        self.state.status = LoadStatus::Error;
        self.state.error = Some(message.into());
        true
    }

    /// Publishes a derived table without touching `preview`. Ignored in
    /// `Idle`, where there is nothing to derive from.
    pub fn set_transformed(&mut self, table: Table) {
        if self.state.status == LoadStatus::Idle {
            return;
        }
        self.state.transformed = table;
    }

    /// Updates the editable query text. Legal in any state; storage only.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
    }

    /// Returns to the exact Idle shape. Also invalidates any outstanding
    /// load tickets.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = PipelineState::initial();
    }

    /// Convenience for callers that already hold the file content: runs
    /// the whole load cycle synchronously. Asynchronous acquisition should
    /// call `start_load` first and settle with the ticket later.
    pub fn load_bytes(&mut self, file_name: &str, raw: &[u8]) -> LoadTicket {
        let ticket = self.start_load(file_name, raw.len() as u64);
        match formats::ingest(file_name, raw) {
            Ok(table) => {
                self.complete_load(ticket, table);
            }
            Err(e) => {
                self.fail_load(ticket, e.to_string());
            }
        }
        ticket
    }

    /// Serializes the transformed table for download.
    pub fn export(
        &self,
        tag: FormatTag,
        base_name: &str,
    ) -> Result<formats::ExportPayload, formats::FormatError> {
        formats::export_table(tag, &self.state.transformed, base_name)
    }

    /// Surfaces a transform-stage failure. Only the state machine may show
    /// failures to the user; the parsed tables are left untouched.
    pub(crate) fn record_transform_failure(&mut self, message: String) {
        self.state.status = LoadStatus::Error;
        self.state.error = Some(message);
    }

    fn ticket_is_live(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation && self.state.status == LoadStatus::Loading
    }
}
