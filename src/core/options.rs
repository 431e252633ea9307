// Load-time policy knobs for a result table.

/// What to do when a result set reports the same column name twice.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DuplicateColumns {
    /// Lookup by name resolves to the last column carrying that name.
    #[default]
    LastWins,
    /// Loading fails with `StreamFailure`. The error is raised by the table, not
    /// the driver; its message says the column was rejected by table options.
    Reject,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    /// Temporal bytes that match no known literal shape fail with `Parse`
    /// instead of reading as the zero timestamp.
    pub strict_temporal: bool,
    pub duplicate_columns: DuplicateColumns,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_temporal(mut self, strict: bool) -> Self {
        self.strict_temporal = strict;
        self
    }

    pub fn with_duplicate_columns(mut self, policy: DuplicateColumns) -> Self {
        self.duplicate_columns = policy;
        self
    }
}
