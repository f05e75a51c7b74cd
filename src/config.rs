/// Per-table settings.
///
/// Diagnostics are opt-in per table rather than switched on process-wide:
/// a table built with `verbose == false` emits no `tracing` events at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConfig {
    /// Label attached to diagnostic events, e.g. the extension name.
    pub name: Option<String>,
    /// Emit `tracing` debug/trace events for scans and mutations.
    pub verbose: bool,
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Label used in diagnostic events.
    pub(crate) fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
