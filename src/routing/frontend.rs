//! Frontend routing entry.

/// Resolved routing entry for one frontend host.
///
/// In the store this is an ordered list `[name, backend_0, backend_1, ...]`;
/// a list of length zero or one means the frontend has no backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontendEntry {
    name: String,
    backends: Vec<String>,
}

impl FrontendEntry {
    /// Build an entry from the raw store sequence.
    pub fn from_sequence(mut sequence: Vec<String>) -> Self {
        if sequence.is_empty() {
            return Self::default();
        }
        let name = sequence.remove(0);
        Self {
            name,
            backends: sequence,
        }
    }

    /// Human-readable frontend name (first list element).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backends(&self) -> &[String] {
        &self.backends
    }

    /// Number of backends, `sequence length - 1`.
    pub fn backend_len(&self) -> usize {
        self.backends.len()
    }

    pub fn backend(&self, idx: usize) -> Option<&str> {
        self.backends.get(idx).map(String::as_str)
    }

    pub fn has_backends(&self) -> bool {
        !self.backends.is_empty()
    }
}
