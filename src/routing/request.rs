//! Per-request routing decision record.

use std::time::{Duration, SystemTime};

/// Decision record produced by `Router::choose_backend` and consumed once by
/// `Router::end_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestData {
    /// Requested frontend host.
    pub host: String,
    /// Frontend host, set only once a non-empty backend list was found.
    pub backend_key: String,
    /// Chosen backend URL, empty if none was selected.
    pub backend: String,
    /// Index of `backend` in the frontend's backend list.
    pub backend_idx: usize,
    /// Number of backends found, 0 if none.
    pub backend_len: usize,
    /// Wall-clock time selection began.
    pub start_time: SystemTime,
}

impl RequestData {
    /// Fresh record for `host` with `start_time` set to now.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            backend_key: String::new(),
            backend: String::new(),
            backend_idx: 0,
            backend_len: 0,
            start_time: SystemTime::now(),
        }
    }

    /// True once a backend has been chosen.
    pub fn has_backend(&self) -> bool {
        !self.backend.is_empty()
    }

    /// Time since selection began. Zero if the clock went backwards.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed().unwrap_or_default()
    }
}
