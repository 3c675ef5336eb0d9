//! Routing errors.

use thiserror::Error;

use crate::routing::request::RequestData;
use crate::store::StoreError;

/// Errors surfaced by the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Reading the frontend entry or dead set failed.
    #[error("error running routes backend commands: {0}")]
    Store(#[source] StoreError),

    /// The frontend is missing or lists no backends.
    #[error("error running routes backend commands: no backends available")]
    NoBackends,

    /// Every backend of the frontend is marked dead.
    #[error("all backends are dead")]
    AllDead,

    /// Recording a failed backend in the dead set failed.
    #[error("error marking backend dead: {0}")]
    MarkDead(#[source] StoreError),
}

/// A failed backend selection.
///
/// Carries the partially populated [`RequestData`] so the proxy layer can
/// still report on the request (`host`, `backend_len`, `start_time`).
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ChooseError {
    pub data: RequestData,
    pub kind: RouteError,
}

impl ChooseError {
    pub fn new(data: RequestData, kind: RouteError) -> Self {
        Self { data, kind }
    }

    pub fn into_parts(self) -> (RequestData, RouteError) {
        (self.data, self.kind)
    }
}
