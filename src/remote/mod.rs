pub mod http;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityId};

/// Error type for remote service calls. The store forwards these to its
/// error state as plain messages; there is no retry logic at any layer.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(EntityId),
}

/// Response envelope used by every endpoint: `{"data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One element of the bulk order-update body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: EntityId,
    pub order: u32,
}

/// The remote service contract the store is written against. `HttpRemote`
/// talks to the real backend; `MemoryRemote` backs tests and offline use.
pub trait Remote<E: Entity> {
    fn fetch_all(&mut self) -> Result<Vec<E>, RemoteError>;
    fn fetch_one(&mut self, id: &str) -> Result<E, RemoteError>;
    fn create(&mut self, draft: &E::Draft) -> Result<E, RemoteError>;
    fn update(&mut self, id: &str, patch: &E::Patch) -> Result<E, RemoteError>;
    fn delete(&mut self, id: &str) -> Result<(), RemoteError>;
    fn update_order(&mut self, entries: &[OrderEntry]) -> Result<(), RemoteError>;
}
