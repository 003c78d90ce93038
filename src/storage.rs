/// Key-value backends the snapshot is written to.
pub mod backend;
/// JSON encoding of the item collection.
pub mod snapshot;
mod store;

pub use backend::{Backend, BackendError, FileBackend, MemoryBackend};
pub use snapshot::SnapshotError;
pub use store::{ItemStore, NotFound};
