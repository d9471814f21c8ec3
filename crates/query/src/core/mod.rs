//! Record source traits and fetch coordination.
//!
//! - [`RecordSource`] - Async source of record pages (backend or mock service)
//! - [`InMemorySource`] - Mock-data implementation over a fixed collection
//! - [`FetchCoordinator`] - Latest-wins fetching that drops stale responses

mod coordinator;
mod source;

pub use coordinator::{FetchCoordinator, FetchState};
pub use source::{InMemorySource, RecordSource, RemoteQuery, decode_records};
