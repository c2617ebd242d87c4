//! Implementations of the SyncApi port.

mod http_sync_api;
mod local_sync_api;

pub use http_sync_api::HttpSyncApi;
pub use local_sync_api::LocalSyncApi;
