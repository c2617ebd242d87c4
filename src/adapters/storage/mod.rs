//! Storage Adapters
//!
//! Implementations of the SessionIdStorage port used by the partner client.
//!
//! ## Available Adapters
//!
//! - **FileSessionIdStorage** - Stores the paired session id as a YAML file
//! - **InMemorySessionIdStorage** - Keeps it in memory (testing/development)

mod file_session_id_storage;
mod in_memory_session_id_storage;

pub use file_session_id_storage::FileSessionIdStorage;
pub use in_memory_session_id_storage::InMemorySessionIdStorage;
