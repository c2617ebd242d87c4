//! Pairing code adapters.

mod code_generator;
mod in_memory_registry;
mod sweeper;

pub use code_generator::{RandomCodeGenerator, SequenceCodeGenerator};
pub use in_memory_registry::InMemoryPairingRegistry;
pub use sweeper::spawn_code_sweeper;
