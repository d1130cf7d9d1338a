//! Storage backends for port records.
//!
//! The repository is volatile: everything lives in process memory and is
//! lost on restart. Durable backends plug in behind [`PortRepository`].

pub mod backend;
pub mod memory;

// Re-export commonly used types
pub use backend::PortRepository;
pub use memory::InMemoryPortRepository;
