//! Token persistence adapters.
//!
//! Two implementations of the `TokenStorage` port: an in-memory store for
//! tests and short-lived processes, and a file-backed store that mirrors
//! the browser client's local-storage document.

mod file;
mod memory;

pub use file::FileTokenStorage;
pub use memory::MemoryTokenStorage;
