//! Chat-platform boundary: the port the core talks through and the events it consumes.

pub mod port;
pub mod retry;
pub mod types;
