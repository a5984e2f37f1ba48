//! Record/replay infrastructure for deterministic runs without network access.

pub mod format;
pub mod loader;
pub mod recorder;
pub mod replayer;
