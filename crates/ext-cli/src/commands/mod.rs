//! Command implementations for ext-cli

pub mod inspect;
pub mod scan;

pub use inspect::run_inspect;
pub use scan::run_scan;
