//! Headless drivers for the campus viewer, used by the `campus` binary.

pub mod replay;
pub mod script;
