//! CLI command handlers, one per file.

mod esd;
mod iso;
mod tools;

pub use esd::{run_esd, EsdOptions};
pub use iso::run_iso;
pub use tools::run_tools;
