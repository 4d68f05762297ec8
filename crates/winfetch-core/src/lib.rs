pub mod config;
pub mod logging;

pub mod catalog;
pub mod convert;
pub mod download;
pub mod error;
pub mod fallback;
pub mod heuristic;
pub mod progress;
pub mod resolver;
pub mod tools;
pub mod transport;

pub use error::WinfetchError;
pub use resolver::{ResolvedTarget, Resolver};
