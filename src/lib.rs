pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod projection;
pub mod storage;
pub mod tracker;
pub mod workflow;

pub use config::Config;
pub use error::{RegTrackerError, Result};
pub use storage::{Gateway, MemoryStore, SqliteStore};
pub use tracker::Tracker;
