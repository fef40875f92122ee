pub mod aggregate;
pub mod analyze;
pub mod cli;
pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod generate;
pub mod scan;
pub mod types;

pub use aggregate::Aggregator;
pub use analyze::Extractor;
pub use config::Config;
pub use engine::{Engine, EngineResult, ProcessOptions};
pub use error::{Result, StubError};
pub use types::*;
