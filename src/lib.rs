pub mod clients;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod orchestrator;
pub mod orientation;
pub mod patterns;
pub mod schemas;
pub mod server;
pub mod storage;
pub mod tools;

pub use error::{CreativeOrientationError, Result};
pub use orchestrator::{CreativeOrchestrator, NoProgress, ProgressSink};
pub use patterns::PatternDictionary;
pub use server::CreativeOrientationServer;
