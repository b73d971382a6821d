pub mod error;
pub mod tape;
pub mod hooks;
pub mod engine;

pub use engine::{run, run_with, Engine, EngineConfig, EofBehavior, RunStats};
pub use error::EngineError;
pub use hooks::{ByteIo, FnHooks, Streams};
