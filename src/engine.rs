//! The engine-level API, including the main actor, commands, and handles.
pub mod actor;
pub mod command;
pub mod handle;

pub use command::EngineCommand;
pub use handle::{EngineEvents, TimerEngine};
