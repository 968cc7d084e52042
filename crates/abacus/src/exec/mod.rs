//! Execution engine: the containment boundary between operation
//! implementations and the agent loop.

mod engine;

pub use engine::Engine;
