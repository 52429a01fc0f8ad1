// Library crate: editor core shared by the CLI, the wasm bindings, and tests.

pub mod command;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod state;
