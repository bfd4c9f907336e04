//! Shared types for the scenecam workspace: node handles, frame stepping and
//! JSON config loading.

mod config;
mod types;

pub use config::{ConfigError, load_json, to_pretty_json};
pub use types::{FrameStep, NodeId, REFERENCE_FRAME_RATE};
