//! Library interface for inliner CLI components

pub mod commands;
pub mod config;

pub use commands::{handle_deps, handle_expand, ExpandArgs, SourceArgs};
pub use config::{ConfigError, InlinerConfig};
