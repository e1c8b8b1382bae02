//! Command-line interface module.

mod args;
pub mod common;
pub mod render;
pub mod serve;
pub mod validate;

pub use args::{Cli, Commands, RenderArgs, ValidateArgs};
