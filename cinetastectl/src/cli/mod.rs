pub mod args;
pub mod render;

pub use args::{Cli, Command};
