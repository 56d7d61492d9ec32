//! Testing infrastructure for compdb integration tests.
//!
//! - `BuildTree`: isolated build output directory with command records
//! - `fixtures`: Kbuild-style record text
//! - `assertions`: checks against a written compile_commands.json

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{BuildTree, CliResult};
