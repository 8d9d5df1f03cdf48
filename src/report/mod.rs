//! Report generation modules.

pub mod console;
pub mod generator;

pub use generator::*;
