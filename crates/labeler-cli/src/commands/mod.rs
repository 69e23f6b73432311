//! CLI command implementations.

pub mod analyze;
pub mod compose;
pub mod manage;
pub mod select;
pub mod serve;
pub mod settings;
pub mod vocab;
