//! MPEG-Convert Library
//!
//! Options negotiation and argument assembly for an interactive FFmpeg
//! front-end, plus the adapters that probe media, run the engine and draw
//! progress in the terminal.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod options;
pub mod ports;
pub mod probe;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use domain::catalog::QuestionCatalog;
pub use domain::model::{FlagMap, InterviewMode, Question};
pub use error::{ConvertError, ConvertResult};
pub use options::{ArgumentAssembler, OptionsNegotiator};
pub use probe::StreamMetadata;
