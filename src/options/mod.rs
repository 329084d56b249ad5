//! Option negotiation and engine argument assembly

pub mod assembler;
pub mod custom_args;
pub mod negotiator;

pub use assembler::{parse_invocation, ArgumentAssembler, Invocation};
pub use negotiator::{NegotiatedOptions, OptionsNegotiator};
