//! Runtime for the interaction controller
//!
//! Applies state machine effects, owns the input widgets and dispatches the
//! single outstanding exchange.

mod controller;
pub mod input;

#[cfg(test)]
pub mod testing;

pub use controller::Controller;
pub use input::{Focus, Key};
