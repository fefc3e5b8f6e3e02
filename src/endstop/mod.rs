//! Endstop input handling.
//!
//! The raw switch level is read through [`EndstopInput`] and filtered by a
//! time-based [`Debouncer`] before any decision is made on it.

mod debounce;
mod switch;

pub use debounce::Debouncer;
pub use switch::{Endstop, EndstopInput};
