//! Unit test entry point for the `tests/unit/` modules.

mod unit;
