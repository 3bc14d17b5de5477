//! `voltline-emulator` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod generator;
pub mod sender;
