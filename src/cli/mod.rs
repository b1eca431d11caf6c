//! CLI module for azbucket
//!
//! Command definitions, argument parsing, and command execution for the
//! `azb` binary.

pub mod commands;

pub use commands::*;
