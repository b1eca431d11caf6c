//! Configuration management module
//!
//! This module handles loading the environment-sourced configuration
//! (account URL, connection string, container name) and validating it.

pub mod settings;

pub use settings::*;
