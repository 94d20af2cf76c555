//! # Configuration Module
//!
//! This module centralizes the configuration of the column format: numeric
//! constants shared by vectors and writers, and the per-file writer options.
//!
//! ## Module Organization
//!
//! - [`constants`]: Format constants with dependency documentation
//! - [`options`]: `WriterOptions`, `EncodingLevel`, `ByteOrder`

pub mod constants;
pub mod options;

pub use constants::*;
pub use options::{ByteOrder, EncodingLevel, WriterOptions};
