//! Readers for the planning tool exports.
//!
//! - [`ob_parser`]: observation blocks exported by Aspro2 as JSON
//!
//! # Example
//!
//! ```no_run
//! use vlti_ob::parsing::ob_parser::parse_observation_block;
//! use std::path::Path;
//!
//! let ob = parse_observation_block(Path::new("ob.json"))
//!     .expect("Failed to parse observation block");
//! ```

pub mod ob_parser;

#[cfg(test)]
mod ob_parser_tests;

pub use ob_parser::{parse_observation_block, parse_observation_block_str};
