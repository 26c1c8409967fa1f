//! Parameter containers filled by the instrument logic and sent to P2.
//!
//! - [`template`]: keyword sets of a template, validated against the range table
//! - [`fixed`]: target and constraints sections with a closed list of names
//! - [`keywords`]: keyword names and their attribute-style spelling

pub mod fixed;
pub mod keywords;
pub mod template;

pub use fixed::{FixedParams, ObConstraints, ObTarget};
pub use template::TemplateParams;
