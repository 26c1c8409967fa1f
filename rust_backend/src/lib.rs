//! VLTI OB generator.
//!
//! Turns observation blocks exported by the Aspro2 planning tool into GRAVITY observation
//! blocks on the ESO P2 service: keyword values are validated against the instrument range
//! table, exposure timing is derived from the DIT table and the target magnitude, and the
//! result is submitted through a [`p2::P2Api`] implementation.
//!
//! ```no_run
//! use vlti_ob::config::VltiConfig;
//! use vlti_ob::p2::{ContainerId, LocalP2Api};
//! use vlti_ob::parsing::parse_observation_block;
//! use vlti_ob::ui::LogUi;
//! use std::path::Path;
//!
//! let gravity = VltiConfig::from_default_location()?.gravity()?;
//! let ob = parse_observation_block(Path::new("ob.json")).expect("readable export");
//! let report = gravity.check_ob(&ob, &mut LocalP2Api::new(), &mut LogUi, ContainerId(1), true)?;
//! println!("{} OB(s) ready", report.entries.len());
//! # Ok::<(), vlti_ob::ObError>(())
//! ```

pub mod config;
pub mod error;
pub mod instrument;
pub mod models;
pub mod p2;
pub mod params;
pub mod parsing;
pub mod tables;
pub mod ui;

pub use error::{ObError, ObResult};
pub use instrument::{Gravity, ObReport, VltiInstrument};
