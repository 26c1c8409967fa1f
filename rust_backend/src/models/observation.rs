//! Observation block as exported by the Aspro2 planning tool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Photometric band of a target flux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    V,
    H,
    K,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Band::V => "V",
            Band::H => "H",
            Band::K => "K",
        };
        write!(f, "{}", s)
    }
}

/// A star referenced by an observation configuration (science, fringe tracker, AO or guide star).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Right ascension as exported, decimal degrees or `HH:MM:SS.sss`.
    #[serde(rename = "RA")]
    pub ra: String,
    /// Declination as exported, decimal degrees or `±DD:MM:SS.ss`.
    #[serde(rename = "DEC")]
    pub dec: String,
    /// Proper motion in RA, mas/yr.
    #[serde(rename = "PMRA", default, skip_serializing_if = "Option::is_none")]
    pub pmra: Option<f64>,
    /// Proper motion in DEC, mas/yr.
    #[serde(rename = "PMDEC", default, skip_serializing_if = "Option::is_none")]
    pub pmdec: Option<f64>,
    #[serde(rename = "FLUX_V", default, skip_serializing_if = "Option::is_none")]
    pub flux_v: Option<f64>,
    #[serde(rename = "FLUX_H", default, skip_serializing_if = "Option::is_none")]
    pub flux_h: Option<f64>,
    #[serde(rename = "FLUX_K", default, skip_serializing_if = "Option::is_none")]
    pub flux_k: Option<f64>,
    /// Angular diameter, mas.
    #[serde(rename = "DIAMETER", default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
}

impl Target {
    pub fn new(name: impl Into<String>, ra: impl Into<String>, dec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ra: ra.into(),
            dec: dec.into(),
            pmra: None,
            pmdec: None,
            flux_v: None,
            flux_h: None,
            flux_k: None,
            diameter: None,
        }
    }

    pub fn flux(&self, band: Band) -> Option<f64> {
        match band {
            Band::V => self.flux_v,
            Band::H => self.flux_h,
            Band::K => self.flux_k,
        }
    }

    pub fn with_flux(mut self, band: Band, value: f64) -> Self {
        match band {
            Band::V => self.flux_v = Some(value),
            Band::H => self.flux_h = Some(value),
            Band::K => self.flux_k = Some(value),
        }
        self
    }

    pub fn with_proper_motion(mut self, pmra: f64, pmdec: f64) -> Self {
        self.pmra = Some(pmra);
        self.pmdec = Some(pmdec);
        self
    }
}

/// Per-configuration observing constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationConstraints {
    /// Sidereal time window `"HH:MM/HH:MM"`.
    #[serde(rename = "LSTinterval", default, skip_serializing_if = "Option::is_none")]
    pub lst_interval: Option<String>,
}

/// One observation of the block: a science or calibrator star with its reference stars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationConfiguration {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "SCTarget")]
    pub sc_target: Target,
    #[serde(rename = "FTTarget", default, skip_serializing_if = "Option::is_none")]
    pub ft_target: Option<Target>,
    #[serde(rename = "AOTarget", default, skip_serializing_if = "Option::is_none")]
    pub ao_target: Option<Target>,
    #[serde(rename = "GSTarget", default, skip_serializing_if = "Option::is_none")]
    pub gs_target: Option<Target>,
    #[serde(
        rename = "observationConstraints",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub observation_constraints: Option<ObservationConstraints>,
}

impl ObservationConfiguration {
    pub fn is_science(&self) -> bool {
        self.kind.contains("SCIENCE")
    }

    pub fn lst_interval(&self) -> Option<&str> {
        self.observation_constraints
            .as_ref()
            .and_then(|c| c.lst_interval.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferometerConfiguration {
    /// Station list, e.g. `"A0 B2 C1 D0"` or `"U1 U2 U3 U4"`.
    pub stations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfiguration {
    #[serde(rename = "instrumentMode")]
    pub instrument_mode: String,
}

/// Complete observation block handed over by the planning tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationBlock {
    #[serde(rename = "interferometerConfiguration")]
    pub interferometer_configuration: InterferometerConfiguration,
    #[serde(rename = "instrumentConfiguration")]
    pub instrument_configuration: InstrumentConfiguration,
    #[serde(rename = "observationConfiguration")]
    pub observation_configuration: Vec<ObservationConfiguration>,
}
