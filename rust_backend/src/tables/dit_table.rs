//! Detector integration time (DIT) table.
//!
//! Only the AT part of the table is populated; UT values are derived by shifting the
//! magnitude breakpoints by `Kut`, dual-field observations by `Kdf`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ObError, ObResult};
use crate::models::Telescope;

/// Table key holding the reference breakpoints.
pub const REFERENCE_TELESCOPE: &str = "AT";

/// Magnitude breakpoints and DIT values of one spectral/polarization mode.
///
/// Bucket `i` covers `[mags[i], mags[i + 1])` and maps to `dits[i]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DitBuckets {
    #[serde(rename = "MAG")]
    pub mags: Vec<f64>,
    #[serde(rename = "DIT")]
    pub dits: Vec<f64>,
}

impl DitBuckets {
    /// DIT of the first bucket containing `k`.
    pub fn lookup(&self, k: f64) -> Option<f64> {
        self.dits
            .iter()
            .enumerate()
            .find(|(i, _)| self.mags[*i] <= k && k < self.mags[i + 1])
            .map(|(_, dit)| *dit)
    }

    /// Covered magnitude window, shifted by `offset`.
    pub fn window(&self, offset: f64) -> (f64, f64) {
        let mut kmin = f64::INFINITY;
        let mut kmax = f64::NEG_INFINITY;
        for i in 0..self.dits.len() {
            kmin = kmin.min(self.mags[i] + offset);
            kmax = kmax.max(self.mags[i + 1] + offset);
        }
        (kmin, kmax)
    }
}

/// Per-telescope section: magnitude corrections plus `spec -> pol -> buckets`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelescopeDits {
    /// Magnitude correction applied in dual-field mode.
    #[serde(rename = "Kdf", default)]
    pub kdf: f64,
    /// Magnitude correction applied on the Unit Telescopes.
    #[serde(rename = "Kut", default)]
    pub kut: f64,
    #[serde(flatten)]
    pub modes: BTreeMap<String, BTreeMap<String, DitBuckets>>,
}

/// Immutable DIT table of an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct DitTable {
    telescopes: BTreeMap<String, TelescopeDits>,
}

impl DitTable {
    /// Load a DIT table from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ObResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ObError::TableLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|message| ObError::TableLoad {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a DIT table from a JSON string.
    pub fn from_json_str(json: &str) -> ObResult<Self> {
        Self::parse(json).map_err(|message| ObError::TableLoad {
            path: "<string>".into(),
            message,
        })
    }

    fn parse(json: &str) -> Result<Self, String> {
        let telescopes: BTreeMap<String, TelescopeDits> =
            serde_json::from_str(json).map_err(|e| format!("invalid DIT table: {}", e))?;

        for (tel, section) in &telescopes {
            for (spec, pols) in &section.modes {
                for (pol, buckets) in pols {
                    if buckets.dits.is_empty() || buckets.mags.len() != buckets.dits.len() + 1 {
                        return Err(format!(
                            "{}/{}/{}: expected {} MAG breakpoints for {} DIT values, found {}",
                            tel,
                            spec,
                            pol,
                            buckets.dits.len() + 1,
                            buckets.dits.len(),
                            buckets.mags.len()
                        ));
                    }
                }
            }
        }

        Ok(Self { telescopes })
    }

    pub fn telescope(&self, tel: &str) -> ObResult<&TelescopeDits> {
        self.telescopes
            .get(tel)
            .ok_or_else(|| ObError::Lookup(format!("no DIT table for telescope '{}'", tel)))
    }

    pub fn buckets(&self, spec: &str, pol: &str) -> ObResult<&DitBuckets> {
        self.telescope(REFERENCE_TELESCOPE)?
            .modes
            .get(spec)
            .and_then(|pols| pols.get(pol))
            .ok_or_else(|| {
                ObError::Lookup(format!(
                    "no DIT values for spec '{}' and pol '{}'",
                    spec, pol
                ))
            })
    }

    /// Total magnitude correction for a telescope and field mode.
    pub fn magnitude_offset(&self, tel: Telescope, dual_feed: bool) -> ObResult<f64> {
        let reference = self.telescope(REFERENCE_TELESCOPE)?;
        let mut dk = if dual_feed { reference.kdf } else { 0.0 };
        if tel == Telescope::UT {
            dk += reference.kut;
        }
        Ok(dk)
    }

    /// Find the DIT for magnitude `k` in the given mode.
    ///
    /// Fails with [`ObError::MagnitudeOutOfRange`] when the corrected magnitude is not covered.
    pub fn get_dit(
        &self,
        tel: Telescope,
        spec: &str,
        pol: &str,
        k: f64,
        dual_feed: bool,
        show_warning: bool,
    ) -> ObResult<f64> {
        let buckets = self.buckets(spec, pol)?;
        let dk = self.magnitude_offset(tel, dual_feed)?;

        if let Some(dit) = buckets.lookup(k - dk) {
            return Ok(dit);
        }

        let (kmin, kmax) = buckets.window(dk);
        if show_warning {
            log::debug!(
                "K={} outside DIT coverage [{}, {}] for {}/{}/{} (dual={})",
                k,
                kmin,
                kmax,
                tel,
                spec,
                pol,
                dual_feed
            );
        }
        if k == kmin {
            return Err(ObError::UndefinedMinDit {
                k,
                tel: tel.to_string(),
                spec: spec.to_string(),
                pol: pol.to_string(),
            });
        }
        Err(ObError::MagnitudeOutOfRange {
            k,
            kmin,
            kmax,
            tel: tel.to_string(),
            spec: spec.to_string(),
            pol: pol.to_string(),
            dual_feed,
        })
    }
}
