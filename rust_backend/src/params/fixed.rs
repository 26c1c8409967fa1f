//! Fixed-schema containers for the OB target and constraints sections.

use std::fmt;

use super::keywords::keyword_from_attr;
use crate::error::{ObError, ObResult};
use crate::models::ParamValue;

/// Key/value holder accepting only a closed set of names.
///
/// No defaults and no range checks: the values are copied verbatim into the OB.
#[derive(Debug, Clone)]
pub struct FixedParams {
    kind: &'static str,
    permitted: &'static [&'static str],
    values: Vec<(String, ParamValue)>,
}

impl FixedParams {
    pub fn new(kind: &'static str, permitted: &'static [&'static str]) -> Self {
        Self {
            kind,
            permitted,
            values: Vec::new(),
        }
    }

    pub fn permitted(&self) -> &'static [&'static str] {
        self.permitted
    }

    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> ObResult<()> {
        let key = keyword_from_attr(name);
        if !self.permitted.contains(&key.as_str()) {
            return Err(ObError::UnsupportedKeyword {
                keyword: name.to_string(),
                permitted: self.permitted.to_vec(),
            });
        }
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((key, value)),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = keyword_from_attr(name);
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl fmt::Display for FixedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} values:", self.kind)?;
        for (k, v) in &self.values {
            writeln!(f, "    {:>30} : {}", k, v)?;
        }
        Ok(())
    }
}

const TARGET_KEYS: &[&str] = &["name", "ra", "dec", "properMotionRa", "properMotionDec"];

const CONSTRAINT_KEYS: &[&str] = &[
    "name",
    "seeing",
    "skyTransparency",
    "baseline",
    "airmass",
    "fli",
];

/// Target section of an OB.
#[derive(Debug, Clone)]
pub struct ObTarget(FixedParams);

impl ObTarget {
    pub fn new() -> Self {
        Self(FixedParams::new("OBTarget", TARGET_KEYS))
    }

    pub fn set_name(&mut self, name: &str) -> ObResult<()> {
        self.0.set("name", name)
    }

    pub fn set_coords(&mut self, ra: &str, dec: &str) -> ObResult<()> {
        self.0.set("ra", ra)?;
        self.0.set("dec", dec)
    }

    pub fn set_proper_motion(&mut self, pmra: f64, pmdec: f64) -> ObResult<()> {
        self.0.set("properMotionRa", pmra)?;
        self.0.set("properMotionDec", pmdec)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(ParamValue::as_str)
    }

    pub fn ra(&self) -> Option<&str> {
        self.0.get("ra").and_then(ParamValue::as_str)
    }

    pub fn dec(&self) -> Option<&str> {
        self.0.get("dec").and_then(ParamValue::as_str)
    }

    pub fn params(&self) -> &FixedParams {
        &self.0
    }

    pub fn params_mut(&mut self) -> &mut FixedParams {
        &mut self.0
    }
}

impl Default for ObTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Constraints section of an OB.
#[derive(Debug, Clone)]
pub struct ObConstraints(FixedParams);

impl ObConstraints {
    pub fn new() -> Self {
        Self(FixedParams::new("OBConstraints", CONSTRAINT_KEYS))
    }

    pub fn set_name(&mut self, name: &str) -> ObResult<()> {
        self.0.set("name", name)
    }

    pub fn set_seeing(&mut self, arcsec: f64) -> ObResult<()> {
        self.0.set("seeing", arcsec)
    }

    pub fn set_sky_transparency(&mut self, transparency: &str) -> ObResult<()> {
        self.0.set("skyTransparency", transparency)
    }

    pub fn set_baseline(&mut self, baseline: &str) -> ObResult<()> {
        self.0.set("baseline", baseline)
    }

    pub fn set_airmass(&mut self, airmass: f64) -> ObResult<()> {
        self.0.set("airmass", airmass)
    }

    pub fn set_fli(&mut self, fli: f64) -> ObResult<()> {
        self.0.set("fli", fli)
    }

    pub fn baseline(&self) -> Option<&str> {
        self.0.get("baseline").and_then(ParamValue::as_str)
    }

    pub fn sky_transparency(&self) -> Option<&str> {
        self.0.get("skyTransparency").and_then(ParamValue::as_str)
    }

    pub fn params(&self) -> &FixedParams {
        &self.0
    }

    pub fn params_mut(&mut self) -> &mut FixedParams {
        &mut self.0
    }
}

impl Default for ObConstraints {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
