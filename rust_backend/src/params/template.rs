//! Template parameter sets validated against the instrument range table.

use std::fmt;
use std::sync::Arc;

use super::keywords::keyword_from_attr;
use crate::error::{ObError, ObResult};
use crate::models::ParamValue;
use crate::tables::RangeTable;

/// Keyword values of one template signature file.
///
/// A new set starts with the defaults declared for its template. Values written through
/// [`TemplateParams::set`] are checked against the range table; [`TemplateParams::set_unchecked`]
/// bypasses the check for values P2 computes or accepts outside the signature file.
#[derive(Debug, Clone)]
pub struct TemplateParams {
    template: String,
    ranges: Arc<RangeTable>,
    values: Vec<(String, ParamValue)>,
}

impl TemplateParams {
    pub fn new(ranges: Arc<RangeTable>, template: &str) -> ObResult<Self> {
        let values = ranges.get_range_defaults(template)?;
        Ok(Self {
            template: template.to_string(),
            ranges,
            values,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Validate and store a keyword value.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> ObResult<()> {
        let value = value.into();
        if !self.ranges.is_in_range(&self.template, key, &value)? {
            return Err(ObError::OutOfRange {
                value: value.to_string(),
                keyword: key.to_string(),
                template: self.template.clone(),
            });
        }
        self.set_unchecked(key, value);
        Ok(())
    }

    /// Store a keyword value without consulting the range table.
    pub fn set_unchecked(&mut self, key: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> ObResult<&ParamValue> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| ObError::UnknownKeyword {
                keyword: key.to_string(),
                template: self.template.clone(),
            })
    }

    /// Numeric value of a keyword; text values are a validation error.
    pub fn get_f64(&self, key: &str) -> ObResult<f64> {
        let value = self.get(key)?;
        value.as_f64().ok_or_else(|| {
            ObError::Validation(format!(
                "keyword {} in template {} is not numeric: {}",
                key, self.template, value
            ))
        })
    }

    /// Read a keyword by its attribute-style name (`SEQ_INS_SOBJ_MAG`).
    pub fn get_attr(&self, attr: &str) -> ObResult<&ParamValue> {
        self.get(&keyword_from_attr(attr))
    }

    /// Write a keyword by its attribute-style name, always validated.
    pub fn set_attr(&mut self, attr: &str, value: impl Into<ParamValue>) -> ObResult<()> {
        self.set(&keyword_from_attr(attr), value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keyword values as the JSON object expected by `setTemplateParams`.
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl fmt::Display for TemplateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TSF values ({}) :", self.template)?;
        for (k, v) in &self.values {
            writeln!(f, "    {:>30} : {}", k, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::keywords::*;
    use crate::tables::fixtures::RANGE_TABLE_JSON;

    fn acq() -> TemplateParams {
        let ranges = Arc::new(RangeTable::from_json_str(RANGE_TABLE_JSON).unwrap());
        TemplateParams::new(ranges, "GRAVITY_gen_acq.tsf").unwrap()
    }

    #[test]
    fn test_defaults_are_preloaded() {
        let params = acq();
        assert_eq!(params.get(INS_SPEC_RES).unwrap(), &ParamValue::from("MED"));
        assert_eq!(params.get(COU_AG_PMA).unwrap(), &ParamValue::Float(0.0));
        assert!(!params.contains(SEQ_INS_SOBJ_NAME));
    }

    #[test]
    fn test_set_validates() {
        let mut params = acq();
        params.set(INS_SPEC_RES, "HIGH").unwrap();
        assert_eq!(params.get(INS_SPEC_RES).unwrap().as_str(), Some("HIGH"));

        let err = params.set(INS_SPEC_RES, "ULTRA").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ULTRA"));
        assert!(msg.contains(INS_SPEC_RES));
        assert!(msg.contains("GRAVITY_gen_acq.tsf"));
        // failed write leaves the previous value in place
        assert_eq!(params.get(INS_SPEC_RES).unwrap().as_str(), Some("HIGH"));
    }

    #[test]
    fn test_set_unknown_keyword_fails() {
        let mut params = acq();
        let err = params.set("DET2.DIT", 1.0).unwrap_err();
        assert!(matches!(err, ObError::UnknownKeyword { .. }));
    }

    #[test]
    fn test_set_unchecked_bypasses_range() {
        let mut params = acq();
        params.set_unchecked(COU_AG_PMA, 99.0);
        params.set_unchecked("SEQ.NOT.IN.TABLE", "x");
        assert_eq!(params.get_f64(COU_AG_PMA).unwrap(), 99.0);
        assert!(params.contains("SEQ.NOT.IN.TABLE"));
    }

    #[test]
    fn test_attribute_style_access() {
        let mut params = acq();
        params.set_attr("SEQ_INS_SOBJ_MAG", 6.0).unwrap();
        assert_eq!(params.get_attr("SEQ_INS_SOBJ_MAG").unwrap(), &ParamValue::Float(6.0));
        assert!(params.set_attr("SEQ_INS_SOBJ_MAG", 42.0).is_err());

        let err = params.get_attr("SEQ_INS_SOBJ_NAME").unwrap_err();
        assert!(err.to_string().contains("unknown keyword 'SEQ.INS.SOBJ.NAME'"));
    }

    #[test]
    fn test_json_map_and_display() {
        let mut params = acq();
        params.set(SEQ_INS_SOBJ_NAME, "HD 1234").unwrap();
        let map = params.to_json_map();
        assert_eq!(map[SEQ_INS_SOBJ_NAME], serde_json::json!("HD 1234"));
        assert_eq!(map.keys().last().map(String::as_str), Some(SEQ_INS_SOBJ_NAME));

        let text = params.to_string();
        assert!(text.starts_with("TSF values (GRAVITY_gen_acq.tsf) :"));
        assert!(text.contains("SEQ.INS.SOBJ.NAME : HD 1234"));
    }
}
