//! Keyword range table extracted from the instrument template signature files.
//!
//! The JSON document maps a comma-separated list of template names to the keywords of
//! those templates:
//!
//! ```json
//! {
//!   "GRAVITY_gen_acq.tsf": {
//!     "SEQ.FI.HMAG": { "min": -10.0, "max": 20.0, "default": 0.0 },
//!     "INS.SPEC.RES": { "list": ["LOW", "MED", "HIGH"], "default": "MED" }
//!   },
//!   "GRAVITY_single_obs_exp.tsf, GRAVITY_dual_obs_exp.tsf": {
//!     "SEQ.OBSSEQ": { "spaceseparatedlist": ["O", "S"], "default": "O S O" }
//!   }
//! }
//! ```
//!
//! Document order is preserved, both for templates and keywords.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ObError, ObResult};
use crate::models::ParamValue;

/// Constraint declared for one keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound {
    /// Inclusive numeric interval.
    MinMax { min: f64, max: f64 },
    /// Value must be one of the listed ones.
    List(Vec<ParamValue>),
    /// Every whitespace-separated token of the value must be listed.
    SpaceSeparatedList(Vec<String>),
    /// No constraint in the signature file.
    Unconstrained,
}

impl RangeBound {
    pub fn accepts(&self, value: &ParamValue) -> bool {
        match self {
            RangeBound::MinMax { min, max } => value
                .as_f64()
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            RangeBound::List(allowed) => allowed.iter().any(|a| a == value),
            RangeBound::SpaceSeparatedList(allowed) => {
                let text = value.to_string();
                text.split_whitespace()
                    .all(|token| allowed.iter().any(|a| a == token))
            }
            RangeBound::Unconstrained => true,
        }
    }
}

/// Range and optional default of a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRange {
    pub bound: RangeBound,
    pub default: Option<ParamValue>,
}

#[derive(Debug, Deserialize)]
struct RawKeywordRange {
    min: Option<f64>,
    max: Option<f64>,
    list: Option<Vec<ParamValue>>,
    spaceseparatedlist: Option<Vec<String>>,
    default: Option<ParamValue>,
}

impl TryFrom<RawKeywordRange> for KeywordRange {
    type Error = String;

    fn try_from(raw: RawKeywordRange) -> Result<Self, Self::Error> {
        let bound = match (raw.min, raw.max, raw.list, raw.spaceseparatedlist) {
            (Some(min), Some(max), None, None) => RangeBound::MinMax { min, max },
            (None, None, Some(list), None) => RangeBound::List(list),
            (None, None, None, Some(ssl)) => RangeBound::SpaceSeparatedList(ssl),
            (None, None, None, None) => RangeBound::Unconstrained,
            (Some(_), None, None, None) | (None, Some(_), None, None) => {
                return Err("'min' and 'max' must be given together".to_string())
            }
            _ => return Err("more than one kind of range is declared".to_string()),
        };
        Ok(Self {
            bound,
            default: raw.default,
        })
    }
}

/// Keyword ranges shared by one or more template names.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRanges {
    /// Table key as written in the document.
    pub key: String,
    pub aliases: Vec<String>,
    pub keywords: Vec<(String, KeywordRange)>,
}

impl TemplateRanges {
    pub fn matches(&self, template: &str) -> bool {
        self.aliases.iter().any(|a| a == template)
    }

    pub fn keyword(&self, keyword: &str) -> Option<&KeywordRange> {
        self.keywords
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, range)| range)
    }
}

/// Immutable range table of an instrument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeTable {
    templates: Vec<TemplateRanges>,
}

impl RangeTable {
    /// Load a range table from a JSON file.
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

    /// Parse a range table from a JSON string.
    pub fn from_json_str(json: &str) -> ObResult<Self> {
        Self::parse(json).map_err(|message| ObError::TableLoad {
            path: "<string>".into(),
            message,
        })
    }

    fn parse(json: &str) -> Result<Self, String> {
        let document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| format!("invalid JSON: {}", e))?;

        let mut templates = Vec::with_capacity(document.len());
        for (key, body) in document {
            let body = match body {
                serde_json::Value::Object(map) => map,
                other => {
                    return Err(format!(
                        "template entry '{}' must be an object, found {}",
                        key, other
                    ))
                }
            };

            let mut keywords = Vec::with_capacity(body.len());
            for (keyword, descriptor) in body {
                let raw: RawKeywordRange = serde_json::from_value(descriptor)
                    .map_err(|e| format!("{} / {}: {}", key, keyword, e))?;
                let range = KeywordRange::try_from(raw)
                    .map_err(|e| format!("{} / {}: {}", key, keyword, e))?;
                keywords.push((keyword, range));
            }

            let aliases = key.split(',').map(|a| a.trim().to_string()).collect();
            templates.push(TemplateRanges {
                key,
                aliases,
                keywords,
            });
        }

        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[TemplateRanges] {
        &self.templates
    }

    /// Resolve the entry whose alias list names `template`. When several entries
    /// alias the same name the last one in the document wins.
    pub fn entry(&self, template: &str) -> ObResult<&TemplateRanges> {
        self.templates
            .iter()
            .rev()
            .find(|t| t.matches(template))
            .ok_or_else(|| ObError::UnknownTemplate {
                template: template.to_string(),
            })
    }

    pub fn keyword(&self, template: &str, keyword: &str) -> ObResult<&KeywordRange> {
        self.entry(template)?
            .keyword(keyword)
            .ok_or_else(|| ObError::UnknownKeyword {
                keyword: keyword.to_string(),
                template: template.to_string(),
            })
    }

    /// Check `value` against the declared range of `keyword` in `template`.
    pub fn is_in_range(&self, template: &str, keyword: &str, value: &ParamValue) -> ObResult<bool> {
        Ok(self.keyword(template, keyword)?.bound.accepts(value))
    }

    /// Raw range of a keyword, for display.
    pub fn get_range(&self, template: &str, keyword: &str) -> ObResult<&RangeBound> {
        Ok(&self.keyword(template, keyword)?.bound)
    }

    /// Default value of every keyword of `template` that declares one, in table order.
    pub fn get_range_defaults(&self, template: &str) -> ObResult<Vec<(String, ParamValue)>> {
        Ok(self
            .entry(template)?
            .keywords
            .iter()
            .filter_map(|(k, range)| range.default.clone().map(|d| (k.clone(), d)))
            .collect())
    }
}
