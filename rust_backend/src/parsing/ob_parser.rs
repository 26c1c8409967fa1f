use anyhow::{Context, Result};
use std::path::Path;

use crate::models::ObservationBlock;

const PREVIEW_LEN: usize = 500;

fn preview(json_str: &str) -> String {
    match json_str.char_indices().nth(PREVIEW_LEN) {
        Some((end, _)) => format!("{}...", &json_str[..end]),
        None => json_str.to_string(),
    }
}

/// Parse an observation block file exported by Aspro2
pub fn parse_observation_block(json_path: &Path) -> Result<ObservationBlock> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_observation_block_str(&json_content)
        .with_context(|| format!("Invalid observation block in {}", json_path.display()))
}

/// Parse an observation block from a string
pub fn parse_observation_block_str(json_str: &str) -> Result<ObservationBlock> {
    let json_value: serde_json::Value = serde_json::from_str(json_str).with_context(|| {
        format!(
            "Invalid JSON syntax. First {} chars: {}",
            PREVIEW_LEN,
            preview(json_str)
        )
    })?;

    let has_configurations = json_value
        .as_object()
        .map(|o| o.contains_key("observationConfiguration"))
        .unwrap_or(false);
    if !has_configurations {
        anyhow::bail!(
            "JSON must contain an 'observationConfiguration' key. Found keys: {:?}",
            json_value.as_object().map(|o| o.keys().collect::<Vec<_>>())
        );
    }

    let block: ObservationBlock = serde_path_to_error::deserialize(json_value).map_err(|e| {
        anyhow::anyhow!(
            "Observation block deserialization error at '{}': {}",
            e.path(),
            e.inner()
        )
    })?;

    log::debug!(
        "Parsed observation block with {} configuration(s) on {}",
        block.observation_configuration.len(),
        block.interferometer_configuration.stations
    );
    Ok(block)
}
