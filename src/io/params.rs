use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::ModelParameters;

/// Keys recognised in a parameter file, in `ModelParameters` field order.
pub const PARAMETER_KEYS: [&str; 6] = ["F", "m0", "mu", "v0", "t_end", "h"];

/// Parse `key = value` lines.
///
/// Blank lines, `#` comments and lines without `=` are skipped; unknown keys
/// are ignored. The line is split at the first `=`.
pub fn parse_params(text: &str) -> Result<ModelParameters> {
    let mut raw: HashMap<&str, f64> = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let Some(&known) = PARAMETER_KEYS.iter().find(|k| **k == key) else {
            continue;
        };
        let value = value.trim();
        let parsed = value.parse::<f64>().map_err(|_| Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        raw.insert(known, parsed);
    }

    let get = |key: &str| {
        raw.get(key)
            .copied()
            .ok_or_else(|| Error::MissingParameter(key.to_string()))
    };

    Ok(ModelParameters {
        thrust: get("F")?,
        m0: get("m0")?,
        mu: get("mu")?,
        v0: get("v0")?,
        t_end: get("t_end")?,
        h: get("h")?,
    })
}

pub fn read_params_file(path: impl AsRef<Path>) -> Result<ModelParameters> {
    let text = std::fs::read_to_string(path)?;
    parse_params(&text)
}

/// Inverse of [`parse_params`].
pub fn format_params(p: &ModelParameters) -> String {
    let values = [p.thrust, p.m0, p.mu, p.v0, p.t_end, p.h];
    PARAMETER_KEYS
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{} = {}\n", k, v))
        .collect()
}
