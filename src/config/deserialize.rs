// ABOUTME: Shapes accepted for a `plugins` list entry.
// ABOUTME: Either a bare plugin name or a [name, config] pair; errors name the offending part.

use serde::Deserialize;
use serde::de::{Error as _, Unexpected};
use serde_json::Value;

use super::DeploymentPluginSpec;
use crate::plugin::PluginConfig;

const EXPECTED_ENTRY: &str = "a plugin name or a [name, config] pair";
const EXPECTED_PAIR: &str = "a [name] or [name, config] array";

/// Read one `plugins` entry.
///
/// A pair without a config, or with a null one, gets an empty config.
pub(super) fn plugin_entry(entry: &Value) -> Result<DeploymentPluginSpec, serde_json::Error> {
    match entry {
        Value::String(name) => Ok(DeploymentPluginSpec::new(name.clone())),
        Value::Array(items) => match items.as_slice() {
            [name] | [name, Value::Null] => {
                Ok(DeploymentPluginSpec::new(String::deserialize(name)?))
            }
            [name, config] => Ok(DeploymentPluginSpec::with_config(
                String::deserialize(name)?,
                PluginConfig::deserialize(config)?,
            )),
            other => Err(serde_json::Error::invalid_length(other.len(), &EXPECTED_PAIR)),
        },
        other => Err(serde_json::Error::invalid_type(unexpected(other), &EXPECTED_ENTRY)),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
